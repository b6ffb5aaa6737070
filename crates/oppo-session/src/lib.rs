//! Caller-side session state for the Oppo serial protocol.
//!
//! The protocol crate's dispatcher is stateless; this crate keeps the state
//! around it that a transport loop needs:
//!
//! - [`PendingRequests`]: commands sent and not yet answered, oldest first,
//!   each with an advisory deadline
//! - [`Session`]: encodes commands, splits the incoming byte stream into
//!   frames, dispatches them and resolves pending requests
//! - [`SessionConfig`]: timeouts and limits, loadable from YAML
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use oppo_protocol::Command;
//! use oppo_session::{Session, SessionConfig, SessionEvent};
//!
//! let mut session = Session::new(SessionConfig::default())?;
//! let bytes = session.send(Command::VolumeQuery, Instant::now())?;
//! assert_eq!(bytes, b"#QVL\r\n");
//!
//! for event in session.feed(b"@QVL OK 25\r") {
//!     if let SessionEvent::Response(response) = event {
//!         assert_eq!(response.data_str(), Some("25"));
//!     }
//! }
//! assert!(session.pending().is_empty());
//! # Ok::<(), oppo_session::SessionError>(())
//! ```

mod config;
mod error;
mod pending;
mod session;

pub use config::*;
pub use error::*;
pub use pending::*;
pub use session::*;
