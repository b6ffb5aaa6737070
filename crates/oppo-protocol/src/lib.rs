//! Oppo RS-232C Control Protocol
//!
//! This crate provides types and utilities for talking to Oppo UDP/BDP
//! players over their serial control interface. It encodes typed commands
//! into wire frames and correlates incoming frames with the commands still
//! awaiting a reply.
//!
//! # Protocol Overview
//!
//! The protocol is line oriented ASCII:
//!
//! - **Commands** (host → player): `#CODE[ PARAMS]\r\n`
//! - **Responses** (player → host): `@CODE OK|ER[ DATA]\r`, or the short form
//!   `@OK|ER[ DATA]\r` which carries no code
//! - **Updates** (player → host, unsolicited): `@CODE DATA\r`
//!
//! Correlation is stateless: the caller owns the set of pending commands and
//! passes it to [`dispatch`] with every frame. The returned [`Event`] says
//! which pending command was answered, if any, so the caller can drop it.
//! Timeouts are advisory metadata ([`Command::timeout`]) enforced by the
//! caller.
//!
//! # Example
//!
//! ```rust
//! use oppo_protocol::{dispatch, Command, Event, FrameCodec};
//!
//! let cmd = Command::PowerToggle;
//! assert_eq!(cmd.encode()?, b"#PWR\r\n");
//! let mut pending = vec![cmd];
//!
//! let mut codec = FrameCodec::new();
//! codec.push(b"@PWR OK ON\r@UPW ON\r");
//!
//! while let Some(frame) = codec.decode() {
//!     match dispatch(&frame, &pending)? {
//!         Event::Matched { response, index } => {
//!             assert_eq!(response.power_on(), Some(true));
//!             pending.remove(index);
//!         }
//!         Event::Unsolicited(update) => assert_eq!(update.power_on(), Some(true)),
//!         Event::Unrecognized => {}
//!     }
//! }
//! assert!(pending.is_empty());
//! # Ok::<(), oppo_protocol::ProtocolError>(())
//! ```

mod codec;
mod commands;
mod constants;
mod dispatch;
mod error;
pub mod frame;
mod responses;
mod types;
mod updates;

pub use codec::*;
pub use commands::*;
pub use constants::*;
pub use dispatch::*;
pub use error::*;
pub use responses::*;
pub use types::*;
pub use updates::*;
