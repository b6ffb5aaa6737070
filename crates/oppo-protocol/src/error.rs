//! Protocol error types.

use thiserror::Error;

use crate::types::Code;

/// Errors that can occur when encoding commands or decoding frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A frame was correlated with a pending request but did not follow the
    /// response grammar for that request.
    ///
    /// `index` is the position of the resolved request in the pending
    /// collection that was passed to the dispatcher, so the caller can fail
    /// the waiter instead of leaving it pending.
    #[error("malformed response to {code} (pending #{index}): {frame:?}")]
    MalformedResponse {
        /// Code of the request the frame was matched against.
        code: Code,
        /// Position of that request in the pending collection.
        index: usize,
        /// The offending frame, lossily decoded for diagnostics.
        frame: String,
    },

    /// A command parameter could not be rendered into the wire format.
    #[error("cannot encode {code}: {reason}")]
    Encoding {
        /// Code of the command being encoded.
        code: String,
        /// Why the parameter was rejected.
        reason: String,
    },

    /// Two update descriptors claim the same code.
    #[error("duplicate update registration for code {0}")]
    DuplicateRegistration(Code),

    /// A code is not exactly three printable ASCII bytes.
    #[error("invalid code: {0:?}")]
    InvalidCode(String),
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
