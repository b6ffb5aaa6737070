//! Common protocol types.

use std::fmt;
use std::str::FromStr;

use crate::constants::{CODE_LEN, STATUS_ERROR, STATUS_OK};
use crate::error::ProtocolError;

/// A 3-byte ASCII command or update code (e.g. `PWR`, `UPW`).
///
/// Codes are case-sensitive and compared byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code([u8; CODE_LEN]);

impl Code {
    /// Create a code from three bytes without validation.
    ///
    /// Intended for the built-in catalogue tables; use [`Code::parse`] or
    /// `TryFrom` for codes coming from outside.
    pub const fn from_bytes(bytes: [u8; CODE_LEN]) -> Self {
        Code(bytes)
    }

    /// Parse and validate a code from a byte slice.
    pub fn parse(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let valid = bytes.len() == CODE_LEN
            && bytes.iter().all(|b| b.is_ascii_graphic());
        if !valid {
            return Err(ProtocolError::InvalidCode(
                String::from_utf8_lossy(bytes).into_owned(),
            ));
        }
        Ok(Code([bytes[0], bytes[1], bytes[2]]))
    }

    /// The raw code bytes.
    pub fn as_bytes(&self) -> &[u8; CODE_LEN] {
        &self.0
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("???")
    }

    /// Whether `bytes` starts with this code.
    pub fn matches_prefix(&self, bytes: &[u8]) -> bool {
        bytes.len() >= CODE_LEN && bytes[..CODE_LEN] == self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Code {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Code::parse(s.as_bytes())
    }
}

impl TryFrom<&[u8]> for Code {
    type Error = ProtocolError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Code::parse(bytes)
    }
}

/// Status carried by a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// `OK`
    Ok,
    /// `ER`
    Error,
}

impl Status {
    /// Decode a status from its two wire bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Status> {
        if bytes == STATUS_OK {
            Some(Status::Ok)
        } else if bytes == STATUS_ERROR {
            Some(Status::Error)
        } else {
            None
        }
    }

    /// Check if this is the `OK` status.
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Error => write!(f, "ER"),
        }
    }
}
