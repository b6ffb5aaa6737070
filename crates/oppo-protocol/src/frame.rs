//! Frame grammar.
//!
//! Three ASCII frame shapes are spoken on the wire:
//!
//! ```text
//! host -> device   #CODE[ PARAMS]\r\n
//! device -> host   @[CODE ](OK|ER)[ DATA]\r     response (code absent = short form)
//! device -> host   @CODE DATA\r                 unsolicited update
//! ```
//!
//! Incoming frames are handed to the parsers here with their trailing `\r`
//! still attached; a frame whose terminator was already stripped parses the
//! same way. The terminator never appears inside a frame.

use std::sync::LazyLock;

use bytes::{BufMut, BytesMut};
use regex::bytes::Regex;

use crate::constants::*;
use crate::types::{Code, Status};

/// Response grammar. The code segment is optional so the same pattern
/// covers long and short form replies.
static RESPONSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^@(?:(?P<code>[!-~]{3}) )?(?P<status>OK|ER)(?: (?P<data>[^\r]*))?\r?$")
        .expect("response grammar is a valid regex")
});

/// Update grammar.
static UPDATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^@(?P<code>[!-~]{3})(?: (?P<data>[^\r]*))?\r?$")
        .expect("update grammar is a valid regex")
});

/// A response frame split into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame<'a> {
    /// Command code echoed by the device, absent for short form replies.
    pub code: Option<Code>,
    /// Response status.
    pub status: Status,
    /// Payload following the status, if any.
    pub data: Option<&'a [u8]>,
}

impl<'a> ResponseFrame<'a> {
    /// Parse a response frame, returning `None` if it does not follow the
    /// response grammar.
    pub fn parse(frame: &'a [u8]) -> Option<Self> {
        let caps = RESPONSE_PATTERN.captures(frame)?;
        let code = match caps.name("code") {
            Some(m) => Some(Code::parse(m.as_bytes()).ok()?),
            None => None,
        };
        let status = Status::from_bytes(caps.name("status")?.as_bytes())?;
        let data = caps.name("data").map(|m| m.as_bytes());
        Some(ResponseFrame { code, status, data })
    }
}

/// An update frame split into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateFrame<'a> {
    /// Update code.
    pub code: Code,
    /// Payload following the code.
    pub data: Option<&'a [u8]>,
}

impl<'a> UpdateFrame<'a> {
    /// Parse an update frame, returning `None` if it does not follow the
    /// update grammar.
    pub fn parse(frame: &'a [u8]) -> Option<Self> {
        let caps = UPDATE_PATTERN.captures(frame)?;
        let code = Code::parse(caps.name("code")?.as_bytes()).ok()?;
        let data = caps.name("data").map(|m| m.as_bytes());
        Some(UpdateFrame { code, data })
    }
}

/// Check whether an incoming frame starts with the response start marker.
pub fn has_start_marker(frame: &[u8]) -> bool {
    frame.first() == Some(&RESPONSE_START)
}

/// Check whether the status code follows the start marker directly,
/// i.e. the frame is a short form response carrying no command code.
pub fn is_short_form(frame: &[u8]) -> bool {
    frame.len() >= 3 && Status::from_bytes(&frame[1..3]).is_some()
}

/// The three bytes following the start marker: the code a long form
/// response or an update would carry.
pub fn leading_code(frame: &[u8]) -> Option<&[u8]> {
    frame.get(1..1 + CODE_LEN)
}

/// Build an outgoing command frame: `#` + code + optional `" " + params` + `\r\n`.
///
/// Empty params are treated as absent.
pub fn encode_command_frame(code: &Code, params: Option<&[u8]>) -> Vec<u8> {
    let params = params.filter(|p| !p.is_empty());
    let len = 1 + CODE_LEN + params.map_or(0, |p| p.len() + 1) + COMMAND_END.len();

    let mut buf = BytesMut::with_capacity(len);
    buf.put_u8(COMMAND_START);
    buf.put_slice(code.as_bytes());
    if let Some(params) = params {
        buf.put_u8(FIELD_SEPARATOR);
        buf.put_slice(params);
    }
    buf.put_slice(COMMAND_END);
    buf.to_vec()
}
