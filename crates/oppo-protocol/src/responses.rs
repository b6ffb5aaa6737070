//! Response decoding.
//!
//! The same status/data bytes mean different things depending on which
//! command was sent, so a [`Response`] always carries the request it answers
//! and decoding is routed through that request's [`ResponseParser`].

use bytes::Bytes;

use crate::commands::Command;
use crate::error::{ProtocolError, ProtocolResult};
use crate::frame::ResponseFrame;
use crate::types::Status;

/// Parsing strategy for a command's reply, chosen per command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseParser {
    /// Grammar-based extraction of status and data.
    Default,
    /// Power toggle reply: the data (`ON`/`OFF`) becomes a power flag.
    PowerState,
}

/// Command-specific interpretation of a response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDetail {
    /// No interpretation beyond status and data.
    None,
    /// Power state reported by a power toggle.
    Power {
        /// Whether the player is now on.
        on: bool,
    },
}

/// A decoded reply to a previously sent command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    request: Command,
    status: Status,
    data: Option<Bytes>,
    detail: ResponseDetail,
    frame: Bytes,
}

impl Response {
    /// Decode `frame` as the reply to `request`.
    ///
    /// `index` is the request's position in the caller's pending collection
    /// and is only used to attach a [`ProtocolError::MalformedResponse`] to it.
    pub fn decode(request: &Command, frame: &[u8], index: usize) -> ProtocolResult<Response> {
        let mut response = Response {
            request: request.clone(),
            status: Status::Error,
            data: None,
            detail: ResponseDetail::None,
            frame: Bytes::copy_from_slice(frame),
        };

        let parsed = match request.response_parser() {
            ResponseParser::Default => response.parse_default(),
            ResponseParser::PowerState => response.parse_power_state(),
        };

        match parsed {
            Some(()) => Ok(response),
            None => Err(ProtocolError::MalformedResponse {
                code: request.code(),
                index,
                frame: String::from_utf8_lossy(frame).into_owned(),
            }),
        }
    }

    /// Extract status and data. A code, when present, must be the request's.
    fn parse_default(&mut self) -> Option<()> {
        let frame = ResponseFrame::parse(&self.frame)?;
        if frame.code.is_some_and(|code| code != self.request.code()) {
            return None;
        }
        self.status = frame.status;
        self.data = frame.data.map(Bytes::copy_from_slice);
        Some(())
    }

    fn parse_power_state(&mut self) -> Option<()> {
        self.parse_default()?;
        let on = self.data.as_deref() == Some(&b"ON"[..]);
        self.detail = ResponseDetail::Power { on };
        Some(())
    }

    /// The command this response answers.
    pub fn request(&self) -> &Command {
        &self.request
    }

    /// Response status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Check if the device reported `OK`.
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Payload bytes following the status, if any.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Payload as text, if present and valid UTF-8.
    pub fn data_str(&self) -> Option<&str> {
        self.data().and_then(|d| std::str::from_utf8(d).ok())
    }

    /// Command-specific interpretation of the payload.
    pub fn detail(&self) -> ResponseDetail {
        self.detail
    }

    /// Power flag, for replies to a power toggle.
    pub fn power_on(&self) -> Option<bool> {
        match self.detail {
            ResponseDetail::Power { on } => Some(on),
            ResponseDetail::None => None,
        }
    }

    /// The raw frame this response was decoded from.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }
}
