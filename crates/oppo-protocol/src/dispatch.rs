//! Correlation of incoming frames with in-flight commands.
//!
//! [`dispatch`] is a pure function of the frame and a snapshot of the
//! caller's pending collection. It never removes anything itself: on a match
//! it reports the position of the resolved request and the caller drops it.
//!
//! Short form replies (`@OK`, `@ER ...`) carry no code. They are matched to
//! the first pending request in the collection's iteration order, so callers
//! should keep pending requests oldest first. This is only sound while the
//! device never interleaves unrelated replies with short form ones.

use crate::commands::Command;
use crate::error::ProtocolResult;
use crate::frame::{has_start_marker, is_short_form};
use crate::responses::Response;
use crate::updates::{Update, UpdateRegistry};

/// Outcome of dispatching one incoming frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The frame answers a pending request.
    Matched {
        /// The decoded response, carrying a copy of the request.
        response: Response,
        /// Position of the resolved request in the pending collection.
        index: usize,
    },
    /// The frame is an unsolicited update.
    Unsolicited(Update),
    /// The frame matched neither a pending request nor a registered update.
    /// Not an error: unknown codes are tolerated.
    Unrecognized,
}

impl Event {
    /// Position of the pending request this event resolves, if any.
    pub fn resolved_index(&self) -> Option<usize> {
        match self {
            Event::Matched { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Check if this is the unrecognized-frame event.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Event::Unrecognized)
    }
}

/// Dispatch a frame using the standard update registry.
pub fn dispatch<'a, I>(frame: &[u8], pending: I) -> ProtocolResult<Event>
where
    I: IntoIterator<Item = &'a Command>,
{
    dispatch_with(frame, pending, UpdateRegistry::standard())
}

/// Dispatch a frame against `pending` and `registry`.
///
/// Request correlation takes priority over update decoding. A frame
/// correlated with a request but failing its response grammar yields
/// [`ProtocolError::MalformedResponse`](crate::ProtocolError::MalformedResponse)
/// carrying the request's position.
pub fn dispatch_with<'a, I>(
    frame: &[u8],
    pending: I,
    registry: &UpdateRegistry,
) -> ProtocolResult<Event>
where
    I: IntoIterator<Item = &'a Command>,
{
    if !has_start_marker(frame) {
        log::trace!("No start marker, ignoring frame {:?}", String::from_utf8_lossy(frame));
        return Ok(Event::Unrecognized);
    }

    if let Some((index, request)) = select_request(frame, pending) {
        log::trace!("Frame correlated with pending #{} ({})", index, request.code());
        let response = Response::decode(request, frame, index)?;
        return Ok(Event::Matched { response, index });
    }

    match registry.decode(frame) {
        Some(update) => {
            log::trace!("Frame decoded as {:?} update", update.kind());
            Ok(Event::Unsolicited(update))
        }
        None => {
            log::trace!("Unrecognized frame {:?}", String::from_utf8_lossy(frame));
            Ok(Event::Unrecognized)
        }
    }
}

/// Pick the pending request a frame answers: the first one for a short form
/// reply, otherwise the first one whose code follows the start marker.
fn select_request<'a, I>(frame: &[u8], pending: I) -> Option<(usize, &'a Command)>
where
    I: IntoIterator<Item = &'a Command>,
{
    let mut pending = pending.into_iter().enumerate();
    if is_short_form(frame) {
        return pending.next();
    }
    let body = frame.get(1..)?;
    pending.find(|(_, request)| request.code().matches_prefix(body))
}
