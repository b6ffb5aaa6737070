//! Caller-side protocol session.
//!
//! A [`Session`] holds everything the stateless dispatcher needs from its
//! caller: the pending requests, the frame codec for the incoming byte
//! stream and the update registry. It performs no I/O; the transport writes
//! the bytes returned by [`Session::send`] and passes received bytes to
//! [`Session::feed`]. Timeouts are advisory and only acted on when the
//! transport calls [`Session::expire`].

use std::time::Instant;

use oppo_protocol::{
    dispatch_with, Command, Event, FrameCodec, ProtocolError, Response, Update, UpdateRegistry,
};
use tracing::{debug, trace, warn};

use crate::config::SessionConfig;
use crate::error::SessionResult;
use crate::pending::{PendingRequest, PendingRequests};

// ============================================================================
// Session Events
// ============================================================================

/// Something a session learned from the incoming byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A pending command was answered and removed from the pending set.
    Response(Response),
    /// The player sent an unsolicited update.
    Update(Update),
    /// A frame was matched to a pending command but violated the response
    /// grammar. The command has been removed from the pending set.
    Malformed {
        /// The request the frame was matched against.
        request: PendingRequest,
        /// The protocol error describing the violation.
        error: ProtocolError,
    },
    /// The frame matched nothing. Typically safe to ignore.
    Unrecognized(Vec<u8>),
}

/// Counters kept by a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Commands encoded and recorded as pending.
    pub commands_sent: u64,
    /// Pending commands resolved by a well-formed response.
    pub responses: u64,
    /// Pending commands resolved by a malformed response.
    pub malformed: u64,
    /// Unsolicited updates decoded.
    pub updates: u64,
    /// Frames that matched nothing.
    pub unrecognized: u64,
    /// Pending commands dropped by [`Session::expire`].
    pub timeouts: u64,
}

// ============================================================================
// Session
// ============================================================================

/// Caller-side state for one serial connection.
pub struct Session {
    config: SessionConfig,
    codec: FrameCodec,
    pending: PendingRequests,
    registry: UpdateRegistry,
    stats: SessionStats,
}

impl Session {
    /// Create a session using the standard update registry.
    pub fn new(config: SessionConfig) -> SessionResult<Self> {
        Self::with_registry(config, UpdateRegistry::standard().clone())
    }

    /// Create a session decoding updates with a custom registry.
    pub fn with_registry(config: SessionConfig, registry: UpdateRegistry) -> SessionResult<Self> {
        config.validate()?;
        Ok(Session {
            codec: FrameCodec::with_max_frame_length(config.max_frame_length),
            config,
            pending: PendingRequests::new(),
            registry,
            stats: SessionStats::default(),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the pending requests, oldest first.
    pub fn pending(&self) -> &PendingRequests {
        &self.pending
    }

    /// Get the session counters.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Encode `command` and record it as pending from `now`.
    ///
    /// Returns the bytes for the transport to write. A command that fails to
    /// encode is not recorded.
    pub fn send(&mut self, command: Command, now: Instant) -> SessionResult<Vec<u8>> {
        let frame = command.encode()?;
        let timeout = self.config.timeout_for(&command);

        debug!(
            "Session[{}]: Sending {} ({} pending, timeout {:?})",
            self.config.name,
            String::from_utf8_lossy(&frame).trim_end(),
            self.pending.len(),
            timeout
        );

        self.pending.push(command, now, timeout);
        self.stats.commands_sent += 1;
        Ok(frame)
    }

    /// Feed received bytes and dispatch every complete frame, in order.
    pub fn feed(&mut self, data: &[u8]) -> Vec<SessionEvent> {
        self.codec.push(data);

        let mut events = Vec::new();
        while let Some(frame) = self.codec.decode() {
            events.push(self.handle_frame(frame));
        }
        events
    }

    /// Drop every pending command whose deadline is at or before `now`.
    ///
    /// Returns the dropped requests so the caller can fail their waiters.
    pub fn expire(&mut self, now: Instant) -> Vec<PendingRequest> {
        let expired = self.pending.expire(now);
        for request in &expired {
            warn!(
                "Session[{}]: {} timed out after {:?}",
                self.config.name,
                request.command().code(),
                now.saturating_duration_since(request.sent_at())
            );
        }
        self.stats.timeouts += expired.len() as u64;
        expired
    }

    /// Abandon every pending command and any partially received frame.
    pub fn reset(&mut self) -> Vec<PendingRequest> {
        self.codec.clear();
        self.pending.clear()
    }

    fn handle_frame(&mut self, frame: Vec<u8>) -> SessionEvent {
        trace!(
            "Session[{}]: Frame {:?}",
            self.config.name,
            String::from_utf8_lossy(&frame)
        );

        match dispatch_with(&frame, self.pending.commands(), &self.registry) {
            Ok(Event::Matched { response, index }) => {
                self.pending.remove(index);
                self.stats.responses += 1;
                trace!(
                    "Session[{}]: {} -> {} {:?}",
                    self.config.name,
                    response.request().code(),
                    response.status(),
                    response.data_str()
                );
                SessionEvent::Response(response)
            }
            Ok(Event::Unsolicited(update)) => {
                self.stats.updates += 1;
                trace!("Session[{}]: Update {:?}", self.config.name, update);
                SessionEvent::Update(update)
            }
            Ok(Event::Unrecognized) => self.unrecognized(frame),
            Err(error) => {
                let ProtocolError::MalformedResponse { index, .. } = &error else {
                    warn!("Session[{}]: Dispatch failed: {}", self.config.name, error);
                    return self.unrecognized(frame);
                };
                let Some(request) = self.pending.remove(*index) else {
                    return self.unrecognized(frame);
                };
                warn!("Session[{}]: {}", self.config.name, error);
                self.stats.malformed += 1;
                SessionEvent::Malformed { request, error }
            }
        }
    }

    fn unrecognized(&mut self, frame: Vec<u8>) -> SessionEvent {
        debug!(
            "Session[{}]: Ignoring unrecognized frame {:?}",
            self.config.name,
            String::from_utf8_lossy(&frame)
        );
        self.stats.unrecognized += 1;
        SessionEvent::Unrecognized(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn session() -> Session {
        Session::new(SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_send_records_pending() {
        let mut session = session();
        let bytes = session.send(Command::VolumeSet { value: 50 }, Instant::now()).unwrap();

        assert_eq!(bytes, b"#SVL 50\r\n");
        assert_eq!(session.pending().len(), 1);
        assert_eq!(session.stats().commands_sent, 1);
    }

    #[test]
    fn test_unencodable_command_not_recorded() {
        let mut session = session();
        let cmd = Command::raw("SRP", Some("\r")).unwrap();
        assert!(session.send(cmd, Instant::now()).is_err());
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_response_resolves_pending() {
        let mut session = session();
        session.send(Command::PowerToggle, Instant::now()).unwrap();

        let events = session.feed(b"@PWR OK OFF\r");
        match &events[..] {
            [SessionEvent::Response(response)] => assert_eq!(response.power_on(), Some(false)),
            other => panic!("unexpected events: {:?}", other),
        }
        assert!(session.pending().is_empty());
        assert_eq!(session.stats().responses, 1);
    }

    #[test]
    fn test_malformed_resolves_pending() {
        let mut session = session();
        session.send(Command::Play, Instant::now()).unwrap();

        let events = session.feed(b"@PLA MAYBE\r");
        match &events[..] {
            [SessionEvent::Malformed { request, .. }] => assert_eq!(request.command(), &Command::Play),
            other => panic!("unexpected events: {:?}", other),
        }
        assert!(session.pending().is_empty());
        assert_eq!(session.stats().malformed, 1);
    }

    #[test]
    fn test_split_frame_across_feeds() {
        let mut session = session();
        assert!(session.feed(b"@UP").is_empty());
        let events = session.feed(b"W ON\r@ZZZ 1\r");

        assert!(matches!(&events[0], SessionEvent::Update(u) if u.power_on() == Some(true)));
        assert_eq!(events[1], SessionEvent::Unrecognized(b"@ZZZ 1\r".to_vec()));
        assert_eq!(session.stats().updates, 1);
        assert_eq!(session.stats().unrecognized, 1);
    }

    #[test]
    fn test_expire_uses_configured_timeout() {
        let mut config = SessionConfig::default();
        config.timeouts.insert("PON".to_string(), 30.0);
        let mut session = Session::new(config).unwrap();

        let t0 = Instant::now();
        session.send(Command::PowerOn, t0).unwrap();
        session.send(Command::Play, t0).unwrap();

        let expired = session.expire(t0 + Duration::from_secs(10));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].command(), &Command::Play);
        assert_eq!(session.pending().len(), 1);
        assert_eq!(session.stats().timeouts, 1);
    }

    #[test]
    fn test_reset() {
        let mut session = session();
        session.send(Command::Play, Instant::now()).unwrap();
        session.feed(b"@PL");
        assert_eq!(session.reset().len(), 1);
        assert!(session.feed(b"A OK\r").is_empty());
    }
}
