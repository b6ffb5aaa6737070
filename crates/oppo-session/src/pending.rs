//! Insertion-ordered set of commands awaiting a reply.
//!
//! Order matters: short form replies are matched to the oldest entry.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use oppo_protocol::Command;
use tracing::{debug, warn};

/// A command that has been sent and not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    command: Command,
    sent_at: Instant,
    deadline: Option<Instant>,
}

impl PendingRequest {
    /// The command that was sent.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// When the command was sent.
    pub fn sent_at(&self) -> Instant {
        self.sent_at
    }

    /// When the caller should give up waiting. `None` if the timeout
    /// reaches past what `Instant` can represent; such entries never expire.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the entry, returning the command.
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Pending requests, oldest first.
#[derive(Debug, Clone, Default)]
pub struct PendingRequests {
    entries: VecDeque<PendingRequest>,
}

impl PendingRequests {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `command` as sent at `sent_at`, expiring after `timeout`.
    ///
    /// A second request with the same code is accepted but only the older one
    /// can be matched by a coded reply until it resolves.
    pub fn push(&mut self, command: Command, sent_at: Instant, timeout: Duration) {
        if self.entries.iter().any(|e| e.command.code() == command.code()) {
            debug!("Request {} already pending, replies resolve the oldest first", command.code());
        }
        let deadline = sent_at.checked_add(timeout);
        if deadline.is_none() {
            warn!("Timeout {:?} for {} is unrepresentable, request never expires", timeout, command.code());
        }
        self.entries.push_back(PendingRequest {
            command,
            sent_at,
            deadline,
        });
    }

    /// Remove the entry at `index` (as reported by the dispatcher).
    pub fn remove(&mut self, index: usize) -> Option<PendingRequest> {
        self.entries.remove(index)
    }

    /// Iterate over pending entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PendingRequest> {
        self.entries.iter()
    }

    /// Iterate over pending commands, oldest first.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.entries.iter().map(|e| &e.command)
    }

    /// Remove and return every entry whose deadline is at or before `now`.
    pub fn expire(&mut self, now: Instant) -> Vec<PendingRequest> {
        let (expired, live): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.deadline.is_some_and(|d| d <= now));
        self.entries = live.into();
        expired
    }

    /// Earliest deadline among pending entries.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().filter_map(|e| e.deadline).min()
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) -> Vec<PendingRequest> {
        self.entries.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_insertion_order() {
        let t0 = Instant::now();
        let mut pending = PendingRequests::new();
        pending.push(Command::Play, t0, SECOND);
        pending.push(Command::Home, t0, SECOND);
        pending.push(Command::Pause, t0, SECOND);

        let codes: Vec<_> = pending.commands().map(|c| c.code().to_string()).collect();
        assert_eq!(codes, ["PLA", "HOM", "PAU"]);

        let removed = pending.remove(1).unwrap();
        assert_eq!(removed.command(), &Command::Home);
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_expire() {
        let t0 = Instant::now();
        let mut pending = PendingRequests::new();
        pending.push(Command::Play, t0, SECOND);
        pending.push(Command::PowerOn, t0, 30 * SECOND);
        pending.push(Command::Home, t0 + SECOND, SECOND);

        assert_eq!(pending.next_deadline(), Some(t0 + SECOND));
        assert!(pending.expire(t0).is_empty());

        let expired = pending.expire(t0 + SECOND);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].command(), &Command::Play);

        let expired = pending.expire(t0 + 2 * SECOND);
        assert_eq!(expired[0].clone().into_command(), Command::Home);

        let remaining: Vec<_> = pending.commands().cloned().collect();
        assert_eq!(remaining, vec![Command::PowerOn]);
    }

    #[test]
    fn test_unrepresentable_deadline_never_expires() {
        let t0 = Instant::now();
        let mut pending = PendingRequests::new();
        pending.push(Command::Play, t0, Duration::MAX);
        pending.push(Command::Home, t0, SECOND);

        assert_eq!(pending.iter().next().unwrap().deadline(), None);
        assert_eq!(pending.next_deadline(), Some(t0 + SECOND));

        let expired = pending.expire(t0 + 60 * SECOND);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].command(), &Command::Home);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_clear() {
        let t0 = Instant::now();
        let mut pending = PendingRequests::new();
        pending.push(Command::Play, t0, SECOND);
        assert_eq!(pending.clear().len(), 1);
        assert!(pending.is_empty());
        assert_eq!(pending.next_deadline(), None);
    }
}
