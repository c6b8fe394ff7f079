use std::{fmt, time::SystemTime};

use crate::{ActorId, CallbackKind, Transition};

/// A recorded callback: the transition plus its arrival metadata.
///
/// - `seq`: arrival position, assigned under the log lock. Strictly
///   increasing for the lifetime of a log, and not reset by `clear()`.
/// - `timestamp`: wall-clock nanoseconds since the Unix epoch. Diagnostic
///   only; ordering always comes from `seq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    seq: u64,
    timestamp: u64,
    transition: Transition,
}

impl LogEntry {
    pub(crate) fn new(seq: u64, transition: Transition) -> Self {
        Self {
            seq,
            timestamp: now_nanos(),
            transition,
        }
    }

    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Timestamp in nanoseconds since Unix epoch (u64 truncation).
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    #[inline]
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    #[inline]
    pub fn actor(&self) -> &ActorId {
        self.transition.actor()
    }

    #[inline]
    pub fn kind(&self) -> CallbackKind {
        self.transition.kind()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.seq, self.transition)
    }
}

// A clock before the epoch only degrades diagnostics, so it maps to zero.
pub(crate) fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
