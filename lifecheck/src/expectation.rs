use std::{fmt, time::Duration};

use crate::{Result, Tracker, WaitPredicate};

/// A fluent wait on a [`Tracker`].
///
/// Created by [`Tracker::expect`]. Uses the tracker's default timeout
/// unless [`within`](Self::within) overrides it.
///
/// ```ignore
/// session.tracker()
///     .expect([("A", Stopped), ("B", Resumed)])
///     .within(Duration::from_secs(2))
///     .wait()?;
/// ```
#[must_use = "an expectation does nothing until `wait` or `assert` is called"]
pub struct Expectation<'a> {
    tracker: &'a Tracker,
    predicate: WaitPredicate,
    timeout: Duration,
}

impl<'a> Expectation<'a> {
    pub(crate) fn new(tracker: &'a Tracker, predicate: WaitPredicate) -> Self {
        Self {
            tracker,
            timeout: tracker.default_timeout(),
            predicate,
        }
    }

    /// Override the default timeout.
    pub fn within(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Block until satisfied, or fail with [`Error::WaitTimeout`](crate::Error::WaitTimeout).
    pub fn wait(self) -> Result {
        self.tracker.await_states(&self.predicate, self.timeout)
    }

    /// Block until satisfied, panicking on timeout.
    #[track_caller]
    pub fn assert(self) {
        self.tracker.assert_states(&self.predicate, self.timeout);
    }
}

impl fmt::Debug for Expectation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("predicate", &self.predicate)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
