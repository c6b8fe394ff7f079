use std::{
    fmt,
    sync::{Arc, OnceLock, Weak},
    time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};

use crate::{
    ActorId, CallbackKind, Config, Error, Expectation, LifecycleListener, LifecycleLog, LogEntry,
    Result, Transition, WaitPredicate,
    log::{ObserverId, kinds_for, last_kind_in},
};

/// Blocks test threads until the log reaches an expected state.
///
/// The tracker is a monitor: a mutex plus a condition variable. Waiters hold
/// the mutex while they evaluate their condition and atomically release it
/// when they go to sleep. Every callback takes the same mutex before waking
/// all waiters, so a callback that lands between a waiter's check and its
/// sleep cannot be missed.
///
/// Waits are always bounded. A wait that times out leaves the tracker and the
/// log fully usable.
///
/// ```
/// use std::{sync::Arc, thread, time::Duration};
/// use lifecheck::{CallbackKind::*, LifecycleLog, Tracker, WaitPredicate};
///
/// let log = Arc::new(LifecycleLog::new());
/// let tracker = Tracker::attach(&log);
///
/// let writer = {
///     let log = log.clone();
///     thread::spawn(move || {
///         log.record("A", Paused);
///         log.record("A", Stopped);
///     })
/// };
///
/// let stopped = WaitPredicate::new().with("A", Stopped);
/// assert!(tracker.wait_for(&stopped, Duration::from_secs(5)));
/// writer.join().unwrap();
/// ```
pub struct Tracker {
    log: Arc<LifecycleLog>,
    lock: Mutex<()>,
    condvar: Condvar,
    default_timeout: Duration,
    observer: OnceLock<ObserverId>,
}

impl Tracker {
    /// Create a tracker over `log`.
    ///
    /// The tracker only wakes when something calls its
    /// [`on_callback`](LifecycleListener::on_callback). Use
    /// [`attach`](Self::attach) to have the log do that on every record.
    pub fn new(log: Arc<LifecycleLog>) -> Self {
        Self {
            log,
            lock: Mutex::new(()),
            condvar: Condvar::new(),
            default_timeout: Config::DEFAULT_TIMEOUT,
            observer: OnceLock::new(),
        }
    }

    /// Create a tracker and register it as an observer of `log`.
    ///
    /// The log only holds a weak reference to the tracker. Dropping the last
    /// `Arc<Tracker>` detaches it.
    pub fn attach(log: &Arc<LifecycleLog>) -> Arc<Self> {
        Self::attach_with(log, &Config::default())
    }

    pub(crate) fn attach_with(log: &Arc<LifecycleLog>, config: &Config) -> Arc<Self> {
        let mut tracker = Tracker::new(log.clone());
        tracker.default_timeout = config.default_timeout();
        let tracker = Arc::new(tracker);
        let id = log.add_observer(Arc::new(Wake(Arc::downgrade(&tracker))));
        let _ = tracker.observer.set(id);
        tracker
    }

    /// Stop receiving notifications from the log this tracker was attached to.
    pub fn detach(&self) {
        if let Some(id) = self.observer.get() {
            self.log.remove_observer(*id);
        }
    }

    pub fn log(&self) -> &Arc<LifecycleLog> {
        &self.log
    }

    /// Timeout used by [`Expectation`] when none is given.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    // ==================== Waiting ====================

    /// Wait until `predicate` holds or `timeout` elapses.
    ///
    /// Returns `true` as soon as the predicate is satisfied, including
    /// immediately when it already is. Returns `false` only once the full
    /// timeout has passed.
    pub fn wait_for(&self, predicate: &WaitPredicate, timeout: Duration) -> bool {
        tracing::trace!(%predicate, ?timeout, "waiting for lifecycle states");
        let satisfied = self.wait_until(timeout, |entries| predicate.is_satisfied_by(entries));
        if !satisfied {
            tracing::debug!(%predicate, ?timeout, "lifecycle wait timed out");
        }
        satisfied
    }

    /// Wait until the callbacks recorded for `actor` equal `expected`.
    pub fn wait_for_transitions(
        &self,
        actor: &ActorId,
        expected: &[CallbackKind],
        timeout: Duration,
    ) -> bool {
        tracing::trace!(actor = %actor, ?expected, ?timeout, "waiting for transitions");
        self.wait_until(timeout, |entries| kinds_for(entries, actor) == expected)
    }

    fn wait_until(&self, timeout: Duration, condition: impl Fn(&[LogEntry]) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock.lock();
        loop {
            if self.log.with_entries(|entries| condition(entries)) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            // Spurious or unrelated wakeups just loop back to the check.
            self.condvar.wait_until(&mut guard, deadline);
        }
    }

    /// Returns the pairs of `predicate` that are not satisfied yet.
    pub fn pending(&self, predicate: &WaitPredicate) -> Vec<Transition> {
        predicate.pending(&self.log)
    }

    // ==================== Result / assert forms ====================

    /// Like [`wait_for`](Self::wait_for), but a timeout becomes
    /// [`Error::WaitTimeout`] listing every pending pair.
    pub fn await_states(&self, predicate: &WaitPredicate, timeout: Duration) -> Result {
        if self.wait_for(predicate, timeout) {
            return Ok(());
        }
        let (pending, observed) = self.log.with_entries(|entries| {
            let pending = predicate.pending_in(entries);
            let observed = pending
                .iter()
                .filter_map(|t| {
                    last_kind_in(entries, t.actor()).map(|kind| Transition::new(t.actor().clone(), kind))
                })
                .collect();
            (pending, observed)
        });
        Err(Error::WaitTimeout {
            timeout,
            pending,
            observed,
        })
    }

    /// Panics if `predicate` is not satisfied within `timeout`.
    #[track_caller]
    pub fn assert_states(&self, predicate: &WaitPredicate, timeout: Duration) {
        if let Err(e) = self.await_states(predicate, timeout) {
            panic!("{e}");
        }
    }

    /// Like [`wait_for_transitions`](Self::wait_for_transitions), but a
    /// timeout becomes [`Error::TransitionsTimeout`].
    pub fn await_transitions(
        &self,
        actor: &ActorId,
        expected: &[CallbackKind],
        timeout: Duration,
    ) -> Result {
        if self.wait_for_transitions(actor, expected, timeout) {
            return Ok(());
        }
        Err(Error::TransitionsTimeout {
            actor: actor.clone(),
            timeout,
            expected: expected.to_vec(),
            observed: self.log.snapshot_for_actor(actor),
        })
    }

    /// Start a fluent wait for `predicate`.
    ///
    /// ```
    /// # use std::{sync::Arc, time::Duration};
    /// # use lifecheck::{CallbackKind::*, LifecycleLog, Tracker, WaitPredicate};
    /// let log = Arc::new(LifecycleLog::new());
    /// let tracker = Tracker::attach(&log);
    /// log.record("A", Resumed);
    ///
    /// tracker
    ///     .expect(WaitPredicate::new().with("A", Resumed))
    ///     .within(Duration::from_millis(100))
    ///     .assert();
    /// ```
    pub fn expect(&self, predicate: impl Into<WaitPredicate>) -> Expectation<'_> {
        Expectation::new(self, predicate.into())
    }
}

impl LifecycleListener for Tracker {
    fn on_callback(&self, _actor: &ActorId, _kind: CallbackKind) {
        let _guard = self.lock.lock();
        self.condvar.notify_all();
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.detach();
    }
}

/// The log's handle on an attached tracker.
struct Wake(Weak<Tracker>);

impl LifecycleListener for Wake {
    fn on_callback(&self, actor: &ActorId, kind: CallbackKind) {
        if let Some(tracker) = self.0.upgrade() {
            tracker.on_callback(actor, kind);
        }
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("log", &self.log)
            .field("default_timeout", &self.default_timeout)
            .field("observer", &self.observer.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{CallbackKind::*, transition};

    fn setup() -> (Arc<LifecycleLog>, Arc<Tracker>) {
        let log = Arc::new(LifecycleLog::new());
        let tracker = Tracker::attach(&log);
        (log, tracker)
    }

    #[test]
    fn already_satisfied_returns_promptly() {
        let (log, tracker) = setup();
        log.record("A", Resumed);

        let start = Instant::now();
        assert!(tracker.wait_for(&WaitPredicate::from([("A", Resumed)]), Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn wakes_when_a_later_record_satisfies() {
        let (log, tracker) = setup();
        log.record("A", Resumed);

        let writer = {
            let log = log.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(200));
                log.record("A", Paused);
                log.record("A", Stopped);
            })
        };

        let start = Instant::now();
        let satisfied = tracker.wait_for(&WaitPredicate::from([("A", Stopped)]), Duration::from_secs(5));
        let elapsed = start.elapsed();
        writer.join().unwrap();

        assert!(satisfied);
        assert!(elapsed >= Duration::from_millis(150), "woke too early: {elapsed:?}");
        assert!(elapsed < Duration::from_secs(3), "woke too late: {elapsed:?}");
    }

    #[test]
    fn never_satisfied_waits_the_full_timeout() {
        let (log, tracker) = setup();
        log.record("A", Resumed);

        let start = Instant::now();
        let satisfied = tracker.wait_for(
            &WaitPredicate::from([("A", Destroyed)]),
            Duration::from_millis(100),
        );
        let elapsed = start.elapsed();

        assert!(!satisfied);
        assert!(elapsed >= Duration::from_millis(100), "returned early: {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "returned late: {elapsed:?}");
    }

    #[test]
    fn unrelated_callbacks_do_not_end_the_wait() {
        let (log, tracker) = setup();
        let writer = {
            let log = log.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    log.record("B", Resumed);
                    thread::sleep(Duration::from_millis(5));
                }
            })
        };
        let start = Instant::now();
        assert!(!tracker.wait_for(&WaitPredicate::from([("A", Destroyed)]), Duration::from_millis(150)));
        assert!(start.elapsed() >= Duration::from_millis(150));
        writer.join().unwrap();
    }

    #[test]
    fn tracker_is_reusable_after_timeout() {
        let (log, tracker) = setup();
        let predicate = WaitPredicate::from([("A", Stopped)]);
        assert!(!tracker.wait_for(&predicate, Duration::from_millis(20)));

        log.record("A", Stopped);
        assert!(tracker.wait_for(&predicate, Duration::from_millis(20)));
    }

    #[test]
    fn concurrent_waiters_with_different_predicates() {
        let (log, tracker) = setup();
        let waiters: Vec<_> = [("A", Stopped), ("B", Resumed), ("C", Destroyed)]
            .into_iter()
            .map(|(actor, kind)| {
                let tracker = tracker.clone();
                thread::spawn(move || {
                    tracker.wait_for(&WaitPredicate::from([(actor, kind)]), Duration::from_secs(5))
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        log.record("B", Resumed);
        log.record("A", Stopped);
        log.record("C", Destroyed);

        for waiter in waiters {
            assert!(waiter.join().unwrap());
        }
    }

    #[test]
    fn await_states_lists_pending_pairs() {
        let (log, tracker) = setup();
        log.record("A", Resumed);
        let err = tracker
            .await_states(
                &WaitPredicate::from([("A", Resumed), ("B", Stopped)]),
                Duration::from_millis(20),
            )
            .unwrap_err();
        assert_eq!(
            err,
            Error::WaitTimeout {
                timeout: Duration::from_millis(20),
                pending: vec![transition("B", Stopped)],
                observed: vec![],
            }
        );
    }

    #[test]
    fn await_states_reports_last_observed_kind() {
        let (log, tracker) = setup();
        log.record("A", Resumed);
        log.record("A", Paused);
        let err = tracker
            .await_states(&WaitPredicate::from([("A", Destroyed)]), Duration::from_millis(20))
            .unwrap_err();
        assert_eq!(
            err,
            Error::WaitTimeout {
                timeout: Duration::from_millis(20),
                pending: vec![transition("A", Destroyed)],
                observed: vec![transition("A", Paused)],
            }
        );
        assert!(err.to_string().contains("A: destroyed (last: paused)"), "{err}");
    }

    #[test]
    #[should_panic(expected = "A: destroyed")]
    fn assert_states_panics_with_pending_pairs() {
        let (_log, tracker) = setup();
        tracker.assert_states(&WaitPredicate::from([("A", Destroyed)]), Duration::from_millis(10));
    }

    #[test]
    fn waits_for_exact_transition_list() {
        let (log, tracker) = setup();
        let writer = {
            let log = log.clone();
            thread::spawn(move || {
                for kind in [PreCreate, Created, Started, Resumed] {
                    log.record("A", kind);
                    thread::sleep(Duration::from_millis(10));
                }
            })
        };
        assert!(tracker.wait_for_transitions(
            &"A".into(),
            &[PreCreate, Created, Started, Resumed],
            Duration::from_secs(5),
        ));
        writer.join().unwrap();
    }

    #[test]
    fn await_transitions_reports_observed_on_timeout() {
        let (log, tracker) = setup();
        log.record("A", Paused);
        let err = tracker
            .await_transitions(&"A".into(), &[Paused, Stopped], Duration::from_millis(20))
            .unwrap_err();
        match err {
            Error::TransitionsTimeout { observed, expected, .. } => {
                assert_eq!(observed, vec![Paused]);
                assert_eq!(expected, vec![Paused, Stopped]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn dropping_tracker_and_log_frees_both() {
        let log = Arc::new(LifecycleLog::new());
        let tracker = Tracker::attach(&log);
        let weak_log = Arc::downgrade(&log);
        let weak_tracker = Arc::downgrade(&tracker);

        drop(tracker);
        drop(log);

        assert!(weak_tracker.upgrade().is_none());
        assert!(weak_log.upgrade().is_none());
    }

    #[test]
    fn dropped_tracker_leaves_the_log_recording() {
        let log = Arc::new(LifecycleLog::new());
        drop(Tracker::attach(&log));
        log.record("A", Resumed);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn detached_tracker_is_no_longer_notified() {
        let (log, tracker) = setup();
        tracker.detach();
        log.record("A", Resumed);
        // Already satisfied is still seen; the check does not need a wakeup.
        assert!(tracker.wait_for(&WaitPredicate::from([("A", Resumed)]), Duration::from_millis(10)));
    }
}
