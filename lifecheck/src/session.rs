use std::sync::Arc;

use crate::{
    ActorId, CallbackKind, CallbackSource, Config, LifecycleLog, ListenerHandle, Result, Tracker,
    Verifier, WaitPredicate,
};

/// Per-test lifecycle context: one log and one tracker.
///
/// Create one at test setup and drop it at teardown. On creation the tracker
/// is attached to the log; [`attach`](Self::attach) additionally registers
/// the log on a callback source. Dropping the session undoes both.
///
/// # Example
///
/// ```
/// use lifecheck::{CallbackKind::*, CallbackSource, Config, Session, Script, Scenario, Tracking};
///
/// let source = CallbackSource::new(&Config::default())?;
/// let session = Session::attach(&source, Config::default())?;
///
/// let writer = Script::new()
///     .emit_all("A", &[PreCreate, Created, Started, Resumed])
///     .spawn(source.poster());
///
/// session.wait_and_assert_states([("A", Resumed)]);
/// session.verifier().assert_scenario("A", &Scenario::LAUNCH, Tracking::Lifecycle);
/// writer.join().unwrap()?;
/// # Ok::<(), lifecheck::Error>(())
/// ```
#[derive(Debug)]
pub struct Session {
    config: Config,
    log: Arc<LifecycleLog>,
    tracker: Arc<Tracker>,
    registration: Option<ListenerHandle>,
}

impl Session {
    /// Create a standalone session. Feed it with [`LifecycleLog::record`].
    pub fn new(config: Config) -> Self {
        let log = Arc::new(LifecycleLog::new());
        let tracker = Tracker::attach_with(&log, &config);
        Self {
            config,
            log,
            tracker,
            registration: None,
        }
    }

    /// Create a session whose log receives every callback `source` delivers.
    pub fn attach(source: &CallbackSource, config: Config) -> Result<Self> {
        let mut session = Self::new(config);
        session.registration = Some(source.register(session.log.clone())?);
        tracing::debug!("session attached to callback source");
        Ok(session)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn log(&self) -> &Arc<LifecycleLog> {
        &self.log
    }

    pub fn tracker(&self) -> &Arc<Tracker> {
        &self.tracker
    }

    /// Returns a verifier over what has been recorded so far.
    pub fn verifier(&self) -> Verifier {
        self.log.verify()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.log.clear();
    }

    // ==================== Waits with the configured timeout ====================

    pub fn wait_for(&self, predicate: impl Into<WaitPredicate>) -> bool {
        self.tracker
            .wait_for(&predicate.into(), self.config.default_timeout())
    }

    pub fn await_states(&self, predicate: impl Into<WaitPredicate>) -> Result {
        self.tracker
            .await_states(&predicate.into(), self.config.default_timeout())
    }

    /// Wait for the states and fail the test if they are not reached.
    #[track_caller]
    pub fn wait_and_assert_states(&self, predicate: impl Into<WaitPredicate>) {
        self.tracker
            .assert_states(&predicate.into(), self.config.default_timeout());
    }

    pub fn wait_for_transitions(&self, actor: impl Into<ActorId>, expected: &[CallbackKind]) -> bool {
        self.tracker.wait_for_transitions(
            &actor.into(),
            expected,
            self.config.default_timeout(),
        )
    }

    /// Wait until `actor` went through `expected`, then check the sequence
    /// is exactly that.
    ///
    /// On timeout the failure is the sequence mismatch, which shows where
    /// the observed callbacks went a different way.
    #[track_caller]
    pub fn wait_and_assert_transitions(
        &self,
        actor: impl Into<ActorId>,
        expected: &[CallbackKind],
        scenario: &str,
    ) {
        let actor = actor.into();
        self.tracker
            .wait_for_transitions(&actor, expected, self.config.default_timeout());
        self.verifier()
            .assert_actor_sequence(actor, expected, scenario);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.tracker.detach();
        if let Some(registration) = self.registration.take() {
            registration.remove();
        }
    }
}
