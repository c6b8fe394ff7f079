//! Checks of observed callback sequences against expected ones.

mod mismatch;
mod scenario;

pub use mismatch::{Divergence, OrderViolation, SequenceMismatch, Subject};
pub use scenario::{Scenario, Tracking};

use crate::{
    ActorId, CallbackKind, Error, Result, Transition,
    error::list,
    log::{Records, kinds_for},
};

/// Verifies a frozen snapshot of a [`LifecycleLog`](crate::LifecycleLog).
///
/// Obtain one with [`LifecycleLog::verify`](crate::LifecycleLog::verify)
/// (or [`Session::verifier`](crate::Session::verifier)) after waiting for
/// the log to settle. Each check has two forms:
///
/// - `check_*` returns [`Result`], so callers can inspect the failure;
/// - `assert_*` panics with the failure's message, for use in tests.
///
/// ```
/// use lifecheck::{CallbackKind::*, LifecycleLog, Scenario, Tracking};
///
/// let log = LifecycleLog::new();
/// for kind in [PreCreate, Created, Started, Resumed] {
///     log.record("A", kind);
/// }
///
/// let verify = log.verify();
/// verify.assert_actor_sequence("A", &[PreCreate, Created, Started, Resumed], "launch");
/// verify.assert_scenario("A", &Scenario::LAUNCH, Tracking::Lifecycle);
/// assert!(verify.check_actor_sequence("A", &[PreCreate], "launch").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Verifier {
    records: Records,
}

impl Verifier {
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    /// Returns every transition in the snapshot.
    pub fn observed(&self) -> Vec<Transition> {
        self.records.iter().map(|e| e.transition().clone()).collect()
    }

    /// Returns the callbacks `actor` received, in order.
    pub fn observed_for(&self, actor: &ActorId) -> Vec<CallbackKind> {
        kinds_for(&self.records, actor)
    }

    fn observed_among(&self, actors: &[&ActorId]) -> Vec<Transition> {
        self.records
            .iter()
            .filter(|e| actors.contains(&e.actor()))
            .map(|e| e.transition().clone())
            .collect()
    }

    // ==================== Exact comparisons ====================

    /// The callbacks of `actor` equal `expected`, element for element.
    pub fn check_actor_sequence(
        &self,
        actor: impl Into<ActorId>,
        expected: &[CallbackKind],
        scenario: &str,
    ) -> Result {
        self.compare_actor(actor.into(), expected, scenario, None)
    }

    fn compare_actor(
        &self,
        actor: ActorId,
        expected: &[CallbackKind],
        scenario: &str,
        known_deviation: Option<&'static str>,
    ) -> Result {
        let observed = self.observed_for(&actor);
        tracing::debug!(actor = %actor, scenario, observed = %list(&observed), "observed sequence");

        let as_transitions = |kinds: &[CallbackKind]| -> Vec<Transition> {
            kinds.iter().map(|k| Transition::new(actor.clone(), *k)).collect()
        };
        match SequenceMismatch::between(
            Subject::Actor(actor.clone()),
            scenario,
            as_transitions(expected),
            as_transitions(&observed),
        ) {
            Some(mismatch) => Err(mismatch.with_known_deviation(known_deviation).into()),
            None => Ok(()),
        }
    }

    /// The entire log equals `expected`, across all actors.
    pub fn check_entire_sequence(&self, expected: &[Transition], scenario: &str) -> Result {
        let observed = self.observed();
        tracing::debug!(scenario, observed = %list(&observed), "observed entire sequence");
        match SequenceMismatch::between(Subject::EntireLog, scenario, expected.to_vec(), observed) {
            Some(mismatch) => Err(mismatch.into()),
            None => Ok(()),
        }
    }

    /// `actor` received no callbacks at all.
    pub fn check_empty_sequence(&self, actor: impl Into<ActorId>, scenario: &str) -> Result {
        self.check_actor_sequence(actor, &[], scenario)
    }

    /// The callbacks of `actor` equal one of `candidates`.
    pub fn check_sequence_matches_one_of(
        &self,
        actor: impl Into<ActorId>,
        candidates: &[&[CallbackKind]],
        scenario: &str,
    ) -> Result {
        let actor = actor.into();
        let observed = self.observed_for(&actor);
        if candidates.iter().any(|c| *c == observed.as_slice()) {
            return Ok(());
        }
        Err(Error::NoMatchingSequence {
            actor,
            scenario: scenario.to_owned(),
            candidates: candidates.iter().map(|c| c.to_vec()).collect(),
            observed,
        })
    }

    // ==================== Ordering ====================

    /// `chain` appears in the log in order, other callbacks allowed in between.
    ///
    /// Matching is greedy: each element is matched at its first occurrence
    /// after the previous match.
    pub fn check_order(&self, chain: &[Transition], scenario: &str) -> Result {
        let mut next = 0;
        for entry in self.records.iter() {
            if next == chain.len() {
                break;
            }
            if *entry.transition() == chain[next] {
                next += 1;
            }
        }
        if next == chain.len() {
            return Ok(());
        }
        Err(OrderViolation::new(scenario, chain.to_vec(), next, self.observed()).into())
    }

    /// For each `(before, after)`, `before` occurs and `after` occurs later.
    ///
    /// Pairs are checked independently; callbacks of other actors and other
    /// pairs may interleave freely.
    pub fn check_partial_order(&self, pairs: &[(Transition, Transition)], scenario: &str) -> Result {
        for (before, after) in pairs {
            self.check_order(&[before.clone(), after.clone()], scenario)?;
        }
        Ok(())
    }

    /// `transition` occurs somewhere in the log.
    pub fn check_transition_observed(&self, transition: &Transition) -> Result {
        self.check_order(std::slice::from_ref(transition), "transition observed")
    }

    // ==================== Templates ====================

    /// The callbacks of `actor` equal the scenario template for `tracking`.
    pub fn check_scenario(
        &self,
        actor: impl Into<ActorId>,
        scenario: &Scenario,
        tracking: Tracking,
    ) -> Result {
        self.compare_actor(
            actor.into(),
            scenario.expected(tracking),
            scenario.name(),
            scenario.known_deviation(),
        )
    }

    /// `actor` was relaunched from `start_state`.
    ///
    /// Supported start states are paused, stopped, resumed and
    /// top-position-gained; anything else is
    /// [`Error::UnsupportedStartState`].
    pub fn check_relaunch(
        &self,
        actor: impl Into<ActorId>,
        start_state: CallbackKind,
        tracking: Tracking,
    ) -> Result {
        let (scenario, tracking) = Scenario::relaunch_from(start_state, tracking)
            .ok_or(Error::UnsupportedStartState(start_state))?;
        self.check_scenario(actor, scenario, tracking)
    }

    /// `launching` launched on top of `existing`.
    ///
    /// `existing` loses the top position (when tracked) and pauses, then
    /// `launching` goes through its launch sequence, and finally `existing`
    /// stops unless `launching` is translucent. Only the two actors'
    /// callbacks are compared, interleaving included.
    pub fn check_launch_over(
        &self,
        launching: impl Into<ActorId>,
        existing: impl Into<ActorId>,
        launching_is_translucent: bool,
        tracking: Tracking,
    ) -> Result {
        let launching = launching.into();
        let existing = existing.into();

        let mut expected = Vec::new();
        if tracking == Tracking::Callbacks {
            expected.push(Transition::new(existing.clone(), CallbackKind::TopPositionLost));
        }
        expected.push(Transition::new(existing.clone(), CallbackKind::Paused));
        expected.extend(
            Scenario::LAUNCH
                .expected(tracking)
                .iter()
                .map(|k| Transition::new(launching.clone(), *k)),
        );
        let occluded = CallbackKind::occluded_by(launching_is_translucent);
        if occluded == CallbackKind::Stopped {
            expected.push(Transition::new(existing.clone(), occluded));
        }

        let observed = self.observed_among(&[&launching, &existing]);
        tracing::debug!(launching = %launching, existing = %existing, observed = %list(&observed), "observed launch");
        match SequenceMismatch::between(
            Subject::Actors(vec![launching, existing]),
            Scenario::LAUNCH.name(),
            expected,
            observed,
        ) {
            Some(mismatch) => Err(mismatch.into()),
            None => Ok(()),
        }
    }

    // ==================== Assert forms ====================

    #[track_caller]
    pub fn assert_actor_sequence(
        &self,
        actor: impl Into<ActorId>,
        expected: &[CallbackKind],
        scenario: &str,
    ) {
        fail_on(self.check_actor_sequence(actor, expected, scenario));
    }

    #[track_caller]
    pub fn assert_entire_sequence(&self, expected: &[Transition], scenario: &str) {
        fail_on(self.check_entire_sequence(expected, scenario));
    }

    #[track_caller]
    pub fn assert_empty_sequence(&self, actor: impl Into<ActorId>, scenario: &str) {
        fail_on(self.check_empty_sequence(actor, scenario));
    }

    #[track_caller]
    pub fn assert_sequence_matches_one_of(
        &self,
        actor: impl Into<ActorId>,
        candidates: &[&[CallbackKind]],
        scenario: &str,
    ) {
        fail_on(self.check_sequence_matches_one_of(actor, candidates, scenario));
    }

    #[track_caller]
    pub fn assert_order(&self, chain: &[Transition], scenario: &str) {
        fail_on(self.check_order(chain, scenario));
    }

    #[track_caller]
    pub fn assert_partial_order(&self, pairs: &[(Transition, Transition)], scenario: &str) {
        fail_on(self.check_partial_order(pairs, scenario));
    }

    #[track_caller]
    pub fn assert_transition_observed(&self, transition: &Transition) {
        fail_on(self.check_transition_observed(transition));
    }

    #[track_caller]
    pub fn assert_scenario(&self, actor: impl Into<ActorId>, scenario: &Scenario, tracking: Tracking) {
        fail_on(self.check_scenario(actor, scenario, tracking));
    }

    #[track_caller]
    pub fn assert_relaunch(&self, actor: impl Into<ActorId>, start_state: CallbackKind, tracking: Tracking) {
        fail_on(self.check_relaunch(actor, start_state, tracking));
    }

    #[track_caller]
    pub fn assert_launch_over(
        &self,
        launching: impl Into<ActorId>,
        existing: impl Into<ActorId>,
        launching_is_translucent: bool,
        tracking: Tracking,
    ) {
        fail_on(self.check_launch_over(launching, existing, launching_is_translucent, tracking));
    }
}

#[track_caller]
fn fail_on(result: Result) {
    if let Err(e) = result {
        panic!("{e}");
    }
}
