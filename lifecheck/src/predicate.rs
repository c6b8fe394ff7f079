use std::fmt;

use crate::{ActorId, CallbackKind, LifecycleLog, LogEntry, Transition, log::last_kind_in};

/// The set of `actor: kind` pairs a [`Tracker`](crate::Tracker) waits for.
///
/// Satisfied when, for every actor mentioned, the last callback recorded for
/// that actor equals the expected kind. Actors not mentioned are
/// unconstrained. Re-adding an actor replaces its previous expectation while
/// keeping its original position, so pending lists stay in the order the
/// predicate was written.
///
/// Evaluation reads the log and nothing else, so evaluating twice against an
/// unchanged log always gives the same answer.
///
/// ```
/// use lifecheck::{CallbackKind::*, LifecycleLog, WaitPredicate};
///
/// let log = LifecycleLog::new();
/// log.record("A", Stopped);
///
/// let predicate = WaitPredicate::new().with("A", Stopped).with("B", Resumed);
/// assert!(!predicate.is_satisfied(&log));
///
/// log.record("B", Resumed);
/// assert!(predicate.is_satisfied(&log));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitPredicate {
    expected: Vec<(ActorId, CallbackKind)>,
}

impl WaitPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect `actor`'s last callback to be `kind`.
    pub fn with(mut self, actor: impl Into<ActorId>, kind: CallbackKind) -> Self {
        self.insert(actor.into(), kind);
        self
    }

    fn insert(&mut self, actor: ActorId, kind: CallbackKind) {
        match self.expected.iter_mut().find(|(a, _)| *a == actor) {
            Some(slot) => slot.1 = kind,
            None => self.expected.push((actor, kind)),
        }
    }

    /// Iterate the expected pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ActorId, CallbackKind)> {
        self.expected.iter().map(|(a, k)| (a, *k))
    }

    pub fn len(&self) -> usize {
        self.expected.len()
    }

    /// An empty predicate is trivially satisfied.
    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    pub fn is_satisfied(&self, log: &LifecycleLog) -> bool {
        log.with_entries(|entries| self.is_satisfied_by(entries))
    }

    /// Returns the pairs the log does not satisfy yet.
    pub fn pending(&self, log: &LifecycleLog) -> Vec<Transition> {
        log.with_entries(|entries| self.pending_in(entries))
    }

    pub(crate) fn is_satisfied_by(&self, entries: &[LogEntry]) -> bool {
        self.expected
            .iter()
            .all(|(actor, kind)| last_kind_in(entries, actor) == Some(*kind))
    }

    pub(crate) fn pending_in(&self, entries: &[LogEntry]) -> Vec<Transition> {
        self.expected
            .iter()
            .filter(|(actor, kind)| last_kind_in(entries, actor) != Some(*kind))
            .map(|(actor, kind)| Transition::new(actor.clone(), *kind))
            .collect()
    }
}

impl<A: Into<ActorId>> FromIterator<(A, CallbackKind)> for WaitPredicate {
    fn from_iter<I: IntoIterator<Item = (A, CallbackKind)>>(iter: I) -> Self {
        let mut predicate = WaitPredicate::new();
        for (actor, kind) in iter {
            predicate.insert(actor.into(), kind);
        }
        predicate
    }
}

impl<A: Into<ActorId>, const N: usize> From<[(A, CallbackKind); N]> for WaitPredicate {
    fn from(pairs: [(A, CallbackKind); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<Transition> for WaitPredicate {
    fn from(t: Transition) -> Self {
        WaitPredicate::new().with(t.actor().clone(), t.kind())
    }
}

impl fmt::Display for WaitPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (actor, kind)) in self.expected.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{actor}: {kind}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CallbackKind::*, transition};

    #[test]
    fn reinserting_an_actor_replaces_in_place() {
        let predicate = WaitPredicate::new()
            .with("A", Resumed)
            .with("B", Paused)
            .with("A", Stopped);
        let pairs: Vec<_> = predicate.iter().map(|(a, k)| (a.as_str(), k)).collect();
        assert_eq!(pairs, vec![("A", Stopped), ("B", Paused)]);
    }

    #[test]
    fn uses_last_recorded_kind_only() {
        let log = LifecycleLog::new();
        log.record("A", Stopped);
        log.record("A", Restarted);
        let predicate = WaitPredicate::from([("A", Stopped)]);
        assert!(!predicate.is_satisfied(&log));
    }

    #[test]
    fn unmentioned_actors_are_unconstrained() {
        let log = LifecycleLog::new();
        log.record("A", Resumed);
        log.record("B", Destroyed);
        assert!(WaitPredicate::from([("A", Resumed)]).is_satisfied(&log));
    }

    #[test]
    fn unseen_actor_is_pending() {
        let log = LifecycleLog::new();
        let predicate = WaitPredicate::from([("A", Resumed), ("B", Stopped)]);
        log.record("A", Resumed);
        assert_eq!(predicate.pending(&log), vec![transition("B", Stopped)]);
    }

    #[test]
    fn empty_predicate_is_satisfied() {
        assert!(WaitPredicate::new().is_satisfied(&LifecycleLog::new()));
    }

    #[test]
    fn evaluation_is_repeatable_on_unchanged_log() {
        let log = LifecycleLog::new();
        log.record("A", Paused);
        let predicate = WaitPredicate::from([("A", Paused), ("B", Resumed)]);
        let first = predicate.is_satisfied(&log);
        for _ in 0..10 {
            assert_eq!(predicate.is_satisfied(&log), first);
        }
        assert_eq!(predicate.pending(&log), predicate.pending(&log));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn display_lists_pairs_in_order() {
        let predicate = WaitPredicate::from([("A", Stopped), ("B", Resumed)]);
        assert_eq!(predicate.to_string(), "{A: stopped, B: resumed}");
    }
}
