use std::{
    collections::HashMap,
    fmt,
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{ActorId, Axis, CallbackKind, LifecycleListener};

/// Listener that keeps a point-in-time view of actor states.
///
/// Tracks, per actor, the last primary lifecycle state, and which actor
/// currently holds the top position. Clone it before registering to keep a
/// handle for queries from any thread.
///
/// ```
/// use lifecheck::{ActorId, CallbackKind::*, LifecycleListener, listeners::StateMonitor};
///
/// let monitor = StateMonitor::new();
/// let a = ActorId::new("A");
/// monitor.on_callback(&a, Resumed);
/// monitor.on_callback(&a, TopPositionGained);
///
/// assert_eq!(monitor.state_of(&a), Some(Resumed));
/// assert_eq!(monitor.top_resumed(), Some(a));
/// ```
#[derive(Clone)]
pub struct StateMonitor {
    inner: Arc<Mutex<StateMonitorInner>>,
}

struct StateMonitorInner {
    states: HashMap<ActorId, CallbackKind>,
    top: Option<ActorId>,
}

impl StateMonitor {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StateMonitorInner {
                states: HashMap::new(),
                top: None,
            })),
        }
    }

    /// Returns the last primary lifecycle state of `actor`.
    pub fn state_of(&self, actor: &ActorId) -> Option<CallbackKind> {
        self.inner.lock().states.get(actor).copied()
    }

    /// Returns the actor holding the top position, if any.
    pub fn top_resumed(&self) -> Option<ActorId> {
        self.inner.lock().top.clone()
    }

    /// Returns `true` if `actor` was seen and is not destroyed.
    pub fn is_alive(&self, actor: &ActorId) -> bool {
        matches!(self.state_of(actor), Some(state) if state != CallbackKind::Destroyed)
    }

    /// Returns the alive actors, sorted by ID.
    pub fn actors(&self) -> Vec<ActorId> {
        let lock = self.inner.lock();
        let mut actors: Vec<ActorId> = lock
            .states
            .iter()
            .filter(|(_, state)| **state != CallbackKind::Destroyed)
            .map(|(actor, _)| actor.clone())
            .collect();
        actors.sort();
        actors
    }

    /// Returns the actors currently in `state`, sorted by ID.
    pub fn actors_in(&self, state: CallbackKind) -> Vec<ActorId> {
        let lock = self.inner.lock();
        let mut actors: Vec<ActorId> = lock
            .states
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(actor, _)| actor.clone())
            .collect();
        actors.sort();
        actors
    }
}

impl LifecycleListener for StateMonitor {
    fn on_callback(&self, actor: &ActorId, kind: CallbackKind) {
        let mut lock = self.inner.lock();
        match kind.axis() {
            Axis::Lifecycle => {
                lock.states.insert(actor.clone(), kind);
                if kind == CallbackKind::Destroyed && lock.top.as_ref() == Some(actor) {
                    lock.top = None;
                }
            }
            Axis::TopPosition => match kind {
                CallbackKind::TopPositionGained => lock.top = Some(actor.clone()),
                _ if lock.top.as_ref() == Some(actor) => lock.top = None,
                _ => {}
            },
            Axis::Notification => {}
        }
    }
}

impl Default for StateMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lock = self.inner.lock();
        f.debug_struct("StateMonitor")
            .field("actors", &lock.states.len())
            .field("top", &lock.top)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallbackKind::*;

    fn feed(monitor: &StateMonitor, actor: &str, kinds: &[CallbackKind]) {
        let id = ActorId::new(actor);
        for kind in kinds {
            monitor.on_callback(&id, *kind);
        }
    }

    #[test]
    fn default_is_empty() {
        let m = StateMonitor::default();
        assert!(m.actors().is_empty());
        assert_eq!(m.top_resumed(), None);
    }

    #[test]
    fn notifications_do_not_move_state() {
        let m = StateMonitor::new();
        feed(&m, "A", &[PreCreate, Created, Started, PostCreate, Resumed, NewIntent]);
        assert_eq!(m.state_of(&"A".into()), Some(Resumed));
    }

    #[test]
    fn destroyed_actor_is_not_alive() {
        let m = StateMonitor::new();
        feed(&m, "A", &[Resumed, TopPositionGained]);
        feed(&m, "B", &[Resumed]);
        feed(&m, "A", &[Paused, Stopped, Destroyed]);
        assert!(!m.is_alive(&"A".into()));
        assert!(m.is_alive(&"B".into()));
        assert_eq!(m.actors(), vec![ActorId::new("B")]);
        assert_eq!(m.top_resumed(), None);
    }

    #[test]
    fn top_position_moves_between_actors() {
        let m = StateMonitor::new();
        feed(&m, "A", &[TopPositionGained]);
        feed(&m, "A", &[TopPositionLost]);
        feed(&m, "B", &[TopPositionGained]);
        assert_eq!(m.top_resumed(), Some(ActorId::new("B")));

        // A stale loss from another actor does not clear the holder.
        feed(&m, "A", &[TopPositionLost]);
        assert_eq!(m.top_resumed(), Some(ActorId::new("B")));
    }

    #[test]
    fn actors_in_state() {
        let m = StateMonitor::new();
        feed(&m, "A", &[Resumed]);
        feed(&m, "B", &[Resumed, Paused]);
        feed(&m, "C", &[Resumed]);
        assert_eq!(m.actors_in(Resumed), vec![ActorId::new("A"), ActorId::new("C")]);
    }

    #[test]
    fn clones_share_state() {
        let m = StateMonitor::new();
        let query = m.clone();
        feed(&m, "A", &[Stopped]);
        assert_eq!(query.state_of(&"A".into()), Some(Stopped));
    }
}
