use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

use parking_lot::{Mutex, RwLock};

use crate::{ActorId, CallbackKind, LifecycleListener, LogEntry, Transition, Verifier};

/// Shared, immutable snapshot of recorded entries.
pub type Records = Arc<Vec<LogEntry>>;

/// Identifier of an observer attached with [`LifecycleLog::add_observer`].
pub type ObserverId = u32;

/// Append-only, thread-safe record of lifecycle callbacks.
///
/// Callbacks may arrive from any thread, concurrently with test threads
/// reading the log. A single lock guards the append and the assignment of
/// the arrival position, so readers never observe a torn record and
/// positions have no gaps or duplicates.
///
/// After every append the log notifies its observers. That is how a
/// [`Tracker`](crate::Tracker) learns that new data is available; the log
/// itself knows nothing about trackers.
///
/// # Example
///
/// ```
/// use lifecheck::{CallbackKind::*, LifecycleLog};
///
/// let log = LifecycleLog::new();
/// log.record("A", PreCreate);
/// log.record("B", PreCreate);
/// log.record("A", Created);
///
/// assert_eq!(log.snapshot_for_actor(&"A".into()), vec![PreCreate, Created]);
/// assert_eq!(log.len(), 3);
///
/// log.clear();
/// assert!(log.is_empty());
/// ```
pub struct LifecycleLog {
    inner: Mutex<LogInner>,
    observers: RwLock<Vec<(ObserverId, Arc<dyn LifecycleListener>)>>,
    next_observer_id: AtomicU32,
}

struct LogInner {
    entries: Vec<LogEntry>,
    next_seq: u64,
}

impl LifecycleLog {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LogInner {
                entries: Vec::new(),
                next_seq: 0,
            }),
            observers: RwLock::new(Vec::new()),
            next_observer_id: AtomicU32::new(0),
        }
    }

    // ==================== Writing ====================

    /// Append one callback and notify observers.
    ///
    /// Never fails. Safe to call concurrently from any number of threads.
    pub fn record(&self, actor: impl Into<ActorId>, kind: CallbackKind) {
        let actor = actor.into();
        let seq = {
            let mut inner = self.inner.lock();
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner
                .entries
                .push(LogEntry::new(seq, Transition::new(actor.clone(), kind)));
            seq
        };
        tracing::trace!(seq, actor = %actor, kind = %kind, "callback recorded");
        self.notify(&actor, kind);
    }

    /// Empty the log.
    ///
    /// A `record` racing with `clear` lands entirely before it (and is
    /// removed) or entirely after it (and is kept). Arrival positions keep
    /// increasing across a clear.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        tracing::trace!(dropped = inner.entries.len(), "lifecycle log cleared");
        inner.entries.clear();
    }

    // ==================== Reading ====================

    /// Returns a copy of every recorded transition, in arrival order.
    pub fn snapshot_all(&self) -> Vec<Transition> {
        self.with_entries(|entries| entries.iter().map(|e| e.transition().clone()).collect())
    }

    /// Returns the callbacks recorded for one actor, in arrival order.
    pub fn snapshot_for_actor(&self, actor: &ActorId) -> Vec<CallbackKind> {
        self.with_entries(|entries| kinds_for(entries, actor))
    }

    /// Returns a shared snapshot of the full entries, metadata included.
    pub fn entries(&self) -> Records {
        Arc::new(self.with_entries(|entries| entries.to_vec()))
    }

    /// Returns the last callback recorded for `actor`, if any.
    pub fn last_kind(&self, actor: &ActorId) -> Option<CallbackKind> {
        self.with_entries(|entries| last_kind_in(entries, actor))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Returns a verifier over a snapshot of the current contents.
    ///
    /// Later records do not affect the returned verifier.
    pub fn verify(&self) -> Verifier {
        Verifier::new(self.entries())
    }

    /// Run `f` against a consistent view of the entries.
    ///
    /// The log lock is held for the duration of `f`, so `f` must not call
    /// back into this log.
    pub(crate) fn with_entries<R>(&self, f: impl FnOnce(&[LogEntry]) -> R) -> R {
        let inner = self.inner.lock();
        f(&inner.entries)
    }

    // ==================== Observers ====================

    /// Attach a listener that is called after every `record`.
    pub fn add_observer(&self, observer: Arc<dyn LifecycleListener>) -> ObserverId {
        let id = self.next_observer_id.fetch_add(1, Ordering::Relaxed);
        self.observers.write().push((id, observer));
        id
    }

    /// Detach a listener. Unknown IDs are ignored.
    pub fn remove_observer(&self, id: ObserverId) {
        self.observers.write().retain(|(observer_id, _)| *observer_id != id);
    }

    fn notify(&self, actor: &ActorId, kind: CallbackKind) {
        // Observers run without the lock held so they may attach or detach others.
        let observers: Vec<Arc<dyn LifecycleListener>> = self
            .observers
            .read()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer.on_callback(actor, kind);
        }
    }

    // ==================== Debugging ====================

    /// Print the recorded log to stdout.
    pub fn dump(&self) {
        self.with_entries(|entries| {
            if entries.is_empty() {
                println!("(no callbacks recorded)");
                return;
            }
            println!("Recorded callbacks ({}):", entries.len());
            for entry in entries {
                println!("  {entry}");
            }
        });
    }
}

impl Default for LifecycleLog {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleListener for LifecycleLog {
    fn on_callback(&self, actor: &ActorId, kind: CallbackKind) {
        self.record(actor.clone(), kind);
    }
}

impl fmt::Debug for LifecycleLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("LifecycleLog")
            .field("entries", &inner.entries.len())
            .field("next_seq", &inner.next_seq)
            .field("observers", &self.observers.read().len())
            .finish()
    }
}

pub(crate) fn kinds_for(entries: &[LogEntry], actor: &ActorId) -> Vec<CallbackKind> {
    entries
        .iter()
        .filter(|e| e.transition().is_for(actor))
        .map(LogEntry::kind)
        .collect()
}

pub(crate) fn last_kind_in(entries: &[LogEntry], actor: &ActorId) -> Option<CallbackKind> {
    entries
        .iter()
        .rev()
        .find(|e| e.transition().is_for(actor))
        .map(LogEntry::kind)
}
