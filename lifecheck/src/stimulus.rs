use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{ActorId, CallbackKind, LifecycleListener, Poster, Result, Transition};

#[derive(Debug, Clone)]
enum Step {
    Emit(Transition),
    Pause(Duration),
}

/// A timed list of callbacks to play from a background thread.
///
/// Stands in for the system under test: it emits callbacks with the
/// pacing of a real UI thread so waits and timeouts can be exercised.
///
/// ```
/// use std::time::Duration;
/// use lifecheck::{CallbackKind::*, Script};
///
/// let script = Script::new()
///     .emit("A", Paused)
///     .pause(Duration::from_millis(200))
///     .emit("A", Stopped);
/// assert_eq!(script.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(mut self, actor: impl Into<ActorId>, kind: CallbackKind) -> Self {
        self.steps.push(Step::Emit(Transition::new(actor, kind)));
        self
    }

    /// Emit `kinds` for `actor`, back to back.
    pub fn emit_all(mut self, actor: impl Into<ActorId>, kinds: &[CallbackKind]) -> Self {
        let actor = actor.into();
        self.steps.extend(
            kinds
                .iter()
                .map(|kind| Step::Emit(Transition::new(actor.clone(), *kind))),
        );
        self
    }

    /// Sleep before the next emit.
    pub fn pause(mut self, duration: Duration) -> Self {
        self.steps.push(Step::Pause(duration));
        self
    }

    /// Number of callbacks the script emits.
    pub fn len(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, Step::Emit(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Play the script on the current thread, calling `target` directly.
    pub fn run(&self, target: &dyn LifecycleListener) {
        for step in &self.steps {
            match step {
                Step::Emit(t) => target.on_callback(t.actor(), t.kind()),
                Step::Pause(d) => thread::sleep(*d),
            }
        }
    }

    /// Play the script on a new thread through a callback source.
    ///
    /// The thread ends early with [`Error::SourceClosed`](crate::Error::SourceClosed)
    /// if the source shuts down.
    pub fn spawn(self, poster: Poster) -> JoinHandle<Result> {
        thread::spawn(move || {
            for step in self.steps {
                match step {
                    Step::Emit(t) => poster.post(t.actor().clone(), t.kind())?,
                    Step::Pause(d) => thread::sleep(d),
                }
            }
            Ok(())
        })
    }

    /// Play the script on a new thread, calling `target` directly.
    pub fn spawn_on<L: LifecycleListener + 'static>(self, target: Arc<L>) -> JoinHandle<()> {
        thread::spawn(move || self.run(target.as_ref()))
    }
}
