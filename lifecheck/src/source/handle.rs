use tokio::sync::mpsc::UnboundedSender;

use crate::{
    ActorId, CallbackKind, Error, Result, Transition,
    source::{ListenerId, SourceCommand},
};

/// Handle to one listener registered on a [`CallbackSource`](crate::CallbackSource).
///
/// Dropping the handle does not unregister the listener; call
/// [`remove`](Self::remove) for that.
#[derive(Debug)]
pub struct ListenerHandle {
    id: ListenerId,
    sender: UnboundedSender<SourceCommand>,
}

impl ListenerHandle {
    pub(crate) fn new(id: ListenerId, sender: UnboundedSender<SourceCommand>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Unregister the listener.
    ///
    /// Callbacks posted before this call are still delivered to it.
    pub fn remove(self) {
        let _ = self.sender.send(SourceCommand::Unregister(self.id));
    }

    /// Stop delivering callbacks to this listener until [`resume`](Self::resume).
    ///
    /// Callbacks posted while paused are skipped, not buffered.
    pub fn pause(&self) {
        let _ = self.sender.send(SourceCommand::PauseOne(self.id));
    }

    pub fn resume(&self) {
        let _ = self.sender.send(SourceCommand::ResumeOne(self.id));
    }
}

/// Cheap, cloneable sender of callbacks into a [`CallbackSource`](crate::CallbackSource).
///
/// Hand one to each thread that plays the system under test.
#[derive(Debug, Clone)]
pub struct Poster {
    sender: UnboundedSender<SourceCommand>,
}

impl Poster {
    pub(crate) fn new(sender: UnboundedSender<SourceCommand>) -> Self {
        Self { sender }
    }

    /// Queue a callback for delivery on the dispatcher thread.
    pub fn post(&self, actor: impl Into<ActorId>, kind: CallbackKind) -> Result {
        self.sender
            .send(SourceCommand::Dispatch(Transition::new(actor, kind)))
            .map_err(|_| Error::SourceClosed)
    }

    /// Returns `true` once the source has shut down.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
