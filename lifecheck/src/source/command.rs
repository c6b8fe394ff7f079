use tokio::sync::oneshot;

use crate::{LifecycleListener, Transition, source::ListenerId};

pub(crate) enum SourceCommand {
    Register(Box<dyn LifecycleListener>, oneshot::Sender<ListenerId>),
    Unregister(ListenerId),
    PauseAll,
    ResumeAll,
    PauseOne(ListenerId),
    ResumeOne(ListenerId),
    Dispatch(Transition),
    /// Answered once every command queued before it has been handled.
    Flush(oneshot::Sender<()>),
    Shutdown,
}
