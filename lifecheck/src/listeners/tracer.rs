use crate::{ActorId, CallbackKind, LifecycleListener};

/// A listener that logs every callback to the `tracing` crate.
///
/// Log levels:
/// - `debug` - every callback
/// - `info` - destroyed and top-position changes
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracer;

impl LifecycleListener for Tracer {
    fn on_callback(&self, actor: &ActorId, kind: CallbackKind) {
        match kind {
            CallbackKind::Destroyed => {
                tracing::info!(actor = %actor.as_str(), "actor destroyed");
            }
            CallbackKind::TopPositionGained | CallbackKind::TopPositionLost => {
                tracing::info!(actor = %actor.as_str(), kind = %kind, "top position changed");
            }
            _ => {
                tracing::debug!(actor = %actor.as_str(), kind = %kind, "lifecycle callback");
            }
        }
    }
}
