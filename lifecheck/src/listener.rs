use std::sync::Arc;

use crate::{ActorId, CallbackKind};

/// Receiver of lifecycle callbacks.
///
/// This is the single-method contract a callback source delivers through.
/// [`LifecycleLog`](crate::LifecycleLog), [`Tracker`](crate::Tracker) and the
/// ready-made listeners in [`listeners`](crate::listeners) all implement it.
///
/// Implementations are called from whatever thread the source delivers on,
/// possibly concurrently with reads from test threads, so they must be
/// `Send + Sync` and use interior mutability.
///
/// # Example
///
/// ```
/// use lifecheck::{ActorId, CallbackKind, LifecycleListener};
///
/// struct Printer;
///
/// impl LifecycleListener for Printer {
///     fn on_callback(&self, actor: &ActorId, kind: CallbackKind) {
///         println!("{actor} -> {kind}");
///     }
/// }
/// ```
pub trait LifecycleListener: Send + Sync {
    /// Called once per observed transition, in delivery order for each actor.
    fn on_callback(&self, actor: &ActorId, kind: CallbackKind);
}

impl<L: LifecycleListener + ?Sized> LifecycleListener for Arc<L> {
    fn on_callback(&self, actor: &ActorId, kind: CallbackKind) {
        (**self).on_callback(actor, kind);
    }
}

impl<L: LifecycleListener + ?Sized> LifecycleListener for Box<L> {
    fn on_callback(&self, actor: &ActorId, kind: CallbackKind) {
        (**self).on_callback(actor, kind);
    }
}
