use std::fmt;

use crate::{ActorId, CallbackKind};

/// A single `(actor, callback)` pair.
///
/// This is the unit of the entire-log comparisons: expected cross-actor
/// interleavings are written as lists of transitions.
///
/// ```
/// use lifecheck::{CallbackKind::*, transition};
///
/// let expected = [
///     transition("FirstActivity", Paused),
///     transition("SecondActivity", PreCreate),
/// ];
/// assert_eq!(expected[0].to_string(), "FirstActivity: paused");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    actor: ActorId,
    kind: CallbackKind,
}

impl Transition {
    pub fn new(actor: impl Into<ActorId>, kind: CallbackKind) -> Self {
        Self {
            actor: actor.into(),
            kind,
        }
    }

    #[inline]
    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    #[inline]
    pub fn kind(&self) -> CallbackKind {
        self.kind
    }

    #[inline]
    pub(crate) fn is_for(&self, actor: &ActorId) -> bool {
        self.actor == *actor
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.actor, self.kind)
    }
}

impl<A: Into<ActorId>> From<(A, CallbackKind)> for Transition {
    fn from((actor, kind): (A, CallbackKind)) -> Self {
        Transition::new(actor, kind)
    }
}

/// Shorthand for [`Transition::new`].
pub fn transition(actor: impl Into<ActorId>, kind: CallbackKind) -> Transition {
    Transition::new(actor, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallbackKind::*;

    #[test]
    fn equality_covers_actor_and_kind() {
        assert_eq!(transition("A", Resumed), transition("A", Resumed));
        assert_ne!(transition("A", Resumed), transition("B", Resumed));
        assert_ne!(transition("A", Resumed), transition("A", Paused));
    }

    #[test]
    fn from_tuple() {
        let t: Transition = ("A", Stopped).into();
        assert_eq!(t.actor().as_str(), "A");
        assert_eq!(t.kind(), Stopped);
    }
}
