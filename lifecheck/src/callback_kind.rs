use std::fmt;

/// One lifecycle callback reported by the system under test.
///
/// The first group are the primary lifecycle states an actor moves through.
/// `TopPositionGained`/`TopPositionLost` form an orthogonal axis: which single
/// actor is frontmost for input, independent of resumed/paused. The rest are
/// cross-cutting notifications that interleave at legal points without moving
/// the primary state.
///
/// Sequence comparisons match this enum exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CallbackKind {
    PreCreate,
    Created,
    Started,
    Restarted,
    Resumed,
    TopPositionGained,
    TopPositionLost,
    Paused,
    Stopped,
    Destroyed,
    NewIntent,
    ActivityResult,
    PostCreate,
    MultiWindowModeChanged,
    ConfigurationChanged,
}

/// Whether a callback moves the primary state, the top-position axis, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Lifecycle,
    TopPosition,
    Notification,
}

impl CallbackKind {
    /// Every callback kind, in declaration order.
    pub const ALL: [CallbackKind; 15] = [
        CallbackKind::PreCreate,
        CallbackKind::Created,
        CallbackKind::Started,
        CallbackKind::Restarted,
        CallbackKind::Resumed,
        CallbackKind::TopPositionGained,
        CallbackKind::TopPositionLost,
        CallbackKind::Paused,
        CallbackKind::Stopped,
        CallbackKind::Destroyed,
        CallbackKind::NewIntent,
        CallbackKind::ActivityResult,
        CallbackKind::PostCreate,
        CallbackKind::MultiWindowModeChanged,
        CallbackKind::ConfigurationChanged,
    ];

    /// Kebab-case name used in diagnostics, e.g. `"top-position-gained"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackKind::PreCreate => "pre-create",
            CallbackKind::Created => "created",
            CallbackKind::Started => "started",
            CallbackKind::Restarted => "restarted",
            CallbackKind::Resumed => "resumed",
            CallbackKind::TopPositionGained => "top-position-gained",
            CallbackKind::TopPositionLost => "top-position-lost",
            CallbackKind::Paused => "paused",
            CallbackKind::Stopped => "stopped",
            CallbackKind::Destroyed => "destroyed",
            CallbackKind::NewIntent => "new-intent",
            CallbackKind::ActivityResult => "activity-result",
            CallbackKind::PostCreate => "post-create",
            CallbackKind::MultiWindowModeChanged => "multi-window-mode-changed",
            CallbackKind::ConfigurationChanged => "configuration-changed",
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            CallbackKind::PreCreate
            | CallbackKind::Created
            | CallbackKind::Started
            | CallbackKind::Restarted
            | CallbackKind::Resumed
            | CallbackKind::Paused
            | CallbackKind::Stopped
            | CallbackKind::Destroyed => Axis::Lifecycle,
            CallbackKind::TopPositionGained | CallbackKind::TopPositionLost => Axis::TopPosition,
            CallbackKind::NewIntent
            | CallbackKind::ActivityResult
            | CallbackKind::PostCreate
            | CallbackKind::MultiWindowModeChanged
            | CallbackKind::ConfigurationChanged => Axis::Notification,
        }
    }

    /// Returns true for callbacks that change the primary lifecycle state.
    #[inline]
    pub fn is_lifecycle(&self) -> bool {
        self.axis() == Axis::Lifecycle
    }

    /// The state an actor settles in when another actor covers it.
    ///
    /// A translucent occluder leaves the actor visible, so it only pauses;
    /// an opaque one stops it.
    pub fn occluded_by(translucent: bool) -> CallbackKind {
        if translucent {
            CallbackKind::Paused
        } else {
            CallbackKind::Stopped
        }
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = CallbackKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), CallbackKind::ALL.len());
    }

    #[test]
    fn display_uses_kebab_case() {
        assert_eq!(CallbackKind::PreCreate.to_string(), "pre-create");
        assert_eq!(
            CallbackKind::ConfigurationChanged.to_string(),
            "configuration-changed"
        );
    }

    #[test]
    fn axes() {
        assert!(CallbackKind::Resumed.is_lifecycle());
        assert!(CallbackKind::Restarted.is_lifecycle());
        assert_eq!(CallbackKind::TopPositionLost.axis(), Axis::TopPosition);
        assert_eq!(CallbackKind::PostCreate.axis(), Axis::Notification);
        assert!(!CallbackKind::NewIntent.is_lifecycle());
    }

    #[test]
    fn occlusion_state_depends_on_translucency() {
        assert_eq!(CallbackKind::occluded_by(true), CallbackKind::Paused);
        assert_eq!(CallbackKind::occluded_by(false), CallbackKind::Stopped);
    }
}
