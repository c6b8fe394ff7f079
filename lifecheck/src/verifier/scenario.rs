//! Expected callback sequences for common lifecycle paths.

use crate::CallbackKind::{self, *};

/// Which callbacks an actor reports.
///
/// Plain actors only report the primary lifecycle. Tracking actors also
/// report post-create and top-position changes, which interleave with the
/// primary callbacks at fixed points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tracking {
    #[default]
    Lifecycle,
    Callbacks,
}

/// A named expected sequence, in both tracking flavors.
///
/// Templates are plain data: verifiers look up the sequence for the actor's
/// [`Tracking`] and compare it exactly against the log.
///
/// A template may carry a `known_deviation` note. Such a template encodes
/// what the system under test actually does today where that looks like a
/// defect, and the note is printed with any failure against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    name: &'static str,
    lifecycle: &'static [CallbackKind],
    callbacks: &'static [CallbackKind],
    known_deviation: Option<&'static str>,
}

impl Scenario {
    pub const fn new(
        name: &'static str,
        lifecycle: &'static [CallbackKind],
        callbacks: &'static [CallbackKind],
    ) -> Self {
        Self {
            name,
            lifecycle,
            callbacks,
            known_deviation: None,
        }
    }

    pub const fn with_known_deviation(mut self, note: &'static str) -> Self {
        self.known_deviation = Some(note);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn expected(&self, tracking: Tracking) -> &'static [CallbackKind] {
        match tracking {
            Tracking::Lifecycle => self.lifecycle,
            Tracking::Callbacks => self.callbacks,
        }
    }

    pub fn known_deviation(&self) -> Option<&'static str> {
        self.known_deviation
    }

    // ==================== Launch ====================

    pub const LAUNCH: Scenario = Scenario::new(
        "launch",
        &[PreCreate, Created, Started, Resumed],
        &[PreCreate, Created, Started, PostCreate, Resumed, TopPositionGained],
    );

    pub const LAUNCH_AND_PAUSE: Scenario = Scenario::new(
        "launch and pause",
        &[PreCreate, Created, Started, Resumed, Paused],
        &[
            PreCreate,
            Created,
            Started,
            PostCreate,
            Resumed,
            TopPositionGained,
            TopPositionLost,
            Paused,
        ],
    );

    pub const LAUNCH_AND_STOP: Scenario = Scenario::new(
        "launch and stop",
        &[PreCreate, Created, Started, Resumed, Paused, Stopped],
        &[
            PreCreate,
            Created,
            Started,
            PostCreate,
            Resumed,
            TopPositionGained,
            TopPositionLost,
            Paused,
            Stopped,
        ],
    );

    pub const LAUNCH_AND_DESTROY: Scenario = Scenario::new(
        "launch and destroy",
        &[PreCreate, Created, Started, Resumed, Paused, Stopped, Destroyed],
        &[
            PreCreate,
            Created,
            Started,
            PostCreate,
            Resumed,
            TopPositionGained,
            TopPositionLost,
            Paused,
            Stopped,
            Destroyed,
        ],
    );

    pub const ACTIVITY_RESULT: Scenario = Scenario::new(
        "activity result",
        &[PreCreate, Created, Started, Resumed, Paused, ActivityResult, Resumed],
        &[
            PreCreate,
            Created,
            Started,
            PostCreate,
            Resumed,
            TopPositionGained,
            TopPositionLost,
            Paused,
            ActivityResult,
            Resumed,
            TopPositionGained,
        ],
    );

    // ==================== Relaunch / recreate ====================

    /// Relaunch of a resumed actor, e.g. after an unhandled configuration change.
    pub const RELAUNCH: Scenario = Scenario::new(
        "relaunch",
        &[Paused, Stopped, Destroyed, PreCreate, Created, Started, Resumed],
        &[
            TopPositionLost,
            Paused,
            Stopped,
            Destroyed,
            PreCreate,
            Created,
            Started,
            PostCreate,
            Resumed,
            TopPositionGained,
        ],
    );

    pub const RELAUNCH_FROM_PAUSED: Scenario = Scenario::new(
        "relaunch from paused",
        &[Stopped, Destroyed, PreCreate, Created, Started, Resumed, Paused],
        &[
            Stopped, Destroyed, PreCreate, Created, Started, PostCreate, Resumed, Paused,
        ],
    );

    pub const RELAUNCH_FROM_STOPPED: Scenario = Scenario::new(
        "relaunch from stopped",
        &[Destroyed, PreCreate, Created, Started, Resumed, Paused, Stopped],
        &[
            Destroyed, PreCreate, Created, Started, PostCreate, Resumed, Paused, Stopped,
        ],
    );

    pub const RECREATE_AND_RESUME: Scenario = Scenario::new(
        "recreate and resume",
        &[Destroyed, PreCreate, Created, Started, Resumed],
        &[
            Destroyed,
            PreCreate,
            Created,
            Started,
            PostCreate,
            Resumed,
            TopPositionGained,
        ],
    );

    pub const RECREATE_AND_PAUSE: Scenario = Scenario::new(
        "recreate and pause",
        &[Destroyed, PreCreate, Created, Started, Resumed, Paused],
        &[Destroyed, PreCreate, Created, Started, PostCreate, Resumed, Paused],
    );

    /// Moving a resumed actor into split screen relaunches it.
    pub const SPLIT_SCREEN: Scenario = Scenario::new(
        "enter split screen",
        &[Paused, Stopped, Destroyed, PreCreate, Created, Started, Resumed],
        &[
            TopPositionLost,
            Paused,
            Stopped,
            Destroyed,
            PreCreate,
            Created,
            Started,
            PostCreate,
            Resumed,
            TopPositionGained,
        ],
    );

    // ==================== Restart / resume ====================

    /// Coming back to the foreground from started.
    pub const RESTART_AND_RESUME: Scenario = Scenario::new(
        "restart and resume",
        &[Started, Resumed],
        &[Started, Resumed, TopPositionGained],
    );

    /// Coming back to the foreground from stopped.
    pub const STOP_TO_RESUME: Scenario = Scenario::new(
        "stop to resume",
        &[Restarted, Started, Resumed],
        &[Restarted, Started, Resumed, TopPositionGained],
    );

    pub const RESTART_AND_PAUSE: Scenario = Scenario::new(
        "restart and pause",
        &[Restarted, Started, Resumed, Paused],
        &[Restarted, Started, Resumed, Paused],
    );

    // ==================== Leaving the foreground ====================

    pub const RESUME_TO_STOP: Scenario = Scenario::new(
        "resume to stop",
        &[Paused, Stopped],
        &[TopPositionLost, Paused, Stopped],
    );

    pub const RESUME_TO_DESTROY: Scenario = Scenario::new(
        "resume to destroy",
        &[Paused, Stopped, Destroyed],
        &[TopPositionLost, Paused, Stopped, Destroyed],
    );

    // ==================== Known deviations ====================

    /// A single-top actor receiving a new intent while paused.
    pub const NEW_INTENT_WHILE_PAUSED: Scenario = Scenario::new(
        "new intent while paused",
        &[NewIntent, Resumed, Paused, Resumed],
        &[NewIntent, Resumed, Paused, Resumed, TopPositionGained],
    )
    .with_known_deviation("extra pause/resume cycle after new-intent; expected is new-intent, resumed");

    /// Launching an actor that shows above the keyguard.
    pub const LAUNCH_ABOVE_KEYGUARD: Scenario = Scenario::new(
        "launch above keyguard",
        &[PreCreate, Created, Started, Resumed, Paused, Resumed],
        &[
            PreCreate,
            Created,
            Started,
            PostCreate,
            Resumed,
            Paused,
            Resumed,
            TopPositionGained,
        ],
    )
    .with_known_deviation("extra pause/resume cycle while the keyguard goes away");

    /// Every built-in template.
    pub const ALL: &'static [Scenario] = &[
        Scenario::LAUNCH,
        Scenario::LAUNCH_AND_PAUSE,
        Scenario::LAUNCH_AND_STOP,
        Scenario::LAUNCH_AND_DESTROY,
        Scenario::ACTIVITY_RESULT,
        Scenario::RELAUNCH,
        Scenario::RELAUNCH_FROM_PAUSED,
        Scenario::RELAUNCH_FROM_STOPPED,
        Scenario::RECREATE_AND_RESUME,
        Scenario::RECREATE_AND_PAUSE,
        Scenario::SPLIT_SCREEN,
        Scenario::RESTART_AND_RESUME,
        Scenario::STOP_TO_RESUME,
        Scenario::RESTART_AND_PAUSE,
        Scenario::RESUME_TO_STOP,
        Scenario::RESUME_TO_DESTROY,
        Scenario::NEW_INTENT_WHILE_PAUSED,
        Scenario::LAUNCH_ABOVE_KEYGUARD,
    ];

    /// Returns the relaunch template for an actor sitting in `start_state`,
    /// and the tracking flavor that start state implies.
    ///
    /// An actor that held the top position is necessarily a tracking actor.
    pub fn relaunch_from(
        start_state: CallbackKind,
        tracking: Tracking,
    ) -> Option<(&'static Scenario, Tracking)> {
        match start_state {
            Paused => Some((&Scenario::RELAUNCH_FROM_PAUSED, tracking)),
            Stopped => Some((&Scenario::RELAUNCH_FROM_STOPPED, tracking)),
            Resumed => Some((&Scenario::RELAUNCH, tracking)),
            TopPositionGained => Some((&Scenario::RELAUNCH, Tracking::Callbacks)),
            PreCreate | Created | Started | Restarted | TopPositionLost | Destroyed
            | NewIntent | ActivityResult | PostCreate | MultiWindowModeChanged
            | ConfigurationChanged => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_flavor_never_has_cross_cutting_callbacks() {
        for scenario in Scenario::ALL {
            assert!(
                scenario
                    .expected(Tracking::Lifecycle)
                    .iter()
                    .all(|k| !matches!(k, PostCreate | TopPositionGained | TopPositionLost)),
                "{}",
                scenario.name()
            );
        }
    }

    #[test]
    fn callbacks_flavor_is_a_superset_in_order() {
        for scenario in Scenario::ALL {
            let callbacks = scenario.expected(Tracking::Callbacks);
            let mut idx = 0;
            for kind in callbacks {
                if idx < scenario.lifecycle.len() && *kind == scenario.lifecycle[idx] {
                    idx += 1;
                }
            }
            assert_eq!(idx, scenario.lifecycle.len(), "{}", scenario.name());
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Scenario::ALL.iter().map(Scenario::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Scenario::ALL.len());
    }

    #[test]
    fn relaunch_templates_by_start_state() {
        assert_eq!(
            Scenario::relaunch_from(Resumed, Tracking::Lifecycle),
            Some((&Scenario::RELAUNCH, Tracking::Lifecycle))
        );
        assert_eq!(
            Scenario::relaunch_from(TopPositionGained, Tracking::Lifecycle),
            Some((&Scenario::RELAUNCH, Tracking::Callbacks))
        );
        assert_eq!(Scenario::relaunch_from(Destroyed, Tracking::Lifecycle), None);
    }

    #[test]
    fn only_deviation_templates_carry_notes() {
        let noted: Vec<_> = Scenario::ALL
            .iter()
            .filter(|s| s.known_deviation().is_some())
            .map(Scenario::name)
            .collect();
        assert_eq!(noted, vec!["new intent while paused", "launch above keyguard"]);
    }
}
