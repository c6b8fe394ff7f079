use std::{fmt::Display, sync::Arc, time::Duration};

use crate::{
    ActorId, CallbackKind, Transition,
    verifier::{OrderViolation, SequenceMismatch},
};

/// The single error type for all lifecheck operations.
///
/// Every fallible API returns `lifecheck::Result<T>`. The `assert_*`
/// helpers panic with this error's `Display`, so each variant renders a
/// message complete enough to diagnose a failure without re-running.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(
        "Expected lifecycle states not reached within {timeout:?}, still pending: {}",
        pending_with_last(.pending, .observed)
    )]
    WaitTimeout {
        timeout: Duration,
        pending: Vec<Transition>,
        /// Last recorded callback of each pending actor that has any.
        observed: Vec<Transition>,
    },

    #[error(
        "Actor '{actor}' did not perform the expected transitions within {timeout:?}\n  expected: {}\n  observed: {}",
        list(.expected),
        list(.observed)
    )]
    TransitionsTimeout {
        actor: ActorId,
        timeout: Duration,
        expected: Vec<CallbackKind>,
        observed: Vec<CallbackKind>,
    },

    #[error("{0}")]
    SequenceMismatch(Box<SequenceMismatch>),

    #[error("{0}")]
    OrderViolation(Box<OrderViolation>),

    #[error(
        "Actor '{actor}' during {scenario}: observed sequence matches none of the candidates\n  candidates: {}\n  observed: {}",
        alternatives(.candidates),
        list(.observed)
    )]
    NoMatchingSequence {
        actor: ActorId,
        scenario: String,
        candidates: Vec<Vec<CallbackKind>>,
        observed: Vec<CallbackKind>,
    },

    #[error("Start state not supported for relaunch: {0}")]
    UnsupportedStartState(CallbackKind),

    #[error("Callback source closed")]
    SourceClosed,

    #[error("IO error: {0}")]
    IoError(#[source] Arc<std::io::Error>),
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::WaitTimeout {
                    timeout: t1,
                    pending: p1,
                    observed: o1,
                },
                Self::WaitTimeout {
                    timeout: t2,
                    pending: p2,
                    observed: o2,
                },
            ) => t1 == t2 && p1 == p2 && o1 == o2,
            (
                Self::TransitionsTimeout {
                    actor: a1,
                    timeout: t1,
                    expected: e1,
                    observed: o1,
                },
                Self::TransitionsTimeout {
                    actor: a2,
                    timeout: t2,
                    expected: e2,
                    observed: o2,
                },
            ) => a1 == a2 && t1 == t2 && e1 == e2 && o1 == o2,
            (Self::SequenceMismatch(a), Self::SequenceMismatch(b)) => a == b,
            (Self::OrderViolation(a), Self::OrderViolation(b)) => a == b,
            (
                Self::NoMatchingSequence {
                    actor: a1,
                    scenario: s1,
                    candidates: c1,
                    observed: o1,
                },
                Self::NoMatchingSequence {
                    actor: a2,
                    scenario: s2,
                    candidates: c2,
                    observed: o2,
                },
            ) => a1 == a2 && s1 == s2 && c1 == c2 && o1 == o2,
            (Self::UnsupportedStartState(a), Self::UnsupportedStartState(b)) => a == b,
            (Self::SourceClosed, Self::SourceClosed) => true,
            (Self::IoError(a), Self::IoError(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(Arc::new(e))
    }
}

impl From<SequenceMismatch> for Error {
    fn from(m: SequenceMismatch) -> Self {
        Error::SequenceMismatch(Box::new(m))
    }
}

impl From<OrderViolation> for Error {
    fn from(v: OrderViolation) -> Self {
        Error::OrderViolation(Box::new(v))
    }
}

/// Renders `[a, b, c]` using each item's `Display`.
pub(crate) fn list<T: Display>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Renders `[A: destroyed (last: paused), B: stopped (last: none)]`.
fn pending_with_last(pending: &[Transition], observed: &[Transition]) -> String {
    let parts: Vec<String> = pending
        .iter()
        .map(|wanted| {
            match observed.iter().find(|t| t.actor() == wanted.actor()) {
                Some(last) => format!("{wanted} (last: {})", last.kind()),
                None => format!("{wanted} (last: none)"),
            }
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

fn alternatives(all: &[Vec<CallbackKind>]) -> String {
    let parts: Vec<String> = all.iter().map(|c| list(c)).collect();
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CallbackKind::*, transition};

    #[test]
    fn wait_timeout_lists_every_pending_pair() {
        let err = Error::WaitTimeout {
            timeout: Duration::from_millis(100),
            pending: vec![transition("A", Destroyed), transition("B", Stopped)],
            observed: vec![transition("A", Paused)],
        };
        let msg = err.to_string();
        assert!(msg.contains("A: destroyed (last: paused)"), "{msg}");
        assert!(msg.contains("B: stopped (last: none)"), "{msg}");
        assert!(msg.contains("100ms"), "{msg}");
    }

    #[test]
    fn transitions_timeout_shows_both_lists() {
        let err = Error::TransitionsTimeout {
            actor: ActorId::new("A"),
            timeout: Duration::from_secs(1),
            expected: vec![Paused, Stopped],
            observed: vec![Paused],
        };
        let msg = err.to_string();
        assert!(msg.contains("expected: [paused, stopped]"), "{msg}");
        assert!(msg.contains("observed: [paused]"), "{msg}");
    }

    #[test]
    fn io_errors_compare_by_identity() {
        let a = Error::from(std::io::Error::other("disk"));
        let b = a.clone();
        let c = Error::from(std::io::Error::other("disk"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unit_variants_compare_equal() {
        assert_eq!(Error::SourceClosed, Error::SourceClosed);
        assert_ne!(
            Error::SourceClosed,
            Error::UnsupportedStartState(Created)
        );
    }
}
