use std::fmt;

use crate::{ActorId, Transition, error::list};

/// What a sequence check was comparing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// The callbacks of one actor, with other actors filtered out.
    Actor(ActorId),
    /// The callbacks of several actors, interleaved.
    Actors(Vec<ActorId>),
    /// Every recorded callback.
    EntireLog,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Actor(actor) => write!(f, "Actor '{actor}'"),
            Subject::Actors(actors) => write!(f, "Actors {}", list(actors)),
            Subject::EntireLog => write!(f, "Entire log"),
        }
    }
}

/// The first point where observed and expected sequences part ways.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Divergence {
    /// Both sequences have an element here, and they differ.
    Substituted {
        expected: Transition,
        observed: Transition,
    },
    /// The observed sequence continues past the end of the expected one.
    TooFewExpected { observed: Transition },
    /// The observed sequence ends before the expected one does.
    TooManyExpected { expected: Transition },
}

/// A failed exact sequence comparison.
///
/// Carries everything needed to diagnose the failure: where the sequences
/// diverge, how, and both full sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceMismatch {
    subject: Subject,
    scenario: String,
    position: usize,
    divergence: Divergence,
    expected: Vec<Transition>,
    observed: Vec<Transition>,
    known_deviation: Option<&'static str>,
}

impl SequenceMismatch {
    /// Compare index by index. Returns `None` when the sequences are equal.
    pub(crate) fn between(
        subject: Subject,
        scenario: &str,
        expected: Vec<Transition>,
        observed: Vec<Transition>,
    ) -> Option<Self> {
        let substituted = expected
            .iter()
            .zip(&observed)
            .position(|(e, o)| e != o);

        let (position, divergence) = match substituted {
            Some(i) => (
                i,
                Divergence::Substituted {
                    expected: expected[i].clone(),
                    observed: observed[i].clone(),
                },
            ),
            None if observed.len() > expected.len() => (
                expected.len(),
                Divergence::TooFewExpected {
                    observed: observed[expected.len()].clone(),
                },
            ),
            None if observed.len() < expected.len() => (
                observed.len(),
                Divergence::TooManyExpected {
                    expected: expected[observed.len()].clone(),
                },
            ),
            None => return None,
        };

        Some(Self {
            subject,
            scenario: scenario.to_owned(),
            position,
            divergence,
            expected,
            observed,
            known_deviation: None,
        })
    }

    pub(crate) fn with_known_deviation(mut self, note: Option<&'static str>) -> Self {
        self.known_deviation = note;
        self
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Index of the first divergence.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn divergence(&self) -> &Divergence {
        &self.divergence
    }

    pub fn expected(&self) -> &[Transition] {
        &self.expected
    }

    pub fn observed(&self) -> &[Transition] {
        &self.observed
    }

    /// Set when the expected sequence documents a known defect of the system
    /// under test.
    pub fn known_deviation(&self) -> Option<&'static str> {
        self.known_deviation
    }

    // Single-actor checks print kinds only; the actor is already in the subject.
    fn render(&self, t: &Transition) -> String {
        match self.subject {
            Subject::Actor(_) => t.kind().to_string(),
            _ => t.to_string(),
        }
    }

    fn render_all(&self, items: &[Transition]) -> String {
        let parts: Vec<String> = items.iter().map(|t| self.render(t)).collect();
        format!("[{}]", parts.join(", "))
    }
}

impl fmt::Display for SequenceMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} during {}: ", self.subject, self.scenario)?;
        let n = self.position;
        match &self.divergence {
            Divergence::Substituted { expected, observed } => write!(
                f,
                "mismatch at position {n}: observed {}, expected {}",
                self.render(observed),
                self.render(expected)
            )?,
            Divergence::TooFewExpected { observed } => write!(
                f,
                "too few expected, length mismatch at position {n}: observed {}, expected <end>",
                self.render(observed)
            )?,
            Divergence::TooManyExpected { expected } => write!(
                f,
                "too many expected, length mismatch at position {n}: observed <end>, expected {}",
                self.render(expected)
            )?,
        }
        write!(f, "\n  expected: {}", self.render_all(&self.expected))?;
        write!(f, "\n  observed: {}", self.render_all(&self.observed))?;
        if let Some(note) = self.known_deviation {
            write!(f, "\n  known deviation: {note}")?;
        }
        Ok(())
    }
}

/// A required ordering was not found in the log.
///
/// `chain` is the ordering that was looked for; `missing` is the first
/// element of it that could not be matched at or after the position where the
/// previous element was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderViolation {
    scenario: String,
    chain: Vec<Transition>,
    index: usize,
    observed: Vec<Transition>,
}

impl OrderViolation {
    pub(crate) fn new(
        scenario: &str,
        chain: Vec<Transition>,
        index: usize,
        observed: Vec<Transition>,
    ) -> Self {
        Self {
            scenario: scenario.to_owned(),
            chain,
            index,
            observed,
        }
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn chain(&self) -> &[Transition] {
        &self.chain
    }

    /// Index into [`chain`](Self::chain) of the unmatched transition.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn missing(&self) -> &Transition {
        &self.chain[self.index]
    }

    pub fn observed(&self) -> &[Transition] {
        &self.observed
    }
}

impl fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: transition '{}' wasn't observed in the expected position",
            self.scenario,
            self.missing()
        )?;
        if self.index > 0 {
            write!(f, " (after '{}')", self.chain[self.index - 1])?;
        }
        write!(f, "\n  order: {}", list(&self.chain))?;
        write!(f, "\n  observed: {}", list(&self.observed))
    }
}
