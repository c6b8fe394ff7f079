#![cfg_attr(docsrs, feature(doc_cfg))]
//! # lifecheck
//!
//! Record, await and verify activity lifecycle callbacks.
//!
//! Lifecycle tests drive a UI system and then need to know two things: when
//! the actors under test have settled, and whether they got there through the
//! right sequence of callbacks. Callbacks arrive asynchronously on the
//! system's main thread while the test runs on its own thread. lifecheck
//! records every callback in arrival order, lets the test thread block until
//! an expected state is reached, and then diffs the recorded sequence against
//! an expected one.
//!
//! ## Quick Start
//!
//! ```rust
//! use lifecheck::*;
//! use lifecheck::CallbackKind::*;
//!
//! fn main() -> Result {
//!     let source = CallbackSource::new(&Config::default())?;
//!     let session = Session::attach(&source, Config::default())?;
//!
//!     // Play the system under test from another thread.
//!     let ui = Script::new()
//!         .emit_all("FirstActivity", &[PreCreate, Created, Started, Resumed])
//!         .spawn(source.poster());
//!
//!     session.wait_and_assert_states([("FirstActivity", Resumed)]);
//!     session
//!         .verifier()
//!         .assert_scenario("FirstActivity", &Scenario::LAUNCH, Tracking::Lifecycle);
//!
//!     ui.join().expect("script thread panicked")
//! }
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`LifecycleLog`] | Thread-safe, append-only record of callbacks |
//! | [`Tracker`] | Blocks until a [`WaitPredicate`] holds, with a timeout |
//! | [`Verifier`] | Exact, ordered and template checks over a log snapshot |
//! | [`Scenario`] | Expected sequences for common lifecycle paths |
//! | [`Session`] | One log plus one tracker for the duration of a test |
//! | [`CallbackSource`] | Delivers posted callbacks on a dedicated thread |
//! | [`LifecycleListener`] | The one-method contract every receiver implements |
//!
//! ## Waiting
//!
//! Waits are condition-variable based: the tracker wakes on every recorded
//! callback and re-evaluates, so a satisfied wait returns promptly and an
//! unsatisfied one returns `false` exactly at its timeout.
//!
//! ```rust,ignore
//! let stopped = WaitPredicate::new().with("A", Stopped).with("B", Resumed);
//! assert!(session.tracker().wait_for(&stopped, Duration::from_secs(5)));
//! ```
//!
//! ## Failures
//!
//! Sequence failures name the first diverging position and print both full
//! sequences:
//!
//! ```text
//! Actor 'A' during relaunch: mismatch at position 0: observed configuration-changed, expected paused
//!   expected: [paused, stopped, destroyed, pre-create, created, started, resumed]
//!   observed: [configuration-changed]
//! ```
//!
//! ## Features
//!
//! - **`serde`** - `Serialize`/`Deserialize` for the data types and [`Config`]
//! - **`recorder`** - Built-in [`listeners::Recorder`] writing callbacks to JSON Lines files (enables `serde`)

mod actor_id;
mod callback_kind;
mod config;
mod error;
mod expectation;
mod listener;
mod log;
mod log_entry;
mod predicate;
mod session;
mod source;
mod stimulus;
mod tracker;
mod transition;
mod verifier;

pub mod listeners;

pub use actor_id::ActorId;
pub use callback_kind::{Axis, CallbackKind};
pub use config::Config;
pub use error::Error;
pub use expectation::Expectation;
pub use listener::LifecycleListener;
pub use log::{LifecycleLog, ObserverId, Records};
pub use log_entry::LogEntry;
pub use predicate::WaitPredicate;
pub use session::Session;
pub use source::{CallbackSource, ListenerHandle, ListenerId, Poster};
pub use stimulus::Script;
pub use tracker::Tracker;
pub use transition::{Transition, transition};
pub use verifier::{
    Divergence, OrderViolation, Scenario, SequenceMismatch, Subject, Tracking, Verifier,
};

/// Convenience alias for `Result<T, lifecheck::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
