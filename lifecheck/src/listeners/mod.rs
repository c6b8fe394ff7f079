//! Ready-to-use listener implementations.
//!
//! Each of these can be registered on a
//! [`CallbackSource`](crate::CallbackSource) next to a session's log.
//!
//! # Available Listeners
//!
//! - [`Tracer`] - Logs callbacks via the `tracing` crate
//! - [`StateMonitor`] - Point-in-time view of actor states and the top position
//! - [`Recorder`] - Records callbacks to a JSON Lines file (requires `recorder` feature)
//!
//! # Example
//!
//! ```
//! use lifecheck::{CallbackSource, Config, listeners::Tracer};
//!
//! let source = CallbackSource::new(&Config::default())?;
//! source.register(Tracer)?;
//! # Ok::<(), lifecheck::Error>(())
//! ```

mod tracer;
pub use tracer::Tracer;

mod state_monitor;
pub use state_monitor::StateMonitor;

#[cfg(feature = "recorder")]
mod recorder;

#[cfg(feature = "recorder")]
#[cfg_attr(docsrs, doc(cfg(feature = "recorder")))]
pub use recorder::Recorder;
