//! In-process callback source.
//!
//! A [`CallbackSource`] plays the part of the system under test's UI thread:
//! callbacks posted from any thread are delivered, in post order, on one
//! dedicated dispatcher thread to every registered [`LifecycleListener`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lifecheck::{CallbackKind::*, CallbackSource, Config, LifecycleLog};
//!
//! let source = CallbackSource::new(&Config::default())?;
//! let log = Arc::new(LifecycleLog::new());
//! let handle = source.register(log.clone())?;
//!
//! source.post("A", PreCreate)?;
//! source.post("A", Created)?;
//! source.flush()?;
//! assert_eq!(log.len(), 2);
//!
//! handle.remove();
//! # Ok::<(), lifecheck::Error>(())
//! ```

mod command;
mod dispatcher;
mod handle;

/// Unique identifier for a registered listener.
pub type ListenerId = u16;

pub(crate) use command::SourceCommand;
use dispatcher::Dispatcher;
pub use handle::{ListenerHandle, Poster};

use std::{fmt, thread::JoinHandle};

use tokio::sync::{mpsc, oneshot};

use crate::{ActorId, CallbackKind, Config, Error, LifecycleListener, Result};

/// Registry of listeners plus the thread that delivers callbacks to them.
pub struct CallbackSource {
    sender: mpsc::UnboundedSender<SourceCommand>,
    thread: Option<JoinHandle<()>>,
}

impl CallbackSource {
    /// Start a source whose dispatcher thread is named after
    /// [`Config::dispatcher_thread_name`].
    pub fn new(config: &Config) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut dispatcher = Dispatcher::new(rx);
        let thread = std::thread::Builder::new()
            .name(config.dispatcher_thread_name().to_owned())
            .spawn(move || dispatcher.run())?;
        tracing::debug!(thread = config.dispatcher_thread_name(), "callback source started");
        Ok(Self {
            sender: tx,
            thread: Some(thread),
        })
    }

    /// Register a listener. It receives every callback posted after this
    /// call returns.
    ///
    /// Blocks until the dispatcher has accepted the listener, so it must not
    /// be called from the dispatcher thread itself.
    pub fn register<L: LifecycleListener + 'static>(&self, listener: L) -> Result<ListenerHandle> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SourceCommand::Register(Box::new(listener), tx))
            .map_err(|_| Error::SourceClosed)?;
        let id = rx.blocking_recv().map_err(|_| Error::SourceClosed)?;
        Ok(ListenerHandle::new(id, self.sender.clone()))
    }

    /// Unregister a listener by its ID.
    ///
    /// Prefer using [`ListenerHandle::remove()`] instead.
    pub fn unregister(&self, id: ListenerId) {
        let _ = self.sender.send(SourceCommand::Unregister(id));
    }

    /// Pause every registered listener.
    pub fn pause(&self) {
        let _ = self.sender.send(SourceCommand::PauseAll);
    }

    /// Resume every registered listener.
    pub fn resume(&self) {
        let _ = self.sender.send(SourceCommand::ResumeAll);
    }

    /// Queue a callback for delivery.
    pub fn post(&self, actor: impl Into<ActorId>, kind: CallbackKind) -> Result {
        self.poster().post(actor, kind)
    }

    /// Returns a sender that other threads can post through.
    pub fn poster(&self) -> Poster {
        Poster::new(self.sender.clone())
    }

    /// Block until every callback posted before this call has been delivered.
    pub fn flush(&self) -> Result {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SourceCommand::Flush(tx))
            .map_err(|_| Error::SourceClosed)?;
        rx.blocking_recv().map_err(|_| Error::SourceClosed)
    }

    /// Stop the dispatcher thread after it has delivered everything queued.
    ///
    /// Idempotent. Later posts fail with [`Error::SourceClosed`].
    pub fn shutdown(&mut self) {
        let _ = self.sender.send(SourceCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("callback dispatcher thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for CallbackSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for CallbackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSource")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        thread,
    };

    use super::*;
    use crate::{CallbackKind::*, LifecycleLog, transition};

    struct Named {
        name: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl LifecycleListener for Named {
        fn on_callback(&self, _actor: &ActorId, _kind: CallbackKind) {
            self.seen.lock().unwrap().push(self.name);
        }
    }

    struct Panicky;

    impl LifecycleListener for Panicky {
        fn on_callback(&self, _actor: &ActorId, _kind: CallbackKind) {
            panic!("listener failure");
        }
    }

    struct ThreadName(Arc<Mutex<Option<String>>>);

    impl LifecycleListener for ThreadName {
        fn on_callback(&self, _actor: &ActorId, _kind: CallbackKind) {
            *self.0.lock().unwrap() = thread::current().name().map(str::to_owned);
        }
    }

    fn source() -> CallbackSource {
        CallbackSource::new(&Config::default()).unwrap()
    }

    #[test]
    fn delivers_in_post_order() {
        let source = source();
        let log = Arc::new(LifecycleLog::new());
        source.register(log.clone()).unwrap();

        for kind in [PreCreate, Created, Started, Resumed] {
            source.post("A", kind).unwrap();
        }
        source.flush().unwrap();

        log.verify()
            .assert_actor_sequence("A", &[PreCreate, Created, Started, Resumed], "launch");
    }

    #[test]
    fn listeners_called_in_registration_order() {
        let source = source();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second", "third"] {
            source
                .register(Named {
                    name,
                    seen: seen.clone(),
                })
                .unwrap();
        }
        source.post("A", Resumed).unwrap();
        source.flush().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn delivers_on_named_dispatcher_thread() {
        let source = CallbackSource::new(&Config::default().with_dispatcher_thread_name("ui")).unwrap();
        let name = Arc::new(Mutex::new(None));
        source.register(ThreadName(name.clone())).unwrap();
        source.post("A", Resumed).unwrap();
        source.flush().unwrap();
        assert_eq!(name.lock().unwrap().as_deref(), Some("ui"));
    }

    #[test]
    fn panicking_listener_is_removed_and_others_continue() {
        let source = source();
        let log = Arc::new(LifecycleLog::new());
        source.register(Panicky).unwrap();
        source.register(log.clone()).unwrap();

        source.post("A", Resumed).unwrap();
        source.post("A", Paused).unwrap();
        source.flush().unwrap();

        assert_eq!(log.snapshot_all(), vec![transition("A", Resumed), transition("A", Paused)]);
    }

    #[test]
    fn paused_listener_skips_callbacks() {
        let source = source();
        let log = Arc::new(LifecycleLog::new());
        let handle = source.register(log.clone()).unwrap();

        source.post("A", Resumed).unwrap();
        handle.pause();
        source.post("A", Paused).unwrap();
        handle.resume();
        source.post("A", Stopped).unwrap();
        source.flush().unwrap();

        assert_eq!(log.snapshot_for_actor(&"A".into()), vec![Resumed, Stopped]);
    }

    #[test]
    fn removed_listener_gets_nothing_more() {
        let source = source();
        let log = Arc::new(LifecycleLog::new());
        let handle = source.register(log.clone()).unwrap();
        source.post("A", Resumed).unwrap();
        handle.remove();
        source.post("A", Paused).unwrap();
        source.flush().unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn posters_from_many_threads_keep_per_thread_order() {
        let source = source();
        let log = Arc::new(LifecycleLog::new());
        source.register(log.clone()).unwrap();

        let handles: Vec<_> = ["A", "B", "C"]
            .into_iter()
            .map(|actor| {
                let poster = source.poster();
                thread::spawn(move || {
                    for kind in [PreCreate, Created, Started, Resumed] {
                        poster.post(actor, kind).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        source.flush().unwrap();

        for actor in ["A", "B", "C"] {
            log.verify()
                .assert_actor_sequence(actor, &[PreCreate, Created, Started, Resumed], "launch");
        }
    }

    #[test]
    fn post_after_shutdown_fails() {
        let mut source = source();
        let poster = source.poster();
        source.shutdown();
        assert!(!source.is_running());
        assert_eq!(source.post("A", Resumed), Err(Error::SourceClosed));
        assert_eq!(poster.post("A", Resumed), Err(Error::SourceClosed));
        assert!(matches!(source.register(Panicky), Err(Error::SourceClosed)));
        assert_eq!(source.flush(), Err(Error::SourceClosed));
    }

    #[test]
    fn every_accepted_post_is_delivered_across_shutdown() {
        let mut source = source();
        let log = Arc::new(LifecycleLog::new());
        source.register(log.clone()).unwrap();

        let poster = source.poster();
        let writer = thread::spawn(move || {
            let mut accepted = 0;
            while poster.post("A", Resumed).is_ok() {
                accepted += 1;
            }
            accepted
        });
        thread::sleep(std::time::Duration::from_millis(10));
        source.shutdown();

        let accepted = writer.join().unwrap();
        assert!(accepted > 0);
        assert_eq!(log.len(), accepted);
    }
}
