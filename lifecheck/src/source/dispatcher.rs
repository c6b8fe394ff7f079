use std::{
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
};

use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    LifecycleListener, Transition,
    source::{ListenerId, SourceCommand},
};

struct ListenerEntry {
    id: ListenerId,
    listener: Box<dyn LifecycleListener>,
    paused: bool,
}

/// Runs on the source's dedicated thread and delivers callbacks.
///
/// Listeners live in a `Vec` so delivery follows registration order.
pub(crate) struct Dispatcher {
    receiver: UnboundedReceiver<SourceCommand>,
    listeners: Vec<ListenerEntry>,
    last_id: ListenerId,
    ids_to_remove: Vec<ListenerId>,
    is_alive: bool,
}

impl Dispatcher {
    pub fn new(receiver: UnboundedReceiver<SourceCommand>) -> Self {
        Self {
            receiver,
            listeners: Vec::new(),
            last_id: 0,
            ids_to_remove: Vec::with_capacity(4),
            is_alive: true,
        }
    }

    pub fn run(&mut self) {
        while self.is_alive {
            match self.receiver.blocking_recv() {
                Some(cmd) => self.handle_command(cmd),
                // Every sender is gone.
                None => break,
            }
        }
        tracing::debug!(listeners = self.listeners.len(), "callback dispatcher stopped");
    }

    fn handle_command(&mut self, cmd: SourceCommand) {
        use SourceCommand::*;
        match cmd {
            Register(listener, resp) => {
                let id = self.last_id;
                self.last_id = self.last_id.wrapping_add(1);
                self.listeners.push(ListenerEntry {
                    id,
                    listener,
                    paused: false,
                });
                let _ = resp.send(id);
            }
            Unregister(id) => {
                self.remove_listener(id);
            }
            PauseAll => self.set_all_paused(true),
            ResumeAll => self.set_all_paused(false),
            PauseOne(id) => self.set_paused(id, true),
            ResumeOne(id) => self.set_paused(id, false),
            Dispatch(transition) => {
                self.deliver(&transition);
            }
            Flush(resp) => {
                let _ = resp.send(());
            }
            Shutdown => {
                self.is_alive = false;
                self.receiver.close();
                self.drain();
            }
        }
    }

    /// Handle what was queued before the channel closed.
    ///
    /// Every post that was accepted is delivered. Registrations are refused,
    /// so their callers see `SourceClosed`.
    fn drain(&mut self) {
        while let Some(cmd) = self.receiver.blocking_recv() {
            match cmd {
                SourceCommand::Dispatch(transition) => self.deliver(&transition),
                SourceCommand::Flush(resp) => {
                    let _ = resp.send(());
                }
                _ => {}
            }
        }
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|entry| entry.id != id);
    }

    fn set_paused(&mut self, id: ListenerId, paused: bool) {
        if let Some(entry) = self.listeners.iter_mut().find(|entry| entry.id == id) {
            entry.paused = paused;
        }
    }

    fn set_all_paused(&mut self, paused: bool) {
        for entry in &mut self.listeners {
            entry.paused = paused;
        }
    }

    fn deliver(&mut self, transition: &Transition) {
        for entry in &self.listeners {
            if entry.paused {
                continue;
            }

            let result = catch_unwind(AssertUnwindSafe(|| {
                entry
                    .listener
                    .on_callback(transition.actor(), transition.kind())
            }));
            if result.is_err() {
                tracing::error!(listener_id = %entry.id, %transition, "Listener panicked, removing");
                self.ids_to_remove.push(entry.id);
            }
        }

        while let Some(id) = self.ids_to_remove.pop() {
            self.remove_listener(id);
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("receiver", &self.receiver)
            .field("listeners.len()", &self.listeners.len())
            .field("last_id", &self.last_id)
            .field("is_alive", &self.is_alive)
            .finish()
    }
}
