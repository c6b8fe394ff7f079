use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use parking_lot::Mutex;
use serde::Serialize;

use crate::{ActorId, CallbackKind, LifecycleListener, log_entry::now_nanos};

/// A listener that records callbacks to a file in JSON Lines format.
///
/// Each callback is written as a JSON object on its own line and flushed
/// immediately:
///
/// ```text
/// {"timestamp":1718000000000000000,"actor":"A","kind":"resumed"}
/// ```
///
/// # Example
///
/// ```ignore
/// let recorder = Recorder::new("callbacks.jsonl")?;
/// source.register(recorder)?;
/// ```
#[derive(Debug)]
pub struct Recorder {
    writer: Mutex<BufWriter<File>>,
}

#[derive(Serialize)]
struct Line<'a> {
    timestamp: u64,
    actor: &'a ActorId,
    kind: CallbackKind,
}

impl Recorder {
    /// Create a new recorder that writes to the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoError`](crate::Error::IoError) if the file cannot be created.
    pub fn new<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl LifecycleListener for Recorder {
    fn on_callback(&self, actor: &ActorId, kind: CallbackKind) {
        let line = Line {
            timestamp: now_nanos(),
            actor,
            kind,
        };
        let mut writer = self.writer.lock();
        if let Err(e) = serde_json::to_writer(&mut *writer, &line) {
            tracing::warn!("Recorder failed to serialize callback: {}", e);
        }
        let _ = writer.write_all(b"\n");
        let _ = writer.flush();
    }
}
