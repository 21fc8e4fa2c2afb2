//! Where converted entries go.
//!
//! The converter never stores anything itself. Once a file is fully
//! converted its entries are offered, one at a time, to a [`PersistenceSink`].

use std::io::Write;
use std::sync::Mutex;

use log::{info, warn};

use crate::gcide::types::error::{GcideError, Result};
use crate::gcide::types::models::DictionaryEntry;

/// Consumer of completed entries.
///
/// Shared across worker threads when several files are converted at once,
/// so implementations handle their own synchronization.
pub trait PersistenceSink: Send + Sync {
    /// Stores one entry and returns the stored form.
    fn save(&self, entry: DictionaryEntry) -> Result<DictionaryEntry>;
}

/// Counts from offering a list of entries to a sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistSummary {
    pub saved: usize,
    pub failed: usize,
}

/// Offers every entry to `sink` once. Rejections are logged and counted.
pub fn persist<S: PersistenceSink + ?Sized>(entries: Vec<DictionaryEntry>, sink: &S) -> PersistSummary {
    let mut summary = PersistSummary::default();
    if entries.is_empty() {
        warn!("No entries to save");
        return summary;
    }
    info!("Saving {} entries", entries.len());

    for entry in entries {
        let word = entry.entry_word.clone();
        match sink.save(entry) {
            Ok(_) => summary.saved += 1,
            Err(e) => {
                warn!("Failed to save entry '{}': {}", word, e);
                summary.failed += 1;
            }
        }
    }
    summary
}

/// Keeps entries in memory, in the order they were saved.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<DictionaryEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries saved so far.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes the stored entries out of the sink.
    pub fn into_entries(self) -> Result<Vec<DictionaryEntry>> {
        self.entries
            .into_inner()
            .map_err(|_| GcideError::Sink("memory sink lock poisoned".to_string()))
    }
}

impl PersistenceSink for MemorySink {
    fn save(&self, entry: DictionaryEntry) -> Result<DictionaryEntry> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| GcideError::Sink("memory sink lock poisoned".to_string()))?;
        entries.push(entry.clone());
        Ok(entry)
    }
}

/// Writes each entry as one line of JSON.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        let mut writer = self
            .writer
            .into_inner()
            .map_err(|_| GcideError::Sink("json sink lock poisoned".to_string()))?;
        writer.flush()?;
        Ok(writer)
    }
}

impl<W: Write + Send> PersistenceSink for JsonLinesSink<W> {
    fn save(&self, entry: DictionaryEntry) -> Result<DictionaryEntry> {
        let line = serde_json::to_string(&entry)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| GcideError::Sink("json sink lock poisoned".to_string()))?;
        writeln!(writer, "{}", line)?;
        Ok(entry)
    }
}
