//! Core data structures for converted dictionary entries.
//!
//! This module defines the fundamental types used throughout the library:
//! - The entry record and its field types
//! - The per-block extraction outcome
//! - Conversion diagnostics and options

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

/// One dictionary headword's full record.
///
/// Created from a new-entry block and extended in place by any continuation
/// blocks that follow it in the same file, up to the next new-entry block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub entry_word: String,
    /// Pronunciation/stress-marked display form, syllables split by `·`.
    pub head_word: Option<String>,
    pub etymology: Option<String>,
    pub definitions: Vec<Definition>,
    pub parts_of_speech: Vec<String>,
    pub synonym: Synonym,
    pub verb_morphology_entries: Vec<VerbMorphologyEntry>,
    pub quotes: Vec<Quote>,
}

impl DictionaryEntry {
    pub fn new(entry_word: impl Into<String>) -> Self {
        Self {
            entry_word: entry_word.into(),
            ..Self::default()
        }
    }
}

/// A single sense of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub definition: String,
    /// Usage or sense marker such as `(Law)` or `[Obs.]`.
    pub mark: Option<String>,
    pub source: Option<String>,
}

impl Definition {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            ..Self::default()
        }
    }
}

/// Synonym aggregate. One per entry; continuation blocks append to the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synonym {
    pub synonym_list: Vec<String>,
    pub source: Option<String>,
}

/// A conjugated form and the parts of speech it is listed under.
///
/// `parts_of_speech` is positional: an abbreviation the table does not know
/// is kept as `None` rather than dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerbMorphologyEntry {
    pub conjugated_form: String,
    pub parts_of_speech: Vec<Option<String>>,
}

/// An illustrative quotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub text: String,
    pub author: Option<String>,
    pub source: Option<String>,
}

/// Outcome of extracting one normalized block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// The block names a headword; a fresh entry was built from it.
    NewEntry(DictionaryEntry),
    /// Fields were merged into the previous entry.
    Continuation,
    /// Nothing usable, or nothing to attach it to.
    Empty,
}

/// Why a block was passed over by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SkipReason {
    /// A comment was opened inside the block and never closed.
    UnclosedComment,
    /// The block failed to parse as structured text.
    Malformed { reason: String },
    /// The block carried no usable fields, or there was no entry to extend.
    Empty,
}

/// Structured events emitted while converting one file.
///
/// Kept as data so the caller decides how to format and ship them; the driver
/// also forwards each one to the `log` facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum Diagnostic {
    FileStarted {
        file: String,
    },
    BlockSkipped {
        file: String,
        /// Byte offset of the block's `<p>` in the file text.
        offset: usize,
        reason: SkipReason,
        /// Raw block text, kept only when [`ConvertOptions::keep_skipped_blocks`] is set.
        #[serde(skip_serializing_if = "Option::is_none")]
        block: Option<String>,
    },
    FileCompleted {
        file: String,
        entries: usize,
        skipped: usize,
    },
}

/// Counters and events for one file conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub blocks_seen: usize,
    pub new_entries: usize,
    pub continuations: usize,
    pub blocks_skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// The completed output of one file: entries plus the report.
///
/// Entries are only handed out once the whole file has been scanned.
#[derive(Debug, Clone, Default)]
pub struct FileConversion {
    pub file_name: String,
    pub entries: Vec<DictionaryEntry>,
    pub report: ConversionReport,
}

/// Tunables for reading and converting source files.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Forced text encoding; `None` means BOM, then UTF-8, then Windows-1252.
    pub encoding: Option<&'static Encoding>,
    /// Only files whose name starts with this are picked up from a directory.
    pub file_prefix: String,
    /// Only files with this extension are picked up from a directory.
    pub file_extension: String,
    /// Worker threads for converting several files at once.
    pub threads: usize,
    /// Keep the raw text of skipped blocks in the diagnostics.
    pub keep_skipped_blocks: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            encoding: None,
            file_prefix: "CIDE".to_string(),
            file_extension: "xml".to_string(),
            threads: (cores / 2).max(1),
            keep_skipped_blocks: true,
        }
    }
}

impl ConvertOptions {
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_file_filter(mut self, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self.file_extension = extension.into();
        self
    }

    pub fn keep_skipped_blocks(mut self, keep: bool) -> Self {
        self.keep_skipped_blocks = keep;
        self
    }
}
