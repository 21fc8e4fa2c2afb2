//! # gcide-reader
//!
//! Converts the GCIDE dictionary source files (SGML-flavored markup, one file
//! per letter range) into structured dictionary entries: headword,
//! definitions, parts of speech, synonyms, etymology, verb conjugation tables
//! and quotations.
//!
//! The source is not well-formed XML. Each file is split into balanced `<p>`
//! blocks, each block is normalized into parseable markup, and each block
//! either starts a new entry or extends the previous one.
pub mod gcide;

// Re-export the main types for convenience
pub use gcide::{
    convert_file,
    GcideError,
    Result,
    batch::{convert_paths, FileOutcome, FileSummary},
    converter::convert,
    extract::extract,
    format::{normalize::normalize, segment::segments},
    sink::{JsonLinesSink, MemorySink, PersistenceSink},
    types::models::{
        ConversionReport,
        ConvertOptions,
        Definition,
        Diagnostic,
        DictionaryEntry,
        ExtractionResult,
        FileConversion,
        Quote,
        SkipReason,
        Synonym,
        VerbMorphologyEntry,
    },
};
