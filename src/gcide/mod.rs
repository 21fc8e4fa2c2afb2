//! Core GCIDE conversion module

pub mod batch;
pub mod converter;
pub mod extract;
pub mod format;
pub mod sink;
pub mod source;
pub mod types;

pub use types::error::{GcideError, Result};
use types::models::{ConvertOptions, DictionaryEntry};

/// Converts one file's text into its dictionary entries.
///
/// Shortcut for [`converter::convert`] with default options when only the
/// entries are needed. Blocks that cannot be used are skipped and logged.
pub fn convert_file(file_name: &str, text: &str) -> Vec<DictionaryEntry> {
    converter::convert(file_name, text, &ConvertOptions::default()).entries
}
