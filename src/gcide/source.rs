//! Loading source files from disk.
//!
//! The converter itself only sees text. This module turns a path into that
//! text, decoding bytes the way the legacy corpus needs:
//!
//! 1. A byte-order mark, if present, wins.
//! 2. Otherwise the encoding forced by [`ConvertOptions::encoding`].
//! 3. Otherwise UTF-8, falling back to Windows-1252 for Latin-1 era files.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::{debug, info, warn};

use crate::gcide::types::error::{GcideError, Result};
use crate::gcide::types::models::ConvertOptions;

/// Resolves an encoding label such as `utf-8`, `latin1` or `windows-1252`.
///
/// # Errors
/// Returns [`GcideError::UnknownEncoding`] if `encoding_rs` has no such label.
pub fn parse_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| GcideError::UnknownEncoding(label.to_string()))
}

/// Decodes raw file bytes into text.
pub fn decode(bytes: &[u8], forced: Option<&'static Encoding>) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        debug!("Byte-order mark found, decoding as {}", encoding.name());
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    if let Some(encoding) = forced {
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            warn!("Malformed {} sequences replaced while decoding", encoding.name());
        }
        return text.into_owned();
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text.into_owned(),
        None => {
            debug!("Source is not valid UTF-8, decoding as {}", WINDOWS_1252.name());
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

/// Reads and decodes one source file.
///
/// # Errors
/// - [`GcideError::Io`] if the file cannot be read
/// - [`GcideError::EmptyFile`] if it holds nothing but whitespace
pub fn read_source(path: impl AsRef<Path>, forced: Option<&'static Encoding>) -> Result<String> {
    let path = path.as_ref();
    debug!("Reading source file: {}", path.display());
    let bytes = fs::read(path)?;
    let text = decode(&bytes, forced);
    if text.trim().is_empty() {
        return Err(GcideError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(text)
}

/// Lists the source files in `dir` that match the configured prefix and
/// extension, sorted by file name.
pub fn list_sources(dir: impl AsRef<Path>, options: &ConvertOptions) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut sources = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type()?.is_file() {
            continue;
        }
        let path = dir_entry.path();
        if is_source_file(&path, options) {
            sources.push(path);
        }
    }
    sources.sort();
    info!("Found {} source files in {}", sources.len(), dir.display());
    Ok(sources)
}

fn is_source_file(path: &Path, options: &ConvertOptions) -> bool {
    let name_matches = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(&options.file_prefix));
    let extension_matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(&options.file_extension));
    name_matches && extension_matches
}
