//! # File Conversion
//!
//! Drives one file's text through segmentation, normalization and
//! extraction, carrying the most recent entry forward so continuation blocks
//! have something to attach to.
//!
//! Block-level failures never leave this module: a malformed or empty block
//! is recorded in the [`ConversionReport`] and skipped. Entries are returned
//! only after the whole file has been scanned.

use log::{debug, info, warn};

use crate::gcide::extract;
use crate::gcide::format::normalize::normalize;
use crate::gcide::format::segment::{segments, Block};
use crate::gcide::types::error::GcideError;
use crate::gcide::types::models::*;

/// Converts the text of one source file.
///
/// The current entry is always the last one in the output list, so the
/// state carried between blocks is just that list.
pub fn convert(file_name: &str, text: &str, options: &ConvertOptions) -> FileConversion {
    let mut conversion = FileConversion {
        file_name: file_name.to_string(),
        ..FileConversion::default()
    };
    info!("Parsing file {}", file_name);
    conversion.report.diagnostics.push(Diagnostic::FileStarted {
        file: file_name.to_string(),
    });

    for block in segments(text) {
        conversion.report.blocks_seen += 1;

        if block.has_unclosed_comment() {
            skip(&mut conversion, &block, SkipReason::UnclosedComment, options);
            continue;
        }

        let normalized = normalize(block.text);
        match extract::extract(&normalized, conversion.entries.last_mut()) {
            Ok(ExtractionResult::NewEntry(entry)) => {
                conversion.report.new_entries += 1;
                conversion.entries.push(entry);
            }
            Ok(ExtractionResult::Continuation) => {
                conversion.report.continuations += 1;
            }
            Ok(ExtractionResult::Empty) => {
                skip(&mut conversion, &block, SkipReason::Empty, options);
            }
            Err(GcideError::MalformedBlock { reason, .. }) => {
                skip(&mut conversion, &block, SkipReason::Malformed { reason }, options);
            }
            Err(other) => {
                skip(
                    &mut conversion,
                    &block,
                    SkipReason::Malformed { reason: other.to_string() },
                    options,
                );
            }
        }
    }

    let entries = conversion.entries.len();
    let skipped = conversion.report.blocks_skipped;
    info!(
        "Parsing of file {} is complete: {} entries, {} blocks skipped",
        file_name, entries, skipped
    );
    conversion.report.diagnostics.push(Diagnostic::FileCompleted {
        file: file_name.to_string(),
        entries,
        skipped,
    });
    conversion
}

fn skip(conversion: &mut FileConversion, block: &Block<'_>, reason: SkipReason, options: &ConvertOptions) {
    match &reason {
        SkipReason::Empty => debug!(
            "{}: skipping empty block at offset {}",
            conversion.file_name, block.offset
        ),
        SkipReason::UnclosedComment => warn!(
            "{}: skipping block with unclosed comment at offset {}",
            conversion.file_name, block.offset
        ),
        SkipReason::Malformed { reason } => {
            warn!(
                "{}: skipping malformed block at offset {}: {}",
                conversion.file_name, block.offset, reason
            );
            debug!("{}", block.text);
        }
    }

    conversion.report.blocks_skipped += 1;
    conversion.report.diagnostics.push(Diagnostic::BlockSkipped {
        file: conversion.file_name.clone(),
        offset: block.offset,
        reason,
        block: options.keep_skipped_blocks.then(|| block.text.to_string()),
    });
}
