//! Converting many source files at once.
//!
//! Each file is read, converted and persisted on its own worker with no
//! shared state besides the sink. A file that cannot be read is reported in
//! its [`FileOutcome`] and does not affect the others.

use std::path::{Path, PathBuf};

use log::{error, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::gcide::converter;
use crate::gcide::sink::{persist, PersistenceSink};
use crate::gcide::source;
use crate::gcide::types::error::Result;
use crate::gcide::types::models::{ConversionReport, ConvertOptions};

/// What happened to one file that was converted successfully.
#[derive(Debug, Clone, Default)]
pub struct FileSummary {
    pub entries: usize,
    pub skipped_blocks: usize,
    pub saved: usize,
    pub failed: usize,
    pub report: ConversionReport,
}

/// Per-file result of a batch run.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<FileSummary>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Expands directories into their source files; plain files pass through.
pub fn expand_paths(paths: &[PathBuf], options: &ConvertOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(source::list_sources(path, options)?);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Reads, converts and persists a single file.
pub fn convert_path<S: PersistenceSink + ?Sized>(
    path: &Path,
    options: &ConvertOptions,
    sink: &S,
) -> Result<FileSummary> {
    let text = source::read_source(path, options.encoding)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let conversion = converter::convert(&file_name, &text, options);
    let entries = conversion.entries.len();
    let skipped_blocks = conversion.report.blocks_skipped;

    let persisted = persist(conversion.entries, sink);
    info!(
        "Persist of {} complete: {} saved, {} failed",
        file_name, persisted.saved, persisted.failed
    );

    Ok(FileSummary {
        entries,
        skipped_blocks,
        saved: persisted.saved,
        failed: persisted.failed,
        report: conversion.report,
    })
}

/// Converts every path on a pool of `options.threads` workers.
///
/// Outcomes come back in the order of `paths`.
pub fn convert_paths<S: PersistenceSink + ?Sized>(
    paths: &[PathBuf],
    options: &ConvertOptions,
    sink: &S,
) -> Vec<FileOutcome> {
    let run_one = |path: &PathBuf| {
        let result = convert_path(path, options, sink);
        if let Err(e) = &result {
            error!("Error processing file {}: {}", path.display(), e);
        }
        FileOutcome {
            path: path.clone(),
            result,
        }
    };

    match ThreadPoolBuilder::new().num_threads(options.threads.max(1)).build() {
        Ok(pool) => pool.install(|| paths.par_iter().map(run_one).collect()),
        Err(e) => {
            warn!("Could not start worker pool ({}), converting sequentially", e);
            paths.iter().map(run_one).collect()
        }
    }
}
