//! Batch config operations
//!
//! File discovery and parallel parsing of whole directory trees. Each file is
//! parsed on its own `rayon` worker with its own parser state; a file that
//! fails is reported and the batch moves on.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::formats::cfg::{CfgParser, ParsedCfg};

/// Progress of a running batch.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Files started so far, including this one.
    pub current: usize,
    pub total: usize,
    /// Path of the file being processed, relative to the batch root when known.
    pub file: String,
}

/// Result of a batch parse
#[derive(Debug, Clone, Default)]
pub struct BatchParseResult {
    /// Number of files parsed
    pub success_count: usize,
    /// Number of files skipped because of an error
    pub fail_count: usize,
    /// One message per file, in input order
    pub results: Vec<String>,
    /// Trees of the files that parsed, in input order
    pub parsed: Vec<(PathBuf, ParsedCfg)>,
}

impl BatchParseResult {
    /// Number of warnings across all parsed files.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.parsed.iter().map(|(_, p)| p.warnings.len()).sum()
    }
}

/// Find all `.cfg` files in a directory recursively.
///
/// Returns a sorted list; unreadable entries are logged and skipped.
pub fn find_cfg_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut cfg_files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("{}, skipped", Error::from(err));
                None
            }
        })
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("cfg"))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    cfg_files.sort();
    cfg_files
}

/// Read and parse one file, using its path as the file name in messages.
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse.
pub fn parse_file(path: &Path, parser: &CfgParser<'_>) -> Result<ParsedCfg> {
    let content = std::fs::read_to_string(path)?;
    let file_name = path.display().to_string();
    parser.with_file_name(&file_name).parse_text(&content)
}

/// Parse files in parallel.
pub fn parse_files(paths: &[PathBuf], parser: &CfgParser<'_>) -> BatchParseResult {
    parse_files_with_progress(paths, None, parser, |_| {})
}

/// Parse files in parallel, reporting progress.
///
/// `base` is stripped from paths in messages and progress updates.
pub fn parse_files_with_progress<F>(
    paths: &[PathBuf],
    base: Option<&Path>,
    parser: &CfgParser<'_>,
    progress: F,
) -> BatchParseResult
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = paths.len();

    let outcomes: Vec<(String, Option<ParsedCfg>)> = paths
        .par_iter()
        .map(|path| {
            let relative_path = base
                .and_then(|b| path.strip_prefix(b).ok())
                .unwrap_or(path.as_path());
            let display_path = relative_path.to_string_lossy().to_string();

            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress {
                current,
                total,
                file: display_path.clone(),
            });

            match parse_file(path, parser) {
                Ok(parsed) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    let message = if parsed.warnings.is_empty() {
                        format!("Parsed: {display_path}")
                    } else {
                        format!("Parsed: {display_path} ({} warnings)", parsed.warnings.len())
                    };
                    (message, Some(parsed))
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    tracing::warn!("cannot parse {}: {}, skipped", display_path, e);
                    (format!("cannot parse {display_path}: {e}, skipped"), None)
                }
            }
        })
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut parsed = Vec::new();
    for (path, (message, tree)) in paths.iter().zip(outcomes) {
        results.push(message);
        if let Some(tree) = tree {
            parsed.push((path.clone(), tree));
        }
    }

    BatchParseResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
        parsed,
    }
}
