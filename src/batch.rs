//! Shared batch driver.
//!
//! Every directory tool follows the same contract: enumerate matching files,
//! process them in a deterministic order, isolate per-file failures, and
//! report `ok/total` at the end. One failing file never stops the batch; it
//! is logged with its error and recorded for the summary, and the process
//! exit code reflects it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::config::SortOrder;
use crate::log;
use crate::logger::ProgressLine;
use crate::utils::natsort::natural_cmp;
use crate::utils::path::has_extension;

/// Result of one batch run.
pub struct BatchOutcome {
    pub total: usize,
    pub failed: Vec<String>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.total - self.failed.len()
    }

    pub fn failures(&self) -> usize {
        self.failed.len()
    }
}

/// Collect files with one of the given extensions (lowercase) from a
/// directory, non-recursively, in the requested order.
pub fn collect_files(dir: &Path, extensions: &[&str], sort: SortOrder) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory '{}'", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_extension(path, extensions))
        .collect();

    match sort {
        SortOrder::Natural => files.sort_by(|a, b| natural_cmp(&name_of(a), &name_of(b))),
        SortOrder::Lexicographic => files.sort(),
    }
    Ok(files)
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Run `op` over the files in order, isolating failures.
pub fn run_batch<F>(module: &'static str, files: &[PathBuf], mut op: F) -> BatchOutcome
where
    F: FnMut(&Path) -> Result<()>,
{
    let progress = ProgressLine::new("files", files.len());
    let mut failed = Vec::new();

    for file in files {
        let name = name_of(file);
        match op(file) {
            Ok(()) => log!(module; "{} {name}", "✓".green()),
            Err(e) => {
                log!(module; "{} {name}: {e:#}", "✗".red());
                failed.push(name);
            }
        }
        progress.inc();
    }
    progress.finish();

    let outcome = BatchOutcome {
        total: files.len(),
        failed,
    };
    log!(module; "{}/{} files processed", outcome.succeeded(), outcome.total);
    if !outcome.failed.is_empty() {
        log!(module; "failed: {}", outcome.failed.join(", "));
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn collects_in_natural_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10.xhtml", "1.xhtml", "2.xhtml", "notes.txt"] {
            touch(dir.path(), name);
        }

        let files = collect_files(dir.path(), &["xhtml"], SortOrder::Natural).unwrap();
        let names: Vec<_> = files.iter().map(|p| name_of(p)).collect();
        assert_eq!(names, vec!["1.xhtml", "2.xhtml", "10.xhtml"]);
    }

    #[test]
    fn lexicographic_order_is_available() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10.xhtml", "1.xhtml", "2.xhtml"] {
            touch(dir.path(), name);
        }

        let files = collect_files(dir.path(), &["xhtml"], SortOrder::Lexicographic).unwrap();
        let names: Vec<_> = files.iter().map(|p| name_of(p)).collect();
        assert_eq!(names, vec!["1.xhtml", "10.xhtml", "2.xhtml"]);
    }

    #[test]
    fn one_failure_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["1.xhtml", "2.xhtml", "3.xhtml"] {
            touch(dir.path(), name);
        }
        let files = collect_files(dir.path(), &["xhtml"], SortOrder::Natural).unwrap();

        let mut seen = Vec::new();
        let outcome = run_batch("format", &files, |file| {
            let name = name_of(file);
            seen.push(name.clone());
            if name == "2.xhtml" {
                anyhow::bail!("boom");
            }
            Ok(())
        });

        assert_eq!(seen.len(), 3);
        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failures(), 1);
        assert_eq!(outcome.failed, vec!["2.xhtml"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(collect_files(Path::new("/nonexistent"), &["xhtml"], SortOrder::Natural).is_err());
    }
}
