//! `cbz` command: EPUB to CBZ conversion.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::batch;
use crate::epub::epub_to_cbz;
use crate::utils::path::resolve_input;

pub fn run(epubs: &[PathBuf], output: Option<&Path>) -> Result<usize> {
    if output.is_some() && epubs.len() > 1 {
        bail!("--output only makes sense with a single input");
    }

    let files: Vec<PathBuf> = epubs.iter().map(|p| resolve_input(p)).collect();
    let outcome = batch::run_batch("cbz", &files, |file| {
        epub_to_cbz(file, output)?;
        Ok(())
    });
    Ok(outcome.failures())
}
