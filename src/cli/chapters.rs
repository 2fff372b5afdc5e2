//! `chapters` and `volume` commands.

use std::path::Path;

use anyhow::Result;

use crate::chapters::{renumber_chapters, split_volume};
use crate::utils::path::{resolve_dir, resolve_input};

pub fn run_chapters(dir: &Path) -> Result<usize> {
    renumber_chapters(&resolve_dir(dir)?)
}

pub fn run_volume(input_dir: &Path, toc_page: &str, contents_file: &Path) -> Result<()> {
    split_volume(
        &resolve_dir(input_dir)?,
        toc_page,
        &resolve_input(contents_file),
    )
}
