//! `split`, `concat`, `blend` and `convert` commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::batch;
use crate::config::SortOrder;
use crate::log;
use crate::pages::blend::{Edge, blend_pages};
use crate::pages::concat::{Direction, concat_pages};
use crate::pages::convert::{TargetFormat, convert_page};
use crate::pages::{IMAGE_EXTENSIONS, split};
use crate::utils::path::{resolve_dir, resolve_input, sibling_dir};

pub fn run_split(input_dir: &Path) -> Result<usize> {
    let source = resolve_dir(input_dir)?;
    let files = batch::collect_files(&source, &IMAGE_EXTENSIONS, SortOrder::Natural)?;

    let output_dir = sibling_dir(&source, "split")?;
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create '{}'", output_dir.display()))?;
    log!("pages"; "splitting double pages into {}", output_dir.display());

    let outcome = batch::run_batch("pages", &files, |file| split::process_page(file, &output_dir));
    Ok(outcome.failures())
}

pub fn run_concat(horizontal: bool, image1: &Path, image2: &Path) -> Result<()> {
    let direction = if horizontal {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    concat_pages(direction, &resolve_input(image1), &resolve_input(image2)).map(|_| ())
}

pub fn run_blend(edge: Edge, band: u32, image1: &Path, image2: &Path) -> Result<()> {
    blend_pages(edge, band, &resolve_input(image1), &resolve_input(image2)).map(|_| ())
}

pub fn run_convert(input_dir: &Path, format: TargetFormat) -> Result<usize> {
    let source = resolve_dir(input_dir)?;

    // Recreate the output directory so stale conversions never linger.
    let output_dir = sibling_dir(&source, format.extension())?;
    if output_dir.exists() {
        fs::remove_dir_all(&output_dir)
            .with_context(|| format!("failed to clear '{}'", output_dir.display()))?;
    }
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create '{}'", output_dir.display()))?;
    log!("convert"; "re-encoding into {}", output_dir.display());

    let files = batch::collect_files(&source, &IMAGE_EXTENSIONS, SortOrder::Natural)?;
    let outcome = batch::run_batch("convert", &files, |file| {
        convert_page(file, &output_dir, format)
    });
    Ok(outcome.failures())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn split_processes_a_directory() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("pages");
        fs::create_dir(&source).unwrap();

        RgbImage::from_pixel(4, 2, Rgb([1, 2, 3]))
            .save(source.join("wide.png"))
            .unwrap();
        RgbImage::from_pixel(2, 4, Rgb([1, 2, 3]))
            .save(source.join("tall.png"))
            .unwrap();

        let failures = run_split(&source).unwrap();
        assert_eq!(failures, 0);

        let out = root.path().join("pages_split");
        assert!(out.join("wide_01.png").exists());
        assert!(out.join("wide_02.png").exists());
        assert!(out.join("tall.png").exists());
    }

    #[test]
    fn convert_recreates_the_output_directory() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("pages");
        fs::create_dir(&source).unwrap();
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9]))
            .save(source.join("a.png"))
            .unwrap();

        let stale_dir = root.path().join("pages_jpg");
        fs::create_dir(&stale_dir).unwrap();
        fs::write(stale_dir.join("stale.jpg"), b"old").unwrap();

        let failures = run_convert(&source, TargetFormat::Jpg).unwrap();
        assert_eq!(failures, 0);
        assert!(stale_dir.join("a.jpg").exists());
        assert!(!stale_dir.join("stale.jpg").exists());
    }

    #[test]
    fn corrupt_image_counts_as_failure_but_batch_continues() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("pages");
        fs::create_dir(&source).unwrap();
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9]))
            .save(source.join("good.png"))
            .unwrap();
        fs::write(source.join("bad.png"), b"not an image").unwrap();

        let failures = run_convert(&source, TargetFormat::Png).unwrap();
        assert_eq!(failures, 1);
        assert!(root.path().join("pages_png").join("good.png").exists());
    }
}
