//! Double-page splitting.
//!
//! A landscape scan is two facing pages in one image. Splitting cuts it at
//! the horizontal middle and names the right half before the left one:
//! manga reads right to left, so the right page comes first.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::debug;
use crate::utils::path::file_name;

/// Width > height means a double page.
pub fn is_double_page(width: u32, height: u32) -> bool {
    width > height
}

/// Crop boxes for the two halves: `(right, left)`, each `(x, y, w, h)`.
pub fn split_boxes(width: u32, height: u32) -> ((u32, u32, u32, u32), (u32, u32, u32, u32)) {
    let middle = width / 2;
    (
        (middle, 0, width - middle, height),
        (0, 0, middle, height),
    )
}

/// Process one page file into `output_dir`.
///
/// Double pages are split into `<stem>_01.<ext>` (right) and
/// `<stem>_02.<ext>` (left); single pages are byte-copied under their
/// original name.
pub fn process_page(file: &Path, output_dir: &Path) -> Result<()> {
    let (width, height) = image::image_dimensions(file)
        .with_context(|| format!("failed to probe '{}'", file.display()))?;

    if !is_double_page(width, height) {
        fs::copy(file, output_dir.join(file_name(file)?))
            .with_context(|| format!("failed to copy '{}'", file.display()))?;
        debug!("pages"; "single page, copied: {}", file_name(file)?);
        return Ok(());
    }

    let img = image::open(file).with_context(|| format!("failed to open '{}'", file.display()))?;
    let (right_box, left_box) = split_boxes(width, height);

    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("'{}' has no usable file name", file.display()))?;
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");

    let right = img.crop_imm(right_box.0, right_box.1, right_box.2, right_box.3);
    let left = img.crop_imm(left_box.0, left_box.1, left_box.2, left_box.3);

    right.save(output_dir.join(format!("{stem}_01.{ext}")))?;
    left.save(output_dir.join(format!("{stem}_02.{ext}")))?;
    Ok(())
}
