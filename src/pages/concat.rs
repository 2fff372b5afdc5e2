//! Page concatenation.
//!
//! Joins two page images edge to edge. Horizontal joins require equal
//! heights, vertical joins equal widths. A mismatch is reported with both
//! sizes rather than silently stretched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use image::RgbImage;
use image::imageops;

use crate::log;
use crate::utils::path::file_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Canvas size for the joined image, or an error naming the mismatch.
pub fn joined_size(
    direction: Direction,
    first: (u32, u32),
    second: (u32, u32),
) -> Result<(u32, u32)> {
    match direction {
        Direction::Horizontal => {
            if first.1 != second.1 {
                bail!(
                    "horizontal join requires equal heights, got {}px and {}px",
                    first.1,
                    second.1
                );
            }
            Ok((first.0 + second.0, first.1))
        }
        Direction::Vertical => {
            if first.0 != second.0 {
                bail!(
                    "vertical join requires equal widths, got {}px and {}px",
                    first.0,
                    second.0
                );
            }
            Ok((first.0, first.1 + second.1))
        }
    }
}

/// Join two images and write `merged_<name1>_<name2>.jpg` beside the first.
pub fn concat_pages(direction: Direction, first: &Path, second: &Path) -> Result<PathBuf> {
    let img1 = image::open(first)
        .with_context(|| format!("failed to open '{}'", first.display()))?
        .to_rgb8();
    let img2 = image::open(second)
        .with_context(|| format!("failed to open '{}'", second.display()))?
        .to_rgb8();

    let (width, height) = joined_size(direction, img1.dimensions(), img2.dimensions())?;

    let mut canvas = RgbImage::new(width, height);
    imageops::replace(&mut canvas, &img1, 0, 0);
    match direction {
        Direction::Horizontal => {
            imageops::replace(&mut canvas, &img2, i64::from(img1.width()), 0);
        }
        Direction::Vertical => {
            imageops::replace(&mut canvas, &img2, 0, i64::from(img1.height()));
        }
    }

    let output = first.with_file_name(format!(
        "merged_{}_{}.jpg",
        file_name(first)?,
        file_name(second)?
    ));
    canvas
        .save(&output)
        .with_context(|| format!("failed to write '{}'", output.display()))?;
    log!("pages"; "joined -> {}", output.display());
    Ok(output)
}
