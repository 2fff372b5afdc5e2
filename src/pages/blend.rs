//! Seam blending.
//!
//! Webtoon exports sometimes cut a panel across two consecutive pages.
//! Blending takes a band of the given depth from the first image's edge and
//! fills the remainder of the canvas from the second image, keeping every
//! pixel at its original position, so the two sources line up into one intact
//! page.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use image::RgbImage;
use image::imageops;

use crate::log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Up,
    Down,
    Left,
    Right,
}

impl Edge {
    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Up => "up",
            Edge::Down => "down",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }
}

/// Validate the band depth against the image size.
pub fn check_band(edge: Edge, band: u32, width: u32, height: u32) -> Result<()> {
    let limit = match edge {
        Edge::Up | Edge::Down => height,
        Edge::Left | Edge::Right => width,
    };
    if band >= limit {
        bail!(
            "band of {band}px does not fit: image is only {limit}px {}",
            match edge {
                Edge::Up | Edge::Down => "tall",
                Edge::Left | Edge::Right => "wide",
            }
        );
    }
    Ok(())
}

/// Compose the blended image from two same-sized sources.
pub fn blend_images(edge: Edge, band: u32, first: &RgbImage, second: &RgbImage) -> RgbImage {
    let (width, height) = first.dimensions();
    let mut canvas = RgbImage::new(width, height);

    match edge {
        Edge::Up => {
            let top = imageops::crop_imm(first, 0, 0, width, band).to_image();
            let bottom = imageops::crop_imm(second, 0, band, width, height - band).to_image();
            imageops::replace(&mut canvas, &top, 0, 0);
            imageops::replace(&mut canvas, &bottom, 0, i64::from(band));
        }
        Edge::Down => {
            let bottom = imageops::crop_imm(first, 0, height - band, width, band).to_image();
            let top = imageops::crop_imm(second, 0, 0, width, height - band).to_image();
            imageops::replace(&mut canvas, &top, 0, 0);
            imageops::replace(&mut canvas, &bottom, 0, i64::from(height - band));
        }
        Edge::Left => {
            let left = imageops::crop_imm(first, 0, 0, band, height).to_image();
            let right = imageops::crop_imm(second, band, 0, width - band, height).to_image();
            imageops::replace(&mut canvas, &left, 0, 0);
            imageops::replace(&mut canvas, &right, i64::from(band), 0);
        }
        Edge::Right => {
            let right = imageops::crop_imm(first, width - band, 0, band, height).to_image();
            let left = imageops::crop_imm(second, 0, 0, width - band, height).to_image();
            imageops::replace(&mut canvas, &left, 0, 0);
            imageops::replace(&mut canvas, &right, i64::from(width - band), 0);
        }
    }

    canvas
}

/// Blend two page files and write `result_<edge>_<band>.<ext>` beside the
/// first.
pub fn blend_pages(edge: Edge, band: u32, first: &Path, second: &Path) -> Result<PathBuf> {
    let img1 = image::open(first)
        .with_context(|| format!("failed to open '{}'", first.display()))?
        .to_rgb8();
    let img2 = image::open(second)
        .with_context(|| format!("failed to open '{}'", second.display()))?
        .to_rgb8();

    if img1.dimensions() != img2.dimensions() {
        bail!(
            "images must share dimensions, got {}x{} and {}x{}",
            img1.width(),
            img1.height(),
            img2.width(),
            img2.height()
        );
    }
    check_band(edge, band, img1.width(), img1.height())?;

    let result = blend_images(edge, band, &img1, &img2);

    let ext = first
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    let output = first.with_file_name(format!("result_{}_{band}.{ext}", edge.as_str()));
    result
        .save(&output)
        .with_context(|| format!("failed to write '{}'", output.display()))?;
    log!("pages"; "blended -> {}", output.display());
    Ok(output)
}
