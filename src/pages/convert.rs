//! Image format conversion.
//!
//! Re-encodes every page in a folder into the target format. Going through
//! a full decode/encode drops embedded profiles and metadata, which is the
//! point: readers choke on some of it.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

/// Encodable target formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetFormat {
    Jpg,
    Png,
    Webp,
}

impl TargetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Jpg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::Webp => "webp",
        }
    }
}

/// Re-encode one image into `output_dir` with the target extension.
pub fn convert_page(file: &Path, output_dir: &Path, format: TargetFormat) -> Result<()> {
    let img = image::open(file).with_context(|| format!("failed to open '{}'", file.display()))?;

    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("'{}' has no usable file name", file.display()))?;
    let output = output_dir.join(format!("{stem}.{}", format.extension()));

    // JPEG has no alpha channel; flatten instead of failing mid-batch.
    match format {
        TargetFormat::Jpg => image::DynamicImage::ImageRgb8(img.to_rgb8()).save(&output),
        TargetFormat::Png | TargetFormat::Webp => img.save(&output),
    }
    .with_context(|| format!("failed to write '{}'", output.display()))?;

    Ok(())
}
