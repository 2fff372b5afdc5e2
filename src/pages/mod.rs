//! Page-image geometry tools.

pub mod blend;
pub mod concat;
pub mod convert;
pub mod split;

/// Image formats the page tools accept as input.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];
