//! Command-line surface: argument definitions and one runner per
//! subcommand.

pub mod args;
pub mod cbz;
pub mod chapters;
pub mod format;
pub mod pages;

pub use args::{Cli, Commands, FormatArgs};
