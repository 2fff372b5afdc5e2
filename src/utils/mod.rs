//! Shared helpers for the batch tools.

pub mod natsort;
pub mod path;
