#![deny(missing_docs)]
//! Image types for brush masks and color pixmaps

/// image representation for brush rasters.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize, Rect};
