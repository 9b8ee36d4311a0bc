#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// softness blur applied after a transform.
pub mod blur;

/// brush entity holding a mask, an optional pixmap and their transform caches.
pub mod brush;

/// single-entry cache of transformed stamps.
mod cache;

/// transform parameters.
pub mod params;

/// matrix, bounding box and stamp transform entry points.
pub mod transform;

pub use brush::Brush;
pub use params::TransformParams;
pub use transform::{transform_mask, transform_pixmap, transform_size};
