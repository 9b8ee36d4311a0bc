//! Pixel interpolation kernels for brush resampling.
//!
//! Two bilinear kernels share the same sampling rules (integer source
//! coordinate, clamp-to-edge for the right and bottom neighbours):
//!
//! - [`bilinear_fixed`] works on 12-bit fixed-point positions and is the one
//!   the transform engine uses.
//! - [`bilinear_reference`] works on `f64` positions and exists to validate
//!   the fixed-point kernel.

mod bilinear;

/// Fixed-point number helpers.
pub mod fixed;

pub use bilinear::{bilinear_fixed, bilinear_reference};
