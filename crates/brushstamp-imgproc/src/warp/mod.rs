//! Geometric resampling of brush rasters through affine transforms.
//!
//! - [`warp_affine_fixed`] walks the destination in scanline order with
//!   12-bit fixed-point source positions and bilinear interpolation.
//! - [`warp_affine_reference`] inverse maps every pixel in floating point.
//!
//! # Examples
//!
//! Doubling the size of a mask:
//!
//! ```
//! use brushstamp_image::Image;
//! use brushstamp_imgproc::matrix::Matrix3;
//! use brushstamp_imgproc::warp::warp_affine_fixed;
//!
//! let mask = Image::<u8, 1>::from_size_val([3, 3].into(), 255).unwrap();
//! let mut out = Image::<u8, 1>::from_size_val([6, 6].into(), 0).unwrap();
//!
//! let mut m = Matrix3::identity();
//! m.scale(2.0, 2.0);
//! warp_affine_fixed(&mask, &mut out, &m).unwrap();
//! ```

mod affine;

pub use affine::{
    warp_affine_fixed, warp_affine_fixed_with, warp_affine_reference, FixedPointWalk,
};
