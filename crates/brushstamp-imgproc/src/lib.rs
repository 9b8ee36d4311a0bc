#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image filtering module.
pub mod filter;

/// utilities for interpolation.
pub mod interpolation;

/// 3x3 homogeneous matrices for 2D affine transforms.
pub mod matrix;

/// module containing parallelization utilities.
pub mod parallel;

/// image geometric transformations module.
pub mod warp;
