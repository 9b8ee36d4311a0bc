//! Filter operations
//!
//! This module provides square-kernel convolution over image regions.

/// Region convolution
mod convolution;
pub use convolution::*;
