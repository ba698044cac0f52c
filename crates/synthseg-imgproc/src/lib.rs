#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color space conversions.
pub mod color;

/// alpha compositing of images.
pub mod compose;

/// image enhancement module.
pub mod enhance;

/// utilities for interpolation.
pub mod interpolation;

/// image padding module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// utility functions for resizing images.
pub mod resize;

/// image geometric transformations module.
pub mod warp;
