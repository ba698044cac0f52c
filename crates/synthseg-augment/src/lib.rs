#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Brightness and scale adjustments.
pub mod adjust;

/// Canvas padding and alpha promotion.
pub mod canvas;

/// Alpha compositing with polygon remapping.
pub mod compose;

/// Error types for the augmentation module.
pub mod error;

/// Shear and warp parameters.
pub mod params;

/// Sign policy shared by the shear and warp routines.
pub mod policy;

/// Corner polygons and their coordinate frames.
pub mod polygon;

/// Affine shear of a padded canvas.
pub mod shear;

/// Fused shear and perspective warp.
pub mod shear_warp;

pub use compose::{overlay, Placement};
pub use error::AugmentError;
pub use params::{ShearParameters, WarpParameters};
pub use polygon::{Corner, Point, Polygon};
pub use shear::shear;
pub use shear_warp::shear_and_warp;
