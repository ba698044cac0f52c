//! Geometric image transformations using affine and perspective warps.
//!
//! This module provides functions for applying 2D transformations to images:
//!
//! - Affine transformations (shearing, translation)
//! - Perspective transformations (homographies) and their estimation
//!   from four point correspondences
//! - Affine transform inversion
//!
//! # Examples
//!
//! Shearing an image horizontally by 0.25 around its top-left corner:
//!
//! ```no_run
//! use synthseg_imgproc::warp::get_shear_matrix2d;
//!
//! let shear_matrix = get_shear_matrix2d((0.25, 0.0), (0.0, 0.0));
//! // Use with warp_affine to shear the image
//! ```

mod affine;
mod perspective;

pub use affine::{get_shear_matrix2d, invert_affine_transform, warp_affine};
pub use perspective::{
    get_perspective_transform, perspective_transform_point, warp_perspective,
};
