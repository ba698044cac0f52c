#![deny(missing_docs)]
//! Image types and traits for generating and manipulating images

/// image representation for computer vision purposes.
pub mod image;

/// images whose channel layout is only known at runtime.
pub mod color_image;

/// Error types for the image module.
pub mod error;

pub use crate::color_image::{ColorImage, ColorMode};
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
