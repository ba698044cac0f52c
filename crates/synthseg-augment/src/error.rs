use synthseg_image::{ColorMode, ImageError, ImageSize};

/// An error type for the augmentation module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AugmentError {
    /// Error raised by the underlying image operations.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error when the overlay does not fit inside the background.
    #[error("Overlay {overlay} is larger than background {background}")]
    OverlayTooLarge {
        /// The size of the overlay image.
        overlay: ImageSize,
        /// The size of the background image.
        background: ImageSize,
    },

    /// Error when two images must share a channel layout.
    #[error("Incompatible image modes: {0} and {1}")]
    IncompatibleImageModes(ColorMode, ColorMode),

    /// Error when a geometric parameter would produce a degenerate result.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
