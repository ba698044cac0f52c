use crate::image::{Image, ImageSize};

/// The channel layout of a [`ColorImage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// 8-bit RGB, fully opaque.
    Rgb8,
    /// 8-bit RGB with an alpha channel.
    Rgba8,
}

impl ColorMode {
    /// Whether the mode carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, ColorMode::Rgba8)
    }

    /// Number of channels per pixel.
    pub fn num_channels(&self) -> usize {
        match self {
            ColorMode::Rgb8 => 3,
            ColorMode::Rgba8 => 4,
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ColorMode::Rgb8 => write!(f, "RGB8"),
            ColorMode::Rgba8 => write!(f, "RGBA8"),
        }
    }
}

/// An 8-bit color image whose channel layout is decided at runtime.
///
/// Images decoded from disk are either opaque or carry transparency; the
/// geometric pipeline accepts both and promotes to [`ColorMode::Rgba8`]
/// where transparency is needed.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorImage {
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
}

impl ColorImage {
    /// The channel layout of the image.
    pub fn mode(&self) -> ColorMode {
        match self {
            ColorImage::Rgb8(_) => ColorMode::Rgb8,
            ColorImage::Rgba8(_) => ColorMode::Rgba8,
        }
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            ColorImage::Rgb8(image) => image.size(),
            ColorImage::Rgba8(image) => image.size(),
        }
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size().width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size().height
    }

    /// Whether the image carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.mode().has_alpha()
    }
}

impl From<Image<u8, 3>> for ColorImage {
    fn from(image: Image<u8, 3>) -> Self {
        ColorImage::Rgb8(image)
    }
}

impl From<Image<u8, 4>> for ColorImage {
    fn from(image: Image<u8, 4>) -> Self {
        ColorImage::Rgba8(image)
    }
}
