use std::path::Path;

use synthseg_image::{ColorImage, Image, ImageSize};

use crate::error::IoError;

/// Whether the file extension names a raster format the decoder supports.
///
/// # Example
///
/// ```
/// use synthseg_io::functional::is_supported_image;
///
/// assert!(is_supported_image("cat.PNG"));
/// assert!(is_supported_image("dog.jpeg"));
/// assert!(!is_supported_image("notes.txt"));
/// ```
pub fn is_supported_image(file_path: impl AsRef<Path>) -> bool {
    image::ImageFormat::from_path(file_path).is_ok()
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate.
/// Images with transparency are returned as [`ColorImage::Rgba8`]; every other
/// color type (grayscale, 16-bit, ...) is converted to [`ColorImage::Rgb8`].
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] if the path does not exist and
/// [`IoError::ImageDecodeError`] if the content cannot be decoded.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<ColorImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = if img.color().has_alpha() {
        ColorImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?)
    } else {
        ColorImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?)
    };

    Ok(image)
}
