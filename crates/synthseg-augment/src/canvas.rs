use synthseg_image::{ColorImage, Image};
use synthseg_imgproc::{
    color::rgba_from_rgb,
    padding::{spatial_padding, Padding2D},
};

use crate::error::AugmentError;

/// Expand the canvas of an image.
///
/// The output is `left + right` pixels wider and `top + bottom` pixels
/// taller; the original is pasted at [`Padding2D::offset`]. New pixels are
/// fully transparent for RGBA images and opaque black for RGB images.
///
/// # Example
///
/// ```
/// use synthseg_augment::canvas::pad;
/// use synthseg_image::{ColorImage, Image, ImageSize};
/// use synthseg_imgproc::padding::Padding2D;
///
/// let image: ColorImage = Image::<u8, 4>::from_size_val(
///     ImageSize { width: 2, height: 2 },
///     255,
/// ).unwrap().into();
///
/// let padded = pad(&image, Padding2D { top: 1, bottom: 0, left: 0, right: 3 }).unwrap();
/// assert_eq!(padded.size(), ImageSize { width: 5, height: 3 });
/// ```
pub fn pad(image: &ColorImage, padding: Padding2D) -> Result<ColorImage, AugmentError> {
    Ok(match image {
        ColorImage::Rgb8(image) => ColorImage::Rgb8(pad_image(image, padding)?),
        ColorImage::Rgba8(image) => ColorImage::Rgba8(pad_image(image, padding)?),
    })
}

/// Pad an image with zeros on every channel.
pub(crate) fn pad_image<const C: usize>(
    image: &Image<u8, C>,
    padding: Padding2D,
) -> Result<Image<u8, C>, AugmentError> {
    let mut padded = Image::from_size_val(padding.padded_size(image.size()), 0u8)?;
    spatial_padding(image, &mut padded, padding, [0u8; C])?;
    Ok(padded)
}

/// Convert an image to RGBA; RGB pixels become fully opaque.
pub fn promote_to_rgba(image: &ColorImage) -> Result<Image<u8, 4>, AugmentError> {
    match image {
        ColorImage::Rgba8(image) => Ok(image.clone()),
        ColorImage::Rgb8(image) => {
            let mut rgba = Image::from_size_val(image.size(), 0u8)?;
            rgba_from_rgb(image, &mut rgba, 255)?;
            Ok(rgba)
        }
    }
}
