use synthseg_image::{ColorImage, Image, ImageSize};
use synthseg_imgproc::{enhance, interpolation::InterpolationMode, resize::resize_native};

use crate::error::AugmentError;

/// Scale an image uniformly by `factor`.
///
/// The new size is `(trunc(width * factor), trunc(height * factor))`.
///
/// # Errors
///
/// Returns [`AugmentError::InvalidParameter`] if the factor is not a positive
/// finite number or the scaled image would be empty.
///
/// # Example
///
/// ```
/// use synthseg_augment::adjust::scale;
/// use synthseg_image::{ColorImage, Image, ImageSize};
///
/// let image: ColorImage = Image::<u8, 3>::from_size_val(
///     ImageSize { width: 10, height: 5 },
///     0,
/// ).unwrap().into();
///
/// let scaled = scale(&image, 2.5).unwrap();
/// assert_eq!(scaled.size(), ImageSize { width: 25, height: 12 });
/// ```
pub fn scale(image: &ColorImage, factor: f64) -> Result<ColorImage, AugmentError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(AugmentError::InvalidParameter(format!(
            "scale factor must be positive, got {factor}"
        )));
    }

    let size = image.size();
    let new_size = ImageSize {
        width: (size.width as f64 * factor) as usize,
        height: (size.height as f64 * factor) as usize,
    };

    if new_size.width == 0 || new_size.height == 0 {
        return Err(AugmentError::InvalidParameter(format!(
            "scaling {size} by {factor} leaves an empty image"
        )));
    }

    Ok(match image {
        ColorImage::Rgb8(image) => ColorImage::Rgb8(scale_impl(image, new_size)?),
        ColorImage::Rgba8(image) => ColorImage::Rgba8(scale_impl(image, new_size)?),
    })
}

fn scale_impl<const C: usize>(
    image: &Image<u8, C>,
    new_size: ImageSize,
) -> Result<Image<u8, C>, AugmentError> {
    let mut scaled = Image::from_size_val(new_size, 0u8)?;
    resize_native(image, &mut scaled, InterpolationMode::Bicubic)?;
    Ok(scaled)
}

/// Scale the color channels by `factor`, leaving alpha untouched.
///
/// A factor of 0 gives a black image and 1 the original image.
///
/// # Errors
///
/// Returns [`AugmentError::InvalidParameter`] for negative or non-finite factors.
pub fn adjust_brightness(image: &ColorImage, factor: f32) -> Result<ColorImage, AugmentError> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(AugmentError::InvalidParameter(format!(
            "brightness factor must be non-negative, got {factor}"
        )));
    }

    Ok(match image {
        ColorImage::Rgb8(image) => ColorImage::Rgb8(brightness_impl(image, factor)?),
        ColorImage::Rgba8(image) => ColorImage::Rgba8(brightness_impl(image, factor)?),
    })
}

fn brightness_impl<const C: usize>(
    image: &Image<u8, C>,
    factor: f32,
) -> Result<Image<u8, C>, AugmentError> {
    let mut out = Image::from_size_val(image.size(), 0u8)?;
    enhance::adjust_brightness(image, &mut out, factor)?;
    Ok(out)
}
