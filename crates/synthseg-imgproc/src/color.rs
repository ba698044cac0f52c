//! Color space conversions.

use synthseg_image::{Image, ImageError};

use crate::parallel;

/// Convert an RGB image to RGBA with a constant alpha value.
///
/// # Arguments
///
/// * `src` - The input RGB image.
/// * `dst` - The output RGBA image.
/// * `alpha` - The alpha value of every output pixel.
///
/// # Errors
///
/// Returns an error if the sizes of `src` and `dst` do not match.
///
/// # Example
///
/// ```
/// use synthseg_image::{Image, ImageSize};
/// use synthseg_imgproc::color::rgba_from_rgb;
///
/// let rgb = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![1, 2, 3]).unwrap();
/// let mut rgba = Image::<u8, 4>::from_size_val(rgb.size(), 0).unwrap();
///
/// rgba_from_rgb(&rgb, &mut rgba, 255).unwrap();
/// assert_eq!(rgba.as_slice(), &[1, 2, 3, 255]);
/// ```
pub fn rgba_from_rgb(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 4>,
    alpha: u8,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[..3].copy_from_slice(src_pixel);
        dst_pixel[3] = alpha;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthseg_image::ImageSize;

    #[test]
    fn rgba_from_rgb_size_mismatch() -> Result<(), ImageError> {
        let rgb = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let mut rgba = Image::<u8, 4>::from_size_val(
            ImageSize {
                width: 2,
                height: 1,
            },
            0,
        )?;
        assert_eq!(
            rgba_from_rgb(&rgb, &mut rgba, 255),
            Err(ImageError::InvalidImageSize(2, 2, 2, 1))
        );
        Ok(())
    }
}
