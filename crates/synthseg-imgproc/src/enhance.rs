use synthseg_image::{Image, ImageDtype, ImageError};

use crate::parallel;

/// Adjust the brightness of an image by a multiplicative factor.
///
/// dst(x,y,c) = src(x,y,c) * factor
///
/// Only the first three (color) channels are scaled; an alpha channel is
/// copied unchanged. A factor of 0 yields black, 1 the original image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image to store the result.
/// * `factor` - The non-negative brightness factor.
///
/// # Errors
///
/// Returns an error if the sizes of `src` and `dst` do not match.
///
/// # Example
///
/// ```
/// use synthseg_image::{Image, ImageSize};
/// use synthseg_imgproc::enhance::adjust_brightness;
///
/// let src = Image::<u8, 4>::new(
///     ImageSize { width: 1, height: 1 },
///     vec![100, 200, 50, 255],
/// ).unwrap();
/// let mut dst = Image::<u8, 4>::from_size_val(src.size(), 0).unwrap();
///
/// adjust_brightness(&src, &mut dst, 0.5).unwrap();
/// assert_eq!(dst.as_slice(), &[50, 100, 25, 255]);
/// ```
pub fn adjust_brightness<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    factor: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let color_channels = C.min(3);

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        for (k, (src_val, dst_val)) in src_pixel.iter().zip(dst_pixel.iter_mut()).enumerate() {
            *dst_val = if k < color_channels {
                T::from_f32((*src_val).into() * factor)
            } else {
                *src_val
            };
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthseg_image::ImageSize;

    #[test]
    fn adjust_brightness_saturates() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![10, 200, 0, 255, 128, 1],
        )?;
        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;

        adjust_brightness(&src, &mut dst, 2.0)?;

        assert_eq!(dst.as_slice(), &[20, 255, 0, 255, 255, 2]);

        Ok(())
    }

    #[test]
    fn adjust_brightness_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<u8, 4>::from_size_val(
            ImageSize {
                width: 2,
                height: 1,
            },
            0,
        )?;
        let mut dst = Image::<u8, 4>::from_size_val(
            ImageSize {
                width: 1,
                height: 1,
            },
            0,
        )?;

        assert!(adjust_brightness(&src, &mut dst, 0.5).is_err());

        Ok(())
    }
}
