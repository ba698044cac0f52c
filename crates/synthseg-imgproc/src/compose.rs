use synthseg_image::{Image, ImageError};

use crate::parallel;

/// Composite `src` over `dst` using the alpha channel (Porter-Duff "over").
///
/// With normalized alphas `af` (foreground) and `ab` (background):
///
/// out_a = af + ab * (1 - af)
/// out_c = (c_f * af + c_b * ab * (1 - af)) / out_a
///
/// For an opaque background this reduces to `c_f * af + c_b * (1 - af)`.
///
/// # Arguments
///
/// * `foreground` - The RGBA image placed on top.
/// * `background` - The RGBA image underneath.
/// * `dst` - The RGBA output image.
///
/// # Errors
///
/// Returns an error if the three images do not share the same size.
///
/// # Example
///
/// ```
/// use synthseg_image::{Image, ImageSize};
/// use synthseg_imgproc::compose::alpha_composite;
///
/// let size = ImageSize { width: 1, height: 1 };
/// let fg = Image::<u8, 4>::new(size, vec![255, 0, 0, 0]).unwrap();
/// let bg = Image::<u8, 4>::new(size, vec![0, 0, 255, 255]).unwrap();
/// let mut dst = Image::<u8, 4>::from_size_val(size, 0).unwrap();
///
/// alpha_composite(&fg, &bg, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 0, 255, 255]);
/// ```
pub fn alpha_composite(
    foreground: &Image<u8, 4>,
    background: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
) -> Result<(), ImageError> {
    for other in [background.size(), dst.size()] {
        if foreground.size() != other {
            return Err(ImageError::InvalidImageSize(
                foreground.width(),
                foreground.height(),
                other.width,
                other.height,
            ));
        }
    }

    parallel::par_iter_rows_two(foreground, background, dst, |fg, bg, out| {
        let af = fg[3] as f32 / 255.0;
        let ab = bg[3] as f32 / 255.0;
        let ab_rest = ab * (1.0 - af);
        let ao = af + ab_rest;

        if ao <= 0.0 {
            out.copy_from_slice(&[0, 0, 0, 0]);
            return;
        }

        for k in 0..3 {
            let c = (fg[k] as f32 * af + bg[k] as f32 * ab_rest) / ao;
            out[k] = c.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (ao * 255.0).round().clamp(0.0, 255.0) as u8;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthseg_image::ImageSize;

    fn pixel(value: [u8; 4]) -> Result<Image<u8, 4>, ImageError> {
        Image::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            value.to_vec(),
        )
    }

    #[test]
    fn composite_opaque_foreground() -> Result<(), ImageError> {
        let fg = pixel([10, 20, 30, 255])?;
        let bg = pixel([200, 200, 200, 255])?;
        let mut dst = pixel([0; 4])?;

        alpha_composite(&fg, &bg, &mut dst)?;
        assert_eq!(dst.as_slice(), &[10, 20, 30, 255]);

        Ok(())
    }

    #[test]
    fn composite_half_alpha_over_opaque() -> Result<(), ImageError> {
        let fg = pixel([255, 0, 0, 128])?;
        let bg = pixel([0, 0, 255, 255])?;
        let mut dst = pixel([0; 4])?;

        alpha_composite(&fg, &bg, &mut dst)?;

        // 255 * 128/255 = 128, 255 * 127/255 = 127
        assert_eq!(dst.as_slice(), &[128, 0, 127, 255]);

        Ok(())
    }

    #[test]
    fn composite_both_transparent() -> Result<(), ImageError> {
        let fg = pixel([255, 255, 255, 0])?;
        let bg = pixel([9, 9, 9, 0])?;
        let mut dst = pixel([1; 4])?;

        alpha_composite(&fg, &bg, &mut dst)?;
        assert_eq!(dst.as_slice(), &[0, 0, 0, 0]);

        Ok(())
    }
}
