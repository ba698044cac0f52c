use rayon::prelude::*;
use synthseg_image::{Image, ImageError, ImageSize};

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The size of an image of `old_size` after applying this padding.
    ///
    /// # Example
    ///
    /// ```rust
    /// use synthseg_image::ImageSize;
    /// use synthseg_imgproc::padding::Padding2D;
    ///
    /// let padding = Padding2D { top: 1, bottom: 1, left: 2, right: 0 };
    /// let new_size = padding.padded_size(ImageSize { width: 4, height: 4 });
    ///
    /// assert_eq!(new_size, ImageSize { width: 6, height: 6 });
    /// ```
    pub fn padded_size(&self, old_size: ImageSize) -> ImageSize {
        ImageSize {
            width: old_size.width + self.left + self.right,
            height: old_size.height + self.top + self.bottom,
        }
    }

    /// Validates that a new image size correctly matches the expected dimensions
    /// after applying this padding to an existing image.
    ///
    /// # Arguments
    /// - `old_size`: The original image size before padding.
    /// - `new_size`: The resulting image size after padding.
    ///
    /// # Returns
    /// - `true` if the `new_size` width and height are equal to
    ///   `old_size.width + left + right` and `old_size.height + top + bottom`, respectively.
    /// - `false` otherwise.
    pub fn validate_size(&self, old_size: ImageSize, new_size: ImageSize) -> bool {
        self.padded_size(old_size) == new_size
    }

    /// The position of the original top-left pixel inside the padded image.
    pub fn offset(&self) -> (usize, usize) {
        (self.left, self.top)
    }
}

/// Pads an image with a constant value, placing the source at the
/// `(left, top)` offset of the destination.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image where the padded output will be stored.
/// * `padding` - The amount of padding (in pixels) for all four sides defined in [`Padding2D`].
/// * `constant_value` - The pixel value used for the border, one value per channel.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match with the expected size
/// i.e. after applying padding specified in argument `padding` on `src`.
///
/// # Example
///
/// ```rust
/// use synthseg_image::{ImageSize, Image};
/// use synthseg_imgproc::padding::{Padding2D, spatial_padding};
///
/// let src = Image::<u8, 4>::from_size_val(ImageSize { width: 2, height: 2 }, 255).unwrap();
/// let mut dst = Image::<u8, 4>::from_size_val(ImageSize { width: 4, height: 3 }, 0).unwrap();
///
/// spatial_padding(
///     &src,
///     &mut dst,
///     Padding2D { top: 1, bottom: 0, left: 1, right: 1 },
///     [0u8; 4],
/// ).unwrap();
///
/// assert_eq!(dst.get_pixel(0, 0, 3).unwrap(), &0);
/// assert_eq!(dst.get_pixel(1, 1, 3).unwrap(), &255);
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if !padding.validate_size(src.size(), dst.size()) {
        let expected = padding.padded_size(src.size());
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected.width,
            expected.height,
        ));
    }

    if dst.is_empty() {
        return Ok(());
    }

    let new_stride = dst.width() * C;
    let old_stride = src.width() * C;
    let (left, top) = padding.offset();

    dst.as_slice_mut()
        .par_chunks_exact_mut(new_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            dst_row
                .chunks_exact_mut(C)
                .for_each(|pixel| pixel.copy_from_slice(&constant_value));

            if old_stride == 0 || y < top || y >= top + src.height() {
                return;
            }

            let src_row = &src.as_slice()[(y - top) * old_stride..(y - top + 1) * old_stride];
            dst_row[left * C..left * C + old_stride].copy_from_slice(src_row);
        });

    Ok(())
}
