use synthseg_image::{Image, ImageDtype, ImageError};

use crate::interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode};
use crate::parallel;

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    // follow OpenCV: check for determinant == 0
    // https://github.com/opencv/opencv/blob/4.9.0/modules/imgproc/src/imgwarp.cpp#L2765
    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Returns a 2x3 matrix for a 2D shear around an anchor point.
///
/// The shear matrix is defined as:
///
/// | 1   kx  -kx * anchor.y |
/// | ky  1   -ky * anchor.x |
///
/// i.e. `x' = x + kx * (y - anchor.y)` and `y' = y + ky * (x - anchor.x)`,
/// so the anchor point is left in place.
///
/// # Arguments
///
/// * `shear` - The shear coefficients `(kx, ky)`.
/// * `anchor` - The fixed point of the shear.
///
/// # Example
///
/// ```
/// use synthseg_imgproc::warp::get_shear_matrix2d;
///
/// let m = get_shear_matrix2d((0.5, 0.0), (0.0, 2.0));
/// assert_eq!(m, [1.0, 0.5, -1.0, 0.0, 1.0, 0.0]);
/// ```
pub fn get_shear_matrix2d(shear: (f32, f32), anchor: (f32, f32)) -> [f32; 6] {
    let (kx, ky) = shear;
    let (ax, ay) = anchor;
    [1.0, kx, -kx * ay, ky, 1.0, -ky * ax]
}

/// Applies an affine transformation to a point.
fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// Destination pixels whose source position falls outside `src` keep
/// their current value.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `m` - The 2x3 affine transformation matrix src -> dst.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use synthseg_image::{Image, ImageSize};
/// use synthseg_imgproc::interpolation::InterpolationMode;
/// use synthseg_imgproc::warp::warp_affine;
///
/// let src = Image::<u8, 4>::from_size_val(
///    ImageSize {
///       width: 4,
///       height: 5,
///    },
///    255,
/// ).unwrap();
///
/// let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
///
/// let mut dst = Image::<u8, 4>::from_size_val(src.size(), 0).unwrap();
///
/// warp_affine(&src, &mut dst, &m, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn warp_affine<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f32; 6],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.is_empty() {
        return Ok(());
    }

    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let (map_x, map_y) = meshgrid_from_fn(dst_cols, dst_rows, |x, y| {
        Ok(transform_point(x as f32, y as f32, &m_inv))
    })?;

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&x, &y, dst_pixel| {
        // check if the position is within the bounds of the src image
        if x >= 0.0f32 && x < src.cols() as f32 && y >= 0.0f32 && y < src.rows() as f32 {
            dst_pixel.iter_mut().enumerate().for_each(|(k, pixel)| {
                *pixel = T::from_f32(interpolate_pixel(src, x, y, k, interpolation))
            });
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthseg_image::ImageSize;

    #[test]
    fn invert_affine_transform() {
        let m = [1.0, 0.5, -2.0, 0.0, 1.0, 3.0];
        let m_inv = super::invert_affine_transform(&m);
        let (x, y) = transform_point(4.0, 2.0, &m);
        let (u, v) = transform_point(x, y, &m_inv);
        approx::assert_relative_eq!(u, 4.0, epsilon = 1e-6);
        approx::assert_relative_eq!(v, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn shear_matrix_keeps_anchor() {
        let m = get_shear_matrix2d((-0.3, 0.7), (2.0, 5.0));
        let (x, y) = transform_point(2.0, 5.0, &m);
        approx::assert_relative_eq!(x, 2.0, epsilon = 1e-6);
        approx::assert_relative_eq!(y, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn warp_affine_shift() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![1.0, 2.0, 3.0],
        )?;

        let m = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let mut dst = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        warp_affine(&image, &mut dst, &m, InterpolationMode::Nearest)?;

        assert_eq!(dst.as_slice(), &[0.0, 1.0, 2.0]);

        Ok(())
    }

    #[test]
    fn warp_affine_shear_u8() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![10, 20, 30, 40],
        )?;

        // shift the second row one pixel right
        let m = get_shear_matrix2d((1.0, 0.0), (0.0, 0.0));
        let mut dst = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0,
        )?;

        warp_affine(&image, &mut dst, &m, InterpolationMode::Bicubic)?;

        assert_eq!(dst.as_slice(), &[10, 20, 0, 0, 30, 40]);

        Ok(())
    }
}
