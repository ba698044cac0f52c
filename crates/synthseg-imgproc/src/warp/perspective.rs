use faer::prelude::SpSolver;

use crate::{
    interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode},
    parallel,
};

use synthseg_image::{Image, ImageDtype, ImageError};

#[rustfmt::skip]
fn determinant3x3(m: &[f32; 9]) -> f32 {
    m[0] * (m[4] * m[8] - m[5] * m[7]) -
    m[1] * (m[3] * m[8] - m[5] * m[6]) +
    m[2] * (m[3] * m[7] - m[4] * m[6])
}

#[rustfmt::skip]
fn adjugate3x3(m: &[f32; 9]) -> [f32; 9] {
    [
        m[4] * m[8] - m[5] * m[7],  // [0, 0]
        m[2] * m[7] - m[1] * m[8],  // [0, 1]
        m[1] * m[5] - m[2] * m[4],  // [0, 2]
        m[5] * m[6] - m[3] * m[8],  // [1, 0]
        m[0] * m[8] - m[2] * m[6],  // [1, 1]
        m[2] * m[3] - m[0] * m[5],  // [1, 2]
        m[3] * m[7] - m[4] * m[6],  // [2, 0]
        m[1] * m[6] - m[0] * m[7],  // [2, 1]
        m[0] * m[4] - m[1] * m[3],  // [2, 2]
    ]
}

fn inverse_perspective_matrix(m: &[f32; 9]) -> Result<[f32; 9], ImageError> {
    let det = determinant3x3(m);

    if det == 0.0 || !det.is_finite() {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let adj = adjugate3x3(m);
    let inv_det = 1.0 / det;

    let mut inv_m = [0.0; 9];
    for i in 0..9 {
        inv_m[i] = adj[i] * inv_det;
    }

    Ok(inv_m)
}

/// Applies a 3x3 perspective transformation to a point.
///
/// # Example
///
/// ```
/// use synthseg_imgproc::warp::perspective_transform_point;
///
/// let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
/// assert_eq!(perspective_transform_point(1.0, 1.0, &m), (0.0, 2.0));
/// ```
pub fn perspective_transform_point(x: f32, y: f32, m: &[f32; 9]) -> (f32, f32) {
    let w = m[6] * x + m[7] * y + m[8];
    let u = (m[0] * x + m[1] * y + m[2]) / w;
    let v = (m[3] * x + m[4] * y + m[5]) / w;
    (u, v)
}

// true if any three of the four points lie on a line
fn has_collinear_triplet(pts: &[[f32; 2]; 4]) -> bool {
    const TRIPLETS: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    TRIPLETS.iter().any(|&[a, b, c]| {
        let (pa, pb, pc) = (pts[a], pts[b], pts[c]);
        let cross = (pb[0] - pa[0]) * (pc[1] - pa[1]) - (pb[1] - pa[1]) * (pc[0] - pa[0]);
        cross.abs() <= f32::EPSILON
    })
}

/// Computes the perspective transformation mapping four source points
/// onto four destination points.
///
/// Solves the 8x8 linear system with the bottom-right entry of the matrix
/// fixed to one, the same formulation as OpenCV's `getPerspectiveTransform`.
///
/// # Arguments
///
/// * `src` - The four source points `[x, y]`.
/// * `dst` - The four destination points `[x, y]`.
///
/// # Returns
///
/// The row-major 3x3 perspective matrix src -> dst.
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] when three of the points
/// are collinear and no finite transformation exists.
///
/// # Example
///
/// ```
/// use synthseg_imgproc::warp::get_perspective_transform;
///
/// let src = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
/// let dst = [[1.0, 2.0], [2.0, 2.0], [2.0, 3.0], [1.0, 3.0]];
///
/// let m = get_perspective_transform(&src, &dst).unwrap();
/// assert!((m[2] - 1.0).abs() < 1e-5);
/// assert!((m[5] - 2.0).abs() < 1e-5);
/// ```
pub fn get_perspective_transform(
    src: &[[f32; 2]; 4],
    dst: &[[f32; 2]; 4],
) -> Result<[f32; 9], ImageError> {
    if has_collinear_triplet(src) || has_collinear_triplet(dst) {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let mut m_mat = faer::Mat::<f64>::zeros(8, 9);
    for i in 0..4 {
        let (x, y) = (src[i][0] as f64, src[i][1] as f64);
        let (u, v) = (dst[i][0] as f64, dst[i][1] as f64);

        m_mat.write(2 * i, 0, x);
        m_mat.write(2 * i, 1, y);
        m_mat.write(2 * i, 2, 1.0);
        m_mat.write(2 * i, 6, -u * x);
        m_mat.write(2 * i, 7, -u * y);
        m_mat.write(2 * i, 8, -u);

        m_mat.write(2 * i + 1, 3, x);
        m_mat.write(2 * i + 1, 4, y);
        m_mat.write(2 * i + 1, 5, 1.0);
        m_mat.write(2 * i + 1, 6, -v * x);
        m_mat.write(2 * i + 1, 7, -v * y);
        m_mat.write(2 * i + 1, 8, -v);
    }

    // solve -> h_mat: 8x1
    let h_mat = m_mat
        .submatrix(0, 0, 8, 8)
        .partial_piv_lu()
        .solve(-m_mat.submatrix(0, 8, 8, 1));
    let h = h_mat.col(0);

    let mut m = [1.0f32; 9];
    for (i, value) in m.iter_mut().take(8).enumerate() {
        *value = h[i] as f32;
    }

    if m.iter().any(|v| !v.is_finite()) || determinant3x3(&m).abs() < 1e-8 {
        return Err(ImageError::CannotComputeDeterminant);
    }

    Ok(m)
}

/// Applies a perspective transformation to an image.
///
/// Destination pixels whose source position falls outside `src` keep
/// their current value.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `m` - The 3x3 perspective transformation matrix src -> dst.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] if `m` is singular.
///
/// # Example
///
/// ```
/// use synthseg_image::{Image, ImageSize};
/// use synthseg_imgproc::interpolation::InterpolationMode;
/// use synthseg_imgproc::warp::warp_perspective;
///
/// let src = Image::<f32, 1>::new(
///   ImageSize {
///     width: 4,
///     height: 5,
///   },
///   vec![0.0f32; 4 * 5]
/// ).unwrap();
///
/// let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
///
/// let mut dst = Image::<f32, 1>::from_size_val(
///   ImageSize {
///     width: 2,
///     height: 3,
///   },
///   0.0
/// ).unwrap();
///
/// warp_perspective(&src, &mut dst, &m, InterpolationMode::Bilinear).unwrap();
///
/// assert_eq!(dst.size().width, 2);
/// assert_eq!(dst.size().height, 3);
/// ```
pub fn warp_perspective<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f32; 9],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let inv_m = inverse_perspective_matrix(m)?;

    if src.is_empty() {
        return Ok(());
    }

    // create meshgrid to find corresponding positions in dst from src
    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let (map_x, map_y) = meshgrid_from_fn(dst_cols, dst_rows, |x, y| {
        Ok(perspective_transform_point(x as f32, y as f32, &inv_m))
    })?;

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&x, &y, dst_pixel| {
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
    use approx::assert_relative_eq;
    use synthseg_image::ImageSize;

    #[test]
    fn inverse_perspective_matrix() -> Result<(), ImageError> {
        let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
        let expected = [1.0, 0.0, 1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0];
        let inv_m = super::inverse_perspective_matrix(&m)?;
        assert_eq!(inv_m, expected);
        Ok(())
    }

    #[test]
    fn transform_point_uses_source_coordinates() {
        // x and y swapped: the y output must come from the input x
        let m = [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let (x, y) = perspective_transform_point(2.0, 5.0, &m);
        assert_eq!((x, y), (5.0, 2.0));
    }

    #[test]
    fn perspective_transform_maps_corners() -> Result<(), ImageError> {
        let src = [[0.0, 0.0], [100.0, 0.0], [100.0, 50.0], [0.0, 50.0]];
        let dst = [[0.0, 0.0], [100.0, 10.0], [100.0, 40.0], [0.0, 50.0]];

        let m = get_perspective_transform(&src, &dst)?;

        for (s, d) in src.iter().zip(dst.iter()) {
            let (u, v) = perspective_transform_point(s[0], s[1], &m);
            assert_relative_eq!(u, d[0], epsilon = 1e-3);
            assert_relative_eq!(v, d[1], epsilon = 1e-3);
        }

        Ok(())
    }

    #[test]
    fn perspective_transform_collinear() {
        let src = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        let dst = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert_eq!(
            get_perspective_transform(&src, &dst),
            Err(ImageError::CannotComputeDeterminant)
        );
    }

    #[test]
    fn warp_perspective_hflip() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )?;

        let image_expected = vec![1.0, 0.0, 3.0, 2.0, 5.0, 4.0];

        // flip matrix
        let m = [-1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_shift_u8() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 4,
                height: 2,
            },
            vec![0, 10, 20, 30, 40, 50, 60, 70],
        )?;

        // shift left by 1 pixel
        let m = [1.0, 0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

        let mut image_transformed = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        super::warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(
            image_transformed.as_slice(),
            &[10, 20, 30, 0, 50, 60, 70, 0]
        );

        Ok(())
    }

    #[test]
    fn warp_perspective_singular() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let mut dst = image.clone();
        let m = [0.0; 9];
        assert_eq!(
            warp_perspective(&image, &mut dst, &m, InterpolationMode::Nearest),
            Err(ImageError::CannotComputeDeterminant)
        );
        Ok(())
    }
}
