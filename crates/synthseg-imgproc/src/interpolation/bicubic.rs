use synthseg_image::{Image, ImageDtype};

// Keys cubic convolution coefficient, same as PIL.
const A: f32 = -0.5;

#[inline]
fn cubic_weight(t: f32) -> f32 {
    let t = t.abs();
    if t <= 1.0 {
        ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((A * t - 5.0 * A) * t + 8.0 * A) * t - 4.0 * A
    } else {
        0.0
    }
}

/// Kernel for bicubic interpolation
///
/// Samples the 4x4 neighbourhood around `(u, v)`, replicating the border
/// pixels when the neighbourhood leaves the image.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel value. The value may overshoot the input range
/// near sharp edges; callers quantize through [`synthseg_image::ImageDtype::from_f32`].
pub(crate) fn bicubic_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows() as isize, image.cols() as isize);
    let data = image.as_slice();

    let (u0, v0) = (u.floor(), v.floor());
    let (frac_u, frac_v) = (u - u0, v - v0);
    let (iu, iv) = (u0 as isize, v0 as isize);

    let mut acc = 0.0f32;
    for m in -1..=2isize {
        let row = (iv + m).clamp(0, rows - 1) as usize;
        let wy = cubic_weight(frac_v - m as f32);
        if wy == 0.0 {
            continue;
        }
        for n in -1..=2isize {
            let col = (iu + n).clamp(0, cols - 1) as usize;
            let wx = cubic_weight(frac_u - n as f32);
            let val: f32 = data[(row * cols as usize + col) * C + c].into();
            acc += val * wx * wy;
        }
    }

    acc
}
