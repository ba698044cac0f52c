use log::debug;
use synthseg_image::{ColorImage, Image, ImageSize};
use synthseg_imgproc::{
    interpolation::InterpolationMode,
    padding::Padding2D,
    warp::{get_shear_matrix2d, warp_affine},
};

use crate::{
    canvas::pad_image,
    error::AugmentError,
    params::ShearParameters,
    policy::{shear_rule, Axis},
};

/// Shear matrices closer to singular than this are rejected.
const MIN_SHEAR_DETERMINANT: f64 = 1e-3;

/// The padding that absorbs the displacement of a shear.
///
/// The horizontal displacement is `trunc(|height * tan(h)|)` and the
/// vertical one `trunc(|width * tan(v)|)`; the side that receives each
/// is decided by [`shear_rule`].
///
/// # Example
///
/// ```
/// use synthseg_augment::{shear::shear_padding, ShearParameters};
/// use synthseg_image::ImageSize;
///
/// let size = ImageSize { width: 100, height: 50 };
/// let padding = shear_padding(size, &ShearParameters::new(45.0, -45.0));
///
/// assert_eq!((padding.left, padding.right), (50, 0));
/// assert_eq!((padding.top, padding.bottom), (0, 100));
/// ```
pub fn shear_padding(size: ImageSize, params: &ShearParameters) -> Padding2D {
    let mut padding = Padding2D::default();

    for (axis, extent) in [
        (Axis::Horizontal, size.height),
        (Axis::Vertical, size.width),
    ] {
        let amount = (extent as f64 * params.slope(axis)).abs().trunc() as usize;
        shear_rule(axis, params.degrees(axis))
            .pad
            .pad(&mut padding, amount);
    }

    padding
}

/// The 2x3 affine matrix of the shear on the padded canvas.
///
/// The shear is anchored at the paste offset of the content, so
/// `x' = x - tan(h) * (y - top)` and `y' = y - tan(v) * (x - left)`.
pub fn shear_matrix(params: &ShearParameters, padding: &Padding2D) -> [f32; 6] {
    let (left, top) = padding.offset();
    get_shear_matrix2d(
        (
            -params.slope(Axis::Horizontal) as f32,
            -params.slope(Axis::Vertical) as f32,
        ),
        (left as f32, top as f32),
    )
}

fn shear_impl<const C: usize>(
    image: &Image<u8, C>,
    padding: Padding2D,
    m: &[f32; 6],
) -> Result<Image<u8, C>, AugmentError> {
    let padded = pad_image(image, padding)?;
    let mut sheared = Image::from_size_val(padded.size(), 0u8)?;
    warp_affine(&padded, &mut sheared, m, InterpolationMode::Bicubic)?;
    Ok(sheared)
}

/// Shear an image without clipping its content.
///
/// The canvas is first padded per [`shear_padding`] and then sheared with
/// bicubic resampling at the padded size. The channel layout is kept.
///
/// # Arguments
///
/// * `image` - The image to shear.
/// * `params` - The horizontal and vertical shear angles.
///
/// # Returns
///
/// The sheared image and the padding that was applied before the shear.
///
/// # Errors
///
/// Returns [`AugmentError::InvalidParameter`] if the angles are out of range
/// or the two shears cancel into a singular transformation.
pub fn shear(
    image: &ColorImage,
    params: ShearParameters,
) -> Result<(ColorImage, Padding2D), AugmentError> {
    params.validate()?;

    let det = 1.0 - params.slope(Axis::Horizontal) * params.slope(Axis::Vertical);
    if det.abs() < MIN_SHEAR_DETERMINANT {
        return Err(AugmentError::InvalidParameter(format!(
            "shear angles {params:?} collapse the image onto a line"
        )));
    }

    let padding = shear_padding(image.size(), &params);
    let m = shear_matrix(&params, &padding);
    debug!("shear {:?}: padding {:?}", params, padding);

    let sheared = match image {
        ColorImage::Rgb8(image) => ColorImage::Rgb8(shear_impl(image, padding, &m)?),
        ColorImage::Rgba8(image) => ColorImage::Rgba8(shear_impl(image, padding, &m)?),
    };

    Ok((sheared, padding))
}
