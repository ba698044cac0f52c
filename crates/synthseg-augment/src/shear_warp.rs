use log::debug;
use synthseg_image::{ColorImage, Image, ImageError, ImageSize};
use synthseg_imgproc::{
    interpolation::InterpolationMode,
    warp::{get_perspective_transform, warp_perspective},
};

use crate::{
    canvas::{pad_image, promote_to_rgba},
    error::AugmentError,
    params::{ShearParameters, WarpParameters},
    policy::{compress_edge, shear_rule, warp_edge, Axis},
    polygon::{rectangle_corners, Point, Polygon},
    shear::shear_padding,
};

/// A compressed edge shorter than this is rejected as degenerate.
pub const MIN_EDGE_PIXELS: f64 = 1.0;

/// The warped corners of a `size` rectangle, before any shear.
///
/// The vertical warp pulls the right (positive) or left (negative) edge
/// toward `height / 2`, the horizontal warp pulls the top (positive) or
/// bottom (negative) edge toward `width / 2`.
pub fn warp_corners(size: ImageSize, warp: &WarpParameters) -> [Point; 4] {
    let mut corners = rectangle_corners(size, (0, 0));
    let mid_x = size.width as f64 / 2.0;
    let mid_y = size.height as f64 / 2.0;

    for (axis, mid) in [(Axis::Vertical, mid_y), (Axis::Horizontal, mid_x)] {
        let amount = warp.amount(axis);
        compress_edge(&mut corners, warp_edge(axis, amount), mid, amount);
    }

    corners
}

fn to_f32(corners: &[Point; 4]) -> [[f32; 2]; 4] {
    corners.map(|[x, y]| [x as f32, y as f32])
}

// singular corner mappings are reported as bad parameters
fn degenerate_as_invalid(err: ImageError) -> AugmentError {
    match err {
        ImageError::CannotComputeDeterminant => AugmentError::InvalidParameter(
            "the warped corners admit no perspective transform".to_string(),
        ),
        err => err.into(),
    }
}

/// Shear and perspective-warp an image in a single resampling pass.
///
/// The four image corners are first moved by the warp, then the corners on
/// the sheared sides are shifted by the shear padding. The padded image is
/// mapped onto that quadrilateral with one perspective transformation, so
/// the returned polygon is exact for the returned image.
///
/// # Arguments
///
/// * `image` - The source image; RGB images are promoted to RGBA.
/// * `shear` - The shear angles.
/// * `warp` - The perspective warp fractions.
///
/// # Returns
///
/// The warped RGBA image of size `(width + h_pad, height + v_pad)` and the
/// content corners normalized by that size, in top-left, top-right,
/// bottom-right, bottom-left order.
///
/// # Errors
///
/// Returns [`AugmentError::InvalidParameter`] for out of range parameters,
/// an empty image, or a warp that squeezes an edge below
/// [`MIN_EDGE_PIXELS`].
///
/// # Example
///
/// ```
/// use synthseg_augment::{shear_and_warp, ShearParameters, WarpParameters};
/// use synthseg_image::{ColorImage, Image, ImageSize};
///
/// let image: ColorImage = Image::<u8, 3>::from_size_val(
///     ImageSize { width: 100, height: 100 },
///     128,
/// ).unwrap().into();
///
/// let (warped, polygon) = shear_and_warp(
///     &image,
///     ShearParameters::new(0.0, 0.0),
///     WarpParameters::new(0.8, -0.8),
/// ).unwrap();
///
/// assert_eq!(warped.size(), image.size());
/// assert_eq!(polygon.corners()[1], [1.0, 0.1]);
/// ```
pub fn shear_and_warp(
    image: &ColorImage,
    shear: ShearParameters,
    warp: WarpParameters,
) -> Result<(Image<u8, 4>, Polygon), AugmentError> {
    shear.validate()?;
    warp.validate()?;

    let size = image.size();
    if size.width == 0 || size.height == 0 {
        return Err(AugmentError::InvalidParameter(format!(
            "cannot warp an empty image {size}"
        )));
    }

    for (axis, side) in [(Axis::Vertical, size.height), (Axis::Horizontal, size.width)] {
        let edge = side as f64 * warp.amount(axis).abs();
        if edge < MIN_EDGE_PIXELS {
            return Err(AugmentError::InvalidParameter(format!(
                "{axis:?} warp {} collapses an edge of {side} px to {edge} px",
                warp.amount(axis)
            )));
        }
    }

    let mut dst_corners = warp_corners(size, &warp);

    let padding = shear_padding(size, &shear);
    for (axis, amount) in [
        (Axis::Vertical, padding.top + padding.bottom),
        (Axis::Horizontal, padding.left + padding.right),
    ] {
        shear_rule(axis, shear.degrees(axis)).shift_corners(&mut dst_corners, amount as f64);
    }

    let padded = pad_image(&promote_to_rgba(image)?, padding)?;
    let src_corners = rectangle_corners(size, padding.offset());

    debug!(
        "shear_and_warp {:?} {:?}: padding {:?}, corners {:?}",
        shear, warp, padding, dst_corners
    );

    let m = get_perspective_transform(&to_f32(&src_corners), &to_f32(&dst_corners))
        .map_err(degenerate_as_invalid)?;

    let mut warped = Image::from_size_val(padded.size(), 0u8)?;
    warp_perspective(&padded, &mut warped, &m, InterpolationMode::Bilinear)?;

    let polygon = Polygon::from_pixels(dst_corners, warped.size())?;

    Ok((warped, polygon))
}
