use synthseg_image::{ColorImage, Image, ImageSize};
use synthseg_imgproc::{compose, padding::Padding2D};

use crate::{
    canvas::{pad_image, promote_to_rgba},
    error::AugmentError,
    polygon::Polygon,
};

/// Where an overlay is placed on a background, as fractions of the free space.
///
/// `(0, 0)` puts the overlay in the top-left corner and `(1, 1)` in the
/// bottom-right corner; any value in between keeps it fully inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// Horizontal fraction in `[0, 1]`.
    pub x: f64,
    /// Vertical fraction in `[0, 1]`.
    pub y: f64,
}

impl Placement {
    /// Create a new placement.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check that both fractions lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), AugmentError> {
        for value in [self.x, self.y] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AugmentError::InvalidParameter(format!(
                    "placement fractions must lie in [0, 1], got {self:?}"
                )));
            }
        }
        Ok(())
    }

    /// The pixel offset of the overlay's top-left corner.
    ///
    /// `(round(x * (W - w)), round(y * (H - h)))`
    ///
    /// # Errors
    ///
    /// Returns [`AugmentError::OverlayTooLarge`] if the overlay does not fit.
    pub fn offset(
        &self,
        background: ImageSize,
        overlay: ImageSize,
    ) -> Result<(usize, usize), AugmentError> {
        if overlay.width > background.width || overlay.height > background.height {
            return Err(AugmentError::OverlayTooLarge {
                overlay,
                background,
            });
        }

        let free_x = (background.width - overlay.width) as f64;
        let free_y = (background.height - overlay.height) as f64;

        Ok((
            (self.x * free_x).round() as usize,
            (self.y * free_y).round() as usize,
        ))
    }
}

/// Composite `foreground` over `background` with the "over" operator.
///
/// # Errors
///
/// Returns [`AugmentError::IncompatibleImageModes`] unless both images are
/// RGBA, and an image error if the sizes differ.
pub fn alpha_composite(
    foreground: &ColorImage,
    background: &ColorImage,
) -> Result<ColorImage, AugmentError> {
    match (foreground, background) {
        (ColorImage::Rgba8(fg), ColorImage::Rgba8(bg)) => {
            let mut out = Image::from_size_val(bg.size(), 0u8)?;
            compose::alpha_composite(fg, bg, &mut out)?;
            Ok(ColorImage::Rgba8(out))
        }
        _ => Err(AugmentError::IncompatibleImageModes(
            foreground.mode(),
            background.mode(),
        )),
    }
}

/// Place an overlay onto a background and remap its polygon.
///
/// Both images are promoted to RGBA. The overlay is padded to the size of
/// the background at [`Placement::offset`] and composited over it.
///
/// # Arguments
///
/// * `background` - The image underneath.
/// * `foreground` - The overlay, at most as large as the background.
/// * `placement` - The placement fractions.
/// * `polygon` - Optional corners in the overlay's normalized frame.
///
/// # Returns
///
/// The composite and, if a polygon was given, the polygon normalized by the
/// background size.
///
/// # Errors
///
/// * [`AugmentError::OverlayTooLarge`] if the overlay is wider or taller.
/// * [`AugmentError::InvalidParameter`] for placements outside `[0, 1]` or a
///   polygon whose frame is not the overlay size.
///
/// # Example
///
/// ```
/// use synthseg_augment::{overlay, Placement, Polygon};
/// use synthseg_image::{ColorImage, Image, ImageSize};
///
/// let bg: ColorImage = Image::<u8, 3>::from_size_val(
///     ImageSize { width: 40, height: 20 },
///     0,
/// ).unwrap().into();
/// let fg: ColorImage = Image::<u8, 4>::from_size_val(
///     ImageSize { width: 20, height: 10 },
///     255,
/// ).unwrap().into();
///
/// let polygon = Polygon::unit(fg.size());
/// let (out, polygon) = overlay(&bg, &fg, Placement::new(1.0, 0.0), Some(&polygon)).unwrap();
///
/// assert_eq!(out.size(), bg.size());
/// assert_eq!(polygon.unwrap().corners()[0], [0.5, 0.0]);
/// ```
pub fn overlay(
    background: &ColorImage,
    foreground: &ColorImage,
    placement: Placement,
    polygon: Option<&Polygon>,
) -> Result<(Image<u8, 4>, Option<Polygon>), AugmentError> {
    placement.validate()?;

    let (bg_size, fg_size) = (background.size(), foreground.size());
    let offset = placement.offset(bg_size, fg_size)?;

    if let Some(polygon) = polygon {
        if polygon.frame() != fg_size {
            return Err(AugmentError::InvalidParameter(format!(
                "polygon frame {} does not match the overlay {}",
                polygon.frame(),
                fg_size
            )));
        }
    }

    let background = promote_to_rgba(background)?;
    let foreground = promote_to_rgba(foreground)?;

    let padding = Padding2D {
        top: offset.1,
        bottom: bg_size.height - fg_size.height - offset.1,
        left: offset.0,
        right: bg_size.width - fg_size.width - offset.0,
    };
    let foreground = pad_image(&foreground, padding)?;

    let mut composite = Image::from_size_val(bg_size, 0u8)?;
    compose::alpha_composite(&foreground, &background, &mut composite)?;

    let polygon = polygon
        .map(|polygon| polygon.remap(offset, bg_size))
        .transpose()?;

    Ok((composite, polygon))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(width: usize, height: usize, value: u8) -> Result<ColorImage, AugmentError> {
        Ok(Image::<u8, 4>::from_size_val(ImageSize { width, height }, value)?.into())
    }

    #[test]
    fn placement_offset_rounds() -> Result<(), AugmentError> {
        let bg = ImageSize {
            width: 11,
            height: 10,
        };
        let fg = ImageSize {
            width: 8,
            height: 10,
        };
        assert_eq!(Placement::new(0.5, 0.5).offset(bg, fg)?, (2, 0));
        assert_eq!(Placement::new(1.0, 1.0).offset(bg, fg)?, (3, 0));
        Ok(())
    }

    #[test]
    fn overlay_too_large() -> Result<(), AugmentError> {
        let bg = rgba(10, 10, 0)?;
        let fg = rgba(10, 11, 0)?;
        let res = overlay(&bg, &fg, Placement::default(), None);
        assert_eq!(
            res,
            Err(AugmentError::OverlayTooLarge {
                overlay: fg.size(),
                background: bg.size(),
            })
        );
        Ok(())
    }

    #[test]
    fn overlay_placement_out_of_range() -> Result<(), AugmentError> {
        let res = overlay(&rgba(4, 4, 0)?, &rgba(2, 2, 0)?, Placement::new(1.5, 0.0), None);
        assert!(matches!(res, Err(AugmentError::InvalidParameter(_))));
        Ok(())
    }

    #[test]
    fn overlay_polygon_frame_mismatch() -> Result<(), AugmentError> {
        let polygon = Polygon::unit(ImageSize {
            width: 3,
            height: 3,
        });
        let res = overlay(
            &rgba(4, 4, 0)?,
            &rgba(2, 2, 0)?,
            Placement::default(),
            Some(&polygon),
        );
        assert!(matches!(res, Err(AugmentError::InvalidParameter(_))));
        Ok(())
    }

    #[test]
    fn overlay_pixels() -> Result<(), AugmentError> {
        let bg: ColorImage = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 3,
                height: 1,
            },
            10,
        )?
        .into();
        let fg: ColorImage = Image::<u8, 4>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![200, 200, 200, 255],
        )?
        .into();

        let (out, polygon) = overlay(&bg, &fg, Placement::new(0.5, 0.0), None)?;

        assert!(polygon.is_none());
        assert_eq!(
            out.as_slice(),
            &[10, 10, 10, 255, 200, 200, 200, 255, 10, 10, 10, 255]
        );
        Ok(())
    }

    #[test]
    fn alpha_composite_modes() -> Result<(), AugmentError> {
        let rgb: ColorImage = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 1,
                height: 1,
            },
            0,
        )?
        .into();
        let rgba = rgba(1, 1, 255)?;

        assert!(matches!(
            alpha_composite(&rgb, &rgba),
            Err(AugmentError::IncompatibleImageModes(_, _))
        ));
        assert_eq!(alpha_composite(&rgba, &rgba)?, rgba);
        Ok(())
    }
}
