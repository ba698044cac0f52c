use std::path::Path;

use log::debug;
use synthseg_augment::{
    adjust::{adjust_brightness, scale},
    overlay, shear_and_warp, AugmentError, Polygon,
};
use synthseg_image::{ColorImage, Image, ImageSize};
use synthseg_io::functional::read_image_any;

use crate::{config::GeneratorConfig, error::DatasetError, sampler::SampleDraw};

/// The dataset split a sample is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Split {
    /// Training split.
    Train,
    /// Validation split.
    Val,
}

impl Split {
    /// Both splits, in output order.
    pub const ALL: [Split; 2] = [Split::Train, Split::Val];

    /// The directory name of the split.
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
        }
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The split of sample `index` out of `samples`.
///
/// The first `floor(samples * ratio)` samples are train samples.
///
/// # Example
///
/// ```
/// use synthseg_dataset::{split_for, Split};
///
/// assert_eq!(split_for(79, 100, 0.8), Split::Train);
/// assert_eq!(split_for(80, 100, 0.8), Split::Val);
/// ```
pub fn split_for(index: usize, samples: usize, ratio: f64) -> Split {
    let train = (samples as f64 * ratio).floor() as usize;
    if index < train {
        Split::Train
    } else {
        Split::Val
    }
}

/// One annotated sample: the instance class and its polygon in the output image.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// The class index of the instance.
    pub class_index: i64,
    /// The normalized polygon of the instance.
    pub polygon: Polygon,
}

impl Sample {
    /// The label row `class x1 y1 x2 y2 x3 y3 x4 y4`, newline terminated.
    pub fn to_label_line(&self) -> String {
        let mut line = self.class_index.to_string();
        for value in self.polygon.flatten() {
            line.push(' ');
            line.push_str(&value.to_string());
        }
        line.push('\n');
        line
    }
}

/// Source of the instance and background images.
pub trait ImageLoader: Sync {
    /// Load the image at `path`.
    fn load(&self, path: &Path) -> Result<ColorImage, DatasetError>;
}

/// Loads images from the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLoader;

impl ImageLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<ColorImage, DatasetError> {
        Ok(read_image_any(path)?)
    }
}

/// The factor the background has to be scaled by so the instance fits.
///
/// Returns `None` when the instance is at most `max_ratio` times the
/// background on both axes or when upscaling is disabled; otherwise the
/// largest side ratio times `upscale`.
pub fn background_scale(
    instance: ImageSize,
    background: ImageSize,
    max_ratio: f64,
    upscale: Option<f64>,
) -> Option<f64> {
    let ratio_w = instance.width as f64 / background.width as f64;
    let ratio_h = instance.height as f64 / background.height as f64;
    let ratio = ratio_w.max(ratio_h);

    if ratio > max_ratio {
        upscale.map(|upscale| ratio * upscale)
    } else {
        None
    }
}

/// Build one sample from already loaded images.
///
/// The instance is sheared and warped, optionally darkened, then placed on
/// the sheared and warped background. The background is upscaled first when
/// the instance is too large for it.
///
/// # Arguments
///
/// * `instance` - The instance cutout.
/// * `background` - The background image.
/// * `class_index` - The class of the instance.
/// * `draw` - The random parameters of this attempt.
/// * `config` - The generator configuration.
///
/// # Returns
///
/// The RGBA output image and its annotation.
pub fn compose_sample(
    instance: &ColorImage,
    background: &ColorImage,
    class_index: i64,
    draw: &SampleDraw,
    config: &GeneratorConfig,
) -> Result<(Image<u8, 4>, Sample), DatasetError> {
    let (instance, polygon) = shear_and_warp(instance, draw.instance_shear, draw.instance_warp)?;
    let mut instance = ColorImage::from(instance);
    if let Some(factor) = draw.brightness {
        instance = adjust_brightness(&instance, factor)?;
    }

    let (background, _) =
        shear_and_warp(background, draw.background_shear, draw.background_warp)?;
    let mut background = ColorImage::from(background);

    if let Some(factor) = background_scale(
        instance.size(),
        background.size(),
        config.max_overlay_ratio,
        draw.upscale,
    ) {
        debug!(
            "upscaling background {} by {factor:.3} for instance {}",
            background.size(),
            instance.size()
        );
        background = scale(&background, factor)?;
    }

    let (image, polygon) = overlay(&background, &instance, draw.placement, Some(&polygon))?;
    let polygon = polygon.ok_or_else(|| {
        AugmentError::InvalidParameter("overlay returned no polygon".to_string())
    })?;

    Ok((
        image,
        Sample {
            class_index,
            polygon,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthseg_augment::{Placement, ShearParameters, WarpParameters};

    fn size(width: usize, height: usize) -> ImageSize {
        ImageSize { width, height }
    }

    fn identity_draw() -> SampleDraw {
        SampleDraw {
            instance: 0,
            background: 0,
            instance_shear: ShearParameters::default(),
            instance_warp: WarpParameters::identity(),
            brightness: None,
            background_shear: ShearParameters::default(),
            background_warp: WarpParameters::identity(),
            upscale: None,
            placement: Placement::new(0.0, 0.0),
        }
    }

    #[test]
    fn split_boundary() {
        assert_eq!(split_for(0, 100, 0.8), Split::Train);
        assert_eq!(split_for(79, 100, 0.8), Split::Train);
        assert_eq!(split_for(80, 100, 0.8), Split::Val);
        assert_eq!(split_for(99, 100, 0.8), Split::Val);
        assert_eq!(split_for(0, 10, 0.0), Split::Val);
        assert_eq!(split_for(9, 10, 1.0), Split::Train);
    }

    #[test]
    fn background_scale_heuristic() {
        assert_eq!(background_scale(size(50, 50), size(100, 100), 0.5, Some(2.0)), None);
        assert_eq!(
            background_scale(size(80, 20), size(100, 100), 0.5, Some(2.0)),
            Some(1.6)
        );
        assert_eq!(
            background_scale(size(20, 150), size(100, 100), 0.5, Some(3.0)),
            Some(4.5)
        );
        assert_eq!(background_scale(size(80, 20), size(100, 100), 0.5, None), None);
    }

    #[test]
    fn label_line_tokens() -> Result<(), DatasetError> {
        let sample = Sample {
            class_index: 3,
            polygon: Polygon::unit(size(10, 10)),
        };
        let line = sample.to_label_line();
        assert_eq!(line, "3 0 0 1 0 1 1 0 1\n");
        assert_eq!(line.split_whitespace().count(), 9);
        Ok(())
    }

    #[test]
    fn compose_upscales_small_background() -> Result<(), DatasetError> {
        let instance: ColorImage = Image::<u8, 3>::from_size_val(size(40, 40), 255)?.into();
        let background: ColorImage = Image::<u8, 3>::from_size_val(size(50, 50), 0)?.into();
        let draw = SampleDraw {
            upscale: Some(2.0),
            ..identity_draw()
        };

        let (image, sample) =
            compose_sample(&instance, &background, 1, &draw, &GeneratorConfig::default())?;

        // 0.8 * 2.0 = 1.6
        assert_eq!(image.size(), size(80, 80));
        assert_eq!(sample.class_index, 1);
        assert_eq!(sample.polygon.frame(), size(80, 80));
        assert_eq!(sample.polygon.corners()[2], [0.5, 0.5]);

        Ok(())
    }

    #[test]
    fn compose_rejects_oversize_without_upscale() -> Result<(), DatasetError> {
        let instance: ColorImage = Image::<u8, 3>::from_size_val(size(60, 60), 255)?.into();
        let background: ColorImage = Image::<u8, 3>::from_size_val(size(50, 50), 0)?.into();

        let res = compose_sample(
            &instance,
            &background,
            0,
            &identity_draw(),
            &GeneratorConfig::default(),
        );
        assert!(matches!(
            res,
            Err(DatasetError::Augment(AugmentError::OverlayTooLarge { .. }))
        ));

        Ok(())
    }
}
