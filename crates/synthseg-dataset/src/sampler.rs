use rand::Rng;
use synthseg_augment::{Placement, ShearParameters, WarpParameters};

use crate::config::{GeneratorConfig, TransformRanges};

/// Every random choice made for one generation attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleDraw {
    /// Index into the instance list.
    pub instance: usize,
    /// Index into the background list.
    pub background: usize,
    /// Shear of the instance.
    pub instance_shear: ShearParameters,
    /// Warp of the instance.
    pub instance_warp: WarpParameters,
    /// Brightness factor of the instance, if enabled.
    pub brightness: Option<f32>,
    /// Shear of the background.
    pub background_shear: ShearParameters,
    /// Warp of the background.
    pub background_warp: WarpParameters,
    /// Extra factor applied when the background has to be upscaled.
    pub upscale: Option<f64>,
    /// Placement of the instance on the background.
    pub placement: Placement,
}

/// Draw a shear with both angles uniform in the configured range.
pub fn sample_shear<R: Rng>(rng: &mut R, ranges: &TransformRanges) -> ShearParameters {
    let [lo, hi] = ranges.shear_degrees;
    ShearParameters::new(rng.random_range(lo..=hi), rng.random_range(lo..=hi))
}

/// Draw a warp with uniform magnitudes and a random sign per axis.
pub fn sample_warp<R: Rng>(rng: &mut R, ranges: &TransformRanges) -> WarpParameters {
    let vertical = signed_magnitude(rng, ranges.warp_magnitude);
    let horizontal = signed_magnitude(rng, ranges.warp_magnitude);
    WarpParameters::new(vertical, horizontal)
}

fn signed_magnitude<R: Rng>(rng: &mut R, [lo, hi]: [f64; 2]) -> f64 {
    let magnitude = rng.random_range(lo..=hi);
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

/// Draw the parameters of one generation attempt.
///
/// The draws happen in a fixed order, so a generator seeded identically
/// yields the same attempt.
///
/// # Arguments
///
/// * `rng` - The random generator of the sample.
/// * `config` - The generator configuration.
/// * `num_instances` - Number of instance images, must be positive.
/// * `num_backgrounds` - Number of background images, must be positive.
pub fn draw_sample<R: Rng>(
    rng: &mut R,
    config: &GeneratorConfig,
    num_instances: usize,
    num_backgrounds: usize,
) -> SampleDraw {
    let instance = rng.random_range(0..num_instances);
    let background = rng.random_range(0..num_backgrounds);

    let instance_shear = sample_shear(rng, &config.instance);
    let instance_warp = sample_warp(rng, &config.instance);
    let brightness = config
        .brightness
        .map(|[lo, hi]| rng.random_range(lo..=hi));

    let background_shear = sample_shear(rng, &config.background);
    let background_warp = sample_warp(rng, &config.background);

    let upscale = config
        .background_upscale
        .map(|[lo, hi]| rng.random_range(lo..=hi));

    let placement = Placement::new(rng.random_range(0.0..=1.0), rng.random_range(0.0..=1.0));

    SampleDraw {
        instance,
        background,
        instance_shear,
        instance_warp,
        brightness,
        background_shear,
        background_warp,
        upscale,
        placement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn draws_stay_in_range() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let draw = draw_sample(&mut rng, &config, 3, 5);
            assert!(draw.instance < 3);
            assert!(draw.background < 5);

            for angle in [
                draw.instance_shear.horizontal_degrees,
                draw.instance_shear.vertical_degrees,
            ] {
                assert!((-20.0..=20.0).contains(&angle));
            }
            for angle in [
                draw.background_shear.horizontal_degrees,
                draw.background_shear.vertical_degrees,
            ] {
                assert!((-5.0..=5.0).contains(&angle));
            }
            for amount in [draw.instance_warp.vertical, draw.instance_warp.horizontal] {
                assert!((0.65..=1.0).contains(&amount.abs()));
            }
            for amount in [
                draw.background_warp.vertical,
                draw.background_warp.horizontal,
            ] {
                assert!((0.9..=1.0).contains(&amount.abs()));
            }

            let brightness = draw.brightness.unwrap_or_default();
            assert!((0.2..=0.9).contains(&brightness));
            let upscale = draw.upscale.unwrap_or_default();
            assert!((2.0..=4.0).contains(&upscale));
            assert!(draw.placement.validate().is_ok());
        }
    }

    #[test]
    fn same_seed_same_draw() {
        let config = GeneratorConfig::default();
        let a = draw_sample(&mut StdRng::seed_from_u64(7), &config, 10, 10);
        let b = draw_sample(&mut StdRng::seed_from_u64(7), &config, 10, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn both_warp_signs_drawn() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let signs = (0..100)
            .map(|_| sample_warp(&mut rng, &config.instance).vertical > 0.0)
            .collect::<Vec<_>>();
        assert!(signs.contains(&true));
        assert!(signs.contains(&false));
    }

    #[test]
    fn disabled_options_not_drawn() {
        let config = GeneratorConfig {
            brightness: None,
            background_upscale: None,
            ..Default::default()
        };
        let draw = draw_sample(&mut StdRng::seed_from_u64(3), &config, 1, 1);
        assert_eq!(draw.brightness, None);
        assert_eq!(draw.upscale, None);
        assert_eq!((draw.instance, draw.background), (0, 0));
    }
}
