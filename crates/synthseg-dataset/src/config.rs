use std::path::Path;

use serde::{Deserialize, Serialize};
use synthseg_augment::params::MAX_SHEAR_DEGREES;

use crate::error::DatasetError;

/// Ranges the shear and warp parameters of one image are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformRanges {
    /// Inclusive range of the shear angles in degrees, for both axes.
    pub shear_degrees: [f64; 2],
    /// Inclusive range of the warp magnitudes; the sign is drawn separately.
    pub warp_magnitude: [f64; 2],
}

impl TransformRanges {
    /// Ranges used for the instance cutouts.
    pub fn instance() -> Self {
        Self {
            shear_degrees: [-20.0, 20.0],
            warp_magnitude: [0.65, 1.0],
        }
    }

    /// Ranges used for the backgrounds.
    pub fn background() -> Self {
        Self {
            shear_degrees: [-5.0, 5.0],
            warp_magnitude: [0.9, 1.0],
        }
    }

    fn validate(&self, what: &str) -> Result<(), DatasetError> {
        let [lo, hi] = self.shear_degrees;
        if !(lo.is_finite() && hi.is_finite() && lo <= hi)
            || lo.abs() >= MAX_SHEAR_DEGREES
            || hi.abs() >= MAX_SHEAR_DEGREES
        {
            return Err(DatasetError::InvalidConfig(format!(
                "{what} shear range [{lo}, {hi}] must be ordered and within +-{MAX_SHEAR_DEGREES} degrees"
            )));
        }

        let [lo, hi] = self.warp_magnitude;
        if !(lo > 0.0 && lo <= hi && hi <= 1.0) {
            return Err(DatasetError::InvalidConfig(format!(
                "{what} warp range [{lo}, {hi}] must be ordered and within (0, 1]"
            )));
        }

        Ok(())
    }
}

/// Parameters of a dataset generation run.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
///
/// # Example
///
/// ```
/// use synthseg_dataset::GeneratorConfig;
///
/// let config: GeneratorConfig = serde_json::from_str(r#"{ "samples": 10, "seed": 7 }"#).unwrap();
///
/// assert_eq!(config.samples, 10);
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.train_val_split, 0.8);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of samples to generate.
    pub samples: usize,
    /// Fraction of the samples written to the train split.
    pub train_val_split: f64,
    /// Base seed of the per-sample random generators; drawn at random if unset.
    pub seed: Option<u64>,
    /// Transform ranges of the instance cutouts.
    pub instance: TransformRanges,
    /// Transform ranges of the backgrounds.
    pub background: TransformRanges,
    /// Inclusive range of the instance brightness factor; `None` keeps the instance as is.
    pub brightness: Option<[f32; 2]>,
    /// Largest instance to background size ratio accepted without rescaling the background.
    pub max_overlay_ratio: f64,
    /// Inclusive range of the extra background upscale; `None` never rescales.
    pub background_upscale: Option<[f64; 2]>,
    /// Number of draws tried for one sample before it is skipped.
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            train_val_split: 0.8,
            seed: None,
            instance: TransformRanges::instance(),
            background: TransformRanges::background(),
            brightness: Some([0.2, 0.9]),
            max_overlay_ratio: 0.5,
            background_upscale: Some([2.0, 4.0]),
            max_attempts: 3,
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.samples == 0 {
            return Err(DatasetError::InvalidConfig(
                "samples must be positive".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.train_val_split) {
            return Err(DatasetError::InvalidConfig(format!(
                "train_val_split must be within [0, 1], got {}",
                self.train_val_split
            )));
        }

        self.instance.validate("instance")?;
        self.background.validate("background")?;

        if let Some([lo, hi]) = self.brightness {
            if !(lo >= 0.0 && lo <= hi && hi.is_finite()) {
                return Err(DatasetError::InvalidConfig(format!(
                    "brightness range [{lo}, {hi}] must be ordered and non-negative"
                )));
            }
        }

        if !(self.max_overlay_ratio > 0.0 && self.max_overlay_ratio <= 1.0) {
            return Err(DatasetError::InvalidConfig(format!(
                "max_overlay_ratio must be within (0, 1], got {}",
                self.max_overlay_ratio
            )));
        }

        if let Some([lo, hi]) = self.background_upscale {
            if !(lo >= 1.0 && lo <= hi && hi.is_finite()) {
                return Err(DatasetError::InvalidConfig(format!(
                    "background_upscale range [{lo}, {hi}] must be ordered and at least 1"
                )));
            }
        }

        if self.max_attempts == 0 {
            return Err(DatasetError::InvalidConfig(
                "max_attempts must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Number of samples written to the train split.
    pub fn train_samples(&self) -> usize {
        (self.samples as f64 * self.train_val_split).floor() as usize
    }
}
