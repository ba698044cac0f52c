use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use synthseg_image::Image;

use crate::{
    assembler::{compose_sample, split_for, FsLoader, ImageLoader, Sample, Split},
    config::GeneratorConfig,
    error::DatasetError,
    registry::ClassRegistry,
    sampler::draw_sample,
    scan::{scan_backgrounds, scan_instances, InstanceEntry},
    writer::DatasetLayout,
};

/// A sample that could not be generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedSample {
    /// The index of the sample.
    pub index: usize,
    /// Why the last attempt failed.
    pub reason: String,
}

/// Summary of a generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// The base seed the run used.
    pub seed: u64,
    /// Number of samples written to the train split.
    pub train: usize,
    /// Number of samples written to the val split.
    pub val: usize,
    /// Samples given up after every attempt failed, by index.
    pub skipped: Vec<SkippedSample>,
}

impl GenerationReport {
    /// Number of samples written to disk.
    pub fn written(&self) -> usize {
        self.train + self.val
    }
}

impl std::fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "wrote {} train and {} val samples, skipped {} (seed {})",
            self.train,
            self.val,
            self.skipped.len(),
            self.seed
        )
    }
}

/// Generates the samples of a dataset.
///
/// Each sample owns a random generator seeded with `seed + index`, so the
/// output does not depend on how the samples are scheduled across threads.
pub struct Generator<L = FsLoader> {
    config: GeneratorConfig,
    seed: u64,
    registry: ClassRegistry,
    instances: Vec<InstanceEntry>,
    backgrounds: Vec<PathBuf>,
    loader: L,
}

impl Generator<FsLoader> {
    /// Create a generator reading the class subdirectories of `instances_dir`
    /// and the images of `backgrounds_dir`.
    pub fn from_dirs(
        config: GeneratorConfig,
        instances_dir: impl AsRef<Path>,
        backgrounds_dir: impl AsRef<Path>,
    ) -> Result<Self, DatasetError> {
        let registry = ClassRegistry::from_dir(instances_dir.as_ref())?;
        let instances = scan_instances(&registry, instances_dir.as_ref())?;
        let backgrounds = scan_backgrounds(backgrounds_dir)?;

        info!(
            "found {} classes, {} instances and {} backgrounds",
            registry.len(),
            instances.len(),
            backgrounds.len()
        );

        Self::new(config, registry, instances, backgrounds, FsLoader)
    }
}

impl<L: ImageLoader> Generator<L> {
    /// Create a generator over explicit inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or either input list
    /// is empty.
    pub fn new(
        config: GeneratorConfig,
        registry: ClassRegistry,
        instances: Vec<InstanceEntry>,
        backgrounds: Vec<PathBuf>,
        loader: L,
    ) -> Result<Self, DatasetError> {
        config.validate()?;

        if instances.is_empty() {
            return Err(DatasetError::EmptyInput("instance"));
        }
        if backgrounds.is_empty() {
            return Err(DatasetError::EmptyInput("background"));
        }

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());

        Ok(Self {
            config,
            seed,
            registry,
            instances,
            backgrounds,
            loader,
        })
    }

    /// The base seed of the per-sample generators.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The configuration of the generator.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The class registry of the instances.
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Generate sample `index` without writing it.
    ///
    /// Up to `max_attempts` draws are tried; the error of the last one is
    /// returned if all fail.
    pub fn generate_sample(&self, index: usize) -> Result<(Image<u8, 4>, Sample), DatasetError> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(index as u64));

        let mut attempt = 1;
        loop {
            match self.try_sample(index, &mut rng) {
                Ok(sample) => return Ok(sample),
                Err(err) if attempt < self.config.max_attempts => {
                    debug!("sample {index}, attempt {attempt} failed: {err}");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn try_sample(
        &self,
        index: usize,
        rng: &mut StdRng,
    ) -> Result<(Image<u8, 4>, Sample), DatasetError> {
        let draw = draw_sample(
            rng,
            &self.config,
            self.instances.len(),
            self.backgrounds.len(),
        );
        let instance = &self.instances[draw.instance];
        let background_path = &self.backgrounds[draw.background];

        debug!(
            "sample {index}: {:?} on {:?}, {draw:?}",
            instance.path, background_path
        );

        let instance_image = self
            .loader
            .load(&instance.path)
            .map_err(|err| err.in_sample(index, &instance.path))?;
        let background_image = self
            .loader
            .load(background_path)
            .map_err(|err| err.in_sample(index, background_path))?;

        compose_sample(
            &instance_image,
            &background_image,
            instance.class_index,
            &draw,
            &self.config,
        )
        .map_err(|err| err.in_sample(index, &instance.path))
    }

    /// Generate every sample in parallel and write the dataset to `layout`.
    ///
    /// A sample that fails all its attempts is logged and skipped. Only
    /// failures to create the output directories or the manifest abort the run.
    pub fn run(&self, layout: &DatasetLayout) -> Result<GenerationReport, DatasetError> {
        layout.create_dirs()?;

        let samples = self.config.samples;
        let ratio = self.config.train_val_split;

        let outcomes = (0..samples)
            .into_par_iter()
            .map(|index| {
                let split = split_for(index, samples, ratio);
                let outcome = self.generate_sample(index).and_then(|(image, sample)| {
                    layout
                        .write_sample(split, index, &image, &sample)
                        .map_err(|err| err.in_sample(index, layout.image_path(split, index)))
                });
                (index, outcome.map(|_| split))
            })
            .collect::<Vec<_>>();

        let mut report = GenerationReport {
            seed: self.seed,
            ..Default::default()
        };
        for (index, outcome) in outcomes {
            match outcome {
                Ok(Split::Train) => report.train += 1,
                Ok(Split::Val) => report.val += 1,
                Err(err) => {
                    warn!("skipping sample {index}: {err}");
                    report.skipped.push(SkippedSample {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }

        layout.write_manifest(&self.registry)?;
        info!("{report}");

        Ok(report)
    }
}
