#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Composition of a single sample from an instance and a background.
pub mod assembler;

/// Generator configuration.
pub mod config;

/// Error types for dataset generation.
pub mod error;

/// Parallel generation of a whole dataset.
pub mod generate;

/// Class registry built from the instance directory.
pub mod registry;

/// Random draws of the per-sample transform parameters.
pub mod sampler;

/// Listing of instance and background images.
pub mod scan;

/// Dataset directory layout, label and manifest writers.
pub mod writer;

pub use assembler::{split_for, FsLoader, ImageLoader, Sample, Split};
pub use config::{GeneratorConfig, TransformRanges};
pub use error::DatasetError;
pub use generate::{GenerationReport, Generator, SkippedSample};
pub use registry::ClassRegistry;
pub use scan::InstanceEntry;
pub use writer::DatasetLayout;
