use std::path::PathBuf;

use synthseg_augment::AugmentError;
use synthseg_image::ImageError;
use synthseg_io::IoError;

/// An error type for the dataset module.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// Error reading or writing an image.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Error creating an image.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error in the geometric pipeline.
    #[error(transparent)]
    Augment(#[from] AugmentError),

    /// Error to manipulate a file or directory.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error parsing a configuration file.
    #[error("Failed to parse the configuration. {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Error when the configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error when no instance image was found.
    #[error("No instance images found in {0}")]
    NoInstances(PathBuf),

    /// Error when no background image was found.
    #[error("No background images found in {0}")]
    NoBackgrounds(PathBuf),

    /// Error when an input list handed to the generator is empty.
    #[error("No {0} images given")]
    EmptyInput(&'static str),

    /// Error while generating one sample.
    #[error("Sample {index} ({path}) failed: {source}")]
    Sample {
        /// The index of the sample.
        index: usize,
        /// The source image the sample was built from.
        path: PathBuf,
        /// The underlying error.
        source: Box<DatasetError>,
    },
}

impl DatasetError {
    /// Attach the sample index and source path to an error.
    pub fn in_sample(self, index: usize, path: impl Into<PathBuf>) -> Self {
        DatasetError::Sample {
            index,
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Whether the error comes from a source image that does not exist.
    pub fn is_input_not_found(&self) -> bool {
        match self {
            DatasetError::Io(IoError::FileDoesNotExist(_)) => true,
            DatasetError::Sample { source, .. } => source.is_input_not_found(),
            _ => false,
        }
    }
}
