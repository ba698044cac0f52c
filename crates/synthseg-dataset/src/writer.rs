use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{info, warn};
use synthseg_image::Image;
use synthseg_io::png::write_image_png_rgba8;

use crate::{
    assembler::{Sample, Split},
    error::DatasetError,
    registry::ClassRegistry,
};

/// File name of the manifest written next to the splits.
pub const MANIFEST_FILE_NAME: &str = "data.yaml";

/// The on-disk layout of a generated dataset.
///
/// ```text
/// <root>/images/{train,val}/<i>.png
/// <root>/labels/{train,val}/<i>.txt
/// <root>/data.yaml
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
    manifest: PathBuf,
}

impl DatasetLayout {
    /// Create a layout rooted at `root`, with the manifest inside it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let manifest = root.join(MANIFEST_FILE_NAME);
        Self { root, manifest }
    }

    /// Write the manifest to `path` instead of the dataset root.
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = path.into();
        self
    }

    /// The dataset root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The manifest path.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    /// The image directory of a split.
    pub fn images_dir(&self, split: Split) -> PathBuf {
        self.root.join("images").join(split.as_str())
    }

    /// The label directory of a split.
    pub fn labels_dir(&self, split: Split) -> PathBuf {
        self.root.join("labels").join(split.as_str())
    }

    /// The image path of sample `index`.
    pub fn image_path(&self, split: Split, index: usize) -> PathBuf {
        self.images_dir(split).join(format!("{index}.png"))
    }

    /// The label path of sample `index`.
    pub fn label_path(&self, split: Split, index: usize) -> PathBuf {
        self.labels_dir(split).join(format!("{index}.txt"))
    }

    /// Create the image and label directories of both splits.
    ///
    /// Existing directories are kept.
    pub fn create_dirs(&self) -> Result<(), DatasetError> {
        for split in Split::ALL {
            for dir in [self.images_dir(split), self.labels_dir(split)] {
                if dir.is_dir() {
                    info!("directory {dir:?} already exists");
                } else {
                    fs::create_dir_all(&dir)?;
                    info!("created directory {dir:?}");
                }
            }
        }
        Ok(())
    }

    /// Write the image and label of sample `index`.
    ///
    /// The label is written only after the image was encoded successfully,
    /// and the image is removed again if the label cannot be written.
    pub fn write_sample(
        &self,
        split: Split,
        index: usize,
        image: &Image<u8, 4>,
        sample: &Sample,
    ) -> Result<(), DatasetError> {
        let image_path = self.image_path(split, index);
        write_image_png_rgba8(&image_path, image)?;

        if let Err(err) = fs::write(self.label_path(split, index), sample.to_label_line()) {
            // no image without its label
            if let Err(remove_err) = fs::remove_file(&image_path) {
                warn!("failed to remove {image_path:?}: {remove_err}");
            }
            return Err(err.into());
        }

        Ok(())
    }

    /// Write the manifest listing both splits and the class names.
    ///
    /// The split paths are absolute so the manifest can be moved.
    pub fn write_manifest(&self, registry: &ClassRegistry) -> Result<(), DatasetError> {
        let train = fs::canonicalize(self.images_dir(Split::Train))?;
        let val = fs::canonicalize(self.images_dir(Split::Val))?;

        if let Some(parent) = self.manifest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = fs::File::create(&self.manifest)?;
        file.write_all(manifest_contents(&train, &val, registry).as_bytes())?;
        info!("wrote manifest {:?}", self.manifest);

        Ok(())
    }
}

/// The manifest text for the given split directories and classes.
pub fn manifest_contents(train: &Path, val: &Path, registry: &ClassRegistry) -> String {
    let names = registry
        .names()
        .iter()
        .map(|name| format!("'{}'", name.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "train: {}\nval: {}\nnc: {}\nnames: [{}]\n",
        train.display(),
        val.display(),
        registry.len(),
        names
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthseg_augment::Polygon;
    use synthseg_image::ImageSize;

    #[test]
    fn layout_paths() {
        let layout = DatasetLayout::new("out");
        assert_eq!(
            layout.image_path(Split::Train, 3),
            Path::new("out/images/train/3.png")
        );
        assert_eq!(
            layout.label_path(Split::Val, 12),
            Path::new("out/labels/val/12.txt")
        );
        assert_eq!(layout.manifest_path(), Path::new("out/data.yaml"));
        assert_eq!(
            layout.with_manifest_path("data.yaml").manifest_path(),
            Path::new("data.yaml")
        );
    }

    #[test]
    fn manifest_text() {
        let registry = ClassRegistry::from_dir_names([
            ("1 dog".to_string(), PathBuf::from("1 dog")),
            ("0 cat's toy".to_string(), PathBuf::from("0 cat's toy")),
        ]);
        let text = manifest_contents(Path::new("/d/train"), Path::new("/d/val"), &registry);
        assert_eq!(
            text,
            "train: /d/train\nval: /d/val\nnc: 2\nnames: ['cat''s toy', 'dog']\n"
        );
    }

    #[test]
    fn write_sample_and_manifest() -> Result<(), DatasetError> {
        let tmp_dir = tempfile::tempdir()?;
        let layout = DatasetLayout::new(tmp_dir.path().join("dataset"));
        layout.create_dirs()?;
        // second call keeps the directories
        layout.create_dirs()?;

        let size = ImageSize {
            width: 4,
            height: 3,
        };
        let image = Image::<u8, 4>::from_size_val(size, 255)?;
        let sample = Sample {
            class_index: 0,
            polygon: Polygon::unit(size),
        };
        layout.write_sample(Split::Val, 5, &image, &sample)?;

        assert!(layout.image_path(Split::Val, 5).is_file());
        assert_eq!(
            fs::read_to_string(layout.label_path(Split::Val, 5))?,
            "0 0 0 1 0 1 1 0 1\n"
        );

        let registry = ClassRegistry::from_dir_names([("0 box".to_string(), PathBuf::new())]);
        layout.write_manifest(&registry)?;
        let manifest = fs::read_to_string(layout.manifest_path())?;
        assert!(manifest.contains("nc: 1\nnames: ['box']\n"));
        assert!(manifest.starts_with("train: /"));

        Ok(())
    }

    #[test]
    fn failed_label_removes_image() -> Result<(), DatasetError> {
        let tmp_dir = tempfile::tempdir()?;
        let layout = DatasetLayout::new(tmp_dir.path());
        layout.create_dirs()?;

        // a directory where the label file should go
        fs::create_dir(layout.label_path(Split::Train, 0))?;

        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let image = Image::<u8, 4>::from_size_val(size, 0)?;
        let sample = Sample {
            class_index: 1,
            polygon: Polygon::unit(size),
        };

        let res = layout.write_sample(Split::Train, 0, &image, &sample);
        assert!(matches!(res, Err(DatasetError::FileError(_))));
        assert!(!layout.image_path(Split::Train, 0).exists());

        Ok(())
    }
}
