use std::path::{Path, PathBuf};

use log::debug;
use synthseg_io::functional::is_supported_image;

use crate::{error::DatasetError, registry::ClassRegistry};

/// An instance image together with the class it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceEntry {
    /// The class index of the instance.
    pub class_index: i64,
    /// The path to the instance image.
    pub path: PathBuf,
}

/// List the decodable images directly inside `dir`, sorted by path.
///
/// Subdirectories and files with an unknown extension are skipped.
pub fn list_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, DatasetError> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        } else {
            debug!("skipping {path:?}");
        }
    }
    images.sort();
    Ok(images)
}

/// List every instance image of every class in the registry.
///
/// # Errors
///
/// Returns [`DatasetError::NoInstances`] if no class holds an image.
pub fn scan_instances(
    registry: &ClassRegistry,
    instances_dir: impl AsRef<Path>,
) -> Result<Vec<InstanceEntry>, DatasetError> {
    let mut instances = Vec::new();
    for (class_index, class) in registry.iter() {
        for path in list_images(&class.dir)? {
            instances.push(InstanceEntry { class_index, path });
        }
    }

    if instances.is_empty() {
        return Err(DatasetError::NoInstances(
            instances_dir.as_ref().to_path_buf(),
        ));
    }

    Ok(instances)
}

/// List the background images of `backgrounds_dir`.
///
/// # Errors
///
/// Returns [`DatasetError::NoBackgrounds`] if the directory holds no image.
pub fn scan_backgrounds(backgrounds_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, DatasetError> {
    let backgrounds_dir = backgrounds_dir.as_ref();
    if !backgrounds_dir.is_dir() {
        return Err(DatasetError::NoBackgrounds(backgrounds_dir.to_path_buf()));
    }

    let backgrounds = list_images(backgrounds_dir)?;
    if backgrounds.is_empty() {
        return Err(DatasetError::NoBackgrounds(backgrounds_dir.to_path_buf()));
    }

    Ok(backgrounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_images_filters_and_sorts() -> Result<(), DatasetError> {
        let tmp_dir = tempfile::tempdir()?;
        for name in ["b.png", "a.jpg", "notes.txt"] {
            std::fs::write(tmp_dir.path().join(name), b"")?;
        }
        std::fs::create_dir(tmp_dir.path().join("c.png"))?;

        let images = list_images(tmp_dir.path())?;
        assert_eq!(
            images,
            vec![tmp_dir.path().join("a.jpg"), tmp_dir.path().join("b.png")]
        );

        Ok(())
    }

    #[test]
    fn scan_instances_tags_classes() -> Result<(), DatasetError> {
        let tmp_dir = tempfile::tempdir()?;
        for (dir, file) in [("0 cat", "x.png"), ("1 dog", "y.png"), ("1 dog", "z.png")] {
            std::fs::create_dir_all(tmp_dir.path().join(dir))?;
            std::fs::write(tmp_dir.path().join(dir).join(file), b"")?;
        }

        let registry = ClassRegistry::from_dir(tmp_dir.path())?;
        let instances = scan_instances(&registry, tmp_dir.path())?;
        let classes = instances.iter().map(|i| i.class_index).collect::<Vec<_>>();
        assert_eq!(classes, vec![0, 1, 1]);

        Ok(())
    }

    #[test]
    fn empty_backgrounds_rejected() -> Result<(), DatasetError> {
        let tmp_dir = tempfile::tempdir()?;
        let res = scan_backgrounds(tmp_dir.path());
        assert!(matches!(res, Err(DatasetError::NoBackgrounds(_))));
        Ok(())
    }
}
