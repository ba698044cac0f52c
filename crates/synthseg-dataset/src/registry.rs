use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::error::DatasetError;

/// A class of instances, backed by one subdirectory of the instance directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassEntry {
    /// The class name written to the manifest.
    pub name: String,
    /// The directory holding the instance images of the class.
    pub dir: PathBuf,
}

/// Immutable mapping between class indices and class names.
///
/// Class directories are named `"<index> <name>"`. Two directories claiming
/// the same index are disambiguated by moving the later one to the next free
/// index; a directory whose name does not start with an integer gets a
/// negative index below every index already assigned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassRegistry {
    classes: BTreeMap<i64, ClassEntry>,
}

impl ClassRegistry {
    /// Build a registry from directory names, in the order given.
    ///
    /// # Arguments
    ///
    /// * `entries` - Pairs of directory name and directory path.
    ///
    /// # Example
    ///
    /// ```
    /// use synthseg_dataset::ClassRegistry;
    ///
    /// let registry = ClassRegistry::from_dir_names([
    ///     ("0 cat".to_string(), "0 cat".into()),
    ///     ("0 dog".to_string(), "0 dog".into()),
    ///     ("bird".to_string(), "bird".into()),
    /// ]);
    ///
    /// assert_eq!(registry.names(), vec!["bird", "cat", "dog"]);
    /// assert_eq!(registry.indices(), vec![-1, 0, 1]);
    /// ```
    pub fn from_dir_names<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, PathBuf)>,
    {
        let mut classes = BTreeMap::new();

        for (dir_name, dir) in entries {
            let (index, name) = match parse_class_dir(&dir_name) {
                Some((mut index, name)) => {
                    while classes.contains_key(&index) {
                        index += 1;
                    }
                    (index, name)
                }
                None => {
                    let lowest = classes.keys().next().copied().unwrap_or(0);
                    let index = lowest.min(0) - 1;
                    warn!("class directory {dir_name:?} has no index, using {index}");
                    (index, dir_name.clone())
                }
            };

            debug!("class {index}: {name:?} from {dir:?}");
            classes.insert(index, ClassEntry { name, dir });
        }

        Self { classes }
    }

    /// Build a registry from the subdirectories of `instances_dir`.
    ///
    /// Subdirectories are visited in name order so that the assigned indices
    /// do not depend on the filesystem.
    pub fn from_dir(instances_dir: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let instances_dir = instances_dir.as_ref();
        if !instances_dir.is_dir() {
            return Err(DatasetError::NoInstances(instances_dir.to_path_buf()));
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(instances_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            entries.push((dir_name, entry.path()));
        }
        entries.sort();

        Ok(Self::from_dir_names(entries))
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the registry holds no class.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Get a class by its index.
    pub fn get(&self, index: i64) -> Option<&ClassEntry> {
        self.classes.get(&index)
    }

    /// Class indices in increasing order.
    pub fn indices(&self) -> Vec<i64> {
        self.classes.keys().copied().collect()
    }

    /// Class names ordered by class index.
    pub fn names(&self) -> Vec<&str> {
        self.classes.values().map(|c| c.name.as_str()).collect()
    }

    /// Iterate over the classes ordered by class index.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &ClassEntry)> {
        self.classes.iter().map(|(index, entry)| (*index, entry))
    }
}

// "<index> <name>", where the name may be empty or contain spaces
fn parse_class_dir(dir_name: &str) -> Option<(i64, String)> {
    let mut tokens = dir_name.split_whitespace();
    let index = tokens.next()?.parse::<i64>().ok()?;
    let name = tokens.collect::<Vec<_>>().join(" ");
    Some((index, name))
}
