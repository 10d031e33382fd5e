use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::city::City;
use crate::error::{ExploreError, Result};

/// Resolves each city to the CSV file holding its trips.
///
/// By default a city's file is `<data_dir>/<city file name>`. Individual
/// cities can be pointed elsewhere with a plain JSON object on disk:
/// ```json
/// {
///   "chicago": "/data/divvy/2017.csv",
///   "new york city": "/data/citibike/2017.csv"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    data_dir: PathBuf,
    overrides: HashMap<City, PathBuf>,
}

impl DatasetConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Reads per-city overrides from a JSON file at `path`.
    ///
    /// Relative paths in the file are resolved against the data directory.
    pub fn with_overrides_file(mut self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: HashMap<String, PathBuf> =
            serde_json::from_str(&content).map_err(|e| ExploreError::InvalidDatasetConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        for (name, file) in entries {
            let city = name
                .parse::<City>()
                .map_err(|e| ExploreError::InvalidDatasetConfig {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            self.overrides.insert(city, file);
        }

        Ok(self)
    }

    /// Returns the file backing `city`.
    pub fn path_for(&self, city: City) -> PathBuf {
        match self.overrides.get(&city) {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => self.data_dir.join(file),
            None => self.data_dir.join(city.default_file_name()),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
