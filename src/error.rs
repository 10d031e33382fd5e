use std::path::PathBuf;
use thiserror::Error;

use crate::city::City;

/// All errors produced by the explorer library.
#[derive(Error, Debug)]
pub enum ExploreError {
    /// The backing file for a city could not be read or parsed as a trip table.
    #[error("Dataset for {city} unavailable at {path}: {reason}")]
    DatasetUnavailable {
        city: City,
        path: PathBuf,
        reason: String,
    },

    /// The dataset override file is malformed or names an unknown city.
    #[error("Invalid dataset config {path}: {reason}")]
    InvalidDatasetConfig { path: PathBuf, reason: String },

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Unknown month: {0}")]
    UnknownMonth(String),

    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ExploreError {
    pub fn is_dataset_unavailable(&self) -> bool {
        matches!(self, ExploreError::DatasetUnavailable { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExploreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_dataset_unavailable() {
        let err = ExploreError::DatasetUnavailable {
            city: City::Washington,
            path: PathBuf::from("/data/washington.csv"),
            reason: "No such file or directory".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("washington"));
        assert!(msg.contains("/data/washington.csv"));
        assert!(msg.contains("No such file"));
        assert!(err.is_dataset_unavailable());
    }

    #[test]
    fn test_error_display_unknown_inputs() {
        assert_eq!(
            ExploreError::UnknownCity("boston".to_string()).to_string(),
            "Unknown city: boston"
        );
        assert_eq!(
            ExploreError::UnknownMonth("july".to_string()).to_string(),
            "Unknown month: july"
        );
        assert_eq!(
            ExploreError::UnknownWeekday("funday".to_string()).to_string(),
            "Unknown weekday: funday"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ExploreError = io_err.into();
        assert!(err.to_string().contains("denied"));
        assert!(!err.is_dataset_unavailable());
    }
}
