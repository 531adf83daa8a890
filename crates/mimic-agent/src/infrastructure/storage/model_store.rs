//! JSON persistence for fitted timing models.
//!
//! A saved model lets `run` start without refitting from a recording.  The
//! parameters are validated again on load.

use std::path::{Path, PathBuf};

use mimic_core::TimingModel;
use thiserror::Error;

/// Error type for model files.
#[derive(Debug, Error)]
pub enum ModelStoreError {
    #[error("model file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error accessing model at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON or parameters that fail validation.
    #[error("invalid model file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Writes `model` to `path` as pretty-printed JSON.
///
/// # Errors
///
/// [`ModelStoreError::Io`] if the file cannot be written.
pub fn save_model(path: &Path, model: &TimingModel) -> Result<(), ModelStoreError> {
    let json = serde_json::to_string_pretty(model).map_err(|source| ModelStoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| ModelStoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "timing model saved");
    Ok(())
}

/// Reads a model previously written by [`save_model`].
///
/// # Errors
///
/// [`ModelStoreError::NotFound`], [`ModelStoreError::Io`], or
/// [`ModelStoreError::Json`] for malformed or invalid content.
pub fn load_model(path: &Path) -> Result<TimingModel, ModelStoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ModelStoreError::NotFound(path.to_path_buf())
        } else {
            ModelStoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|source| ModelStoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimic_core::DistributionParams;

    fn model() -> TimingModel {
        let press = DistributionParams::new(3.5, 0.04, 0.02).unwrap();
        let a = DistributionParams::new(2.0, 0.3, 0.15).unwrap();
        let b = DistributionParams::new(1.4, 1.1, 0.4).unwrap();
        TimingModel::new(press, vec![a, b]).unwrap()
    }

    #[test]
    fn test_saved_model_loads_identically() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        // Act
        save_model(&path, &model()).unwrap();
        let loaded = load_model(&path).unwrap();

        // Assert
        assert_eq!(loaded, model());
    }

    #[test]
    fn test_missing_model_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_model(&dir.path().join("none.json"));
        assert!(matches!(result, Err(ModelStoreError::NotFound(_))));
    }

    #[test]
    fn test_invalid_parameters_are_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let text = r#"{
            "press_duration": { "shape": -1.0, "location": 0.0, "scale": 0.1 },
            "interval_phases": [ { "shape": 1.0, "location": 0.0, "scale": 0.1 } ]
        }"#;
        std::fs::write(&path, text).unwrap();

        assert!(matches!(load_model(&path), Err(ModelStoreError::Json { .. })));
    }

    #[test]
    fn test_model_without_phases_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        let text = r#"{
            "press_duration": { "shape": 1.0, "location": 0.0, "scale": 0.1 },
            "interval_phases": []
        }"#;
        std::fs::write(&path, text).unwrap();

        assert!(matches!(load_model(&path), Err(ModelStoreError::Json { .. })));
    }
}
