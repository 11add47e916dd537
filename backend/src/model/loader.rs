//! Artifact loading
//!
//! Loading never fails from the caller's point of view: any problem with the
//! artifact yields `ModelAvailability::Unavailable`.

use crate::model::artifact::ModelArtifact;
use crate::model::error::ModelLoadError;
use crate::model::pipeline::Pipeline;
use std::path::Path;

/// Message shown when no usable model is present
pub const MODEL_UNAVAILABLE_MESSAGE: &str =
    "Model not found. Please ensure baseline_model.json is in the models directory.";

/// Outcome of loading the artifact
#[derive(Debug)]
pub enum ModelAvailability {
    /// Artifact loaded and validated
    Available(Pipeline),
    /// Missing, corrupt or incompatible artifact
    Unavailable,
}

impl ModelAvailability {
    /// Loaded pipeline, if any
    pub fn pipeline(&self) -> Option<&Pipeline> {
        match self {
            ModelAvailability::Available(pipeline) => Some(pipeline),
            ModelAvailability::Unavailable => None,
        }
    }

    /// True when a pipeline is loaded
    pub fn is_available(&self) -> bool {
        matches!(self, ModelAvailability::Available(_))
    }
}

/// Read, parse and validate an artifact
pub async fn read_artifact(path: &Path) -> Result<Pipeline, ModelLoadError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let artifact: ModelArtifact = serde_json::from_str(&contents)?;
    artifact.validate()?;
    Ok(Pipeline::from_artifact(artifact))
}

/// Load the artifact at `path`, collapsing every failure to `Unavailable`
pub async fn load_model(path: &Path) -> ModelAvailability {
    match read_artifact(path).await {
        Ok(pipeline) => {
            tracing::info!(
                path = %path.display(),
                features = pipeline.feature_names().len(),
                classes = pipeline.classes().len(),
                "Loaded model artifact"
            );
            ModelAvailability::Available(pipeline)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Model artifact unavailable");
            ModelAvailability::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID_ARTIFACT: &str = r#"{
        "format_version": 1,
        "feature_names": ["age", "industry"],
        "preprocessor": [
            {"kind": "numeric", "column": "age", "fill": 30.0, "mean": 30.0, "scale": 10.0},
            {"kind": "categorical", "column": "industry", "categories": ["tech", "retail"]}
        ],
        "classifier": {
            "kind": "linear",
            "classes": ["Eng", "Sales"],
            "coefficients": [[1.0, 0.5, -0.5], [-1.0, -0.5, 0.5]],
            "intercepts": [0.0, 0.0]
        }
    }"#;

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models/baseline_model.json");

        let availability = load_model(&path).await;
        assert!(!availability.is_available());
        assert!(availability.pipeline().is_none());
        assert!(matches!(
            read_artifact(&path).await,
            Err(ModelLoadError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("baseline_model.json");
        fs::write(&path, b"\x80\x04\x95 not json").unwrap();

        assert!(!load_model(&path).await.is_available());
    }

    #[tokio::test]
    async fn test_version_skew_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("baseline_model.json");
        fs::write(&path, VALID_ARTIFACT.replace("\"format_version\": 1", "\"format_version\": 7"))
            .unwrap();

        assert!(matches!(
            read_artifact(&path).await,
            Err(ModelLoadError::UnsupportedVersion(7))
        ));
        assert!(!load_model(&path).await.is_available());
    }

    #[tokio::test]
    async fn test_valid_file_loads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("baseline_model.json");
        fs::write(&path, VALID_ARTIFACT).unwrap();

        let availability = load_model(&path).await;
        let pipeline = availability.pipeline().expect("model should load");
        assert_eq!(pipeline.feature_names(), &["age", "industry"]);
        assert_eq!(pipeline.classes(), &["Eng", "Sales"]);
    }
}
