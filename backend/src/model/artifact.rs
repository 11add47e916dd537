//! On-disk format of the role classifier
//!
//! Inference-only: the artifact is produced offline by the training
//! pipeline and exported as JSON. It bundles the feature preprocessing
//! steps with the fitted classifier.

use crate::model::error::ModelLoadError;
use serde::{Deserialize, Serialize};

/// Artifact format understood by this build
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Serialized preprocessor + classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Format version, must equal `SUPPORTED_FORMAT_VERSION`
    pub format_version: u32,
    /// Input columns the model was trained on
    pub feature_names: Vec<String>,
    /// Per-column transforms, applied in order to build the feature vector
    pub preprocessor: Vec<ColumnTransform>,
    /// Fitted classifier
    pub classifier: ClassifierSpec,
}

fn default_scale() -> f64 {
    1.0
}

/// Transform for one input column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransform {
    /// Parse as a number, impute blanks with `fill`, standardize
    Numeric {
        /// Input column
        column: String,
        /// Value used for blank or unparseable input
        #[serde(default)]
        fill: f64,
        /// Training mean
        #[serde(default)]
        mean: f64,
        /// Training standard deviation
        #[serde(default = "default_scale")]
        scale: f64,
    },
    /// One-hot encode; unknown values encode as all zeros
    Categorical {
        /// Input column
        column: String,
        /// Known categories, in encoding order
        categories: Vec<String>,
    },
    /// Parse as a number, impute blanks with `fill`, no scaling
    Passthrough {
        /// Input column
        column: String,
        /// Value used for blank or unparseable input
        #[serde(default)]
        fill: f64,
    },
}

impl ColumnTransform {
    /// Input column the transform reads
    pub fn column(&self) -> &str {
        match self {
            ColumnTransform::Numeric { column, .. }
            | ColumnTransform::Categorical { column, .. }
            | ColumnTransform::Passthrough { column, .. } => column,
        }
    }

    /// Number of encoded features the transform produces
    pub fn width(&self) -> usize {
        match self {
            ColumnTransform::Categorical { categories, .. } => categories.len(),
            _ => 1,
        }
    }
}

/// Fitted classifier parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    /// Multinomial (or binary) linear model
    ///
    /// One coefficient row per class, or a single row for two classes where
    /// a positive score selects `classes[1]`.
    Linear {
        /// Class labels
        classes: Vec<String>,
        /// Coefficient rows
        coefficients: Vec<Vec<f64>>,
        /// Intercept per coefficient row
        intercepts: Vec<f64>,
    },
    /// Constant baseline predicting the most frequent class
    Prior {
        /// Class labels
        classes: Vec<String>,
        /// Training class frequencies
        class_prior: Vec<f64>,
    },
}

impl ClassifierSpec {
    /// Class labels in model order
    pub fn classes(&self) -> &[String] {
        match self {
            ClassifierSpec::Linear { classes, .. } | ClassifierSpec::Prior { classes, .. } => {
                classes
            }
        }
    }
}

impl ModelArtifact {
    /// Total width of the encoded feature vector
    pub fn encoded_width(&self) -> usize {
        self.preprocessor.iter().map(ColumnTransform::width).sum()
    }

    /// Check the artifact is internally consistent
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedVersion(self.format_version));
        }
        if self.feature_names.is_empty() {
            return Err(ModelLoadError::Invalid(
                "artifact declares no feature names".to_string(),
            ));
        }
        for transform in &self.preprocessor {
            if !self.feature_names.iter().any(|f| f == transform.column()) {
                return Err(ModelLoadError::Invalid(format!(
                    "transform reads unknown column '{}'",
                    transform.column()
                )));
            }
        }

        let width = self.encoded_width();
        match &self.classifier {
            ClassifierSpec::Linear {
                classes,
                coefficients,
                intercepts,
            } => {
                if classes.len() < 2 {
                    return Err(ModelLoadError::Invalid(
                        "linear classifier needs at least two classes".to_string(),
                    ));
                }
                let binary = classes.len() == 2 && coefficients.len() == 1;
                if !binary && coefficients.len() != classes.len() {
                    return Err(ModelLoadError::Invalid(format!(
                        "expected {} coefficient rows, found {}",
                        classes.len(),
                        coefficients.len()
                    )));
                }
                if intercepts.len() != coefficients.len() {
                    return Err(ModelLoadError::Invalid(format!(
                        "expected {} intercepts, found {}",
                        coefficients.len(),
                        intercepts.len()
                    )));
                }
                if let Some(row) = coefficients.iter().find(|row| row.len() != width) {
                    return Err(ModelLoadError::Invalid(format!(
                        "coefficient row has {} weights, preprocessor produces {}",
                        row.len(),
                        width
                    )));
                }
            }
            ClassifierSpec::Prior {
                classes,
                class_prior,
            } => {
                if classes.is_empty() || classes.len() != class_prior.len() {
                    return Err(ModelLoadError::Invalid(
                        "prior classifier needs one prior per class".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(classifier: ClassifierSpec) -> ModelArtifact {
        ModelArtifact {
            format_version: SUPPORTED_FORMAT_VERSION,
            feature_names: vec!["age".to_string(), "industry".to_string()],
            preprocessor: vec![
                ColumnTransform::Numeric {
                    column: "age".to_string(),
                    fill: 35.0,
                    mean: 35.0,
                    scale: 10.0,
                },
                ColumnTransform::Categorical {
                    column: "industry".to_string(),
                    categories: vec!["tech".to_string(), "retail".to_string()],
                },
            ],
            classifier,
        }
    }

    #[test]
    fn test_parse_tagged_json() {
        let json = r#"{
            "format_version": 1,
            "feature_names": ["age"],
            "preprocessor": [{"kind": "numeric", "column": "age", "mean": 30.0}],
            "classifier": {"kind": "prior", "classes": ["Eng"], "class_prior": [1.0]}
        }"#;
        let parsed: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.encoded_width(), 1);
        match &parsed.preprocessor[0] {
            ColumnTransform::Numeric { scale, fill, .. } => {
                assert_eq!(*scale, 1.0);
                assert_eq!(*fill, 0.0);
            }
            other => panic!("Expected numeric transform, got {:?}", other),
        }
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_validate_linear_shapes() {
        let ok = artifact(ClassifierSpec::Linear {
            classes: vec!["Eng".to_string(), "Sales".to_string(), "Ops".to_string()],
            coefficients: vec![vec![0.0; 3], vec![0.0; 3], vec![0.0; 3]],
            intercepts: vec![0.0; 3],
        });
        assert!(ok.validate().is_ok());

        let wrong_width = artifact(ClassifierSpec::Linear {
            classes: vec!["Eng".to_string(), "Sales".to_string()],
            coefficients: vec![vec![0.0; 2]],
            intercepts: vec![0.0],
        });
        assert!(matches!(
            wrong_width.validate(),
            Err(ModelLoadError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_version_and_columns() {
        let mut future = artifact(ClassifierSpec::Prior {
            classes: vec!["Eng".to_string()],
            class_prior: vec![1.0],
        });
        future.format_version = 2;
        assert!(matches!(
            future.validate(),
            Err(ModelLoadError::UnsupportedVersion(2))
        ));

        let mut stray = artifact(ClassifierSpec::Prior {
            classes: vec!["Eng".to_string()],
            class_prior: vec![1.0],
        });
        stray.feature_names = vec!["age".to_string()];
        assert!(stray.validate().is_err());
    }
}
