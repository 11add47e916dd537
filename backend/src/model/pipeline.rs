//! Preprocessor + classifier inference

use crate::model::artifact::{ClassifierSpec, ColumnTransform, ModelArtifact};
use crate::model::error::PredictError;
use ndarray::{Array1, Array2};
use std::collections::{HashMap, HashSet};

/// One input row: column name -> raw text as entered by the user
pub type FeatureRow = HashMap<String, String>;

enum Classifier {
    /// Scores: f(x) = W·x + b
    Linear {
        classes: Vec<String>,
        weights: Array2<f64>,
        intercepts: Array1<f64>,
    },
    Prior {
        classes: Vec<String>,
        class_prior: Vec<f64>,
    },
}

/// Loaded, immutable prediction pipeline
pub struct Pipeline {
    feature_names: Vec<String>,
    transforms: Vec<ColumnTransform>,
    width: usize,
    classifier: Classifier,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("feature_names", &self.feature_names)
            .field("classes", &self.classes())
            .field("width", &self.width)
            .finish()
    }
}

impl Pipeline {
    /// Build a pipeline from a validated artifact
    pub(crate) fn from_artifact(artifact: ModelArtifact) -> Self {
        let width = artifact.encoded_width();
        let classifier = match artifact.classifier {
            ClassifierSpec::Linear {
                classes,
                coefficients,
                intercepts,
            } => {
                let rows = coefficients.len();
                let flat: Vec<f64> = coefficients.into_iter().flatten().collect();
                let weights = Array2::from_shape_vec((rows, width), flat)
                    .unwrap_or_else(|_| Array2::zeros((rows, width)));
                Classifier::Linear {
                    classes,
                    weights,
                    intercepts: Array1::from_vec(intercepts),
                }
            }
            ClassifierSpec::Prior {
                classes,
                class_prior,
            } => Classifier::Prior {
                classes,
                class_prior,
            },
        };

        Self {
            feature_names: artifact.feature_names,
            transforms: artifact.preprocessor,
            width,
            classifier,
        }
    }

    /// Columns the model expects as input
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Labels the model can predict
    pub fn classes(&self) -> &[String] {
        match &self.classifier {
            Classifier::Linear { classes, .. } | Classifier::Prior { classes, .. } => classes,
        }
    }

    /// Require `columns` to be exactly the model's feature set
    pub fn check_schema<'a, I>(&self, columns: I) -> Result<(), PredictError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let given: HashSet<&str> = columns.into_iter().collect();
        let expected: HashSet<&str> = self.feature_names.iter().map(String::as_str).collect();

        let missing: Vec<String> = self
            .feature_names
            .iter()
            .filter(|f| !given.contains(f.as_str()))
            .cloned()
            .collect();
        let mut unexpected: Vec<String> = given
            .difference(&expected)
            .map(|c| c.to_string())
            .collect();
        unexpected.sort();

        if missing.is_empty() && unexpected.is_empty() {
            Ok(())
        } else {
            Err(PredictError::SchemaMismatch {
                missing,
                unexpected,
            })
        }
    }

    /// Predict one label per row
    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<String>, PredictError> {
        if rows.is_empty() {
            return Err(PredictError::EmptyInput);
        }
        rows.iter()
            .map(|row| {
                let probabilities = self.predict_proba(row)?;
                Ok(argmax_label(&probabilities))
            })
            .collect()
    }

    /// Class probabilities for one row, in model class order
    pub fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<(String, f64)>, PredictError> {
        self.check_schema(row.keys().map(String::as_str))?;
        let x = self.encode(row);

        let probabilities = match &self.classifier {
            Classifier::Linear {
                classes,
                weights,
                intercepts,
            } => {
                let scores = weights.dot(&x) + intercepts;
                let probs = if scores.len() == 1 {
                    let p = sigmoid(scores[0]);
                    vec![1.0 - p, p]
                } else {
                    softmax(scores.as_slice().unwrap_or(&[]))
                };
                classes.iter().cloned().zip(probs).collect()
            }
            Classifier::Prior {
                classes,
                class_prior,
            } => {
                let total: f64 = class_prior.iter().sum();
                classes
                    .iter()
                    .cloned()
                    .zip(class_prior.iter().map(|p| {
                        if total > 0.0 {
                            p / total
                        } else {
                            1.0 / class_prior.len() as f64
                        }
                    }))
                    .collect()
            }
        };
        Ok(probabilities)
    }

    /// Apply the preprocessor to one row
    fn encode(&self, row: &FeatureRow) -> Array1<f64> {
        let mut x = Vec::with_capacity(self.width);
        for transform in &self.transforms {
            let raw = row
                .get(transform.column())
                .map(|v| v.trim())
                .unwrap_or("");
            match transform {
                ColumnTransform::Numeric {
                    fill, mean, scale, ..
                } => {
                    let value = parse_finite(raw).unwrap_or(*fill);
                    let scale = if *scale == 0.0 { 1.0 } else { *scale };
                    x.push((value - mean) / scale);
                }
                ColumnTransform::Passthrough { fill, .. } => {
                    x.push(parse_finite(raw).unwrap_or(*fill));
                }
                ColumnTransform::Categorical { categories, .. } => {
                    x.extend(categories.iter().map(|c| if c == raw { 1.0 } else { 0.0 }));
                }
            }
        }
        Array1::from_vec(x)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Highest-probability label; the first class wins ties
fn argmax_label(probabilities: &[(String, f64)]) -> String {
    let mut best: Option<&(String, f64)> = None;
    for entry in probabilities {
        if best.map_or(true, |b| entry.1 > b.1) {
            best = Some(entry);
        }
    }
    best.map(|(label, _)| label.clone()).unwrap_or_default()
}

/// Numeric cell value; "NaN" and "inf" count as missing
fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
