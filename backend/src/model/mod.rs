//! Inference adapter
//!
//! Loads the pre-trained role classifier from disk and predicts a primary
//! role from user-entered feature values. Training happens elsewhere; this
//! module only consumes the exported artifact.

pub mod artifact;
pub mod error;
pub mod loader;
pub mod pipeline;

pub use artifact::{ClassifierSpec, ColumnTransform, ModelArtifact, SUPPORTED_FORMAT_VERSION};
pub use error::{ModelLoadError, PredictError};
pub use loader::{load_model, read_artifact, ModelAvailability, MODEL_UNAVAILABLE_MESSAGE};
pub use pipeline::{FeatureRow, Pipeline};
