//! # Attrition Engine
//!
//! A prediction pipeline for a pre-trained employee attrition classifier
//! ("stay" vs "resign"): schema validation, calibrated probability scoring,
//! decision interpretation, and batch scoring over uploaded tables.
//!
//! ## Features
//!
//! - **Feature schema**: the ordered 10-field contract the model was trained
//!   on, statically declared and checked against the artifact at load time
//! - **Record validation**: every violation reported at once, never just the
//!   first
//! - **Inference**: forest classification with calibrated probabilities and a
//!   configurable decision threshold
//! - **Interpretation**: deterministic decision categories with static
//!   recommendation bundles
//! - **Batch runner**: parallel per-row scoring with pass-through of extra
//!   columns, a summary, and cooperative cancellation
//!
//! ## Quick Start
//!
//! ```no_run
//! use attrition_engine::{predict_record, InferenceEngine, PipelineConfig};
//! use std::collections::HashMap;
//!
//! // Load the model artifact once at startup (fatal if missing or corrupt)
//! let engine = InferenceEngine::load("attrition_forest.json")?;
//!
//! let record: HashMap<String, f64> = [
//!     ("MaritalStatus_Single", 1.0),
//!     ("JobLevelSatisfaction", 2.0),
//!     ("MonthlyIncome", 3200.0),
//!     ("StockOptionLevel", 0.0),
//!     ("JobInvolvement", 2.0),
//!     ("EmployeeSatisfaction", 1.0),
//!     ("DailyRate", 400.0),
//!     ("DistanceFromHome", 25.0),
//!     ("Age", 26.0),
//!     ("EnvironmentSatisfaction", 2.0),
//! ]
//! .iter()
//! .map(|(k, v)| (k.to_string(), *v))
//! .collect();
//!
//! let prediction = predict_record(&engine, &record, &PipelineConfig::default())?;
//! println!("Label: {}", prediction.result.label.as_str());
//! # Ok::<(), attrition_engine::PipelineError>(())
//! ```
//!
//! ## Architecture
//!
//! The pipeline follows this flow:
//!
//! ```text
//! Raw Input → RecordValidator → InferenceEngine → OutcomeInterpreter → Output
//! ```
//!
//! Invalid input short-circuits before inference and surfaces every violation
//! found. The loaded model and schema are read-only, process-wide state; all
//! per-request types are created per call and carry no identity.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod config;
pub mod error;
pub mod interpret;
pub mod model;
pub mod result;
pub mod schema;

// Re-export main types
pub use batch::{run_batch, run_batch_with_cancel, BatchOutput, BatchSummary, CancelToken, Table};
pub use config::{PipelineConfig, RowPolicy};
pub use error::PipelineError;
pub use interpret::{interpret, DecisionCategory, RecommendationBundle, RecommendationItem};
pub use model::{InferenceEngine, ModelArtifact, ModelCapabilities};
pub use result::{ClassProbabilities, Label, PredictionResult};
pub use schema::validator::{validate_record, ValidatedRecord, Violation};
pub use schema::{FeatureSchema, FieldDescriptor, FieldDomain};

use std::collections::HashMap;

/// A fully interpreted single-record prediction
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPrediction {
    /// Label and (when supported) probabilities
    pub result: PredictionResult,

    /// Decision category derived from the label
    pub category: DecisionCategory,

    /// Guidance bundle for the category
    pub recommendations: &'static RecommendationBundle,
}

/// Run the full pipeline for one named record
///
/// Validates the record against the feature schema, classifies it, scores
/// probabilities where the model supports them, and attaches the decision
/// category and recommendation bundle.
///
/// # Arguments
///
/// * `engine` - The loaded inference engine
/// * `record` - Field name to value mapping (all 10 schema fields)
/// * `config` - Pipeline configuration (decision threshold)
///
/// # Errors
///
/// [`PipelineError::SchemaViolation`] enumerating every validation problem;
/// [`PipelineError::InternalError`] on engine contract violations.
///
/// # Example
///
/// ```no_run
/// use attrition_engine::{predict_record, InferenceEngine, PipelineConfig};
/// use std::collections::HashMap;
///
/// let engine = InferenceEngine::load("attrition_forest.json")?;
/// let record: HashMap<String, f64> = HashMap::new(); // your field values
/// match predict_record(&engine, &record, &PipelineConfig::default()) {
///     Ok(prediction) => println!("{}", prediction.result.label.as_str()),
///     Err(e) => eprintln!("{}", e),
/// }
/// # Ok::<(), attrition_engine::PipelineError>(())
/// ```
pub fn predict_record(
    engine: &InferenceEngine,
    record: &HashMap<String, f64>,
    config: &PipelineConfig,
) -> Result<RecordPrediction, PipelineError> {
    let validated = validate_record(engine.schema(), record)
        .map_err(PipelineError::SchemaViolation)?;
    let result = engine.predict(&validated, config.decision_threshold)?;
    let (category, recommendations) = interpret(&result);
    Ok(RecordPrediction {
        result,
        category,
        recommendations,
    })
}
