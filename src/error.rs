//! Error types for the attrition prediction pipeline

use crate::schema::validator::Violation;
use std::fmt;

/// Errors that can occur in the prediction pipeline
///
/// Validation outcomes that enumerate per-field problems travel as ordinary
/// `Result<_, Vec<Violation>>` values inside the pipeline; `SchemaViolation`
/// is how they surface at the pipeline boundary, carrying the full list so the
/// rendered message names every problem at once.
#[derive(Debug, Clone)]
pub enum PipelineError {
    /// Input does not conform to the feature schema (all violations listed)
    SchemaViolation(Vec<Violation>),

    /// Model artifact missing, unreadable, or corrupt at startup (fatal)
    ModelNotLoaded(String),

    /// Loaded model lacks a requested capability (probabilities, importances)
    UnsupportedCapability(String),

    /// Batch upload could not be parsed as tabular data
    MalformedInputFile(String),

    /// Caller contract violation (e.g. feature cardinality mismatch)
    InternalError(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::SchemaViolation(violations) => {
                write!(f, "Schema violation ({} problem(s)):", violations.len())?;
                for v in violations {
                    write!(f, "\n  - {}", v)?;
                }
                Ok(())
            }
            PipelineError::ModelNotLoaded(msg) => write!(f, "Model not loaded: {}", msg),
            PipelineError::UnsupportedCapability(msg) => {
                write!(f, "Unsupported capability: {}", msg)
            }
            PipelineError::MalformedInputFile(msg) => {
                write!(f, "Malformed input file: {}", msg)
            }
            PipelineError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_violation_lists_every_problem() {
        let err = PipelineError::SchemaViolation(vec![
            Violation::MissingField {
                field: "Age".to_string(),
            },
            Violation::MissingField {
                field: "MonthlyIncome".to_string(),
            },
        ]);
        let rendered = err.to_string();
        assert!(rendered.contains("2 problem(s)"));
        assert!(rendered.contains("Age"));
        assert!(rendered.contains("MonthlyIncome"));
    }
}
