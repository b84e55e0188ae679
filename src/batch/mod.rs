//! Batch prediction over an uploaded table
//!
//! Orchestrates table-shape validation, per-row validation, inference, and
//! result assembly. Rows are independent, so inference runs in parallel while
//! the output preserves input order; re-running the same table against the
//! same loaded model yields byte-identical output.

pub mod table;

pub use table::Table;

use crate::config::{PipelineConfig, RowPolicy};
use crate::error::PipelineError;
use crate::model::InferenceEngine;
use crate::result::PredictionResult;
use crate::schema::validator::{validate_row, validate_table, Violation};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Appended column: predicted label
pub const PREDICTION_COLUMN: &str = "Prediction";
/// Appended column: resign probability as a percentage
pub const RESIGN_PROB_COLUMN: &str = "Resign Probability (%)";
/// Appended column: stay probability as a percentage
pub const STAY_PROB_COLUMN: &str = "Stay Probability (%)";
/// Appended column: why a row was not scored
pub const REASON_COLUMN: &str = "Validation Error";

/// Cooperative cancellation token for long-running batches
///
/// Cloned tokens share state. Rows not yet scored when the token fires are
/// annotated and counted as rejected; rows already computed are kept, so
/// cancellation yields a partial result rather than a hard abort.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, un-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Row counts of a completed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Rows in the input table
    pub total_rows: usize,
    /// Rows that were validated and scored
    pub scored_rows: usize,
    /// Rows excluded by validation or cancellation
    pub rejected_rows: usize,
}

/// Result of a batch run: the augmented table plus its summary
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Input columns (passed through untouched) plus the appended
    /// prediction, probability, and (where applicable) reason columns
    pub table: Table,
    /// Row counts
    pub summary: BatchSummary,
}

enum RowOutcome {
    Scored(PredictionResult),
    Invalid(Vec<Violation>),
    Cancelled,
}

/// Score every valid row of a table
///
/// Equivalent to [`run_batch_with_cancel`] with a token that never fires.
pub fn run_batch(
    engine: &InferenceEngine,
    input: &Table,
    config: &PipelineConfig,
) -> Result<BatchOutput, PipelineError> {
    run_batch_with_cancel(engine, input, config, &CancelToken::new())
}

/// Score every valid row of a table, honoring a cancellation token
///
/// Steps: validate the table shape (missing required columns is one fatal
/// violation listing every missing name, with zero rows scored); validate and
/// score the remaining rows in parallel; append the prediction columns.
/// Extra input columns pass through untouched.
///
/// Row failures follow `config.row_policy`:
/// - [`RowPolicy::ExcludeRows`] (default): failing rows keep their input
///   cells, get the reason column filled, and are excluded from inference;
///   every other row is still scored.
/// - [`RowPolicy::RejectBatch`]: any failing row rejects the whole batch with
///   a [`PipelineError::SchemaViolation`] attributing each violation to its
///   row.
///
/// Label-only models (no probability capability) leave the probability
/// columns empty.
///
/// # Errors
///
/// [`PipelineError::SchemaViolation`] for shape or (under `RejectBatch`) row
/// failures; [`PipelineError::InternalError`] propagated from the engine.
pub fn run_batch_with_cancel(
    engine: &InferenceEngine,
    input: &Table,
    config: &PipelineConfig,
    cancel: &CancelToken,
) -> Result<BatchOutput, PipelineError> {
    let schema = engine.schema();
    let plan = validate_table(schema, input)?;
    log::debug!(
        "Running batch of {} rows (policy {:?})",
        input.row_count(),
        config.row_policy
    );

    let outcomes: Vec<RowOutcome> = input
        .rows()
        .par_iter()
        .map(|row| {
            if cancel.is_cancelled() {
                return Ok(RowOutcome::Cancelled);
            }
            match validate_row(schema, &plan, row) {
                Ok(record) => engine
                    .predict(&record, config.decision_threshold)
                    .map(RowOutcome::Scored),
                Err(violations) => Ok(RowOutcome::Invalid(violations)),
            }
        })
        .collect::<Result<_, PipelineError>>()?;

    if config.row_policy == RowPolicy::RejectBatch {
        let mut failures = Vec::new();
        for (idx, outcome) in outcomes.iter().enumerate() {
            if let RowOutcome::Invalid(violations) = outcome {
                failures.extend(violations.iter().cloned().map(|v| Violation::InRow {
                    row: idx + 1,
                    violation: Box::new(v),
                }));
            }
        }
        if !failures.is_empty() {
            return Err(PipelineError::SchemaViolation(failures));
        }
    }

    let cancelled_any = outcomes
        .iter()
        .any(|o| matches!(o, RowOutcome::Cancelled));
    let with_reason_column = config.row_policy == RowPolicy::ExcludeRows || cancelled_any;

    let mut headers: Vec<String> = input.headers().to_vec();
    headers.push(PREDICTION_COLUMN.to_string());
    headers.push(RESIGN_PROB_COLUMN.to_string());
    headers.push(STAY_PROB_COLUMN.to_string());
    if with_reason_column {
        headers.push(REASON_COLUMN.to_string());
    }

    let mut rows = Vec::with_capacity(input.row_count());
    let mut scored_rows = 0usize;
    let mut rejected_rows = 0usize;

    for (idx, outcome) in outcomes.into_iter().enumerate() {
        let mut row: Vec<String> = input.row(idx).to_vec();
        match outcome {
            RowOutcome::Scored(result) => {
                scored_rows += 1;
                row.push(result.label.as_str().to_string());
                match result.probabilities {
                    Some(p) => {
                        row.push(format!("{:.2}", p.resign * 100.0));
                        row.push(format!("{:.2}", p.stay * 100.0));
                    }
                    None => {
                        row.push(String::new());
                        row.push(String::new());
                    }
                }
                if with_reason_column {
                    row.push(String::new());
                }
            }
            RowOutcome::Invalid(violations) => {
                rejected_rows += 1;
                let reason: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                row.push(String::new());
                row.push(String::new());
                row.push(String::new());
                row.push(reason.join("; "));
            }
            RowOutcome::Cancelled => {
                rejected_rows += 1;
                row.push(String::new());
                row.push(String::new());
                row.push(String::new());
                row.push("cancelled before scoring".to_string());
            }
        }
        rows.push(row);
    }

    let summary = BatchSummary {
        total_rows: input.row_count(),
        scored_rows,
        rejected_rows,
    };
    log::debug!(
        "Batch done: {} scored, {} rejected of {}",
        summary.scored_rows,
        summary.rejected_rows,
        summary.total_rows
    );

    let table = Table::new(headers, rows)?;
    Ok(BatchOutput { table, summary })
}
