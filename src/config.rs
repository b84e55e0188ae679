//! Configuration parameters for the prediction pipeline

/// Policy for rows that fail value-domain validation in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPolicy {
    /// Exclude failing rows from inference, annotate them with the violation
    /// reason, and score the rest (default)
    ExcludeRows,

    /// Reject the whole batch on any failing row, enumerating every failure
    RejectBatch,
}

/// Prediction pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Decision threshold on the resign probability (default: 0.5)
    ///
    /// A record is labelled `Resign` when its resign probability is at or
    /// above this value. Tuning it trades recall against precision without
    /// retraining; it never changes the probabilities themselves.
    pub decision_threshold: f64,

    /// Batch row-failure policy (default: `ExcludeRows`)
    pub row_policy: RowPolicy,

    /// How many features the diagnostic importance view returns (default: 10)
    pub top_importances: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            decision_threshold: 0.5,
            row_policy: RowPolicy::ExcludeRows,
            top_importances: 10,
        }
    }
}
