//! Prediction result types

use serde::{Deserialize, Serialize};

/// Predicted class label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Employee is expected to stay
    Stay,
    /// Employee is expected to resign
    Resign,
}

impl Label {
    /// Display name of the label
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Stay => "Stay",
            Label::Resign => "Resign",
        }
    }
}

/// Calibrated class probabilities, summing to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    /// Probability the employee stays (0.0-1.0)
    pub stay: f64,

    /// Probability the employee resigns (0.0-1.0)
    pub resign: f64,
}

/// Outcome of classifying one validated record
///
/// `probabilities` is `None` only when the loaded model cannot produce
/// calibrated probabilities; callers then degrade to label-only display
/// rather than receiving a fabricated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted label under the configured decision threshold
    pub label: Label,

    /// Class probabilities, when the model supports them
    pub probabilities: Option<ClassProbabilities>,
}
