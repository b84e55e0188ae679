//! Model artifact loading and inference
//!
//! The classifier is consumed as an opaque, already-trained capability: a
//! versioned JSON artifact describing a forest of decision trees. Loading
//! happens once at process start; the loaded engine is read-only and safe for
//! concurrent callers.

pub mod artifact;
pub mod engine;

pub use artifact::{DecisionTree, ModelArtifact, TreeNode};
pub use engine::{InferenceEngine, ModelCapabilities};
