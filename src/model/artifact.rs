//! Serialized model artifact: a versioned forest of decision trees
//!
//! The artifact embeds the ordered feature-name list it was trained on, so
//! the positional contract between schema and model is checked at load time
//! instead of relying on coincidence.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Artifact format version this build understands
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// One node of a decision tree
///
/// `Split` sends values `<= threshold` left, others right. `Leaf` carries the
/// training class counts `[stay, resign]` and supports calibrated
/// probabilities; `Vote` carries only the majority class (0 = stay,
/// 1 = resign) and limits the forest to label-only output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal split node
    Split {
        /// Feature index, in schema order
        feature: usize,
        /// Split threshold; values `<= threshold` go left
        threshold: f64,
        /// Index of the left child
        left: usize,
        /// Index of the right child
        right: usize,
    },

    /// Leaf with training class counts `[stay, resign]`
    Leaf {
        /// Class counts observed at this leaf during training
        counts: [f64; 2],
    },

    /// Leaf carrying only a majority class (0 = stay, 1 = resign)
    Vote {
        /// Majority class index
        class: usize,
    },
}

/// One decision tree: a node array with the root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Tree nodes; child links always point forward in the array
    pub nodes: Vec<TreeNode>,
}

/// A serialized, versioned classifier artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact format version (must equal [`SUPPORTED_FORMAT_VERSION`])
    pub format_version: u32,

    /// Model version string, tied to the training run
    pub model_version: String,

    /// Ordered feature names the forest was fit on
    pub feature_names: Vec<String>,

    /// The forest
    pub trees: Vec<DecisionTree>,

    /// Per-feature importance scores, in `feature_names` order (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<Vec<f64>>,
}

impl ModelArtifact {
    /// Parse an artifact from its JSON representation
    ///
    /// # Errors
    ///
    /// [`PipelineError::ModelNotLoaded`] when the document is not valid JSON
    /// for this format or fails structural validation.
    pub fn from_json(text: &str) -> Result<Self, PipelineError> {
        let artifact: ModelArtifact = serde_json::from_str(text)
            .map_err(|e| PipelineError::ModelNotLoaded(format!("unparsable artifact: {}", e)))?;
        artifact.validate_structure()?;
        Ok(artifact)
    }

    /// Serialize the artifact to pretty JSON
    pub fn to_json(&self) -> Result<String, PipelineError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::InternalError(format!("artifact serialization: {}", e)))
    }

    /// Structural validation of the artifact
    ///
    /// Checks the format version, that the forest is non-empty, that feature
    /// and importance dimensions agree, and that every child link points
    /// forward in its node array (which rules out cycles, so traversal always
    /// terminates) at an in-bounds index.
    pub fn validate_structure(&self) -> Result<(), PipelineError> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(PipelineError::ModelNotLoaded(format!(
                "unsupported artifact format version {} (expected {})",
                self.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }

        if self.feature_names.is_empty() {
            return Err(PipelineError::ModelNotLoaded(
                "artifact declares no features".to_string(),
            ));
        }

        if self.trees.is_empty() {
            return Err(PipelineError::ModelNotLoaded(
                "artifact contains no trees".to_string(),
            ));
        }

        if let Some(importances) = &self.feature_importances {
            if importances.len() != self.feature_names.len() {
                return Err(PipelineError::ModelNotLoaded(format!(
                    "importance vector has {} entries for {} features",
                    importances.len(),
                    self.feature_names.len()
                )));
            }
        }

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(PipelineError::ModelNotLoaded(format!(
                    "tree {} is empty",
                    tree_idx
                )));
            }
            for (node_idx, node) in tree.nodes.iter().enumerate() {
                if let TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } = node
                {
                    if *feature >= self.feature_names.len() {
                        return Err(PipelineError::ModelNotLoaded(format!(
                            "tree {} node {} splits on feature {} of {}",
                            tree_idx,
                            node_idx,
                            feature,
                            self.feature_names.len()
                        )));
                    }
                    for &child in [left, right] {
                        if child <= node_idx || child >= tree.nodes.len() {
                            return Err(PipelineError::ModelNotLoaded(format!(
                                "tree {} node {} has invalid child link {}",
                                tree_idx, node_idx, child
                            )));
                        }
                    }
                }
                if let TreeNode::Leaf { counts } = node {
                    let total = counts[0] + counts[1];
                    if !total.is_finite() || counts[0] < 0.0 || counts[1] < 0.0 || total <= 0.0 {
                        return Err(PipelineError::ModelNotLoaded(format!(
                            "tree {} node {} has invalid class counts {:?}",
                            tree_idx, node_idx, counts
                        )));
                    }
                }
                if let TreeNode::Vote { class } = node {
                    if *class > 1 {
                        return Err(PipelineError::ModelNotLoaded(format!(
                            "tree {} node {} votes for class {} (binary model)",
                            tree_idx, node_idx, class
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Whether every leaf in every tree carries a class-count distribution
    ///
    /// Determined once at load; a forest with any vote-only leaf cannot
    /// produce calibrated probabilities.
    pub fn supports_probabilities(&self) -> bool {
        self.trees.iter().all(|tree| {
            tree.nodes
                .iter()
                .all(|node| !matches!(node, TreeNode::Vote { .. }))
        })
    }
}

impl DecisionTree {
    /// Walk the tree for one feature vector and return the reached leaf
    ///
    /// The caller (the inference engine) guarantees feature cardinality;
    /// structural validation at load guarantees termination and in-bounds
    /// links.
    pub fn leaf_for(&self, features: &[f64]) -> &TreeNode {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                leaf => return leaf,
            }
        }
    }
}
