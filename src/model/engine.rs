//! Inference engine: the loaded classifier behind the pipeline
//!
//! Loaded once at startup and read-only afterwards. All inference methods
//! take `&self` and keep no per-call state, so one engine (typically behind
//! an `Arc`) serves any number of concurrent callers.

use super::artifact::{ModelArtifact, TreeNode};
use crate::error::PipelineError;
use crate::result::{ClassProbabilities, Label, PredictionResult};
use crate::schema::validator::ValidatedRecord;
use crate::schema::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Capability flags of a loaded model, determined once at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    /// Model can produce calibrated class probabilities
    pub has_probabilities: bool,

    /// Model ships per-feature importance scores
    pub has_importances: bool,
}

/// The loaded classifier plus its feature schema
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    schema: FeatureSchema,
    artifact: ModelArtifact,
    capabilities: ModelCapabilities,
}

impl InferenceEngine {
    /// Load the model artifact from a file path
    ///
    /// One-time startup acquisition: a missing, unreadable, or corrupt
    /// artifact is fatal and the process must not serve predictions.
    ///
    /// # Errors
    ///
    /// [`PipelineError::ModelNotLoaded`] on I/O failure, an unparsable or
    /// structurally invalid artifact, or a feature-schema mismatch.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        log::debug!("Loading model artifact from {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| {
            PipelineError::ModelNotLoaded(format!("cannot read {}: {}", path.display(), e))
        })?;
        let artifact = ModelArtifact::from_json(&text)?;
        Self::from_artifact(artifact)
    }

    /// Build an engine from an already-parsed artifact
    ///
    /// Validates the artifact structure and checks that its embedded
    /// feature-name list matches the attrition schema exactly, names and
    /// order both. A tree model fed columns in the wrong order mispredicts
    /// silently, so the mismatch is refused here rather than discovered in
    /// production output.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, PipelineError> {
        artifact.validate_structure()?;

        let schema = FeatureSchema::attrition_top10();
        let expected = schema.field_names();
        if artifact.feature_names != expected {
            return Err(PipelineError::ModelNotLoaded(format!(
                "artifact feature order {:?} does not match schema {:?}",
                artifact.feature_names, expected
            )));
        }

        let capabilities = ModelCapabilities {
            has_probabilities: artifact.supports_probabilities(),
            has_importances: artifact.feature_importances.is_some(),
        };
        if !capabilities.has_probabilities {
            log::warn!(
                "Model {} has vote-only leaves; probability output unavailable",
                artifact.model_version
            );
        }
        if !capabilities.has_importances {
            log::warn!(
                "Model {} ships no feature importances; diagnostic view unavailable",
                artifact.model_version
            );
        }

        log::debug!(
            "Loaded model {} ({} trees, probabilities={}, importances={})",
            artifact.model_version,
            artifact.trees.len(),
            capabilities.has_probabilities,
            capabilities.has_importances
        );

        Ok(Self {
            schema,
            artifact,
            capabilities,
        })
    }

    /// The feature schema this engine validates against
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Version string of the loaded model
    pub fn model_version(&self) -> &str {
        &self.artifact.model_version
    }

    /// Capability flags, fixed at load time
    pub fn capabilities(&self) -> ModelCapabilities {
        self.capabilities
    }

    /// Cardinality fail-fast: a wrong-length feature vector is a caller
    /// contract violation, never silently padded or truncated.
    fn features_checked<'a>(&self, record: &'a ValidatedRecord) -> Result<&'a [f64], PipelineError> {
        let features = record.features();
        if features.len() != self.schema.len() {
            return Err(PipelineError::InternalError(format!(
                "feature cardinality mismatch: got {}, model expects {}",
                features.len(),
                self.schema.len()
            )));
        }
        Ok(features)
    }

    /// Calibrated class probabilities for one validated record
    ///
    /// Per-tree leaf class distributions are normalized and averaged across
    /// the forest; the two returned floats sum to 1.0.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnsupportedCapability`] when the model is vote-only —
    /// a probability is never fabricated.
    pub fn score_probabilities(
        &self,
        record: &ValidatedRecord,
    ) -> Result<ClassProbabilities, PipelineError> {
        if !self.capabilities.has_probabilities {
            return Err(PipelineError::UnsupportedCapability(
                "model does not support probability output".to_string(),
            ));
        }
        let features = self.features_checked(record)?;

        let mut resign_sum = 0.0;
        for tree in &self.artifact.trees {
            match tree.leaf_for(features) {
                TreeNode::Leaf { counts } => {
                    let total = counts[0] + counts[1];
                    resign_sum += counts[1] / total;
                }
                // supports_probabilities() == true rules these out
                _ => {
                    return Err(PipelineError::InternalError(
                        "vote leaf reached in probability-capable forest".to_string(),
                    ))
                }
            }
        }

        let resign = resign_sum / self.artifact.trees.len() as f64;
        Ok(ClassProbabilities {
            stay: 1.0 - resign,
            resign,
        })
    }

    /// Classify one validated record
    ///
    /// With probability support, the label is `Resign` iff the resign
    /// probability is at or above `threshold`. Vote-only models fall back to
    /// per-tree majority voting, with ties resolved to `Resign`.
    pub fn classify(
        &self,
        record: &ValidatedRecord,
        threshold: f64,
    ) -> Result<Label, PipelineError> {
        if self.capabilities.has_probabilities {
            let probabilities = self.score_probabilities(record)?;
            return Ok(if probabilities.resign >= threshold {
                Label::Resign
            } else {
                Label::Stay
            });
        }

        let features = self.features_checked(record)?;
        let mut resign_votes = 0usize;
        for tree in &self.artifact.trees {
            let resign = match tree.leaf_for(features) {
                TreeNode::Leaf { counts } => counts[1] >= counts[0],
                TreeNode::Vote { class } => *class == 1,
                TreeNode::Split { .. } => {
                    return Err(PipelineError::InternalError(
                        "tree traversal stopped at a split node".to_string(),
                    ))
                }
            };
            if resign {
                resign_votes += 1;
            }
        }
        Ok(if resign_votes * 2 >= self.artifact.trees.len() {
            Label::Resign
        } else {
            Label::Stay
        })
    }

    /// Classify and score one validated record in a single call
    ///
    /// The degraded, label-only path is taken when the model lacks
    /// probability support; any other scoring failure propagates.
    pub fn predict(
        &self,
        record: &ValidatedRecord,
        threshold: f64,
    ) -> Result<PredictionResult, PipelineError> {
        let probabilities = match self.score_probabilities(record) {
            Ok(p) => Some(p),
            Err(PipelineError::UnsupportedCapability(_)) => {
                log::warn!("Degrading to label-only output");
                None
            }
            Err(e) => return Err(e),
        };
        let label = self.classify(record, threshold)?;
        Ok(PredictionResult {
            label,
            probabilities,
        })
    }

    /// Top-N feature importances as a descending `(name, score)` list
    ///
    /// Diagnostic display only; not part of the prediction contract.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnsupportedCapability`] when the artifact ships no
    /// importance vector.
    pub fn feature_importances(
        &self,
        top_n: usize,
    ) -> Result<Vec<(String, f64)>, PipelineError> {
        let importances = self.artifact.feature_importances.as_ref().ok_or_else(|| {
            PipelineError::UnsupportedCapability(
                "model does not expose feature importances".to_string(),
            )
        })?;

        let mut ranked: Vec<(String, f64)> = self
            .artifact
            .feature_names
            .iter()
            .cloned()
            .zip(importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_n);
        Ok(ranked)
    }
}
