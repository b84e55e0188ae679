//! Outcome interpretation: label to decision category and guidance
//!
//! A pure, total mapping with no state and no failure modes. Guidance
//! selection is categorical: it branches on the label alone, never on
//! probability magnitude.

use crate::result::{Label, PredictionResult};
use serde::{Deserialize, Serialize};

/// Decision category derived from the predicted label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionCategory {
    /// Employee predicted to stay: retention-strengthening guidance
    RetainGuidance,
    /// Employee predicted to resign: attrition-response guidance
    AttritionGuidance,
}

impl DecisionCategory {
    /// Display name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionCategory::RetainGuidance => "Retain",
            DecisionCategory::AttritionGuidance => "Attrition",
        }
    }
}

/// One guidance item: a short title and a body of advice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationItem {
    /// Short action title
    pub title: &'static str,
    /// Advice text
    pub body: &'static str,
}

/// Fixed, ordered guidance items associated with a decision category
///
/// Static configuration data, not derived at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationBundle {
    /// Guidance items, in presentation order
    pub items: &'static [RecommendationItem],
}

/// Guidance shown when an employee is predicted to stay
pub static RETAIN_GUIDANCE: RecommendationBundle = RecommendationBundle {
    items: &[
        RecommendationItem {
            title: "Optimize salary and benefits",
            body: "Review the compensation structure so it stays competitive \
                   and reflects the employee's contribution.",
        },
        RecommendationItem {
            title: "Focus on career development",
            body: "Offer growth opportunities such as training, certification, \
                   and mentoring that support a clear career path.",
        },
        RecommendationItem {
            title: "Improve work-life balance",
            body: "Re-evaluate flexible-hours policies and remote or hybrid \
                   work options.",
        },
        RecommendationItem {
            title: "Build long-term engagement",
            body: "Run regular employee satisfaction surveys and follow up on \
                   the results through open discussion and improvement programs.",
        },
    ],
};

/// Guidance shown when an employee is predicted to resign
pub static ATTRITION_GUIDANCE: RecommendationBundle = RecommendationBundle {
    items: &[
        RecommendationItem {
            title: "Conduct an exit interview",
            body: "Collect the reasons behind the resignation to gain honest, \
                   actionable insight.",
        },
        RecommendationItem {
            title: "Analyze turnover patterns",
            body: "Use historical data to identify trends such as units with \
                   high turnover or the average tenure before resignation.",
        },
        RecommendationItem {
            title: "Improve the work environment",
            body: "Act on exit-interview findings through changes to \
                   management, workload, or organizational culture.",
        },
        RecommendationItem {
            title: "Plan future retention strategy",
            body: "Build a data-driven retention program that targets \
                   high-potential employees with a high risk of leaving.",
        },
    ],
};

/// Map a prediction result to its decision category and guidance bundle
///
/// `Stay` maps to [`DecisionCategory::RetainGuidance`], `Resign` to
/// [`DecisionCategory::AttritionGuidance`]. Total over the result domain.
pub fn interpret(result: &PredictionResult) -> (DecisionCategory, &'static RecommendationBundle) {
    match result.label {
        Label::Stay => (DecisionCategory::RetainGuidance, &RETAIN_GUIDANCE),
        Label::Resign => (DecisionCategory::AttritionGuidance, &ATTRITION_GUIDANCE),
    }
}
