//! Feature schema: the ordered, named input contract of the trained model
//!
//! The schema is a static declaration, never inferred from data. Its field
//! order is the positional contract the classifier was fit on; feeding a
//! tree-based model columns in the wrong order does not raise an error, it
//! silently mispredicts. The loaded artifact therefore embeds its own ordered
//! feature-name list, and [`crate::model::InferenceEngine::load`] rejects any
//! mismatch against this schema.

pub mod validator;

/// Value domain of a single feature
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDomain {
    /// Enumerated set of allowed integer values (categorical/ordinal fields)
    Values(&'static [i64]),

    /// Inclusive integer range
    IntRange {
        /// Minimum allowed value
        min: i64,
        /// Maximum allowed value
        max: i64,
    },

    /// Inclusive continuous range
    FloatRange {
        /// Minimum allowed value
        min: f64,
        /// Maximum allowed value
        max: f64,
    },
}

impl FieldDomain {
    /// Human-readable description of the domain (used in violation reasons)
    pub fn describe(&self) -> String {
        match self {
            FieldDomain::Values(values) => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("one of {{{}}}", rendered.join(", "))
            }
            FieldDomain::IntRange { min, max } => format!("an integer in [{}, {}]", min, max),
            FieldDomain::FloatRange { min, max } => format!("a number in [{}, {}]", min, max),
        }
    }

    /// Check a single numeric value against this domain
    ///
    /// Returns `Ok(())` on conformance, or a human-readable reason on failure.
    /// Integer domains additionally require the value to be a whole number.
    pub fn check(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("expected {}, got a non-finite value", self.describe()));
        }
        match self {
            FieldDomain::Values(values) => {
                if value.fract() != 0.0 {
                    return Err(format!("expected {}, got {}", self.describe(), value));
                }
                let v = value as i64;
                if values.contains(&v) {
                    Ok(())
                } else {
                    Err(format!("expected {}, got {}", self.describe(), v))
                }
            }
            FieldDomain::IntRange { min, max } => {
                if value.fract() != 0.0 {
                    return Err(format!("expected {}, got {}", self.describe(), value));
                }
                let v = value as i64;
                if v < *min || v > *max {
                    Err(format!("expected {}, got {}", self.describe(), v))
                } else {
                    Ok(())
                }
            }
            FieldDomain::FloatRange { min, max } => {
                if value < *min || value > *max {
                    Err(format!("expected {}, got {}", self.describe(), value))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Descriptor of one named feature in the schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Unique field name
    pub name: &'static str,

    /// Allowed value domain
    pub domain: FieldDomain,
}

/// Ordered set of field descriptors the trained model expects
///
/// Immutable for the lifetime of a loaded model. Schema and model artifact
/// are versioned together; see the module docs for why order matters.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    fields: Vec<FieldDescriptor>,
}

/// Ordinal satisfaction scale used by several survey-derived fields
const SCALE_1_TO_4: &[i64] = &[1, 2, 3, 4];

/// Binary 0/1 flag
const FLAG: &[i64] = &[0, 1];

/// Stock option levels
const STOCK_LEVELS: &[i64] = &[0, 1, 2, 3];

impl FeatureSchema {
    /// The top-10 attrition feature schema, in the exact order the
    /// classifier was trained on
    pub fn attrition_top10() -> Self {
        Self {
            fields: vec![
                FieldDescriptor {
                    name: "MaritalStatus_Single",
                    domain: FieldDomain::Values(FLAG),
                },
                FieldDescriptor {
                    name: "JobLevelSatisfaction",
                    domain: FieldDomain::Values(SCALE_1_TO_4),
                },
                FieldDescriptor {
                    name: "MonthlyIncome",
                    domain: FieldDomain::IntRange {
                        min: 1000,
                        max: 50000,
                    },
                },
                FieldDescriptor {
                    name: "StockOptionLevel",
                    domain: FieldDomain::Values(STOCK_LEVELS),
                },
                FieldDescriptor {
                    name: "JobInvolvement",
                    domain: FieldDomain::Values(SCALE_1_TO_4),
                },
                FieldDescriptor {
                    name: "EmployeeSatisfaction",
                    domain: FieldDomain::Values(SCALE_1_TO_4),
                },
                FieldDescriptor {
                    name: "DailyRate",
                    domain: FieldDomain::IntRange { min: 0, max: 1500 },
                },
                FieldDescriptor {
                    name: "DistanceFromHome",
                    domain: FieldDomain::IntRange { min: 0, max: 100 },
                },
                FieldDescriptor {
                    name: "Age",
                    domain: FieldDomain::IntRange { min: 18, max: 60 },
                },
                FieldDescriptor {
                    name: "EnvironmentSatisfaction",
                    domain: FieldDomain::Values(SCALE_1_TO_4),
                },
            ],
        }
    }

    /// Ordered field descriptors
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of fields in the schema
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields (never true for a real schema)
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Ordered field names
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Look up a descriptor by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a single value against a single field's domain
    ///
    /// # Returns
    ///
    /// `Ok(())` on conformance, or a human-readable violation reason.
    pub fn validate_value(&self, value: f64, field: &FieldDescriptor) -> Result<(), String> {
        field.domain.check(value)
    }
}
