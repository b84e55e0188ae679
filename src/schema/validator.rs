//! Record and table validation against the feature schema
//!
//! Validation outcomes are ordinary result values, not faults: a failed
//! validation returns the complete list of violations found, never just the
//! first. Only genuinely unexpected conditions (corrupt artifacts, contract
//! violations) use [`crate::error::PipelineError`].

use super::{FeatureSchema, FieldDescriptor};
use crate::batch::table::Table;
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single schema violation found while validating input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Violation {
    /// A required field is absent
    MissingField {
        /// Name of the absent field
        field: String,
    },

    /// A field not in the schema was supplied (strict single-record mode)
    UnexpectedField {
        /// Name of the unrecognized field
        field: String,
    },

    /// A cell could not be parsed as a number
    NotANumber {
        /// Field the cell belongs to
        field: String,
        /// Raw cell content
        value: String,
    },

    /// A value falls outside its field's declared domain
    OutOfDomain {
        /// Field the value belongs to
        field: String,
        /// Human-readable reason from the domain check
        reason: String,
    },

    /// A violation attributed to a specific batch row (1-based)
    InRow {
        /// Row number in the source table, 1-based
        row: usize,
        /// The underlying violation
        violation: Box<Violation>,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingField { field } => write!(f, "missing required field '{}'", field),
            Violation::UnexpectedField { field } => {
                write!(f, "unrecognized field '{}'", field)
            }
            Violation::NotANumber { field, value } => {
                write!(f, "field '{}': '{}' is not a number", field, value)
            }
            Violation::OutOfDomain { field, reason } => {
                write!(f, "field '{}': {}", field, reason)
            }
            Violation::InRow { row, violation } => {
                write!(f, "row {}: {}", row, violation)
            }
        }
    }
}

/// A record whose values have passed validation, held in exact schema order
///
/// This is the only input type the inference engine accepts: constructing one
/// through the validator is what guarantees the positional contract the model
/// was trained on.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    features: Vec<f64>,
}

impl ValidatedRecord {
    /// Feature values in schema order
    pub fn features(&self) -> &[f64] {
        &self.features
    }
}

/// Validate a single named record against the schema
///
/// Checks field presence (all fields required), rejects unrecognized fields,
/// and checks every value against its field's domain. All violations found
/// are returned together.
///
/// # Arguments
///
/// * `schema` - The feature schema to validate against
/// * `record` - Field name to value mapping
///
/// # Returns
///
/// A [`ValidatedRecord`] with features in schema order, or the full list of
/// violations.
pub fn validate_record(
    schema: &FeatureSchema,
    record: &HashMap<String, f64>,
) -> Result<ValidatedRecord, Vec<Violation>> {
    log::debug!("Validating record with {} supplied fields", record.len());

    let mut violations = Vec::new();
    let mut features = Vec::with_capacity(schema.len());

    for field in schema.fields() {
        match record.get(field.name) {
            Some(&value) => {
                if let Err(reason) = schema.validate_value(value, field) {
                    violations.push(Violation::OutOfDomain {
                        field: field.name.to_string(),
                        reason,
                    });
                } else {
                    features.push(value);
                }
            }
            None => violations.push(Violation::MissingField {
                field: field.name.to_string(),
            }),
        }
    }

    // Strict mode: extra fields are violations, not silently dropped.
    let mut unexpected: Vec<&String> = record
        .keys()
        .filter(|name| schema.field(name).is_none())
        .collect();
    unexpected.sort();
    for name in unexpected {
        violations.push(Violation::UnexpectedField {
            field: name.clone(),
        });
    }

    if violations.is_empty() {
        Ok(ValidatedRecord { features })
    } else {
        Err(violations)
    }
}

/// Column lookup plan for a validated table
///
/// Maps schema order to column indices in the source table. Extra columns are
/// tolerated and left for the caller to pass through untouched.
#[derive(Debug, Clone)]
pub struct TablePlan {
    /// For each schema field (in schema order), the table column index
    pub column_indices: Vec<usize>,
}

/// Validate a table's shape against the schema
///
/// Every required column name must be present. Missing columns are a single
/// fatal violation listing every missing name; extraneous columns are
/// tolerated and ignored downstream.
///
/// # Errors
///
/// [`PipelineError::SchemaViolation`] listing each missing column.
pub fn validate_table(schema: &FeatureSchema, table: &Table) -> Result<TablePlan, PipelineError> {
    log::debug!(
        "Validating table shape: {} columns, {} rows",
        table.headers().len(),
        table.row_count()
    );

    let mut column_indices = Vec::with_capacity(schema.len());
    let mut missing = Vec::new();

    for field in schema.fields() {
        match table.column_index(field.name) {
            Some(idx) => column_indices.push(idx),
            None => missing.push(Violation::MissingField {
                field: field.name.to_string(),
            }),
        }
    }

    if missing.is_empty() {
        Ok(TablePlan { column_indices })
    } else {
        Err(PipelineError::SchemaViolation(missing))
    }
}

/// Validate one table row through a [`TablePlan`]
///
/// Parses each required cell and checks it against its field's domain. All
/// violations in the row are returned together.
pub fn validate_row(
    schema: &FeatureSchema,
    plan: &TablePlan,
    row: &[String],
) -> Result<ValidatedRecord, Vec<Violation>> {
    let mut violations = Vec::new();
    let mut features = Vec::with_capacity(schema.len());

    for (field, &col_idx) in schema.fields().iter().zip(&plan.column_indices) {
        match parse_cell(field, &row[col_idx]) {
            Ok(value) => {
                if let Err(reason) = schema.validate_value(value, field) {
                    violations.push(Violation::OutOfDomain {
                        field: field.name.to_string(),
                        reason,
                    });
                } else {
                    features.push(value);
                }
            }
            Err(v) => violations.push(v),
        }
    }

    if violations.is_empty() {
        Ok(ValidatedRecord { features })
    } else {
        Err(violations)
    }
}

fn parse_cell(field: &FieldDescriptor, cell: &str) -> Result<f64, Violation> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Err(Violation::MissingField {
            field: field.name.to_string(),
        });
    }
    trimmed.parse::<f64>().map_err(|_| Violation::NotANumber {
        field: field.name.to_string(),
        value: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> HashMap<String, f64> {
        let pairs = [
            ("MaritalStatus_Single", 1.0),
            ("JobLevelSatisfaction", 3.0),
            ("MonthlyIncome", 5000.0),
            ("StockOptionLevel", 1.0),
            ("JobInvolvement", 3.0),
            ("EmployeeSatisfaction", 3.0),
            ("DailyRate", 800.0),
            ("DistanceFromHome", 10.0),
            ("Age", 30.0),
            ("EnvironmentSatisfaction", 3.0),
        ];
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_valid_record_preserves_schema_order() {
        let schema = FeatureSchema::attrition_top10();
        let validated = validate_record(&schema, &full_record()).unwrap();
        assert_eq!(
            validated.features(),
            &[1.0, 3.0, 5000.0, 1.0, 3.0, 3.0, 800.0, 10.0, 30.0, 3.0]
        );
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let schema = FeatureSchema::attrition_top10();
        let mut record = full_record();
        record.remove("Age");
        record.remove("DailyRate");

        let violations = validate_record(&schema, &record).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert!(violations.contains(&Violation::MissingField {
            field: "Age".to_string()
        }));
        assert!(violations.contains(&Violation::MissingField {
            field: "DailyRate".to_string()
        }));
    }

    #[test]
    fn test_unexpected_field_rejected() {
        let schema = FeatureSchema::attrition_top10();
        let mut record = full_record();
        record.insert("EmployeeId".to_string(), 42.0);

        let violations = validate_record(&schema, &record).unwrap_err();
        assert_eq!(
            violations,
            vec![Violation::UnexpectedField {
                field: "EmployeeId".to_string()
            }]
        );
    }

    #[test]
    fn test_out_of_domain_and_missing_reported_together() {
        let schema = FeatureSchema::attrition_top10();
        let mut record = full_record();
        record.insert("Age".to_string(), 200.0);
        record.remove("MonthlyIncome");

        let violations = validate_record(&schema, &record).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().any(|v| matches!(
            v,
            Violation::OutOfDomain { field, .. } if field == "Age"
        )));
        assert!(violations.iter().any(|v| matches!(
            v,
            Violation::MissingField { field } if field == "MonthlyIncome"
        )));
    }

    #[test]
    fn test_validate_table_missing_columns_one_fatal_error() {
        let schema = FeatureSchema::attrition_top10();
        let table = Table::parse_delimited("Age,DailyRate\n30,800\n", ',').unwrap();

        let err = validate_table(&schema, &table).unwrap_err();
        match err {
            PipelineError::SchemaViolation(missing) => {
                assert_eq!(missing.len(), 8);
                assert!(missing.iter().all(|v| matches!(v, Violation::MissingField { .. })));
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_table_extra_columns_tolerated() {
        let schema = FeatureSchema::attrition_top10();
        let header = "EmployeeId,MaritalStatus_Single,JobLevelSatisfaction,MonthlyIncome,\
                      StockOptionLevel,JobInvolvement,EmployeeSatisfaction,DailyRate,\
                      DistanceFromHome,Age,EnvironmentSatisfaction";
        let text = format!("{}\n7,1,3,5000,1,3,3,800,10,30,3\n", header);
        let table = Table::parse_delimited(&text, ',').unwrap();

        let plan = validate_table(&schema, &table).unwrap();
        // EmployeeId occupies column 0; schema columns start at 1.
        assert_eq!(plan.column_indices[0], 1);

        let validated = validate_row(&schema, &plan, table.row(0)).unwrap();
        assert_eq!(validated.features()[2], 5000.0);
    }

    #[test]
    fn test_validate_row_unparsable_cell() {
        let schema = FeatureSchema::attrition_top10();
        let header = schema.field_names().join(",");
        let text = format!("{}\n1,3,lots,1,3,3,800,10,30,3\n", header);
        let table = Table::parse_delimited(&text, ',').unwrap();
        let plan = validate_table(&schema, &table).unwrap();

        let violations = validate_row(&schema, &plan, table.row(0)).unwrap_err();
        assert_eq!(
            violations,
            vec![Violation::NotANumber {
                field: "MonthlyIncome".to_string(),
                value: "lots".to_string()
            }]
        );
    }
}
