//! Integration tests for the attrition prediction pipeline

use attrition_engine::{
    predict_record, run_batch, run_batch_with_cancel, validate_record, CancelToken,
    DecisionCategory, FeatureSchema, InferenceEngine, Label, PipelineConfig, PipelineError,
    RowPolicy, Table, Violation,
};
use std::collections::HashMap;
use std::path::PathBuf;

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn load_engine() -> InferenceEngine {
    InferenceEngine::load(fixture_path("attrition_forest.json"))
        .expect("fixture forest should load")
}

fn record(values: [(&str, f64); 10]) -> HashMap<String, f64> {
    values
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

/// Low satisfaction, low income, young, far commute
fn likely_resign_record() -> HashMap<String, f64> {
    record([
        ("MaritalStatus_Single", 1.0),
        ("JobLevelSatisfaction", 1.0),
        ("MonthlyIncome", 1200.0),
        ("StockOptionLevel", 0.0),
        ("JobInvolvement", 1.0),
        ("EmployeeSatisfaction", 1.0),
        ("DailyRate", 200.0),
        ("DistanceFromHome", 40.0),
        ("Age", 22.0),
        ("EnvironmentSatisfaction", 1.0),
    ])
}

/// High satisfaction and compensation, short commute
fn likely_stay_record() -> HashMap<String, f64> {
    record([
        ("MaritalStatus_Single", 0.0),
        ("JobLevelSatisfaction", 4.0),
        ("MonthlyIncome", 15000.0),
        ("StockOptionLevel", 3.0),
        ("JobInvolvement", 4.0),
        ("EmployeeSatisfaction", 4.0),
        ("DailyRate", 1200.0),
        ("DistanceFromHome", 2.0),
        ("Age", 45.0),
        ("EnvironmentSatisfaction", 4.0),
    ])
}

fn schema_header() -> String {
    FeatureSchema::attrition_top10().field_names().join(",")
}

#[test]
fn test_fixture_model_loads_with_full_capabilities() {
    let engine = load_engine();
    assert_eq!(engine.model_version(), "rf-top10-fixture-1");
    assert!(engine.capabilities().has_probabilities);
    assert!(engine.capabilities().has_importances);
}

#[test]
fn test_missing_artifact_is_fatal() {
    let err = InferenceEngine::load(fixture_path("no_such_model.json")).unwrap_err();
    assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
}

#[test]
fn test_low_satisfaction_far_commute_predicts_resign() {
    let engine = load_engine();
    let prediction =
        predict_record(&engine, &likely_resign_record(), &PipelineConfig::default()).unwrap();

    assert_eq!(prediction.result.label, Label::Resign);
    let p = prediction.result.probabilities.unwrap();
    assert!(p.resign > 0.5, "expected resign probability > 0.5, got {}", p.resign);
    assert!((p.resign + p.stay - 1.0).abs() < 1e-6);

    assert_eq!(prediction.category, DecisionCategory::AttritionGuidance);
    assert_eq!(prediction.recommendations.items.len(), 4);
    assert!(prediction.recommendations.items[0]
        .title
        .contains("exit interview"));
}

#[test]
fn test_high_satisfaction_short_commute_predicts_stay() {
    let engine = load_engine();
    let prediction =
        predict_record(&engine, &likely_stay_record(), &PipelineConfig::default()).unwrap();

    assert_eq!(prediction.result.label, Label::Stay);
    let p = prediction.result.probabilities.unwrap();
    assert!(p.resign < 0.5, "expected resign probability < 0.5, got {}", p.resign);
    assert_eq!(prediction.category, DecisionCategory::RetainGuidance);
}

#[test]
fn test_probabilities_valid_across_record_grid() {
    let engine = load_engine();
    let schema = FeatureSchema::attrition_top10();
    let config = PipelineConfig::default();

    // A spread of valid records across the domain corners.
    let candidates = [
        likely_resign_record(),
        likely_stay_record(),
        record([
            ("MaritalStatus_Single", 1.0),
            ("JobLevelSatisfaction", 4.0),
            ("MonthlyIncome", 50000.0),
            ("StockOptionLevel", 0.0),
            ("JobInvolvement", 4.0),
            ("EmployeeSatisfaction", 1.0),
            ("DailyRate", 1500.0),
            ("DistanceFromHome", 0.0),
            ("Age", 60.0),
            ("EnvironmentSatisfaction", 4.0),
        ]),
        record([
            ("MaritalStatus_Single", 0.0),
            ("JobLevelSatisfaction", 1.0),
            ("MonthlyIncome", 1000.0),
            ("StockOptionLevel", 3.0),
            ("JobInvolvement", 1.0),
            ("EmployeeSatisfaction", 4.0),
            ("DailyRate", 0.0),
            ("DistanceFromHome", 100.0),
            ("Age", 18.0),
            ("EnvironmentSatisfaction", 1.0),
        ]),
    ];

    for candidate in &candidates {
        let validated = validate_record(&schema, candidate).unwrap();
        let p = engine.score_probabilities(&validated).unwrap();
        assert!((0.0..=1.0).contains(&p.resign));
        assert!((0.0..=1.0).contains(&p.stay));
        assert!((p.resign + p.stay - 1.0).abs() < 1e-6);

        // Label boundary follows the threshold exactly.
        let label = engine
            .classify(&validated, config.decision_threshold)
            .unwrap();
        assert_eq!(label == Label::Resign, p.resign >= config.decision_threshold);
    }
}

#[test]
fn test_threshold_changes_label_not_probabilities() {
    let engine = load_engine();
    let schema = FeatureSchema::attrition_top10();
    let validated = validate_record(&schema, &likely_resign_record()).unwrap();

    let p_before = engine.score_probabilities(&validated).unwrap();
    assert_eq!(engine.classify(&validated, 0.5).unwrap(), Label::Resign);
    assert_eq!(engine.classify(&validated, 0.95).unwrap(), Label::Stay);
    assert_eq!(engine.score_probabilities(&validated).unwrap(), p_before);
}

#[test]
fn test_missing_fields_listed_exactly() {
    let engine = load_engine();
    let mut partial = likely_stay_record();
    partial.remove("MonthlyIncome");
    partial.remove("EnvironmentSatisfaction");

    let err = predict_record(&engine, &partial, &PipelineConfig::default()).unwrap_err();
    match err {
        PipelineError::SchemaViolation(violations) => {
            assert_eq!(violations.len(), 2);
            assert!(violations.contains(&Violation::MissingField {
                field: "MonthlyIncome".to_string()
            }));
            assert!(violations.contains(&Violation::MissingField {
                field: "EnvironmentSatisfaction".to_string()
            }));
        }
        other => panic!("expected SchemaViolation, got {:?}", other),
    }
}

#[test]
fn test_feature_importances_descending() {
    let engine = load_engine();
    let top = engine.feature_importances(10).unwrap();
    assert_eq!(top.len(), 10);
    assert_eq!(top[0].0, "EmployeeSatisfaction");
    assert_eq!(top[1].0, "MonthlyIncome");
    for window in top.windows(2) {
        assert!(window[0].1 >= window[1].1);
    }
}

#[test]
fn test_batch_missing_column_names_it_and_scores_nothing() {
    let engine = load_engine();
    let names: Vec<&str> = FeatureSchema::attrition_top10()
        .field_names()
        .into_iter()
        .filter(|n| *n != "MonthlyIncome")
        .collect();
    let text = format!("{}\n1,1,0,1,1,200,40,22,1\n", names.join(","));
    let input = Table::parse_delimited(&text, ',').unwrap();

    let err = run_batch(&engine, &input, &PipelineConfig::default()).unwrap_err();
    match err {
        PipelineError::SchemaViolation(violations) => {
            assert_eq!(
                violations,
                vec![Violation::MissingField {
                    field: "MonthlyIncome".to_string()
                }]
            );
        }
        other => panic!("expected SchemaViolation, got {:?}", other),
    }
}

#[test]
fn test_large_batch_excludes_only_the_invalid_row() {
    let engine = load_engine();
    let valid_row = "1,1,1200,0,1,1,200,40,22,1";
    let invalid_row = "1,1,1200,0,1,1,200,40,200,1"; // Age 200

    let mut text = format!("{}\n", schema_header());
    for _ in 0..100 {
        text.push_str(valid_row);
        text.push('\n');
    }
    text.push_str(invalid_row);
    text.push('\n');

    let input = Table::parse_delimited(&text, ',').unwrap();
    let output = run_batch(&engine, &input, &PipelineConfig::default()).unwrap();

    assert_eq!(output.summary.total_rows, 101);
    assert_eq!(output.summary.scored_rows, 100);
    assert_eq!(output.summary.rejected_rows, 1);

    let excluded = output.table.row(100);
    assert_eq!(excluded[10], "");
    assert!(excluded[13].contains("Age"));
    assert!(excluded[13].contains("200"));
}

#[test]
fn test_batch_output_byte_identical_across_runs() {
    let engine = load_engine();
    let text = format!(
        "{}\n1,1,1200,0,1,1,200,40,22,1\n0,4,15000,3,4,4,1200,2,45,4\n",
        schema_header()
    );
    let input = Table::parse_delimited(&text, ',').unwrap();
    let config = PipelineConfig::default();

    let first = run_batch(&engine, &input, &config).unwrap().table.to_delimited(',');
    for _ in 0..5 {
        let again = run_batch(&engine, &input, &config).unwrap().table.to_delimited(',');
        assert_eq!(first, again);
    }
}

#[test]
fn test_batch_rows_are_independent() {
    let engine = load_engine();
    let config = PipelineConfig::default();
    let with_invalid = format!(
        "{}\n1,1,1200,0,1,1,200,40,22,1\n1,1,1200,0,1,1,200,40,200,1\n0,4,15000,3,4,4,1200,2,45,4\n",
        schema_header()
    );
    let without_invalid = format!(
        "{}\n1,1,1200,0,1,1,200,40,22,1\n0,4,15000,3,4,4,1200,2,45,4\n",
        schema_header()
    );

    let a = run_batch(
        &engine,
        &Table::parse_delimited(&with_invalid, ',').unwrap(),
        &config,
    )
    .unwrap();
    let b = run_batch(
        &engine,
        &Table::parse_delimited(&without_invalid, ',').unwrap(),
        &config,
    )
    .unwrap();

    assert_eq!(a.table.row(0), b.table.row(0));
    assert_eq!(a.table.row(2), b.table.row(1));
}

#[test]
fn test_reject_batch_policy_end_to_end() {
    let engine = load_engine();
    let text = format!(
        "{}\n1,1,1200,0,1,1,200,40,22,1\n1,1,1200,0,1,1,200,40,200,1\n",
        schema_header()
    );
    let input = Table::parse_delimited(&text, ',').unwrap();
    let config = PipelineConfig {
        row_policy: RowPolicy::RejectBatch,
        ..PipelineConfig::default()
    };

    let err = run_batch(&engine, &input, &config).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("row 2"));
    assert!(message.contains("Age"));
}

#[test]
fn test_cancelled_batch_returns_partial_annotations() {
    let engine = load_engine();
    let text = format!(
        "{}\n1,1,1200,0,1,1,200,40,22,1\n0,4,15000,3,4,4,1200,2,45,4\n",
        schema_header()
    );
    let input = Table::parse_delimited(&text, ',').unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();
    let output =
        run_batch_with_cancel(&engine, &input, &PipelineConfig::default(), &cancel).unwrap();

    // Nothing scored, but the table still comes back with reasons attached.
    assert_eq!(output.summary.scored_rows, 0);
    assert_eq!(output.summary.rejected_rows, 2);
    for idx in 0..2 {
        assert_eq!(output.table.row(idx)[13], "cancelled before scoring");
    }
}

#[test]
fn test_malformed_upload_reported_with_reason() {
    let err = Table::parse_delimited("a,b\n1\n", ',').unwrap_err();
    match err {
        PipelineError::MalformedInputFile(reason) => {
            assert!(reason.contains("row 1"));
        }
        other => panic!("expected MalformedInputFile, got {:?}", other),
    }
}

#[test]
fn test_engine_is_share_safe_across_threads() {
    let engine = std::sync::Arc::new(load_engine());
    let config = PipelineConfig::default();
    let schema = FeatureSchema::attrition_top10();
    let validated = validate_record(&schema, &likely_resign_record()).unwrap();
    let expected = engine.predict(&validated, config.decision_threshold).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = std::sync::Arc::clone(&engine);
            let validated = validated.clone();
            let threshold = config.decision_threshold;
            std::thread::spawn(move || engine.predict(&validated, threshold).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
