//! Example: Predict attrition for a single employee record
//!
//! Usage:
//!   cargo run --example predict_single -- <model.json>

use attrition_engine::{predict_record, InferenceEngine, PipelineConfig};
use std::collections::HashMap;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let model_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/attrition_forest.json".to_string());

    // One-time startup acquisition; failure here is fatal.
    let engine = InferenceEngine::load(&model_path)?;
    println!("Loaded model {} from {}", engine.model_version(), model_path);

    let record: HashMap<String, f64> = [
        ("MaritalStatus_Single", 1.0),
        ("JobLevelSatisfaction", 2.0),
        ("MonthlyIncome", 3200.0),
        ("StockOptionLevel", 0.0),
        ("JobInvolvement", 2.0),
        ("EmployeeSatisfaction", 1.0),
        ("DailyRate", 400.0),
        ("DistanceFromHome", 25.0),
        ("Age", 26.0),
        ("EnvironmentSatisfaction", 2.0),
    ]
    .iter()
    .map(|(name, value)| (name.to_string(), *value))
    .collect();

    let config = PipelineConfig::default();
    let prediction = predict_record(&engine, &record, &config)?;

    println!("\nPrediction: {}", prediction.result.label.as_str());
    match prediction.result.probabilities {
        Some(p) => println!(
            "Probability of resigning: {:.2}%  staying: {:.2}%",
            p.resign * 100.0,
            p.stay * 100.0
        ),
        None => println!("(model does not support probability output)"),
    }

    println!("\nRecommended actions ({}):", prediction.category.as_str());
    for (i, item) in prediction.recommendations.items.iter().enumerate() {
        println!("  {}. {}: {}", i + 1, item.title, item.body);
    }

    if engine.capabilities().has_importances {
        println!("\nTop features by importance:");
        for (name, score) in engine.feature_importances(config.top_importances)? {
            println!("  {:<25} {:.4}", name, score);
        }
    }

    Ok(())
}
