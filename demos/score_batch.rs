//! Example: Score a CSV of employee records and write the augmented CSV
//!
//! Usage:
//!   cargo run --example score_batch -- <model.json> <input.csv> <output.csv> [--json]
//!
//! Notes:
//! - Rows are scored in parallel; output preserves input order.
//! - Rows failing validation are excluded and annotated, not dropped silently.

use attrition_engine::{run_batch, InferenceEngine, PipelineConfig, Table};
use std::env;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let json_summary = args.iter().any(|a| a == "--json");
    let mut paths = args.iter().filter(|a| !a.starts_with("--"));
    let (model_path, input_path, output_path) = match (paths.next(), paths.next(), paths.next()) {
        (Some(m), Some(i), Some(o)) => (m, i, o),
        _ => {
            eprintln!("Usage: score_batch <model.json> <input.csv> <output.csv> [--json]");
            std::process::exit(2);
        }
    };

    let engine = InferenceEngine::load(model_path)?;
    let text = fs::read_to_string(input_path)?;
    let input = Table::parse_delimited(&text, ',')?;

    let output = run_batch(&engine, &input, &PipelineConfig::default())?;
    fs::write(output_path, output.table.to_delimited(','))?;

    if json_summary {
        println!("{}", serde_json::to_string(&output.summary)?);
    } else {
        println!(
            "Scored {} of {} rows ({} rejected); results written to {}",
            output.summary.scored_rows,
            output.summary.total_rows,
            output.summary.rejected_rows,
            output_path
        );
    }

    Ok(())
}
