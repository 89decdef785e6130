//! Workflow command handlers
//!
//! Each handler loads a data file, runs one simulator workflow, and renders
//! the outcome. A failed job is reported, not raised: the process only exits
//! nonzero for infrastructure problems (bad configuration, unreadable
//! files).

use std::path::PathBuf;

use anyhow::Result;
use colored::*;

use timedetect_core::domain::prediction::Prediction;
use timedetect_simulator::{JobOutcome, PredictOutcome, StreamDayReport};

use crate::config::{Config, PREDICT_FILE, TRAIN_FILE};
use crate::data;

/// Check that the detection API is reachable
pub async fn health(config: &Config) -> Result<()> {
    let client = config.api_client();
    let status = client.health_check().await?;

    if (200..300).contains(&status) {
        println!("{}", format!("✓ API is healthy (status {status})").green());
    } else {
        println!("{}", format!("✗ API returned status {status}").red());
    }

    Ok(())
}

/// Upload a data file and wait for ingestion
pub async fn upload(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let path = config.data_file(file, TRAIN_FILE);
    let rows = data::load_registrations(&path)?;
    println!(
        "{}",
        format!("Uploading {} registration(s) from {}", rows.len(), path.display()).bold()
    );

    let mut simulator = config.simulator()?;
    let outcome = simulator.upload_data(&rows).await;
    print_job_outcome("Upload", &outcome);

    Ok(())
}

/// Train models on the uploaded dataset
pub async fn train(config: &Config, incremental: bool) -> Result<()> {
    let mut simulator = config.simulator()?;
    let outcome = simulator.start_training(!incremental).await;
    print_job_outcome("Training", &outcome);

    Ok(())
}

/// Request batch predictions and display the scored rows
pub async fn predict(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let path = config.data_file(file, PREDICT_FILE);
    let rows = data::load_registrations(&path)?;
    println!(
        "{}",
        format!("Predicting {} registration(s) from {}", rows.len(), path.display()).bold()
    );

    let mut simulator = config.simulator()?;
    match simulator.predict(&rows).await {
        PredictOutcome::Completed(scored) => print_predictions(&scored),
        PredictOutcome::Failed { last_status } => {
            println!("{}", "✗ Prediction failed".red());
            if let Some(report) = last_status {
                println!(
                    "  Last status: {}",
                    serde_json::to_string(&report).unwrap_or_default().dimmed()
                );
            }
        }
    }

    Ok(())
}

/// Request synchronous real-time predictions for the first `count` rows
pub async fn predict_realtime(config: &Config, file: Option<PathBuf>, count: usize) -> Result<()> {
    let path = config.data_file(file, PREDICT_FILE);
    let rows = data::load_registrations(&path)?;
    let sample: Vec<_> = rows.into_iter().take(count).collect();
    println!(
        "{}",
        format!("Scoring {} registration(s) in real time", sample.len()).bold()
    );

    let mut simulator = config.simulator()?;
    match simulator.predict_realtime(&sample).await {
        Ok(scored) => print_predictions(&scored),
        Err(e) => println!("{}", format!("✗ Real-time prediction failed: {e}").red()),
    }

    Ok(())
}

/// Replay a data file one day at a time (upload + incremental retrain)
pub async fn stream(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let path = config.data_file(file, PREDICT_FILE);
    let rows = data::load_registrations(&path)?;
    println!(
        "{}",
        format!("Streaming {} registration(s) from {}", rows.len(), path.display()).bold()
    );

    let mut simulator = config.simulator()?;
    let reports = simulator.stream_day_by_day(&rows).await;

    println!("{}", format!("Streamed {} day(s):", reports.len()).bold());
    println!();
    for report in &reports {
        print_day_report(report);
    }

    Ok(())
}

/// Replay a data file one day at a time, predicting before each upload
pub async fn stream_predict(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let path = config.data_file(file, PREDICT_FILE);
    let rows = data::load_registrations(&path)?;
    println!(
        "{}",
        format!(
            "Streaming and predicting {} registration(s) from {}",
            rows.len(),
            path.display()
        )
        .bold()
    );

    let mut simulator = config.simulator()?;
    let report = simulator.stream_and_predict_day_by_day(&rows, None).await;

    println!(
        "{}",
        format!("Collected {} prediction(s):", report.rows.len()).bold()
    );
    println!();
    for row in &report.rows {
        println!(
            "  {} call {}  {}  score {}",
            "▸".cyan(),
            row.call_count,
            row.prediction.registration_id.dimmed(),
            colorize_score(row.prediction.anomaly_score)
        );
    }
    println!();

    if report.lost.is_empty() {
        println!("{}", "All registrations received predictions.".green());
    } else {
        println!(
            "{}",
            format!(
                "⚠ {} registration(s) received no prediction:",
                report.lost.len()
            )
            .yellow()
        );
        for id in &report.lost {
            println!("  {}", id.dimmed());
        }
    }

    Ok(())
}

/// Print a terminal job outcome
fn print_job_outcome(what: &str, outcome: &JobOutcome) {
    match outcome {
        JobOutcome::Success => {
            println!("{}", format!("✓ {what} finished successfully").green());
        }
        JobOutcome::Failed { last_status } => {
            println!("{}", format!("✗ {what} failed").red());
            if let Some(report) = last_status {
                println!(
                    "  Last status: {}",
                    serde_json::to_string(&report).unwrap_or_default().dimmed()
                );
            }
        }
    }
}

/// Print one streamed day's upload/training outcomes
fn print_day_report(report: &StreamDayReport) {
    let mark = if report.is_success() {
        "✓".green()
    } else {
        "✗".red()
    };
    println!(
        "  {} {}  upload {}  training {}",
        mark,
        report.date,
        outcome_word(&report.upload),
        outcome_word(&report.training)
    );
}

fn outcome_word(outcome: &JobOutcome) -> ColoredString {
    match outcome {
        JobOutcome::Success => "ok".green(),
        JobOutcome::Failed { .. } => "failed".red(),
    }
}

/// Print scored predictions, most anomalous first
fn print_predictions(rows: &[Prediction]) {
    println!("{}", format!("Got {} result(s):", rows.len()).bold());
    println!();

    let mut sorted: Vec<&Prediction> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        b.anomaly_score
            .partial_cmp(&a.anomaly_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for row in sorted {
        println!(
            "  {} {}  score {}",
            "▸".cyan(),
            row.registration_id.dimmed(),
            colorize_score(row.anomaly_score)
        );
        if let Some(fields) = &row.significant_fields {
            if !fields.is_empty() {
                println!("    Significant: {}", fields.join(", "));
            }
        }
        if let Some(related) = &row.related_registration_ids {
            if !related.is_empty() {
                println!("    Related:     {}", related.join(", ").dimmed());
            }
        }
    }
}

fn colorize_score(score: f64) -> ColoredString {
    let rendered = format!("{score:.3}");
    if score >= 0.8 {
        rendered.red()
    } else if score >= 0.5 {
        rendered.yellow()
    } else {
        rendered.green()
    }
}
