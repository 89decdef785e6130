//! Generate command handler

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use colored::*;

use crate::config::{Config, PREDICT_FILE, TRAIN_FILE};
use crate::data;
use crate::generate::DataGenerator;

/// Arguments for synthetic data generation
#[derive(Args)]
pub struct GenerateArgs {
    /// Number of employees in the synthetic company
    #[arg(long, default_value_t = 10)]
    pub employees: usize,

    /// First day of the training period
    #[arg(long, default_value = "2023-01-02")]
    pub train_start: NaiveDate,

    /// Last day of the training period
    #[arg(long, default_value = "2023-03-31")]
    pub train_end: NaiveDate,

    /// First day of the prediction period
    #[arg(long, default_value = "2023-04-03")]
    pub predict_start: NaiveDate,

    /// Last day of the prediction period
    #[arg(long, default_value = "2023-04-07")]
    pub predict_end: NaiveDate,
}

/// Generate train and predict data files
pub fn handle_generate(args: GenerateArgs, config: &Config) -> Result<()> {
    if args.employees == 0 {
        anyhow::bail!("--employees must be greater than 0");
    }
    if args.train_end < args.train_start {
        anyhow::bail!("--train-end must not be before --train-start");
    }
    if args.predict_end < args.predict_start {
        anyhow::bail!("--predict-end must not be before --predict-start");
    }

    let mut rng = rand::thread_rng();
    let mut generator = DataGenerator::new(args.employees);

    let train = generator.generate(&mut rng, args.train_start, args.train_end);
    let predict = generator.generate(&mut rng, args.predict_start, args.predict_end);

    let train_path = config.data_dir().join(TRAIN_FILE);
    data::save_registrations(&train_path, &train)?;
    println!(
        "{}",
        format!(
            "✓ Wrote {} training registration(s) to {}",
            train.len(),
            train_path.display()
        )
        .green()
    );

    let predict_path = config.data_dir().join(PREDICT_FILE);
    data::save_registrations(&predict_path, &predict)?;
    println!(
        "{}",
        format!(
            "✓ Wrote {} prediction registration(s) to {}",
            predict.len(),
            predict_path.display()
        )
        .green()
    );

    Ok(())
}
