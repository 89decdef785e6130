//! TimeDetect Client Simulator
//!
//! Simulates a client of the hosted time-anomaly-detection API: uploads
//! registrations, starts training and prediction jobs, and polls job status
//! until a terminal state is reached.
//!
//! Each workflow runs one state machine:
//! Idle → Dispatched → Polling → Terminal (succeeded or failed).
//! Steps within a workflow are strictly sequential — an upload reaches its
//! terminal state before the following training run is dispatched, and a
//! date's steps finish before the next date begins. One simulator instance
//! tracks at most one job at a time; independent instances (one per
//! tenant/dataset) may run concurrently against the service.
//!
//! # Example
//!
//! ```no_run
//! use timedetect_client::{ApiClient, AuthConfig, TokenProvider};
//! use timedetect_simulator::{ClientSimulator, SimulatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let tokens = TokenProvider::new(AuthConfig::from_env()?);
//!     let client = ApiClient::new("https://api.example.com/td", "my-tenant", tokens);
//!     let mut simulator =
//!         ClientSimulator::new(client, "my-dataset", SimulatorConfig::default());
//!
//!     let outcome = simulator.start_training(true).await;
//!     println!("training finished: {}", outcome.is_success());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod outcome;

mod simulator;

pub use config::SimulatorConfig;
pub use outcome::{
    JobOutcome, PredictOutcome, StreamDayReport, StreamReport, StreamedPrediction, WorkflowPhase,
};
pub use simulator::ClientSimulator;
