//! Workflow outcome types
//!
//! Workflows never panic on a failed job; they return one of these values
//! and let the caller decide how to degrade.

use std::collections::BTreeSet;

use timedetect_core::domain::job::JobStatusReport;
use timedetect_core::domain::prediction::Prediction;

/// Observable state of the simulator's current (or most recent) workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    /// No workflow has run yet, or one is about to dispatch
    Idle,
    /// The asynchronous call was accepted and a job id is tracked
    Dispatched,
    /// Waiting on status checks
    Polling,
    /// Terminal: the job reported success
    Succeeded,
    /// Terminal: the job vanished, the dispatch failed, or the attempt cap
    /// was exhausted
    Failed,
}

/// Terminal outcome of an upload or training workflow
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Success,
    Failed {
        /// The last status report seen before the workflow gave up, if any
        last_status: Option<JobStatusReport>,
    },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Terminal outcome of a batch-prediction workflow
#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    /// The job succeeded and its results were fetched and unpacked
    Completed(Vec<Prediction>),
    Failed {
        last_status: Option<JobStatusReport>,
    },
}

impl PredictOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// The scored rows, if the workflow completed
    pub fn rows(&self) -> Option<&[Prediction]> {
        match self {
            Self::Completed(rows) => Some(rows),
            Self::Failed { .. } => None,
        }
    }
}

/// One prediction collected by the combined streaming workflow, tagged with
/// the 1-based sequence number of the batch it arrived in
#[derive(Debug, Clone, PartialEq)]
pub struct StreamedPrediction {
    pub call_count: u32,
    pub prediction: Prediction,
}

/// Result of a combined predict-upload-retrain streaming run
#[derive(Debug, Clone, PartialEq)]
pub struct StreamReport {
    /// Every prediction collected, in batch order
    pub rows: Vec<StreamedPrediction>,
    /// Input registration ids that never appeared in any result batch
    pub lost: BTreeSet<String>,
}

/// Per-date outcome of a plain upload-retrain streaming run
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDayReport {
    pub date: String,
    pub upload: JobOutcome,
    pub training: JobOutcome,
}

impl StreamDayReport {
    pub fn is_success(&self) -> bool {
        self.upload.is_success() && self.training.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_predicates() {
        assert!(JobOutcome::Success.is_success());
        assert!(!JobOutcome::Failed { last_status: None }.is_success());

        let failed = PredictOutcome::Failed { last_status: None };
        assert!(!failed.is_success());
        assert!(failed.rows().is_none());

        let completed = PredictOutcome::Completed(Vec::new());
        assert!(completed.is_success());
        assert_eq!(completed.rows(), Some(&[][..]));
    }
}
