//! Gain reports: evaluation of every scenario candidate, serialized as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use infogain_split::{
    ConfiguredCriterion, GainBreakdown, PriorConfiguration, PriorSource, best_candidate,
    evaluate_candidates,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::IoError;
use crate::scenario::Scenario;

/// Outcome of one candidate split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReport {
    /// Candidate name from the scenario.
    pub name: String,
    /// Gain and intermediates, when evaluation succeeded.
    pub breakdown: Option<GainBreakdown>,
    /// Error message, when evaluation failed.
    pub error: Option<String>,
}

/// The highest-gain candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestCandidate {
    /// Position of the candidate in the scenario.
    pub index: usize,
    /// Candidate name.
    pub name: String,
    /// Its information gain.
    pub gain: f64,
}

/// Result of evaluating every candidate of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainReport {
    /// `"weighted"` or `"unweighted"`.
    pub mode: String,
    /// Number of candidates whose evaluation failed.
    pub n_failed: usize,
    /// Best candidate, if any evaluation succeeded.
    pub best: Option<BestCandidate>,
    /// One entry per candidate, in scenario order.
    pub candidates: Vec<CandidateReport>,
}

impl GainReport {
    /// Evaluate every candidate of `scenario` with `criterion`.
    #[instrument(skip_all, fields(n_candidates = scenario.candidates.len()))]
    pub fn evaluate(scenario: &Scenario, criterion: &ConfiguredCriterion<String>) -> Self {
        let splits: Vec<_> = scenario.candidates.iter().map(|c| c.split.clone()).collect();
        let results = evaluate_candidates(criterion, &scenario.base, &splits);

        let best = best_candidate(&results).map(|(index, gain)| BestCandidate {
            index,
            name: scenario.candidates[index].name.clone(),
            gain,
        });

        let candidates: Vec<CandidateReport> = scenario
            .candidates
            .iter()
            .zip(results)
            .map(|(candidate, result)| match result {
                Ok(breakdown) => CandidateReport {
                    name: candidate.name.clone(),
                    breakdown: Some(breakdown),
                    error: None,
                },
                Err(e) => CandidateReport {
                    name: candidate.name.clone(),
                    breakdown: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let n_failed = candidates.iter().filter(|c| c.error.is_some()).count();
        let mode = if criterion.criterion().is_weighted() {
            "weighted"
        } else {
            "unweighted"
        };

        info!(mode, n_failed, best_gain = ?best.as_ref().map(|b| b.gain), "scenario evaluated");

        Self {
            mode: mode.to_string(),
            n_failed,
            best,
            candidates,
        }
    }
}

/// Configured class priors, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorTableReport {
    /// Where the priors came from.
    pub source: PriorSource,
    /// Class labels in configured order.
    pub labels: Vec<String>,
    /// Priors, parallel to `labels`.
    pub priors: Vec<f64>,
    /// Training counts, parallel to `labels`.
    pub train_counts: Vec<u64>,
}

impl From<&PriorConfiguration<String>> for PriorTableReport {
    fn from(config: &PriorConfiguration<String>) -> Self {
        Self {
            source: config.prior_source(),
            labels: config.labels().to_vec(),
            priors: config.priors().to_vec(),
            train_counts: config.train_counts().to_vec(),
        }
    }
}

/// Writes serializable reports as pretty-printed JSON files.
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    /// Create a writer targeting `path`. Parent directories are created on write.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Serialize `report` and write it to the target path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The report cannot be serialized |
    /// | [`IoError::WriteFile`] | The directory or file cannot be written |
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn write<T: Serialize>(&self, report: &T) -> Result<(), IoError> {
        let json =
            serde_json::to_string_pretty(report).map_err(|e| IoError::Serialize { source: e })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| IoError::WriteFile {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(&self.path, json).map_err(|e| IoError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;

        info!("report written");
        Ok(())
    }
}
