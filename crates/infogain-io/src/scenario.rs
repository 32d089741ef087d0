//! JSON scenario reader: a base node, its candidate splits, and optional priors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use infogain_split::{
    ClassHistogram, ConfiguredCriterion, CriterionConfig, PartitionCheck, SplitCandidate,
    Weighting,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::IoError;

/// A named candidate split.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedCandidate {
    /// Display name (defaults to `candidate-{index}`).
    pub name: String,
    /// The two branch histograms.
    pub split: SplitCandidate<String>,
}

/// A gain evaluation problem loaded from JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Training instances per class, required for prior weighting.
    pub train_counts: Option<BTreeMap<String, u64>>,
    /// Explicit class priors.
    pub priors: Option<BTreeMap<String, f64>>,
    /// Histogram of all instances reaching the node.
    pub base: ClassHistogram<String>,
    /// Candidate splits of `base`.
    pub candidates: Vec<NamedCandidate>,
}

#[derive(Deserialize)]
struct RawScenario {
    #[serde(default)]
    train_counts: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    priors: Option<BTreeMap<String, f64>>,
    base: ClassHistogram<String>,
    candidates: Vec<RawCandidate>,
}

#[derive(Deserialize)]
struct RawCandidate {
    #[serde(default)]
    name: Option<String>,
    positive: ClassHistogram<String>,
    negative: ClassHistogram<String>,
}

impl Scenario {
    /// Return the weighting a scenario asks for by itself: explicit priors if
    /// present, otherwise empirical priors if training counts are present,
    /// otherwise unweighted.
    #[must_use]
    pub fn default_weighting(&self) -> Weighting<String> {
        match (&self.priors, &self.train_counts) {
            (Some(priors), _) => Weighting::Explicit(priors.clone()),
            (None, Some(_)) => Weighting::Empirical,
            (None, None) => Weighting::Unweighted,
        }
    }

    /// Build a criterion for this scenario.
    ///
    /// # Errors
    ///
    /// | Variant                          | When                                                  |
    /// |----------------------------------|-------------------------------------------------------|
    /// | [`IoError::MissingTrainCounts`]  | `weighting` is prior-weighted and no counts are given |
    /// | [`IoError::InvalidScenario`]     | the priors or counts fail validation                  |
    pub fn build_criterion(
        &self,
        weighting: Weighting<String>,
        partition_check: PartitionCheck,
    ) -> Result<ConfiguredCriterion<String>, IoError> {
        let config = CriterionConfig::new()
            .with_weighting(weighting)
            .with_partition_check(partition_check);

        let criterion = match (config.weighting(), &self.train_counts) {
            (Weighting::Unweighted, None) => config.build(&BTreeMap::new())?,
            (_, Some(counts)) => config.build(counts)?,
            (_, None) => return Err(IoError::MissingTrainCounts),
        };
        Ok(criterion)
    }
}

/// Reads a [`Scenario`] from a JSON file.
///
/// Expected format:
///
/// ```json
/// {
///   "train_counts": {"a": 100, "b": 100},
///   "priors": {"a": 0.9, "b": 0.1},
///   "base": {"a": 50, "b": 50},
///   "candidates": [
///     {"name": "x0<=1.5", "positive": {"a": 40, "b": 5}, "negative": {"a": 10, "b": 45}}
///   ]
/// }
/// ```
///
/// `train_counts`, `priors` and candidate `name` are optional.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Malformed JSON, missing fields, or invalid counts |
/// | [`IoError::NoCandidates`] | `candidates` is empty |
pub struct ScenarioReader {
    path: PathBuf,
}

impl ScenarioReader {
    /// Create a new reader for the given JSON file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the scenario file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Scenario, IoError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(bytes = content.len(), "read scenario file");

        let raw: RawScenario =
            serde_json::from_str(&content).map_err(|e| IoError::JsonParse {
                path: self.path.clone(),
                source: e,
            })?;

        if raw.candidates.is_empty() {
            return Err(IoError::NoCandidates {
                path: self.path.clone(),
            });
        }

        let candidates: Vec<NamedCandidate> = raw
            .candidates
            .into_iter()
            .enumerate()
            .map(|(index, c)| NamedCandidate {
                name: c.name.unwrap_or_else(|| format!("candidate-{index}")),
                split: SplitCandidate::new(c.positive, c.negative),
            })
            .collect();

        info!(
            n_candidates = candidates.len(),
            n_labels = raw.base.n_labels(),
            has_priors = raw.priors.is_some(),
            "scenario loaded"
        );

        Ok(Scenario {
            train_counts: raw.train_counts,
            priors: raw.priors,
            base: raw.base,
            candidates,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use infogain_split::{PartitionCheck, Weighting};
    use tempfile::NamedTempFile;

    use super::ScenarioReader;
    use crate::IoError;

    fn write_json(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    const FULL: &str = r#"{
        "train_counts": {"a": 100, "b": 100},
        "priors": {"a": 0.9, "b": 0.1},
        "base": {"a": 50, "b": 50},
        "candidates": [
            {"name": "x0<=1.5", "positive": {"a": 40, "b": 5}, "negative": {"a": 10, "b": 45}},
            {"positive": {"a": 50}, "negative": {"b": 50}}
        ]
    }"#;

    #[test]
    fn reads_full_scenario() {
        let f = write_json(FULL);
        let scenario = ScenarioReader::new(f.path()).read().unwrap();

        assert_eq!(scenario.candidates.len(), 2);
        assert_eq!(scenario.candidates[0].name, "x0<=1.5");
        assert_eq!(scenario.candidates[1].name, "candidate-1");
        assert!((scenario.base.total() - 100.0).abs() < f64::EPSILON);
        assert_eq!(scenario.train_counts.as_ref().unwrap()["a"], 100);
        assert!(matches!(scenario.default_weighting(), Weighting::Explicit(_)));
    }

    #[test]
    fn minimal_scenario_defaults_to_unweighted() {
        let f = write_json(
            r#"{"base": {"a": 2, "b": 2}, "candidates": [{"positive": {"a": 2}, "negative": {"b": 2}}]}"#,
        );
        let scenario = ScenarioReader::new(f.path()).read().unwrap();
        assert_eq!(scenario.default_weighting(), Weighting::Unweighted);
        assert!(
            scenario
                .build_criterion(Weighting::Unweighted, PartitionCheck::Disabled)
                .is_ok()
        );
    }

    #[test]
    fn weighted_without_counts_errors() {
        let f = write_json(
            r#"{"base": {"a": 2}, "candidates": [{"positive": {"a": 2}, "negative": {}}]}"#,
        );
        let scenario = ScenarioReader::new(f.path()).read().unwrap();
        let err = scenario
            .build_criterion(Weighting::Empirical, PartitionCheck::Disabled)
            .unwrap_err();
        assert!(matches!(err, IoError::MissingTrainCounts));
    }

    #[test]
    fn bad_priors_surface_as_invalid_scenario() {
        let f = write_json(
            r#"{"train_counts": {"a": 1, "b": 1}, "priors": {"a": 1.0},
                "base": {"a": 1, "b": 1}, "candidates": [{"positive": {"a": 1}, "negative": {"b": 1}}]}"#,
        );
        let scenario = ScenarioReader::new(f.path()).read().unwrap();
        let err = scenario
            .build_criterion(scenario.default_weighting(), PartitionCheck::Disabled)
            .unwrap_err();
        assert!(matches!(err, IoError::InvalidScenario(_)));
    }

    #[test]
    fn empty_candidates_rejected() {
        let f = write_json(r#"{"base": {"a": 1}, "candidates": []}"#);
        let err = ScenarioReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::NoCandidates { .. }));
    }

    #[test]
    fn negative_count_rejected_as_parse_error() {
        let f = write_json(
            r#"{"base": {"a": -1}, "candidates": [{"positive": {}, "negative": {}}]}"#,
        );
        let err = ScenarioReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::JsonParse { .. }));
    }

    #[test]
    fn missing_file() {
        let err = ScenarioReader::new(std::path::Path::new("/nonexistent/scenario.json"))
            .read()
            .unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
