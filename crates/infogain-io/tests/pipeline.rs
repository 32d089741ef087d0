//! End-to-end integration tests: scenario JSON -> evaluate -> report JSON -> deserialize.

use std::fs;
use std::path::Path;

use infogain_io::{GainReport, ReportWriter, ScenarioReader};
use infogain_split::{PartitionCheck, Weighting};
use tempfile::TempDir;

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn weighted_round_trip() {
    // 1. Read scenario
    let scenario = ScenarioReader::new(&fixture_path("skewed_priors.json"))
        .read()
        .expect("fixture should parse");
    assert_eq!(scenario.candidates.len(), 3);

    // 2. Evaluate with the scenario's own priors, checking partitions
    let criterion = scenario
        .build_criterion(scenario.default_weighting(), PartitionCheck::Enabled)
        .unwrap();
    let report = GainReport::evaluate(&scenario, &criterion);
    assert_eq!(report.n_failed, 0);

    // 3. Write JSON artifact
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("skewed_report.json");
    ReportWriter::new(&path).write(&report).unwrap();

    // 4. Read back and verify
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(content["mode"], "weighted");
    assert_eq!(content["best"]["name"], "x0<=1.5");
    let gain = content["best"]["gain"].as_f64().unwrap();
    assert!((gain - 0.144_829_791_450_621).abs() < 1e-12);

    // Uninformative and one-sided splits gain nothing.
    for index in [1, 2] {
        let g = content["candidates"][index]["breakdown"]["gain"].as_f64().unwrap();
        assert!(g.abs() < 1e-12, "candidate {index} gain {g}");
    }
}

#[test]
fn empirical_and_unweighted_agree_at_training_root() {
    let scenario = ScenarioReader::new(&fixture_path("balanced_counts.json"))
        .read()
        .unwrap();

    let weighted = scenario
        .build_criterion(Weighting::Empirical, PartitionCheck::Disabled)
        .unwrap();
    let unweighted = scenario
        .build_criterion(Weighting::Unweighted, PartitionCheck::Disabled)
        .unwrap();

    let weighted = GainReport::evaluate(&scenario, &weighted);
    let unweighted = GainReport::evaluate(&scenario, &unweighted);

    for (w, u) in weighted.candidates.iter().zip(&unweighted.candidates) {
        let w = w.breakdown.unwrap().gain;
        let u = u.breakdown.unwrap().gain;
        assert!((w - u).abs() < 1e-9);
    }
    let best = unweighted.best.unwrap();
    assert_eq!(best.name, "perfect");
    assert!((best.gain - 1.0).abs() < 1e-12);
}
