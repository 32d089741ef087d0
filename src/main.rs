use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use infogain_io::{GainReport, PriorTableReport, ReportWriter, Scenario, ScenarioReader};
use infogain_split::{PartitionCheck, Weighting};

#[derive(Parser)]
#[command(name = "infogain")]
#[command(about = "Score decision-tree split candidates by (prior-weighted) information gain")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate every candidate split in a scenario and report the best one
    Gain {
        /// Path to the scenario JSON file
        #[arg(long)]
        scenario: PathBuf,

        /// Weighting: "auto", "weighted", "empirical", or "unweighted"
        #[arg(long, default_value = "auto")]
        mode: String,

        /// Reject candidates whose branches do not partition the base node
        #[arg(long, default_value_t = false)]
        check_partition: bool,

        /// Also write the report to this JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the configured class priors and training counts
    Priors {
        /// Path to the scenario JSON file
        #[arg(long)]
        scenario: PathBuf,

        /// Weighting: "auto", "weighted", or "empirical"
        #[arg(long, default_value = "auto")]
        mode: String,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct PriorsOutput {
    scenario: String,
    #[serde(flatten)]
    table: PriorTableReport,
}

/// Resolve a `--mode` value against what the scenario provides.
///
/// `auto` uses explicit priors if present, else empirical priors if training
/// counts are present, else no weighting. `weighted` is `auto` without the
/// unweighted fallback.
fn parse_mode(s: &str, scenario: &Scenario) -> Result<Weighting<String>> {
    match s {
        "auto" => Ok(scenario.default_weighting()),
        "weighted" => match scenario.default_weighting() {
            Weighting::Unweighted => Ok(Weighting::Empirical),
            weighting => Ok(weighting),
        },
        "empirical" => Ok(Weighting::Empirical),
        "unweighted" => Ok(Weighting::Unweighted),
        other => anyhow::bail!(
            "unknown mode: {other} (expected auto, weighted, empirical, or unweighted)"
        ),
    }
}

/// Resolve a `--mode` value for the `priors` command, which needs a
/// prior-weighted criterion.
fn parse_priors_mode(s: &str, scenario: &Scenario) -> Result<Weighting<String>> {
    if s == "unweighted" {
        anyhow::bail!("the priors command needs a prior-weighted mode (auto, weighted, or empirical)");
    }
    match parse_mode(s, scenario)? {
        Weighting::Unweighted => {
            anyhow::bail!("scenario has no priors or training counts; nothing to configure")
        }
        weighting => Ok(weighting),
    }
}

fn read_scenario(path: &Path) -> Result<Scenario> {
    ScenarioReader::new(path)
        .read()
        .with_context(|| format!("failed to read scenario {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Gain {
            scenario,
            mode,
            check_partition,
            output,
        } => {
            let loaded = read_scenario(&scenario)?;
            let weighting = parse_mode(&mode, &loaded)?;
            let partition_check = if check_partition {
                PartitionCheck::Enabled
            } else {
                PartitionCheck::Disabled
            };

            let criterion = loaded
                .build_criterion(weighting, partition_check)
                .context("failed to configure split criterion")?;
            let report = GainReport::evaluate(&loaded, &criterion);

            if let Some(path) = output {
                ReportWriter::new(&path).write(&report)?;
            }

            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Priors { scenario, mode } => {
            let loaded = read_scenario(&scenario)?;
            let weighting = parse_priors_mode(&mode, &loaded)?;

            let criterion = loaded
                .build_criterion(weighting, PartitionCheck::Disabled)
                .context("failed to configure class priors")?;
            let config = criterion
                .criterion()
                .prior_configuration()
                .context("criterion is not prior-weighted")?;

            let output = PriorsOutput {
                scenario: scenario.display().to_string(),
                table: PriorTableReport::from(config),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use infogain_io::Scenario;
    use infogain_split::{ClassHistogram, Weighting};

    use super::{parse_mode, parse_priors_mode};

    fn scenario(with_counts: bool, with_priors: bool) -> Scenario {
        Scenario {
            train_counts: with_counts.then(|| [("a".to_string(), 10), ("b".to_string(), 10)].into()),
            priors: with_priors.then(|| [("a".to_string(), 0.9), ("b".to_string(), 0.1)].into()),
            base: ClassHistogram::new(),
            candidates: Vec::new(),
        }
    }

    #[test]
    fn auto_mode_follows_scenario() {
        assert_eq!(parse_mode("auto", &scenario(false, false)).unwrap(), Weighting::Unweighted);
        assert_eq!(parse_mode("auto", &scenario(true, false)).unwrap(), Weighting::Empirical);
        assert!(matches!(
            parse_mode("auto", &scenario(true, true)).unwrap(),
            Weighting::Explicit(_)
        ));
    }

    #[test]
    fn weighted_mode_never_falls_back_to_unweighted() {
        assert_eq!(parse_mode("weighted", &scenario(false, false)).unwrap(), Weighting::Empirical);
    }

    #[test]
    fn unknown_mode_rejected() {
        assert!(parse_mode("gini", &scenario(true, false)).is_err());
    }

    #[test]
    fn priors_command_rejects_unweighted_mode_with_counts_present() {
        let err = parse_priors_mode("unweighted", &scenario(true, true)).unwrap_err();
        assert!(err.to_string().contains("prior-weighted mode"), "{err}");
    }

    #[test]
    fn priors_command_without_counts_or_priors_reports_it() {
        let err = parse_priors_mode("auto", &scenario(false, false)).unwrap_err();
        assert!(err.to_string().contains("no priors or training counts"), "{err}");
    }

    #[test]
    fn priors_command_accepts_empirical() {
        assert_eq!(
            parse_priors_mode("empirical", &scenario(true, true)).unwrap(),
            Weighting::Empirical
        );
    }
}
