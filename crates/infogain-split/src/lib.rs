//! Information-gain split criteria for decision-tree induction.
//!
//! Scores a candidate binary split of a node's class histogram either by
//! classic (C4.5) information gain over empirical proportions, or by CART
//! prior-weighted gain, where class probabilities and branch weights are
//! re-derived from configured class priors and training counts.

mod batch;
mod config;
mod criterion;
mod entropy;
mod error;
mod histogram;
mod partition;
mod priors;

pub use batch::{SplitCandidate, best_candidate, evaluate_candidates};
pub use config::{ConfiguredCriterion, CriterionConfig, PartitionCheck, Weighting};
pub use criterion::{GainBreakdown, SplitCriterion};
pub use entropy::{WeightedEntropy, legacy_entropy};
pub use error::GainError;
pub use histogram::ClassHistogram;
pub use partition::debug_check_partition;
pub use priors::{PriorConfiguration, PriorSource};
