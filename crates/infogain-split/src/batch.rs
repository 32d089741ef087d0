//! Parallel evaluation of many candidate splits of the same base node.
//!
//! Each rayon worker owns its own clone of the criterion, so no prior
//! configuration (and its scratch buffer) is shared between two in-flight
//! evaluations. Histograms are only read and are shared by reference.

use std::fmt::Debug;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, instrument};

use crate::config::ConfiguredCriterion;
use crate::criterion::GainBreakdown;
use crate::error::GainError;
use crate::histogram::ClassHistogram;

/// One candidate split: the positive and negative branches of a threshold test.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitCandidate<L> {
    /// Instances satisfying the test.
    pub positive: ClassHistogram<L>,
    /// Instances failing the test.
    pub negative: ClassHistogram<L>,
}

impl<L> SplitCandidate<L> {
    /// Create a candidate from its two branch histograms.
    #[must_use]
    pub fn new(positive: ClassHistogram<L>, negative: ClassHistogram<L>) -> Self {
        Self { positive, negative }
    }
}

/// Evaluate every candidate split of `base` in parallel.
///
/// The result at index `i` belongs to `candidates[i]`. Failed evaluations
/// are returned as errors in place and do not stop the others.
#[instrument(skip_all, fields(n_candidates = candidates.len()))]
pub fn evaluate_candidates<L>(
    criterion: &ConfiguredCriterion<L>,
    base: &ClassHistogram<L>,
    candidates: &[SplitCandidate<L>],
) -> Vec<Result<GainBreakdown, GainError>>
where
    L: Ord + Clone + Debug + Send + Sync,
{
    let results: Vec<Result<GainBreakdown, GainError>> = candidates
        .par_iter()
        .map_init(
            || criterion.clone(),
            |worker, candidate| {
                worker.compute_split_breakdown(base, &candidate.positive, &candidate.negative)
            },
        )
        .collect();

    let n_failed = results.iter().filter(|r| r.is_err()).count();
    debug!(n_failed, "candidate evaluation complete");
    results
}

/// Return the index and gain of the best candidate.
///
/// Errors and non-finite gains are never selected. Ties keep the earliest
/// index. Returns `None` when no candidate has a finite gain.
#[must_use]
pub fn best_candidate(results: &[Result<GainBreakdown, GainError>]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, result) in results.iter().enumerate() {
        let Ok(breakdown) = result else {
            continue;
        };
        let gain = breakdown.gain;
        if !gain.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, best_gain)| gain > best_gain) {
            best = Some((index, gain));
        }
    }
    best
}
