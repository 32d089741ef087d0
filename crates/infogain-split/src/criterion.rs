//! Information-gain evaluation of a candidate binary split.

use std::fmt::Debug;

use crate::entropy::legacy_entropy;
use crate::error::GainError;
use crate::histogram::ClassHistogram;
use crate::priors::PriorConfiguration;

/// Criterion for scoring a split of a node into positive and negative branches.
#[derive(Debug, Clone)]
pub enum SplitCriterion<L> {
    /// C4.5 information gain from the empirical class proportions:
    /// `H(B) - |P|/|B| H(P) - |N|/|B| H(N)`.
    Unweighted,
    /// CART prior-weighted gain: each entropy is computed from prior-adjusted
    /// class probabilities and each branch is weighted by its marginal
    /// probability relative to the base node.
    PriorWeighted(PriorConfiguration<L>),
}

/// Every intermediate value of one gain evaluation.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GainBreakdown {
    /// Information gain (bits).
    pub gain: f64,
    /// Entropy of the base node.
    pub base_entropy: f64,
    /// Entropy of the positive branch (zero when the branch is empty).
    pub positive_entropy: f64,
    /// Entropy of the negative branch (zero when the branch is empty).
    pub negative_entropy: f64,
    /// Weight applied to the positive branch entropy.
    pub positive_weight: f64,
    /// Weight applied to the negative branch entropy.
    pub negative_weight: f64,
}

impl<L> SplitCriterion<L> {
    /// Create the unweighted (empirical-proportion) criterion.
    #[must_use]
    pub fn unweighted() -> Self {
        SplitCriterion::Unweighted
    }

    /// Create the prior-weighted criterion from a configuration.
    #[must_use]
    pub fn prior_weighted(config: PriorConfiguration<L>) -> Self {
        SplitCriterion::PriorWeighted(config)
    }

    /// Return `true` for the prior-weighted criterion.
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        matches!(self, SplitCriterion::PriorWeighted(_))
    }

    /// Return the prior configuration, if this criterion is prior-weighted.
    #[must_use]
    pub fn prior_configuration(&self) -> Option<&PriorConfiguration<L>> {
        match self {
            SplitCriterion::Unweighted => None,
            SplitCriterion::PriorWeighted(config) => Some(config),
        }
    }
}

impl<L: Ord + Clone + Debug> SplitCriterion<L> {
    /// Compute the information gain of splitting `base` into `positive` and `negative`.
    ///
    /// `positive` and `negative` are assumed to partition `base`; this is not
    /// checked here (see [`debug_check_partition`](crate::debug_check_partition)).
    ///
    /// # Errors
    ///
    /// See [`compute_split_breakdown`](Self::compute_split_breakdown).
    pub fn compute_split_gain(
        &mut self,
        base: &ClassHistogram<L>,
        positive: &ClassHistogram<L>,
        negative: &ClassHistogram<L>,
    ) -> Result<f64, GainError> {
        self.compute_split_breakdown(base, positive, negative)
            .map(|breakdown| breakdown.gain)
    }

    /// Compute the information gain together with its entropies and branch weights.
    ///
    /// An empty branch contributes weight zero and is not evaluated.
    ///
    /// In prior-weighted mode the branch weights are the branch marginal
    /// probabilities divided by the base marginal probability. They are not
    /// renormalized to sum to one.
    ///
    /// # Errors
    ///
    /// | Variant                                   | When                                                   |
    /// |-------------------------------------------|--------------------------------------------------------|
    /// | [`GainError::EmptyHistogram`]             | unweighted mode and `base` has zero total              |
    /// | [`GainError::ZeroMarginalProbability`]    | weighted mode and the base node has `p(t) == 0`        |
    /// | [`GainError::ZeroTrainingCount`]          | weighted mode and a counted class has no training data |
    /// | [`GainError::UnconfiguredLabel`]          | weighted mode and a counted class is not configured    |
    /// | [`GainError::NonFiniteGain`]              | the combined gain is NaN or infinite                   |
    pub fn compute_split_breakdown(
        &mut self,
        base: &ClassHistogram<L>,
        positive: &ClassHistogram<L>,
        negative: &ClassHistogram<L>,
    ) -> Result<GainBreakdown, GainError> {
        let breakdown = match self {
            SplitCriterion::Unweighted => unweighted_breakdown(base, positive, negative)?,
            SplitCriterion::PriorWeighted(config) => {
                weighted_breakdown(config, base, positive, negative)?
            }
        };
        if !breakdown.gain.is_finite() {
            return Err(GainError::NonFiniteGain {
                gain: breakdown.gain,
            });
        }
        Ok(breakdown)
    }
}

fn combine(base_entropy: f64, positive: (f64, f64), negative: (f64, f64)) -> GainBreakdown {
    let (positive_entropy, positive_weight) = positive;
    let (negative_entropy, negative_weight) = negative;
    GainBreakdown {
        gain: base_entropy - positive_weight * positive_entropy - negative_weight * negative_entropy,
        base_entropy,
        positive_entropy,
        negative_entropy,
        positive_weight,
        negative_weight,
    }
}

fn unweighted_breakdown<L: Ord>(
    base: &ClassHistogram<L>,
    positive: &ClassHistogram<L>,
    negative: &ClassHistogram<L>,
) -> Result<GainBreakdown, GainError> {
    let base_entropy = legacy_entropy(base)?;
    let total = base.total();

    // (entropy, proportion of the base total)
    let branch = |h: &ClassHistogram<L>| -> Result<(f64, f64), GainError> {
        if h.is_empty() {
            return Ok((0.0, 0.0));
        }
        Ok((legacy_entropy(h)?, h.total() / total))
    };

    Ok(combine(base_entropy, branch(positive)?, branch(negative)?))
}

fn weighted_breakdown<L: Ord + Clone + Debug>(
    config: &mut PriorConfiguration<L>,
    base: &ClassHistogram<L>,
    positive: &ClassHistogram<L>,
    negative: &ClassHistogram<L>,
) -> Result<GainBreakdown, GainError> {
    let base_result = config.weighted_entropy(base)?;
    let base_p = base_result.marginal_probability;

    // A branch that cannot be reached under the priors carries no weight.
    let mut branch = |h: &ClassHistogram<L>| -> Result<(f64, f64), GainError> {
        if h.is_empty() {
            return Ok((0.0, 0.0));
        }
        match config.weighted_entropy(h) {
            Ok(result) => Ok((result.entropy, result.marginal_probability / base_p)),
            Err(GainError::ZeroMarginalProbability) => Ok((0.0, 0.0)),
            Err(e) => Err(e),
        }
    };

    let positive_part = branch(positive)?;
    let negative_part = branch(negative)?;
    Ok(combine(base_result.entropy, positive_part, negative_part))
}
