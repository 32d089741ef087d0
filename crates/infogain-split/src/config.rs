//! Configuration builder for split-gain evaluation.

use std::collections::BTreeMap;
use std::fmt::Debug;

use tracing::debug;

use crate::criterion::{GainBreakdown, SplitCriterion};
use crate::error::GainError;
use crate::histogram::ClassHistogram;
use crate::partition::debug_check_partition;
use crate::priors::PriorConfiguration;

/// How class priors enter the gain computation.
#[derive(Debug, Clone, PartialEq)]
pub enum Weighting<L> {
    /// Empirical node proportions, no priors.
    Unweighted,
    /// Prior-weighted, with priors equal to the training class frequencies.
    Empirical,
    /// Prior-weighted, with caller-supplied priors.
    Explicit(BTreeMap<L, f64>),
}

/// Whether each evaluation verifies that the branches partition the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionCheck {
    /// Return [`GainError::PartitionMismatch`] for a broken partition.
    Enabled,
    /// Trust the caller.
    Disabled,
}

/// Configuration for split-gain evaluation.
///
/// Construct via [`CriterionConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter         | Default      |
/// |-------------------|--------------|
/// | `weighting`       | `Unweighted` |
/// | `partition_check` | `Disabled`   |
/// | `tolerance`       | 1e-9         |
#[derive(Debug, Clone)]
pub struct CriterionConfig<L> {
    pub(crate) weighting: Weighting<L>,
    pub(crate) partition_check: PartitionCheck,
    pub(crate) tolerance: f64,
}

impl<L> Default for CriterionConfig<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> CriterionConfig<L> {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            weighting: Weighting::Unweighted,
            partition_check: PartitionCheck::Disabled,
            tolerance: 1e-9,
        }
    }

    // --- Setters ---

    /// Set how class priors are used.
    #[must_use]
    pub fn with_weighting(mut self, weighting: Weighting<L>) -> Self {
        self.weighting = weighting;
        self
    }

    /// Set whether each evaluation checks the partition invariant.
    #[must_use]
    pub fn with_partition_check(mut self, partition_check: PartitionCheck) -> Self {
        self.partition_check = partition_check;
        self
    }

    /// Set the absolute tolerance of the partition check.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    // --- Getters ---

    /// Return the weighting mode.
    #[must_use]
    pub fn weighting(&self) -> &Weighting<L> {
        &self.weighting
    }

    /// Return the partition check mode.
    #[must_use]
    pub fn partition_check(&self) -> PartitionCheck {
        self.partition_check
    }

    /// Return the partition check tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl<L: Ord + Clone + Debug> CriterionConfig<L> {
    /// Build a ready-to-use criterion.
    ///
    /// `train_counts` holds the number of training instances per class; it is
    /// ignored in unweighted mode.
    ///
    /// # Errors
    ///
    /// | Variant                                | When                                          |
    /// |----------------------------------------|-----------------------------------------------|
    /// | [`GainError::InvalidTolerance`]        | `tolerance` is negative or non-finite         |
    /// | [`GainError::MissingPrior`]            | explicit priors omit a training label         |
    /// | [`GainError::UnexpectedPriorLabel`]    | explicit priors name an unknown label         |
    /// | [`GainError::InvalidPrior`]            | an explicit prior is outside [0, 1]           |
    pub fn build(
        &self,
        train_counts: &BTreeMap<L, u64>,
    ) -> Result<ConfiguredCriterion<L>, GainError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(GainError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }

        let criterion = match &self.weighting {
            Weighting::Unweighted => SplitCriterion::unweighted(),
            Weighting::Empirical => {
                SplitCriterion::prior_weighted(PriorConfiguration::try_configure(None, train_counts)?)
            }
            Weighting::Explicit(priors) => SplitCriterion::prior_weighted(
                PriorConfiguration::try_configure(Some(priors), train_counts)?,
            ),
        };

        debug!(
            weighted = criterion.is_weighted(),
            partition_check = ?self.partition_check,
            "split criterion built"
        );

        Ok(ConfiguredCriterion {
            criterion,
            partition_check: self.partition_check,
            tolerance: self.tolerance,
        })
    }
}

/// A [`SplitCriterion`] together with its evaluation options.
#[derive(Debug, Clone)]
pub struct ConfiguredCriterion<L> {
    criterion: SplitCriterion<L>,
    partition_check: PartitionCheck,
    tolerance: f64,
}

impl<L> From<SplitCriterion<L>> for ConfiguredCriterion<L> {
    fn from(criterion: SplitCriterion<L>) -> Self {
        Self {
            criterion,
            partition_check: PartitionCheck::Disabled,
            tolerance: 0.0,
        }
    }
}

impl<L> ConfiguredCriterion<L> {
    /// Return the underlying criterion.
    #[must_use]
    pub fn criterion(&self) -> &SplitCriterion<L> {
        &self.criterion
    }

    /// Consume the wrapper and return the underlying criterion.
    #[must_use]
    pub fn into_criterion(self) -> SplitCriterion<L> {
        self.criterion
    }
}

impl<L: Ord + Clone + Debug> ConfiguredCriterion<L> {
    /// Compute the information gain of a split. See [`SplitCriterion::compute_split_gain`].
    ///
    /// # Errors
    ///
    /// [`GainError::PartitionMismatch`] when the check is enabled and fails,
    /// otherwise as [`SplitCriterion::compute_split_breakdown`].
    pub fn compute_split_gain(
        &mut self,
        base: &ClassHistogram<L>,
        positive: &ClassHistogram<L>,
        negative: &ClassHistogram<L>,
    ) -> Result<f64, GainError> {
        self.compute_split_breakdown(base, positive, negative)
            .map(|breakdown| breakdown.gain)
    }

    /// Compute the gain breakdown of a split, checking the partition first if enabled.
    ///
    /// # Errors
    ///
    /// See [`compute_split_gain`](Self::compute_split_gain).
    pub fn compute_split_breakdown(
        &mut self,
        base: &ClassHistogram<L>,
        positive: &ClassHistogram<L>,
        negative: &ClassHistogram<L>,
    ) -> Result<GainBreakdown, GainError> {
        if self.partition_check == PartitionCheck::Enabled
            && !debug_check_partition(base, positive, negative, self.tolerance)
        {
            return Err(GainError::PartitionMismatch {
                tolerance: self.tolerance,
            });
        }
        self.criterion
            .compute_split_breakdown(base, positive, negative)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{CriterionConfig, PartitionCheck, Weighting};
    use crate::{ClassHistogram, GainError, PriorSource, SplitCriterion};

    fn train() -> BTreeMap<&'static str, u64> {
        [("a", 100), ("b", 100)].into_iter().collect()
    }

    fn hist(pairs: &[(&'static str, f64)]) -> ClassHistogram<&'static str> {
        ClassHistogram::from_counts(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn defaults() {
        let cfg: CriterionConfig<&str> = CriterionConfig::new();
        assert_eq!(cfg.weighting(), &Weighting::Unweighted);
        assert_eq!(cfg.partition_check(), PartitionCheck::Disabled);
        assert!((cfg.tolerance() - 1e-9).abs() < f64::EPSILON);
    }

    #[test]
    fn unweighted_build_ignores_counts() {
        let built = CriterionConfig::new().build(&BTreeMap::<&str, u64>::new()).unwrap();
        assert!(!built.criterion().is_weighted());
    }

    #[test]
    fn empirical_build_configures_priors() {
        let built = CriterionConfig::new()
            .with_weighting(Weighting::Empirical)
            .build(&train())
            .unwrap();
        let priors = built.criterion().prior_configuration().unwrap();
        assert_eq!(priors.prior_source(), PriorSource::Empirical);
        assert_eq!(priors.priors(), &[0.5, 0.5]);
    }

    #[test]
    fn explicit_build_surfaces_missing_prior() {
        let err = CriterionConfig::new()
            .with_weighting(Weighting::Explicit([("a", 1.0)].into_iter().collect()))
            .build(&train())
            .unwrap_err();
        assert!(matches!(err, GainError::MissingPrior { .. }));
    }

    #[test]
    fn negative_tolerance_rejected() {
        let err = CriterionConfig::<&str>::new()
            .with_tolerance(-1.0)
            .build(&BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, GainError::InvalidTolerance { .. }));
    }

    #[test]
    fn partition_check_rejects_broken_split() {
        let mut built = CriterionConfig::new()
            .with_partition_check(PartitionCheck::Enabled)
            .build(&train())
            .unwrap();
        let err = built
            .compute_split_gain(
                &hist(&[("a", 10.0), ("b", 10.0)]),
                &hist(&[("a", 10.0)]),
                &hist(&[("b", 3.0)]),
            )
            .unwrap_err();
        assert!(matches!(err, GainError::PartitionMismatch { .. }));
    }

    #[test]
    fn partition_check_passes_valid_split() {
        let mut built = CriterionConfig::new()
            .with_weighting(Weighting::Explicit([("a", 0.9), ("b", 0.1)].into_iter().collect()))
            .with_partition_check(PartitionCheck::Enabled)
            .build(&train())
            .unwrap();
        let gain = built
            .compute_split_gain(
                &hist(&[("a", 50.0), ("b", 50.0)]),
                &hist(&[("a", 40.0), ("b", 5.0)]),
                &hist(&[("a", 10.0), ("b", 45.0)]),
            )
            .unwrap();
        assert!(gain > 0.0);
    }

    #[test]
    fn disabled_check_trusts_the_caller() {
        let mut built: super::ConfiguredCriterion<&str> = SplitCriterion::unweighted().into();
        let gain = built
            .compute_split_gain(
                &hist(&[("a", 10.0), ("b", 10.0)]),
                &hist(&[("a", 10.0)]),
                &hist(&[("b", 3.0)]),
            )
            .unwrap();
        assert!(gain.is_finite());
    }
}
