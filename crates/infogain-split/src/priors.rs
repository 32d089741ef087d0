//! Class-prior configuration and prior-weighted node entropy.
//!
//! The weighted entropy follows Breiman et al. (1984), "Classification and
//! Regression Trees": the probability of class `j` at node `t` is estimated
//! from the class prior and the fraction of that class's training instances
//! that reach the node, rather than from the node's raw class proportions.

use std::collections::BTreeMap;
use std::fmt::Debug;

use tracing::debug;

use crate::entropy::{WeightedEntropy, entropy_term};
use crate::error::{GainError, label_name};
use crate::histogram::ClassHistogram;

/// Where the configured class priors came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PriorSource {
    /// Relative class frequencies of the training counts.
    Empirical,
    /// `1 / n_classes` for every class; used when all training counts are zero.
    Uniform,
    /// Supplied by the caller, used as-is without renormalization.
    Explicit,
}

/// Validated class priors and training counts in a fixed label order,
/// plus the scratch space reused by every weighted entropy evaluation.
///
/// A configuration must not be shared by two in-flight evaluations; the
/// `&mut self` receiver of [`weighted_entropy`](Self::weighted_entropy)
/// enforces this. Parallel callers clone one configuration per worker.
#[derive(Debug, Clone)]
pub struct PriorConfiguration<L> {
    labels: Vec<L>,
    priors: Vec<f64>,
    train_counts: Vec<u64>,
    source: PriorSource,
    /// Per-class joint probabilities of the current evaluation.
    scratch: Vec<f64>,
}

impl<L: Ord + Clone + Debug> PriorConfiguration<L> {
    /// Build a configuration from training counts and optional explicit priors.
    ///
    /// The label order is the key order of `train_counts`. Without `priors`,
    /// each class prior is its relative training frequency, or `1 / n_classes`
    /// when every training count is zero. An empty `train_counts` yields an
    /// empty configuration.
    ///
    /// # Errors
    ///
    /// | Variant                                | When                                              |
    /// |----------------------------------------|---------------------------------------------------|
    /// | [`GainError::MissingPrior`]            | a training label has no entry in `priors`         |
    /// | [`GainError::UnexpectedPriorLabel`]    | `priors` names a label with no training count     |
    /// | [`GainError::InvalidPrior`]            | a supplied prior is non-finite or outside [0, 1]  |
    pub fn try_configure(
        priors: Option<&BTreeMap<L, f64>>,
        train_counts: &BTreeMap<L, u64>,
    ) -> Result<Self, GainError> {
        let labels: Vec<L> = train_counts.keys().cloned().collect();
        let counts: Vec<u64> = train_counts.values().copied().collect();
        let n_classes = labels.len();
        // Summed in f64 so very large counts cannot overflow.
        let total: f64 = counts.iter().map(|&c| c as f64).sum();

        let (class_priors, source) = match priors {
            None if total > 0.0 => {
                let empirical: Vec<f64> = counts.iter().map(|&c| c as f64 / total).collect();
                (empirical, PriorSource::Empirical)
            }
            None => (vec![1.0 / n_classes as f64; n_classes], PriorSource::Uniform),
            Some(supplied) => {
                if let Some(extra) = supplied.keys().find(|l| !train_counts.contains_key(*l)) {
                    return Err(GainError::UnexpectedPriorLabel {
                        label: label_name(extra),
                    });
                }
                let explicit = labels
                    .iter()
                    .map(|label| {
                        let value = *supplied.get(label).ok_or_else(|| GainError::MissingPrior {
                            label: label_name(label),
                        })?;
                        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                            return Err(GainError::InvalidPrior {
                                label: label_name(label),
                                value,
                            });
                        }
                        Ok(value)
                    })
                    .collect::<Result<Vec<f64>, GainError>>()?;
                (explicit, PriorSource::Explicit)
            }
        };

        debug!(n_classes, total, ?source, "class priors configured");

        Ok(Self {
            labels,
            priors: class_priors,
            train_counts: counts,
            source,
            scratch: vec![0.0; n_classes],
        })
    }

    /// Compute the prior-weighted entropy of `histogram` and the marginal
    /// probability of reaching the node it describes.
    ///
    /// For each class `j`: `p(j, t) = prior(j) * count_t(j) / train_count(j)`,
    /// `p(t) = Σ_j p(j, t)`, and the entropy is `-Σ_j p(j|t) log2 p(j|t)`
    /// over classes with `p(j|t) > 0`.
    ///
    /// # Errors
    ///
    /// | Variant                                   | When                                                  |
    /// |-------------------------------------------|-------------------------------------------------------|
    /// | [`GainError::UnconfiguredLabel`]          | a label with positive count is not configured         |
    /// | [`GainError::ZeroTrainingCount`]          | a class with positive count has no training instances |
    /// | [`GainError::ZeroMarginalProbability`]    | `p(t)` is zero                                        |
    pub fn weighted_entropy(
        &mut self,
        histogram: &ClassHistogram<L>,
    ) -> Result<WeightedEntropy, GainError> {
        self.scratch.fill(0.0);

        for (label, count) in histogram.iter() {
            if count <= 0.0 {
                continue;
            }
            let j = self
                .labels
                .binary_search(label)
                .map_err(|_| GainError::UnconfiguredLabel {
                    label: label_name(label),
                })?;
            let train_count = self.train_counts[j];
            if train_count == 0 {
                return Err(GainError::ZeroTrainingCount {
                    label: label_name(label),
                });
            }
            self.scratch[j] = self.priors[j] * count / train_count as f64;
        }

        let p_t: f64 = self.scratch.iter().sum();
        if p_t <= 0.0 {
            return Err(GainError::ZeroMarginalProbability);
        }

        let entropy: f64 = self.scratch.iter().map(|&joint| entropy_term(joint / p_t)).sum();

        Ok(WeightedEntropy {
            entropy,
            marginal_probability: p_t,
        })
    }
}

impl<L> PriorConfiguration<L> {
    /// Return the class labels in configured order.
    #[must_use]
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Return the class priors, parallel to [`labels`](Self::labels).
    #[must_use]
    pub fn priors(&self) -> &[f64] {
        &self.priors
    }

    /// Return the per-class training counts, parallel to [`labels`](Self::labels).
    #[must_use]
    pub fn train_counts(&self) -> &[u64] {
        &self.train_counts
    }

    /// Return the number of configured classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// Return where the priors came from.
    #[must_use]
    pub fn prior_source(&self) -> PriorSource {
        self.source
    }
}
