//! Base-2 Shannon entropy of class distributions.

use std::f64::consts::LN_2;

use crate::error::GainError;
use crate::histogram::ClassHistogram;

/// Result of a prior-weighted entropy evaluation at one node.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeightedEntropy {
    /// Entropy (bits) of the prior-adjusted conditional class distribution.
    pub entropy: f64,
    /// Estimated probability that a prior-weighted instance reaches the node.
    pub marginal_probability: f64,
}

/// Compute `log2(x)` as `ln(x) / ln(2)`. `x` should be positive.
#[inline]
pub(crate) fn lb(x: f64) -> f64 {
    x.ln() / LN_2
}

/// Entropy contribution `-p * log2(p)`, taken as zero for `p <= 0`.
#[inline]
pub(crate) fn entropy_term(p: f64) -> f64 {
    if p > 0.0 { -p * lb(p) } else { 0.0 }
}

/// Unweighted Shannon entropy (bits) of the empirical class proportions.
///
/// Labels with zero count contribute nothing.
///
/// # Errors
///
/// Returns [`GainError::EmptyHistogram`] if the histogram total is zero.
pub fn legacy_entropy<L: Ord>(histogram: &ClassHistogram<L>) -> Result<f64, GainError> {
    let total = histogram.total();
    if total <= 0.0 {
        return Err(GainError::EmptyHistogram);
    }
    Ok(histogram
        .iter()
        .map(|(_, count)| entropy_term(count / total))
        .sum())
}
