//! Per-class count histograms for the instances reaching a tree node.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{GainError, label_name};

/// Count (or weight) of instances per class label, with a cached total.
///
/// Labels are kept in `Ord` order. Counts are finite and non-negative;
/// a label may be present with a zero count.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassHistogram<L> {
    counts: BTreeMap<L, f64>,
    total: f64,
}

impl<L: Ord> Default for ClassHistogram<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Ord> ClassHistogram<L> {
    /// Create an empty histogram with total zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0.0,
        }
    }

    /// Build a histogram counting one unit per label occurrence.
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
    {
        let mut histogram = Self::new();
        for label in labels {
            histogram.increment(label);
        }
        histogram
    }

    /// Add one unit of count to `label`.
    pub fn increment(&mut self, label: L) {
        *self.counts.entry(label).or_insert(0.0) += 1.0;
        self.total += 1.0;
    }

    /// Return the count for `label`, or zero if the label is absent.
    #[must_use]
    pub fn count(&self, label: &L) -> f64 {
        self.counts.get(label).copied().unwrap_or(0.0)
    }

    /// Return the sum of all counts.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Return `true` if the total count is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0.0
    }

    /// Return the number of labels present (including zero-count labels).
    #[must_use]
    pub fn n_labels(&self) -> usize {
        self.counts.len()
    }

    /// Iterate over `(label, count)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&L, f64)> {
        self.counts.iter().map(|(label, &count)| (label, count))
    }
}

impl<L: Ord + Debug> ClassHistogram<L> {
    /// Build a histogram from `(label, count)` pairs. Repeated labels accumulate.
    ///
    /// # Errors
    ///
    /// Returns [`GainError::InvalidCount`] if any count is negative or non-finite.
    pub fn from_counts<I>(counts: I) -> Result<Self, GainError>
    where
        I: IntoIterator<Item = (L, f64)>,
    {
        let mut histogram = Self::new();
        for (label, count) in counts {
            histogram.add(label, count)?;
        }
        Ok(histogram)
    }

    /// Add `weight` to the count for `label`.
    ///
    /// # Errors
    ///
    /// Returns [`GainError::InvalidCount`] if `weight` is negative or non-finite.
    pub fn add(&mut self, label: L, weight: f64) -> Result<(), GainError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(GainError::InvalidCount {
                label: label_name(&label),
                value: weight,
            });
        }
        *self.counts.entry(label).or_insert(0.0) += weight;
        self.total += weight;
        Ok(())
    }
}

impl<L: Serialize> Serialize for ClassHistogram<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.counts.serialize(serializer)
    }
}

impl<'de, L> Deserialize<'de> for ClassHistogram<L>
where
    L: Ord + Debug + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let counts = BTreeMap::<L, f64>::deserialize(deserializer)?;
        Self::from_counts(counts).map_err(serde::de::Error::custom)
    }
}
