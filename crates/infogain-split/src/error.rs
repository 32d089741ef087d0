/// Errors from prior configuration and split-gain evaluation.
///
/// Class labels are carried as their `Debug` rendering so the error type
/// stays independent of the label type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GainError {
    /// Returned when an explicit prior table omits a label that has training counts.
    #[error("no prior probability supplied for class {label}")]
    MissingPrior {
        /// The class label without a prior.
        label: String,
    },

    /// Returned when an explicit prior table names a label with no training count.
    #[error("prior supplied for class {label}, which has no training count")]
    UnexpectedPriorLabel {
        /// The class label absent from the training counts.
        label: String,
    },

    /// Returned when a supplied prior is non-finite or outside [0, 1].
    #[error("prior for class {label} must be in [0, 1], got {value}")]
    InvalidPrior {
        /// The class label with the invalid prior.
        label: String,
        /// The invalid prior value.
        value: f64,
    },

    /// Returned when a histogram count is negative or non-finite.
    #[error("count for class {label} must be finite and non-negative, got {value}")]
    InvalidCount {
        /// The class label with the invalid count.
        label: String,
        /// The invalid count value.
        value: f64,
    },

    /// Returned when a histogram holds instances of a class that has zero training instances.
    #[error("class {label} has a positive histogram count but zero training instances")]
    ZeroTrainingCount {
        /// The class label with a zero training count.
        label: String,
    },

    /// Returned when a histogram holds instances of a class the configuration does not know.
    #[error("class {label} is not part of the prior configuration")]
    UnconfiguredLabel {
        /// The unknown class label.
        label: String,
    },

    /// Returned when the prior-weighted probability of reaching a node is zero.
    #[error("marginal node probability is zero; conditional class probabilities are undefined")]
    ZeroMarginalProbability,

    /// Returned when an unweighted entropy is requested for a histogram with zero total.
    #[error("histogram has zero total count")]
    EmptyHistogram,

    /// Returned when the combined gain is NaN or infinite.
    #[error("split gain is not finite: {gain}")]
    NonFiniteGain {
        /// The offending gain value.
        gain: f64,
    },

    /// Returned when the branch histograms do not add up to the base histogram.
    #[error("positive and negative histograms do not partition the base histogram (tolerance {tolerance})")]
    PartitionMismatch {
        /// The absolute tolerance the check was run with.
        tolerance: f64,
    },

    /// Returned when the partition-check tolerance is negative or non-finite.
    #[error("partition tolerance must be finite and non-negative, got {tolerance}")]
    InvalidTolerance {
        /// The invalid tolerance value.
        tolerance: f64,
    },
}

/// Render a class label for use in an error message.
pub(crate) fn label_name<L: std::fmt::Debug>(label: &L) -> String {
    format!("{label:?}")
}
