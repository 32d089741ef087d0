use crate::histogram::ClassHistogram;

/// Return `true` if `positive` and `negative` partition `base`.
///
/// Totals and every label's counts must add up to within `tolerance`
/// (absolute). Labels absent from a histogram count as zero.
#[must_use]
pub fn debug_check_partition<L: Ord>(
    base: &ClassHistogram<L>,
    positive: &ClassHistogram<L>,
    negative: &ClassHistogram<L>,
    tolerance: f64,
) -> bool {
    let close = |a: f64, b: f64| (a - b).abs() <= tolerance;

    if !close(positive.total() + negative.total(), base.total()) {
        return false;
    }

    // Any label appearing in one of the three must balance.
    base.iter()
        .chain(positive.iter())
        .chain(negative.iter())
        .all(|(label, _)| close(positive.count(label) + negative.count(label), base.count(label)))
}
