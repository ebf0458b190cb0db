use crate::alignment::{Alignment, AlignmentStep};

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Fraction of alignment columns where both sides are present and equal,
/// over the total aligned length (gaps included). Rounded to 3 decimal
/// places; 0 for an empty alignment.
pub fn similarity<T: PartialEq>(alignment: &Alignment<'_, T>) -> f64 {
    let total = alignment.len();
    if total == 0 {
        return 0.0;
    }
    let matches = alignment
        .steps()
        .iter()
        .filter(|step| matches!(step, AlignmentStep::Pair { left, right } if left == right))
        .count();
    round3(matches as f64 / total as f64)
}

/// Raw alignment score divided by the longer original sequence length,
/// rounded to 3 decimal places. Guarded to 0 when both sequences are empty.
pub fn norm_score(score: i64, len1: usize, len2: usize) -> f64 {
    let longest = len1.max(len2);
    if longest == 0 {
        return 0.0;
    }
    round3(score as f64 / longest as f64)
}
