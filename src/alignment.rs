use std::fmt::Display;

use tracing::debug;

use crate::types::{AlignmentScoring, GAP};

/// One column of a global alignment. A column always carries at least one
/// element, so "gap against gap" is unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentStep<T> {
    Pair { left: T, right: T },
    LeftOnly { left: T },
    RightOnly { right: T },
}

impl<T> AlignmentStep<T> {
    pub fn left(&self) -> Option<&T> {
        match self {
            AlignmentStep::Pair { left, right: _ } => Some(left),
            AlignmentStep::LeftOnly { left } => Some(left),
            AlignmentStep::RightOnly { right: _ } => None,
        }
    }
    pub fn right(&self) -> Option<&T> {
        match self {
            AlignmentStep::Pair { left: _, right } => Some(right),
            AlignmentStep::LeftOnly { left: _ } => None,
            AlignmentStep::RightOnly { right } => Some(right),
        }
    }
}

/// Optimal global alignment of two sequences, with its raw Needleman-Wunsch
/// score and the ordered column list reconstructed by traceback.
#[derive(Debug)]
pub struct Alignment<'a, T> {
    pub score: i64,
    steps: Vec<AlignmentStep<&'a T>>,
}

impl<'a, T> Alignment<'a, T> {
    pub fn steps(&self) -> &[AlignmentStep<&'a T>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<'a, T: Display> Alignment<'a, T> {
    /// Render both aligned rows, substituting [`GAP`] where a sequence has no
    /// element in a column. The rows always have equal length.
    pub fn gapped_rows(&self) -> (Vec<String>, Vec<String>) {
        let mut left_row = Vec::with_capacity(self.steps.len());
        let mut right_row = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            left_row.push(step.left().map_or_else(|| GAP.to_string(), |t| t.to_string()));
            right_row.push(step.right().map_or_else(|| GAP.to_string(), |t| t.to_string()));
        }
        (left_row, right_row)
    }
}

/// Needleman-Wunsch global alignment of `left` against `right`.
///
/// Fills the full `(n+1) x (m+1)` score matrix, then walks back from the
/// bottom-right corner. Traceback prefers the diagonal whenever the two
/// elements compare equal, and breaks the up/left tie in favor of consuming
/// `left`. Quadratic in the sequence lengths; bounding input size is the
/// caller's responsibility.
pub fn align<'a, T, S>(scoring: &S, left: &'a [T], right: &'a [T]) -> Alignment<'a, T>
where
    T: PartialEq,
    S: AlignmentScoring<T>,
{
    let n = left.len();
    let m = right.len();
    let gap = scoring.gap_penalty();
    debug!(n, m, "aligning sequences");

    let mut dp = vec![vec![0i64; m + 1]; n + 1];
    for (i, row) in dp.iter_mut().enumerate().skip(1) {
        row[0] = i as i64 * gap;
    }
    for j in 1..=m {
        dp[0][j] = j as i64 * gap;
    }
    for i in 1..=n {
        for j in 1..=m {
            let substitution = scoring.substitution_score(&left[i - 1], &right[j - 1]);
            dp[i][j] = (dp[i - 1][j - 1] + substitution)
                .max(dp[i - 1][j] + gap)
                .max(dp[i][j - 1] + gap);
        }
    }

    let mut steps = Vec::with_capacity(n.max(m));
    let mut i = n;
    let mut j = m;
    while i > 0 && j > 0 {
        if left[i - 1] == right[j - 1] {
            steps.push(AlignmentStep::Pair {
                left: &left[i - 1],
                right: &right[j - 1],
            });
            i -= 1;
            j -= 1;
        } else if dp[i][j] == dp[i - 1][j] + gap {
            steps.push(AlignmentStep::LeftOnly { left: &left[i - 1] });
            i -= 1;
        } else {
            steps.push(AlignmentStep::RightOnly {
                right: &right[j - 1],
            });
            j -= 1;
        }
    }
    while i > 0 {
        steps.push(AlignmentStep::LeftOnly { left: &left[i - 1] });
        i -= 1;
    }
    while j > 0 {
        steps.push(AlignmentStep::RightOnly {
            right: &right[j - 1],
        });
        j -= 1;
    }
    steps.reverse();

    Alignment {
        score: dp[n][m],
        steps,
    }
}
