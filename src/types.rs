use std::fmt;

use serde::Serialize;

/// Placeholder emitted in an aligned row where the other sequence has no
/// corresponding element.
pub const GAP: &str = "-";

/// Closed category alphabet a source file is abstracted into. One label per
/// block, exhaustiveness-checked at every match site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstractToken {
    ImportStatement,
    FunctionDef,
    ClassDef,
    Loop,
    Conditional,
    Docstring,
    GeneralToken,
}

impl AbstractToken {
    pub fn label(&self) -> &'static str {
        match self {
            AbstractToken::ImportStatement => "import_statement",
            AbstractToken::FunctionDef => "function_def",
            AbstractToken::ClassDef => "class_def",
            AbstractToken::Loop => "loop",
            AbstractToken::Conditional => "conditional",
            AbstractToken::Docstring => "docstring",
            AbstractToken::GeneralToken => "general_token",
        }
    }
}

impl fmt::Display for AbstractToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A maximal run of lexemes between two segmentation boundaries, joined with
/// single spaces. The construct tag is fixed by the token that opened the
/// block; untagged blocks are `GeneralToken`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub text: String,
    pub construct: AbstractToken,
}

pub trait AlignmentScoring<T> {
    fn substitution_score(&self, left: &T, right: &T) -> i64;
    fn gap_penalty(&self) -> i64;
}

/// Match/mismatch/gap parameters for the global aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringScheme {
    pub match_score: i64,
    pub mismatch_penalty: i64,
    pub gap_penalty: i64,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_score: 2,
            mismatch_penalty: -1,
            gap_penalty: -2,
        }
    }
}

impl<T: PartialEq> AlignmentScoring<T> for ScoringScheme {
    fn substitution_score(&self, left: &T, right: &T) -> i64 {
        if left == right {
            self.match_score
        } else {
            self.mismatch_penalty
        }
    }

    fn gap_penalty(&self) -> i64 {
        self.gap_penalty
    }
}

/// Final artifact of one pairwise comparison. The caller owns persisting or
/// discarding it; the core keeps no state between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentResult {
    pub similarity: f64,
    pub needleman_score: i64,
    pub norm_score: f64,
    pub aligned_seq1: Vec<String>,
    pub aligned_seq2: Vec<String>,
}

impl AlignmentResult {
    /// Aligned row of the first file as one space-joined string.
    pub fn aligned_file1(&self) -> String {
        self.aligned_seq1.join(" ")
    }

    /// Aligned row of the second file as one space-joined string.
    pub fn aligned_file2(&self) -> String {
        self.aligned_seq2.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_snake_case() {
        assert_eq!(AbstractToken::ImportStatement.to_string(), "import_statement");
        assert_eq!(AbstractToken::FunctionDef.to_string(), "function_def");
        assert_eq!(AbstractToken::GeneralToken.to_string(), "general_token");
    }

    #[test]
    fn default_scheme_matches_contract() {
        let scheme = ScoringScheme::default();
        assert_eq!(scheme.match_score, 2);
        assert_eq!(scheme.mismatch_penalty, -1);
        assert_eq!(scheme.gap_penalty, -2);
        assert_eq!(
            scheme.substitution_score(&AbstractToken::Loop, &AbstractToken::Loop),
            2
        );
        assert_eq!(
            scheme.substitution_score(&AbstractToken::Loop, &AbstractToken::ClassDef),
            -1
        );
    }

    #[test]
    fn aligned_file_join_uses_single_spaces() {
        let result = AlignmentResult {
            similarity: 0.667,
            needleman_score: 2,
            norm_score: 0.667,
            aligned_seq1: vec!["loop".into(), "-".into(), "general_token".into()],
            aligned_seq2: vec!["loop".into(), "conditional".into(), "general_token".into()],
        };
        assert_eq!(result.aligned_file1(), "loop - general_token");
        assert_eq!(result.aligned_file2(), "loop conditional general_token");
    }
}
