//! Structural similarity between two source files.
//!
//! Each file is scanned into construct-tagged blocks, abstracted to a closed
//! category alphabet, and the two category sequences are globally aligned
//! with Needleman-Wunsch. The result carries the raw score, a normalized
//! score, a match-ratio similarity, and both gapped rows.
//!
//! The whole pipeline is pure and synchronous: no I/O, no global state, and
//! every input (including malformed source) produces a fully defined result.

pub mod alignment;
pub mod scoring;
pub mod tokenizer;
pub mod types;

use crate::alignment::align;
use crate::scoring::{norm_score, similarity};
use crate::tokenizer::{abstract_blocks, tokenize};
use crate::types::{AlignmentResult, ScoringScheme};

/// Compare two source texts end to end with the default scoring scheme.
pub fn compute_result(text1: &str, text2: &str) -> AlignmentResult {
    compute_result_with(text1, text2, ScoringScheme::default())
}

/// Compare two source texts end to end with an explicit scoring scheme.
pub fn compute_result_with(text1: &str, text2: &str, scheme: ScoringScheme) -> AlignmentResult {
    let seq1 = abstract_blocks(&tokenize(text1));
    let seq2 = abstract_blocks(&tokenize(text2));
    let alignment = align(&scheme, &seq1, &seq2);
    let (aligned_seq1, aligned_seq2) = alignment.gapped_rows();
    AlignmentResult {
        similarity: similarity(&alignment),
        needleman_score: alignment.score,
        norm_score: norm_score(alignment.score, seq1.len(), seq2.len()),
        aligned_seq1,
        aligned_seq2,
    }
}
