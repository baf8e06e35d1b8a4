//! QualityGate: additive heuristic score for generative candidates
//!
//! Higher is better, no fixed ceiling. The orchestrator accepts a candidate
//! only at `QUALITY_THRESHOLD` or above.

use crate::{AFFECT_MISMATCH_THRESHOLD, QUALITY_THRESHOLD};

const LENGTH_BONUS_IDEAL: i32 = 4;
const LENGTH_BONUS_SHORT: i32 = 2;
const QUESTION_BONUS: i32 = 3;
const EMPATHY_BONUS: i32 = 2;
const SOCRATIC_BONUS: i32 = 2;
const SELF_REFERENCE_PENALTY: i32 = -10;
const GENERIC_PENALTY: i32 = -6;
const REPETITION_PENALTY: i32 = -5;
const AFFECT_MISMATCH_PENALTY: i32 = -8;

/// Distinct/total word ratio below which the candidate counts as repetitive
const MIN_DISTINCT_RATIO: f64 = 0.6;

/// +1 each when present
pub const THERAPEUTIC_KEYWORDS: &[&str] = &[
    "feel", "understand", "support", "help", "explore", "process",
    "acknowledge", "validate", "reflect", "share", "experience",
    "important", "meaningful", "difficult", "challenging", "growth",
    "progress", "journey", "healing", "coping", "resilience",
    "hear", "sounds", "seems", "think", "wonder", "curious",
    "courage", "strength", "valid", "normal", "natural",
];

/// +2 each when present
pub const EMPATHY_INDICATORS: &[&str] = &[
    "i hear", "i understand", "that sounds", "it seems", "i can see",
    "i imagine", "i can imagine", "that must be", "i'm sorry",
    "that's difficult", "that's challenging", "that's hard",
];

/// -10 each when present
pub const SELF_REFERENCE_PHRASES: &[&str] = &[
    "i am", "i'm a", "i work as", "i do", "my job", "my profession",
    "analyst", "assistant", "software company",
];

/// -6 each when present
pub const GENERIC_PHRASES: &[&str] = &[
    "thank you", "that is nice", "good job", "well done", "that is good",
    "that's good", "that's nice", "that's great", "that's a good philosophy",
    "that's a good point", "that's a good way", "that's a good approach",
];

/// Upbeat words that clash with strongly negative input
pub const POSITIVE_WORDS: &[&str] = &["good", "great", "wonderful", "excellent"];

/// +2 once if any is present
pub const SOCRATIC_PHRASES: &[&str] = &["what do you think", "how do you feel", "can you tell me more"];

/// Additive rubric scorer
#[derive(Debug, Default, Clone, Copy)]
pub struct QualityGate;

impl QualityGate {
    pub fn new() -> Self {
        Self
    }

    /// Score a candidate against the fused sentiment scalar
    pub fn score(&self, candidate: &str, sentiment: f64) -> i32 {
        if candidate.is_empty() {
            return 0;
        }

        let lower = candidate.to_lowercase();
        let mut score = 0;

        let length = candidate.chars().count();
        if (30..=200).contains(&length) {
            score += LENGTH_BONUS_IDEAL;
        } else if (15..30).contains(&length) {
            score += LENGTH_BONUS_SHORT;
        }

        score += count_present(&lower, THERAPEUTIC_KEYWORDS);

        if candidate.contains('?') {
            score += QUESTION_BONUS;
        }

        score += EMPATHY_BONUS * count_present(&lower, EMPATHY_INDICATORS);
        score += SELF_REFERENCE_PENALTY * count_present(&lower, SELF_REFERENCE_PHRASES);
        score += GENERIC_PENALTY * count_present(&lower, GENERIC_PHRASES);

        let words: Vec<&str> = lower.split_whitespace().collect();
        let mut distinct = words.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if (distinct.len() as f64) < words.len() as f64 * MIN_DISTINCT_RATIO {
            score += REPETITION_PENALTY;
        }

        if sentiment < AFFECT_MISMATCH_THRESHOLD && count_present(&lower, POSITIVE_WORDS) > 0 {
            score += AFFECT_MISMATCH_PENALTY;
        }

        if count_present(&lower, SOCRATIC_PHRASES) > 0 {
            score += SOCRATIC_BONUS;
        }

        score
    }

    /// Whether a score clears the acceptance bar
    pub fn accepts(&self, score: i32) -> bool {
        score >= QUALITY_THRESHOLD
    }
}

/// Number of list entries that occur in the text (each entry counted once)
fn count_present(lower: &str, phrases: &[&str]) -> i32 {
    phrases.iter().filter(|p| lower.contains(*p)).count() as i32
}
