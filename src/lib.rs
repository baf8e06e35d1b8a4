//! Attune: supportive reply engine
//!
//! Raw text + two sentiment signals → DetailExtractor → ContextSelector →
//! generative candidate (quality gate + content filter) → template pools

pub mod core;
pub mod types;

pub use crate::core::produce_response;

// =============================================================================
// SENTIMENT THRESHOLDS
// =============================================================================

/// Lexicon score above this selects the positive pool
pub const POSITIVE_THRESHOLD: f64 = 0.3;

/// Lexicon score below this selects the negative pool
pub const NEGATIVE_THRESHOLD: f64 = -0.3;

/// Fallback thresholding when the categorical classifier is unavailable
pub const CLASSIFIER_FALLBACK_THRESHOLD: f64 = 0.1;

/// Below this score, upbeat wording in a candidate is penalised
pub const AFFECT_MISMATCH_THRESHOLD: f64 = -0.5;

// =============================================================================
// QUALITY GATE
// =============================================================================

/// Minimum quality score for a generative candidate to be used
pub const QUALITY_THRESHOLD: i32 = 10;

// =============================================================================
// GENERATION DEFAULTS
// =============================================================================

/// Upper bound on generated tokens
pub const MAX_NEW_TOKENS: u32 = 64;

/// Prompt truncation length (tokens) passed to the backend
pub const MAX_PROMPT_TOKENS: u32 = 128;

/// Sampling temperature
pub const TEMPERATURE: f64 = 0.7;

/// Nucleus sampling mass
pub const TOP_P: f64 = 0.9;

/// Repetition penalty
pub const REPETITION_PENALTY: f64 = 1.1;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "0.4.0";
