//! Sentiment fusion and the built-in scorers
//!
//! The two sentiment values normally come from external scorers. The fused
//! scalar that drives bucket selection is the lexicon score; the categorical
//! label is only used when it is the sole usable signal.

use std::collections::HashMap;
use lazy_static::lazy_static;
use regex::Regex;
use crate::CLASSIFIER_FALLBACK_THRESHOLD;
use crate::types::{SentimentBucket, SentimentSignal};

/// Continuous valence scorer: `score(text) -> [-1, 1]`
pub trait LexiconScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

/// Discrete classifier: `classify(text) -> {-1, 0, 1}`, `None` when it cannot answer
pub trait CategoricalClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Option<i8>;
}

/// Fuses the two signals into the scalar used for bucket selection
#[derive(Debug, Default, Clone, Copy)]
pub struct SentimentFusion;

impl SentimentFusion {
    pub fn new() -> Self {
        Self
    }

    /// Fused scalar when either scorer may be missing
    pub fn fuse(&self, lexicon_score: Option<f64>, categorical_label: Option<i8>) -> f64 {
        match (lexicon_score, categorical_label) {
            (Some(score), _) => score.clamp(-1.0, 1.0),
            (None, Some(label)) => label.clamp(-1, 1) as f64,
            (None, None) => 0.0,
        }
    }

    /// Fused scalar for a complete signal (the lexicon score)
    pub fn overall(&self, signal: &SentimentSignal) -> f64 {
        self.fuse(Some(signal.lexicon_score), Some(signal.categorical_label))
    }

    /// Template bucket for a complete signal
    pub fn bucket(&self, signal: &SentimentSignal) -> SentimentBucket {
        SentimentBucket::from_score(self.overall(signal))
    }
}

/// Label derived from a lexicon score: > 0.1 → 1, < -0.1 → -1, else 0
pub fn label_from_score(score: f64) -> i8 {
    if score > CLASSIFIER_FALLBACK_THRESHOLD {
        1
    } else if score < -CLASSIFIER_FALLBACK_THRESHOLD {
        -1
    } else {
        0
    }
}

// =============================================================================
// LEXICON SCORER
// =============================================================================

/// Normalisation constant for the compound score
const COMPOUND_ALPHA: f64 = 15.0;

/// Valence multiplier applied after a negator
const NEGATION_SCALAR: f64 = -0.74;

/// Boost added by an intensifier directly before a word
const INTENSIFIER_BOOST: f64 = 0.293;

/// How many preceding tokens are checked for a negator
const NEGATION_WINDOW: usize = 3;

const VALENCES: &[(&str, f64)] = &[
    // positive
    ("happy", 2.7), ("happiness", 2.6), ("glad", 2.0), ("joy", 2.8), ("excited", 2.2),
    ("great", 3.1), ("good", 1.9), ("wonderful", 2.7), ("amazing", 2.8), ("love", 3.2),
    ("loved", 2.9), ("proud", 2.1), ("grateful", 2.0), ("hopeful", 1.9), ("relieved", 1.5),
    ("peaceful", 2.2), ("calm", 1.3), ("confident", 2.2), ("optimistic", 1.3),
    ("motivated", 1.5), ("inspired", 2.2), ("better", 1.9), ("best", 3.2), ("fun", 2.3),
    ("thankful", 2.7), ("excellent", 2.7), ("fantastic", 2.6), ("nice", 1.8),
    ("success", 2.7), ("win", 2.8), ("won", 2.7), ("content", 1.6), ("safe", 1.9),
    // negative
    ("sad", -2.1), ("unhappy", -1.8), ("depressed", -2.3), ("depression", -2.7),
    ("lonely", -2.0), ("alone", -1.0), ("hurt", -2.4), ("pain", -2.3), ("crying", -2.1),
    ("angry", -2.3), ("mad", -2.2), ("furious", -2.7), ("hate", -2.7), ("upset", -1.6),
    ("annoyed", -1.6), ("frustrated", -1.5), ("anxious", -1.0), ("anxiety", -0.7),
    ("worried", -1.2), ("scared", -2.2), ("afraid", -2.0), ("fear", -2.2),
    ("nervous", -1.1), ("stress", -1.8), ("stressed", -1.4), ("overwhelmed", -1.5),
    ("exhausted", -1.5), ("tired", -1.4), ("hopeless", -2.0), ("helpless", -2.0),
    ("worthless", -1.9), ("useless", -1.8), ("failure", -2.3), ("ashamed", -2.1),
    ("guilty", -1.8), ("bad", -2.5), ("terrible", -2.1), ("awful", -2.0),
    ("horrible", -2.5), ("worst", -3.1), ("kill", -3.7), ("suicide", -3.5),
    ("die", -2.9), ("death", -2.9), ("dead", -3.3), ("lost", -1.3), ("cry", -2.1),
    ("miserable", -2.2), ("bored", -1.1), ("fired", -2.6), ("debt", -1.5),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without",
    "cannot", "cant", "dont", "didnt", "doesnt", "isnt", "wasnt", "wont",
];

const INTENSIFIERS: &[&str] = &[
    "very", "really", "so", "extremely", "incredibly", "totally", "completely",
    "absolutely", "deeply", "super",
];

lazy_static! {
    static ref RE_WORD: Regex = Regex::new(r"[a-z]+(?:'[a-z]+)?").unwrap();
    static ref LEXICON: HashMap<&'static str, f64> = VALENCES.iter().copied().collect();
}

/// Word-valence lexicon scorer with negation and intensifier handling
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }

    /// Sum of per-word valences, before normalisation
    pub fn raw_valence(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = RE_WORD.find_iter(&lower).map(|m| m.as_str()).collect();

        let mut total = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = LEXICON.get(*token) else {
                continue;
            };
            let mut valence = base;

            if i > 0 && INTENSIFIERS.contains(&tokens[i - 1]) {
                valence += INTENSIFIER_BOOST * base.signum();
            }

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|w| is_negator(w)) {
                valence *= NEGATION_SCALAR;
            }

            total += valence;
        }
        total
    }
}

impl LexiconScorer for LexiconSentiment {
    fn score(&self, text: &str) -> f64 {
        let raw = self.raw_valence(text);
        if raw == 0.0 {
            return 0.0;
        }
        (raw / (raw * raw + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

/// Categorical fallback: thresholds a lexicon scorer's output
pub struct ThresholdClassifier<L: LexiconScorer> {
    scorer: L,
}

impl<L: LexiconScorer> ThresholdClassifier<L> {
    pub fn new(scorer: L) -> Self {
        Self { scorer }
    }
}

impl<L: LexiconScorer> CategoricalClassifier for ThresholdClassifier<L> {
    fn classify(&self, text: &str) -> Option<i8> {
        Some(label_from_score(self.scorer.score(text)))
    }
}

/// Produces a `SentimentSignal` from text using the configured scorers
pub struct SentimentAnalyzer {
    lexicon: Box<dyn LexiconScorer>,
    classifier: Option<Box<dyn CategoricalClassifier>>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new(Box::new(LexiconSentiment::new()), None)
    }
}

impl SentimentAnalyzer {
    pub fn new(
        lexicon: Box<dyn LexiconScorer>,
        classifier: Option<Box<dyn CategoricalClassifier>>,
    ) -> Self {
        Self { lexicon, classifier }
    }

    /// Score text; the label falls back to thresholding the lexicon score
    /// when no classifier is configured or it cannot answer
    pub fn analyze(&self, text: &str) -> SentimentSignal {
        let score = self.lexicon.score(text);
        let label = self
            .classifier
            .as_ref()
            .and_then(|c| c.classify(text))
            .unwrap_or_else(|| label_from_score(score));
        SentimentSignal::new(score, label)
    }
}

// =============================================================================
// TESTS
// =============================================================================
