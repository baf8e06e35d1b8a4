//! Sentiment signal and bucket definitions

use serde::{Deserialize, Serialize};
use crate::{POSITIVE_THRESHOLD, NEGATIVE_THRESHOLD};

/// The two independently computed sentiment values for one piece of text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    /// Continuous lexicon score in [-1, 1]
    pub lexicon_score: f64,
    /// Discrete classifier label in {-1, 0, 1}
    pub categorical_label: i8,
}

impl SentimentSignal {
    /// Create a signal, clamping both values into their domains
    pub fn new(lexicon_score: f64, categorical_label: i8) -> Self {
        let lexicon_score = if lexicon_score.is_finite() {
            lexicon_score.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            lexicon_score,
            categorical_label: categorical_label.clamp(-1, 1),
        }
    }

    /// Plain average of both values, as reported by the HTTP shell
    pub fn average(&self) -> f64 {
        (self.lexicon_score + self.categorical_label as f64) / 2.0
    }
}

/// Template pool selected from the fused sentiment scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentBucket {
    Positive,
    Neutral,
    Negative,
}

impl SentimentBucket {
    /// Bucket a fused score: > 0.3 positive, < -0.3 negative, else neutral
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentBucket::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentBucket::Negative
        } else {
            SentimentBucket::Neutral
        }
    }

    /// Get ANSI color name for terminal display
    pub fn color(&self) -> colored::Color {
        match self {
            SentimentBucket::Positive => colored::Color::Green,
            SentimentBucket::Neutral => colored::Color::BrightBlack,
            SentimentBucket::Negative => colored::Color::Yellow,
        }
    }
}

impl std::fmt::Display for SentimentBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SentimentBucket::Positive => "POSITIVE",
            SentimentBucket::Neutral => "NEUTRAL",
            SentimentBucket::Negative => "NEGATIVE",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries_are_exclusive() {
        assert_eq!(SentimentBucket::from_score(0.3), SentimentBucket::Neutral);
        assert_eq!(SentimentBucket::from_score(0.31), SentimentBucket::Positive);
        assert_eq!(SentimentBucket::from_score(-0.3), SentimentBucket::Neutral);
        assert_eq!(SentimentBucket::from_score(-0.31), SentimentBucket::Negative);
    }

    #[test]
    fn test_signal_clamps_inputs() {
        let signal = SentimentSignal::new(4.0, 7);
        assert_eq!(signal.lexicon_score, 1.0);
        assert_eq!(signal.categorical_label, 1);

        let signal = SentimentSignal::new(f64::NAN, -3);
        assert_eq!(signal.lexicon_score, 0.0);
        assert_eq!(signal.categorical_label, -1);
    }

    #[test]
    fn test_average() {
        let signal = SentimentSignal::new(0.5, 1);
        assert!((signal.average() - 0.75).abs() < 1e-12);
    }
}
