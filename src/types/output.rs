//! Output structures for terminal display

use serde::Serialize;
use chrono::{DateTime, Utc};
use colored::Colorize;
use crate::types::{DetailTags, Provenance, ResponseCandidate, SentimentBucket, SentimentSignal};

/// One produced reply with the context that led to it
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Response text
    pub text: String,
    /// Stage that produced the text
    pub provenance: Provenance,
    /// Quality score, generative replies only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<i32>,
    /// Raw sentiment input
    pub signal: SentimentSignal,
    /// Bucket of the fused score
    pub bucket: SentimentBucket,
    /// Extracted tags
    pub details: DetailTags,
}

impl Reply {
    /// Create new reply
    pub fn new(
        candidate: ResponseCandidate,
        signal: SentimentSignal,
        bucket: SentimentBucket,
        details: DetailTags,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            text: candidate.text,
            provenance: candidate.provenance,
            quality: candidate.quality,
            signal,
            bucket,
            details,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let header = format!(
            "[{} | {} | lexicon={:+.3} label={:+}]",
            self.bucket,
            self.provenance.code(),
            self.signal.lexicon_score,
            self.signal.categorical_label,
        )
        .color(self.bucket.color());
        format!("{}\n{}", header, self.text.bold())
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "bucket={} | provenance={} | lexicon={:.3} | label={} | response={}",
            self.bucket,
            self.provenance.code(),
            self.signal.lexicon_score,
            self.signal.categorical_label,
            self.text
        )
    }
}
