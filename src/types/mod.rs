//! Core types for Attune

mod sentiment;
mod details;
mod candidate;
mod situation;
mod error;
mod output;

pub use sentiment::{SentimentSignal, SentimentBucket};
pub use details::{DetailTags, Emotion, TimeFrame};
pub use candidate::{ResponseCandidate, Provenance};
pub use situation::Situation;
pub use error::GenerationError;
pub use output::Reply;
