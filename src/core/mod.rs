//! Core modules for Attune

pub mod fusion;
pub mod details;
pub mod context;
pub mod filter;
pub mod quality;
pub mod generator;
pub mod cascade;
pub mod api;

pub use fusion::{
    label_from_score, CategoricalClassifier, LexiconScorer, LexiconSentiment, SentimentAnalyzer,
    SentimentFusion, ThresholdClassifier,
};
pub use details::DetailExtractor;
pub use context::{ContextRule, ContextSelector, CRISIS_RESPONSE};
pub use filter::{ContentFilter, Rejection};
pub use quality::QualityGate;
pub use generator::{
    strip_echo, GenerativeCandidateProducer, GeneratorCell, GeneratorConfig, GeneratorLoader,
    GeneratorStatus, HttpGenerator, SamplingParams, TextGenerator,
};
pub use cascade::{default_cascade, produce_response, CascadeOrchestrator, TemplatePool};
pub use api::{create_router, run_server, AppState};
