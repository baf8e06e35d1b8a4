//! CascadeOrchestrator: contextual rule → generative candidate → technique
//! pools → sentiment-bucketed templates
//!
//! Every stage returns a candidate or nothing; the first candidate wins. The
//! last stage always produces, so the cascade always yields a reply.

use std::sync::OnceLock;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use crate::core::details::contains_any;
use crate::core::{
    ContextSelector, DetailExtractor, GenerativeCandidateProducer, GeneratorCell,
    GeneratorConfig, GeneratorStatus, QualityGate, SentimentFusion,
};
use crate::types::{DetailTags, Reply, ResponseCandidate, SentimentBucket, SentimentSignal};

// =============================================================================
// POOLS
// =============================================================================

/// Requests for relaxation techniques
pub const RELAXATION_KEYWORDS: &[&str] = &[
    "relax", "relaxing", "calm", "stress", "anxiety", "breathing", "meditation", "technique",
];

/// Requests for coping strategies
pub const COPING_KEYWORDS: &[&str] = &[
    "cope", "coping", "deal with", "handle", "manage", "strategy", "help me",
];

pub const RELAXATION_TECHNIQUES: &[&str] = &[
    "Here are some relaxation techniques: Deep breathing, progressive muscle relaxation, guided meditation, or taking a warm bath. Which of these sounds most appealing to you?",
    "Try the 4-7-8 breathing technique: inhale for 4, hold for 7, exhale for 8. Or try progressive muscle relaxation. What feels most accessible to you?",
    "Some effective relaxation methods include mindfulness meditation, gentle stretching, or listening to calming music. Which of these resonates with you?",
    "Try box breathing: inhale for 4, hold for 4, exhale for 4, hold for 4. Or practice grounding by naming 5 things you can see, 4 you can touch, 3 you can hear, 2 you can smell, and 1 you can taste.",
    "Consider guided imagery or a body scan technique. What type of relaxation feels most natural to you?",
];

pub const COPING_STRATEGIES: &[&str] = &[
    "Some helpful coping strategies include journaling, talking to a friend, physical activity, or self-compassion. Which of these feels most helpful right now?",
    "Try cognitive reframing or setting small, achievable goals. What coping method has worked for you in the past?",
    "Healthy coping might include creative expression, time with loved ones, or activities that bring you joy. What feels most supportive to you?",
    "Try the STOP technique: Stop, Take a breath, Observe your thoughts and feelings, Proceed mindfully. Or practice self-soothing through your five senses. What resonates with you?",
    "Consider building a coping toolkit with activities like reading, music, walking, or calling a friend. What would you like to include?",
];

/// Sentiment-bucketed template pool with its default substitutions.
///
/// Placeholders: `{topic}`, `{emotion}`, `{time}`.
#[derive(Debug)]
pub struct TemplatePool {
    pub bucket: SentimentBucket,
    pub templates: &'static [&'static str],
    pub topic_default: &'static str,
    pub emotion_default: &'static str,
    pub time_default: &'static str,
}

impl TemplatePool {
    /// Pool for a bucket
    pub fn for_bucket(bucket: SentimentBucket) -> &'static TemplatePool {
        match bucket {
            SentimentBucket::Positive => &POSITIVE_POOL,
            SentimentBucket::Neutral => &NEUTRAL_POOL,
            SentimentBucket::Negative => &NEGATIVE_POOL,
        }
    }

    pub fn render(&self, template: &str, details: &DetailTags) -> String {
        template
            .replace("{topic}", details.topic_or(self.topic_default))
            .replace("{emotion}", details.emotion_or(self.emotion_default))
            .replace("{time}", details.time_or(self.time_default))
    }

    /// Every rendering of this pool for the given details
    pub fn renderings(&self, details: &DetailTags) -> Vec<String> {
        self.templates.iter().map(|t| self.render(t, details)).collect()
    }

    /// Uniformly random rendered template
    pub fn pick<R: Rng + ?Sized>(&self, details: &DetailTags, rng: &mut R) -> String {
        let template = self.templates.choose(rng).copied().unwrap_or(self.templates[0]);
        self.render(template, details)
    }
}

pub static POSITIVE_POOL: TemplatePool = TemplatePool {
    bucket: SentimentBucket::Positive,
    templates: &[
        "That's wonderful to hear about {topic}! What do you think contributed to this positive shift?",
        "I'm really proud of your progress with {topic}. What would you like to build on from here?",
        "You're doing a fantastic job with {topic}. What does this success tell you about your capabilities?",
        "It sounds like you're in a good place with {topic} {time}. Is there anything specific you'd like to explore?",
        "That's a significant achievement with {topic}! What did you learn about yourself through this process?",
    ],
    topic_default: "this",
    emotion_default: "how you're feeling",
    time_default: "recently",
};

pub static NEUTRAL_POOL: TemplatePool = TemplatePool {
    bucket: SentimentBucket::Neutral,
    templates: &[
        "Thanks for sharing that with me about {topic}. What's been on your mind lately?",
        "Sometimes our feelings about {topic} aren't always clear. What do you think might be contributing to {emotion} right now?",
        "I'm here for you with {topic}. What would be most helpful for us to focus on today?",
        "Can you tell me more about {topic}? What else comes to mind when you think about this?",
        "Let's explore {topic} together. What aspects of this feel most important to you right now?",
    ],
    topic_default: "this situation",
    emotion_default: "how you're feeling",
    time_default: "recently",
};

pub static NEGATIVE_POOL: TemplatePool = TemplatePool {
    bucket: SentimentBucket::Negative,
    templates: &[
        "I hear how difficult {topic} is for you. What's been most challenging about this situation?",
        "That sounds really tough with {topic}. Can you tell me more about what's contributing to {emotion}?",
        "It's okay to feel like this about {topic}. What do you think these emotions might be trying to communicate?",
        "Thanks for being open about {topic}. What would feel most supportive to you right now?",
        "I'm really sorry you're going through this with {topic}. What's one small thing we could do together to help you feel a bit more supported?",
    ],
    topic_default: "this situation",
    emotion_default: "these feelings",
    time_default: "recently",
};

// =============================================================================
// ORCHESTRATOR
// =============================================================================

/// Sequences the cascade stages
#[derive(Debug)]
pub struct CascadeOrchestrator {
    fusion: SentimentFusion,
    extractor: DetailExtractor,
    selector: ContextSelector,
    producer: GenerativeCandidateProducer,
    gate: QualityGate,
}

impl CascadeOrchestrator {
    /// Orchestrator around a generative producer
    pub fn new(producer: GenerativeCandidateProducer) -> Self {
        Self {
            fusion: SentimentFusion::new(),
            extractor: DetailExtractor::new(),
            selector: ContextSelector::new(),
            producer,
            gate: QualityGate::new(),
        }
    }

    /// Orchestrator that never attempts generation
    pub fn template_only() -> Self {
        Self::new(GenerativeCandidateProducer::disabled())
    }

    /// Orchestrator whose generator is configured from `config`
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(GenerativeCandidateProducer::new(GeneratorCell::new(config.loader())))
    }

    pub fn generator_status(&self) -> GeneratorStatus {
        self.producer.status()
    }

    /// Always returns a non-empty reply
    pub fn produce_response(&self, lexicon_score: f64, categorical_label: i8, raw_text: &str) -> String {
        self.respond(
            SentimentSignal::new(lexicon_score, categorical_label),
            raw_text,
            &mut rand::thread_rng(),
        )
        .text
    }

    /// Run the cascade with an explicit random source for the template stages
    pub fn respond<R: Rng + ?Sized>(
        &self,
        signal: SentimentSignal,
        raw_text: &str,
        rng: &mut R,
    ) -> Reply {
        let overall = self.fusion.overall(&signal);
        let bucket = SentimentBucket::from_score(overall);
        let details = self.extractor.extract(raw_text);

        let candidate = self
            .contextual(raw_text, &details)
            .or_else(|| self.generative(raw_text, overall))
            .or_else(|| self.technique(raw_text, rng))
            .unwrap_or_else(|| self.bucketed(bucket, &details, rng));

        debug!(
            provenance = candidate.provenance.code(),
            %bucket,
            topic = details.topic,
            "response selected"
        );
        Reply::new(candidate, signal, bucket, details)
    }

    fn contextual(&self, raw_text: &str, details: &DetailTags) -> Option<ResponseCandidate> {
        let rule = self.selector.matching_rule(raw_text, details)?;
        debug!(rule = rule.name, "contextual rule matched");
        Some(ResponseCandidate::contextual(rule.template.render(details)))
    }

    fn generative(&self, raw_text: &str, overall: f64) -> Option<ResponseCandidate> {
        let text = self.producer.produce(raw_text)?;
        let score = self.gate.score(&text, overall);
        if self.gate.accepts(score) {
            Some(ResponseCandidate::generative(text, score))
        } else {
            debug!(score, "generative candidate below quality threshold");
            None
        }
    }

    fn technique<R: Rng + ?Sized>(&self, raw_text: &str, rng: &mut R) -> Option<ResponseCandidate> {
        let lower = raw_text.to_lowercase();
        let pool = if contains_any(&lower, RELAXATION_KEYWORDS) {
            RELAXATION_TECHNIQUES
        } else if contains_any(&lower, COPING_KEYWORDS) {
            COPING_STRATEGIES
        } else {
            return None;
        };
        pool.choose(rng).map(|t| ResponseCandidate::template(*t))
    }

    fn bucketed<R: Rng + ?Sized>(
        &self,
        bucket: SentimentBucket,
        details: &DetailTags,
        rng: &mut R,
    ) -> ResponseCandidate {
        ResponseCandidate::template(TemplatePool::for_bucket(bucket).pick(details, rng))
    }
}

static DEFAULT_CASCADE: OnceLock<CascadeOrchestrator> = OnceLock::new();

/// Process-wide orchestrator, generator configured from the environment
pub fn default_cascade() -> &'static CascadeOrchestrator {
    DEFAULT_CASCADE.get_or_init(|| CascadeOrchestrator::from_config(&GeneratorConfig::from_env()))
}

/// Supportive reply for one disclosure. Never fails, never empty.
pub fn produce_response(lexicon_score: f64, categorical_label: i8, raw_text: &str) -> String {
    default_cascade().produce_response(lexicon_score, categorical_label, raw_text)
}

// =============================================================================
// TESTS
// =============================================================================
