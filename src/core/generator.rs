//! GenerativeCandidateProducer: external text generation behind a lazy,
//! failure-memoized handle
//!
//! The handle is acquired at most once per `GeneratorCell`. The first outcome
//! (ready or unavailable) is permanent; concurrent first calls block on the
//! same initialization instead of loading twice.

use std::sync::{Arc, OnceLock};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::core::filter::ContentFilter;
use crate::types::{GenerationError, Situation};
use crate::{MAX_NEW_TOKENS, MAX_PROMPT_TOKENS, REPETITION_PENALTY, TEMPERATURE, TOP_P};

/// Decoding parameters passed to the backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub max_new_tokens: u32,
    pub max_prompt_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_new_tokens: MAX_NEW_TOKENS,
            max_prompt_tokens: MAX_PROMPT_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            repetition_penalty: REPETITION_PENALTY,
        }
    }
}

/// External generation service. Synchronous; may fail per call.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str, params: &SamplingParams) -> Result<String, GenerationError>;
}

/// Builds the generator handle; called at most once per cell
pub type GeneratorLoader =
    Box<dyn Fn() -> Result<Arc<dyn TextGenerator>, GenerationError> + Send + Sync>;

/// Lifecycle of the generator handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorStatus {
    Uninitialized,
    Ready,
    Unavailable,
}

/// Lazily initialized generator handle with a sticky failure sentinel
pub struct GeneratorCell {
    handle: OnceLock<Result<Arc<dyn TextGenerator>, GenerationError>>,
    loader: GeneratorLoader,
}

impl std::fmt::Debug for GeneratorCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorCell")
            .field("status", &self.status())
            .finish()
    }
}

impl GeneratorCell {
    /// Cell that runs `loader` on first access
    pub fn new(loader: GeneratorLoader) -> Self {
        Self {
            handle: OnceLock::new(),
            loader,
        }
    }

    /// Cell that never loads anything
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(Box::new(move || Err(GenerationError::Unavailable(reason.clone()))))
    }

    /// Cell wrapping an already constructed generator
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(Box::new(move || Ok(Arc::clone(&generator))))
    }

    /// Handle, loading it on first call. A failed load is never retried.
    pub fn get_or_init(&self) -> Result<Arc<dyn TextGenerator>, GenerationError> {
        self.handle
            .get_or_init(|| {
                let loaded = (self.loader)();
                match &loaded {
                    Ok(_) => debug!("text generator loaded"),
                    Err(e) => warn!(error = %e, "text generator unavailable, using templates only"),
                }
                loaded
            })
            .clone()
    }

    pub fn status(&self) -> GeneratorStatus {
        match self.handle.get() {
            None => GeneratorStatus::Uninitialized,
            Some(Ok(_)) => GeneratorStatus::Ready,
            Some(Err(_)) => GeneratorStatus::Unavailable,
        }
    }
}

// =============================================================================
// HTTP BACKEND
// =============================================================================

/// Where and how to reach the generation backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Base URL of an Ollama-compatible server; `None` disables generation
    pub url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            url: None,
            model: "llama3.2".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GeneratorConfig {
    /// Read `ATTUNE_GENERATOR_URL`, `ATTUNE_GENERATOR_MODEL` and
    /// `ATTUNE_TEST_MODE` (which disables generation)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let test_mode = std::env::var("ATTUNE_TEST_MODE")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if !test_mode {
            config.url = std::env::var("ATTUNE_GENERATOR_URL")
                .ok()
                .filter(|u| !u.trim().is_empty());
        }
        if let Ok(model) = std::env::var("ATTUNE_GENERATOR_MODEL") {
            config.model = model;
        }
        config
    }

    /// Loader that connects an `HttpGenerator`, or fails when no URL is set
    pub fn loader(&self) -> GeneratorLoader {
        let config = self.clone();
        Box::new(move || {
            let generator = HttpGenerator::connect(&config)?;
            Ok(Arc::new(generator) as Arc<dyn TextGenerator>)
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f64,
    top_p: f64,
    repeat_penalty: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Blocking client for an Ollama-compatible `/api/generate` endpoint
#[derive(Debug)]
pub struct HttpGenerator {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl HttpGenerator {
    /// Build the client and probe the server once
    pub fn connect(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let base_url = config
            .url
            .as_deref()
            .ok_or_else(|| GenerationError::Unavailable("no generator URL configured".into()))?
            .trim_end_matches('/')
            .to_string();

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        client
            .get(format!("{}/api/tags", base_url))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            model: config.model.clone(),
        })
    }
}

impl TextGenerator for HttpGenerator {
    fn generate(&self, prompt: &str, params: &SamplingParams) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: params.max_new_tokens,
                temperature: params.temperature,
                top_p: params.top_p,
                repeat_penalty: params.repetition_penalty,
            },
        };

        let body: GenerateResponse = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()?
            .error_for_status()?
            .json()
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        Ok(body.response)
    }
}

/// Keep at most `limit` whitespace-separated tokens
fn truncate_words(text: &str, limit: usize) -> String {
    if text.split_whitespace().count() <= limit {
        return text.to_string();
    }
    text.split_whitespace().take(limit).collect::<Vec<_>>().join(" ")
}

// =============================================================================
// PRODUCER
// =============================================================================

/// Prompt → generate → strip echo → content filter
#[derive(Debug)]
pub struct GenerativeCandidateProducer {
    cell: GeneratorCell,
    params: SamplingParams,
    filter: ContentFilter,
}

impl GenerativeCandidateProducer {
    pub fn new(cell: GeneratorCell) -> Self {
        Self::with_params(cell, SamplingParams::default())
    }

    pub fn with_params(cell: GeneratorCell, params: SamplingParams) -> Self {
        Self {
            cell,
            params,
            filter: ContentFilter::new(),
        }
    }

    /// Producer whose generator is permanently unavailable
    pub fn disabled() -> Self {
        Self::new(GeneratorCell::unavailable("generation disabled"))
    }

    pub fn status(&self) -> GeneratorStatus {
        self.cell.status()
    }

    /// Conditioning prompt for the input's coarse situation. Only the user
    /// text is cut to `max_user_words`; header and `Assistant:` cue stay intact.
    pub fn build_prompt(text: &str, max_user_words: usize) -> String {
        let situation = Situation::classify(text);
        let text = truncate_words(text, max_user_words);
        format!(
            "You are a supportive AI assistant helping with emotional well-being. {}\n\
             Rules: Never mention yourself, focus on their feelings, use empathetic language, ask gentle questions.\n\
             User: {}\n\
             Assistant:",
            situation.description(),
            text
        )
    }

    /// A filtered candidate, or `None` when unavailable, failed or rejected
    pub fn produce(&self, text: &str) -> Option<String> {
        let generator = self.cell.get_or_init().ok()?;
        match self.try_produce(generator.as_ref(), text) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!(error = %e, "generation failed, falling back");
                None
            }
        }
    }

    fn try_produce(
        &self,
        generator: &dyn TextGenerator,
        text: &str,
    ) -> Result<Option<String>, GenerationError> {
        let prompt = Self::build_prompt(text, self.params.max_prompt_tokens as usize);
        let raw = generator.generate(&prompt, &self.params)?;
        let response = strip_echo(&prompt, &raw);
        if response.trim().is_empty() {
            return Err(GenerationError::Malformed("empty output".into()));
        }

        match self.filter.check(response) {
            None => Ok(Some(response.trim().to_string())),
            Some(rejection) => {
                debug!(?rejection, "generative candidate filtered");
                Ok(None)
            }
        }
    }
}

/// Remove a leading, case-insensitive copy of the prompt
pub fn strip_echo<'a>(prompt: &str, raw: &'a str) -> &'a str {
    let mut rest = raw.char_indices();
    for p in prompt.chars() {
        match rest.next() {
            Some((_, r)) if r.to_lowercase().eq(p.to_lowercase()) => {}
            _ => return raw,
        }
    }
    let offset = rest.next().map(|(i, _)| i).unwrap_or(raw.len());
    raw[offset..].trim()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Fixed(String);

    impl TextGenerator for Fixed {
        fn generate(&self, _prompt: &str, _params: &SamplingParams) -> Result<String, GenerationError> {
            Ok(self.0.clone())
        }
    }

    struct Echoing(String);

    impl TextGenerator for Echoing {
        fn generate(&self, prompt: &str, _params: &SamplingParams) -> Result<String, GenerationError> {
            Ok(format!("{} {}", prompt.to_uppercase(), self.0))
        }
    }

    struct Failing;

    impl TextGenerator for Failing {
        fn generate(&self, _prompt: &str, _params: &SamplingParams) -> Result<String, GenerationError> {
            Err(GenerationError::Request("connection reset".into()))
        }
    }

    struct Recording(Mutex<Option<SamplingParams>>);

    impl TextGenerator for Recording {
        fn generate(&self, _prompt: &str, params: &SamplingParams) -> Result<String, GenerationError> {
            *self.0.lock().unwrap() = Some(*params);
            Ok("It seems like a lot is happening, how are things at home?".into())
        }
    }

    fn producer(generator: impl TextGenerator + 'static) -> GenerativeCandidateProducer {
        GenerativeCandidateProducer::new(GeneratorCell::with_generator(Arc::new(generator)))
    }

    #[test]
    fn test_loader_runs_once_on_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cell = GeneratorCell::new(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(GenerationError::Unavailable("no backend".into()))
        }));

        assert_eq!(cell.status(), GeneratorStatus::Uninitialized);
        for _ in 0..5 {
            assert!(cell.get_or_init().is_err());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cell.status(), GeneratorStatus::Unavailable);
    }

    #[test]
    fn test_loader_runs_once_under_concurrency() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cell = Arc::new(GeneratorCell::new(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            Ok(Arc::new(Fixed("fine".into())) as Arc<dyn TextGenerator>)
        })));

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                std::thread::spawn(move || cell.get_or_init().is_ok())
            })
            .collect();
        for t in threads {
            assert!(t.join().unwrap());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cell.status(), GeneratorStatus::Ready);
    }

    #[test]
    fn test_unavailable_returns_none() {
        assert_eq!(GenerativeCandidateProducer::disabled().produce("I feel sad"), None);
    }

    #[test]
    fn test_transient_failure_returns_none() {
        let p = producer(Failing);
        assert_eq!(p.produce("I feel sad"), None);
        // handle stays ready; only the call failed
        assert_eq!(p.status(), GeneratorStatus::Ready);
    }

    #[test]
    fn test_echo_is_stripped() {
        let p = producer(Echoing("That sounds painful, what happened next?".into()));
        assert_eq!(
            p.produce("I feel sad").as_deref(),
            Some("That sounds painful, what happened next?")
        );
    }

    #[test]
    fn test_strip_echo_without_echo() {
        assert_eq!(strip_echo("Prompt:", "Hello there"), "Hello there");
        assert_eq!(strip_echo("Prompt:", "prompt:  rest "), "rest");
        assert_eq!(strip_echo("Prompt:", "Prom"), "Prom");
    }

    #[test]
    fn test_filtered_candidate_returns_none() {
        let p = producer(Fixed("I'm a software analyst, what do you do for a living?".into()));
        assert_eq!(p.produce("I feel sad"), None);
    }

    #[test]
    fn test_empty_output_returns_none() {
        assert_eq!(producer(Fixed("   ".into())).produce("I feel sad"), None);
    }

    #[test]
    fn test_default_sampling_params_are_passed() {
        let recording = Arc::new(Recording(Mutex::new(None)));
        let p = GenerativeCandidateProducer::new(GeneratorCell::with_generator(
            Arc::clone(&recording) as Arc<dyn TextGenerator>,
        ));
        assert!(p.produce("work is fine").is_some());
        let params = recording.0.lock().unwrap().expect("generate was called");
        assert_eq!(params.max_new_tokens, 64);
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.top_p, 0.9);
    }

    #[test]
    fn test_prompt_embeds_situation_and_rules() {
        let prompt = GenerativeCandidateProducer::build_prompt("I'm so angry at my sister", 128);
        assert!(prompt.contains("ANGER:"));
        assert!(prompt.contains("Never mention yourself"));
        assert!(prompt.contains("User: I'm so angry at my sister\n"));
        assert!(prompt.ends_with("Assistant:"));
    }

    #[test]
    fn test_long_input_keeps_prompt_frame() {
        let long = vec!["word"; 300].join(" ");
        let prompt = GenerativeCandidateProducer::build_prompt(&long, 128);
        assert!(prompt.starts_with("You are a supportive AI assistant"));
        assert!(prompt.contains("\nRules: "));
        assert!(prompt.ends_with("\nAssistant:"));
        let user = prompt
            .lines()
            .find_map(|l| l.strip_prefix("User: "))
            .expect("user line");
        assert_eq!(user.split_whitespace().count(), 128);
    }

    #[test]
    fn test_echo_stripped_for_long_input() {
        let long = vec!["word"; 300].join(" ");
        let p = producer(Echoing("That sounds exhausting, what has been hardest?".into()));
        assert_eq!(
            p.produce(&long).as_deref(),
            Some("That sounds exhausting, what has been hardest?")
        );
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("a b c d", 2), "a b");
        assert_eq!(truncate_words("a  b", 5), "a  b");
    }

    #[test]
    fn test_config_without_url_is_unavailable() {
        let cell = GeneratorCell::new(GeneratorConfig::default().loader());
        assert!(matches!(cell.get_or_init(), Err(GenerationError::Unavailable(_))));
    }
}
