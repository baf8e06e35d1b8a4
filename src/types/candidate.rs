//! Response candidates and where they came from

use serde::{Deserialize, Serialize};

/// Which stage of the cascade produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Deterministic rule/pattern match
    Contextual,
    /// External generation service, passed the quality gate
    Generative,
    /// Technique pool or sentiment-bucketed template pool
    Template,
}

impl Provenance {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::Contextual => "contextual",
            Self::Generative => "generative",
            Self::Template => "template",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Contextual => "Matched a contextual rule",
            Self::Generative => "Generated and accepted by the quality gate",
            Self::Template => "Drawn from a template pool",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

/// A response plus its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseCandidate {
    pub text: String,
    pub provenance: Provenance,
    /// Only set for generative candidates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<i32>,
}

impl ResponseCandidate {
    pub fn contextual(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provenance: Provenance::Contextual,
            quality: None,
        }
    }

    pub fn generative(text: impl Into<String>, quality: i32) -> Self {
        Self {
            text: text.into(),
            provenance: Provenance::Generative,
            quality: Some(quality),
        }
    }

    pub fn template(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provenance: Provenance::Template,
            quality: None,
        }
    }
}
