//! Structured situational tags extracted from raw text

use serde::{Deserialize, Serialize};

/// Closed set of emotions the extractor can assign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Stress,
    Anxiety,
    Depression,
    Anger,
    Loneliness,
    Happiness,
    Shame,
    Boredom,
    Motivation,
}

impl Emotion {
    /// Lower-case name, also used when interpolating into templates
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Stress => "stress",
            Emotion::Anxiety => "anxiety",
            Emotion::Depression => "depression",
            Emotion::Anger => "anger",
            Emotion::Loneliness => "loneliness",
            Emotion::Happiness => "happiness",
            Emotion::Shame => "shame",
            Emotion::Boredom => "boredom",
            Emotion::Motivation => "motivation",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time frame of the disclosure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Recent,
    Ongoing,
}

impl TimeFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Recent => "recent",
            TimeFrame::Ongoing => "ongoing",
        }
    }
}

impl std::fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// At most one value per key. Topics come from the extractor's closed table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DetailTags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeFrame>,
}

impl DetailTags {
    /// No tags at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.topic.is_none() && self.emotion.is_none() && self.time.is_none()
    }

    /// Topic, or the given default phrase when absent
    pub fn topic_or<'a>(&self, default: &'a str) -> &'a str {
        self.topic.unwrap_or(default)
    }

    /// Emotion name, or the given default phrase when absent
    pub fn emotion_or<'a>(&self, default: &'a str) -> &'a str {
        self.emotion.map(|e| e.as_str()).unwrap_or(default)
    }

    /// Time frame name, or the given default phrase when absent
    pub fn time_or<'a>(&self, default: &'a str) -> &'a str {
        self.time.map(|t| t.as_str()).unwrap_or(default)
    }

    /// "lately" for a recent disclosure, "recently" otherwise
    pub fn time_context(&self) -> &'static str {
        if self.time == Some(TimeFrame::Recent) {
            "lately"
        } else {
            "recently"
        }
    }
}
