//! Coarse situational buckets used to condition generation

/// Seven coarse buckets, scanned in declaration order; `General` is the default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Situation {
    Crisis,
    NegativeAffect,
    PositiveAffect,
    Anger,
    Anxiety,
    Identity,
    General,
}

impl Situation {
    /// Scan order for classification (General excluded, it is the fallback)
    pub const SCAN_ORDER: [Situation; 6] = [
        Situation::Crisis,
        Situation::NegativeAffect,
        Situation::PositiveAffect,
        Situation::Anger,
        Situation::Anxiety,
        Situation::Identity,
    ];

    /// Trigger keywords (substring match on lower-cased text)
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Situation::Crisis => &["kill", "suicide", "die", "death", "end it"],
            Situation::NegativeAffect => &["sad", "depressed", "lonely", "hurt", "pain", "crying"],
            Situation::PositiveAffect => {
                &["happy", "excited", "joy", "great", "wonderful", "amazing", "love"]
            }
            Situation::Anger => &["angry", "frustrated", "mad", "hate", "upset", "annoyed"],
            Situation::Anxiety => &["anxious", "worried", "scared", "fear", "nervous", "stress"],
            Situation::Identity => &["gay", "lesbian", "bisexual", "trans", "lgbt", "queer"],
            Situation::General => &[],
        }
    }

    /// Conditioning description embedded in the prompt
    pub fn description(&self) -> &'static str {
        match self {
            Situation::Crisis => "CRISIS: Someone is expressing thoughts of self-harm. Respond with immediate empathy, validation, and support. Acknowledge their pain and offer a safe space to talk.",
            Situation::NegativeAffect => "NEGATIVE: Someone is feeling sad or in emotional pain. Respond with deep empathy, validation, and gentle support. Acknowledge their feelings as valid.",
            Situation::PositiveAffect => "POSITIVE: Someone is feeling happy or joyful. Celebrate their positive feelings, validate their happiness, and encourage them to share more about what's bringing them joy.",
            Situation::Anger => "ANGER: Someone is feeling angry or frustrated. Acknowledge their feelings as valid, help them feel heard, and offer support without trying to fix the situation.",
            Situation::Anxiety => "ANXIETY: Someone is feeling anxious or worried. Provide gentle reassurance, validate their concerns, and offer support without minimizing their feelings.",
            Situation::Identity => "IDENTITY: Someone is sharing something about their identity. Respond with support, validation, and acceptance. Celebrate their courage in sharing.",
            Situation::General => "GENERAL: Someone is sharing their thoughts or feelings. Respond with empathy, curiosity, and gentle encouragement to help them explore further.",
        }
    }

    /// First bucket whose keywords appear in the text, else General
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self::SCAN_ORDER
            .into_iter()
            .find(|s| s.keywords().iter().any(|k| lower.contains(k)))
            .unwrap_or(Situation::General)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_scanned_first() {
        // "sad" would also match NegativeAffect
        assert_eq!(Situation::classify("I'm sad and want to die"), Situation::Crisis);
    }

    #[test]
    fn test_default_is_general() {
        assert_eq!(Situation::classify("The weather changed."), Situation::General);
    }

    #[test]
    fn test_identity() {
        assert_eq!(Situation::classify("I think I'm bisexual"), Situation::Identity);
    }

    #[test]
    fn test_substring_semantics() {
        // "madness" contains "mad"
        assert_eq!(Situation::classify("this madness"), Situation::Anger);
    }
}
