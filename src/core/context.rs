//! ContextSelector: ordered pattern → template rules
//!
//! Rules are evaluated top to bottom and the first match wins. Crisis rules
//! come first, then exact-topic rules, then emotion rules, then standalone
//! keyword triggers.

use crate::core::details::contains_any;
use crate::types::{DetailTags, Emotion};

/// Fixed reply for crisis/self-harm language
pub const CRISIS_RESPONSE: &str = "I hear how much pain you're in right now. You're not alone, and I'm here to listen. Can you tell me more about what's bringing you to this place? Your feelings are valid, and there are people who want to help you through this.";

/// Rule category, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    Crisis,
    Topic,
    Emotion,
    Keyword,
}

/// When a rule fires
#[derive(Debug)]
pub enum Predicate {
    /// Any of the keywords occurs in the lower-cased text
    AnyKeyword(&'static [&'static str]),
    /// Extracted topic equals this value
    Topic(&'static str),
    /// Extracted emotion equals this value
    Emotion(Emotion),
}

impl Predicate {
    fn matches(&self, lower: &str, details: &DetailTags) -> bool {
        match self {
            Predicate::AnyKeyword(keywords) => contains_any(lower, keywords),
            Predicate::Topic(topic) => details.topic == Some(*topic),
            Predicate::Emotion(emotion) => details.emotion == Some(*emotion),
        }
    }
}

/// Reply template.
///
/// Placeholders: `{topic}` (topic or `topic_default`), `{Topic}` (same,
/// first letter upper-cased) and `{when}` ("lately" for recent disclosures,
/// "recently" otherwise).
#[derive(Debug)]
pub struct Template {
    pub text: &'static str,
    pub topic_default: &'static str,
}

impl Template {
    const fn fixed(text: &'static str) -> Self {
        Self { text, topic_default: "this situation" }
    }

    const fn with_default(text: &'static str, topic_default: &'static str) -> Self {
        Self { text, topic_default }
    }

    /// Substitute placeholders from the extracted details
    pub fn render(&self, details: &DetailTags) -> String {
        if !self.text.contains('{') {
            return self.text.to_string();
        }
        let topic = details.topic_or(self.topic_default);
        self.text
            .replace("{Topic}", &capitalize(topic))
            .replace("{topic}", topic)
            .replace("{when}", details.time_context())
    }
}

/// One row of the rule table
#[derive(Debug)]
pub struct ContextRule {
    pub name: &'static str,
    pub category: RuleCategory,
    pub predicate: Predicate,
    pub template: Template,
}

/// The rule table, in evaluation order
pub static CONTEXT_RULES: &[ContextRule] = &[
    // crisis
    ContextRule {
        name: "crisis",
        category: RuleCategory::Crisis,
        predicate: Predicate::AnyKeyword(&[
            "kill myself", "suicide", "want to die", "end it all", "no reason to live",
        ]),
        template: Template::fixed(CRISIS_RESPONSE),
    },
    // topics
    ContextRule {
        name: "job market",
        category: RuleCategory::Topic,
        predicate: Predicate::Topic("job market"),
        template: Template::fixed("I understand how stressful the job market can be right now. It's such an uncertain and competitive environment, and it's completely normal to feel overwhelmed by it. What specifically about the job market is most concerning for you? Are you looking for work, or worried about job security?"),
    },
    ContextRule {
        name: "work stress",
        category: RuleCategory::Topic,
        predicate: Predicate::Topic("work stress"),
        template: Template::fixed("Work stress can be incredibly draining, especially when it feels like it's building up {when}. It affects not just your professional life but your personal well-being too. What's been most challenging about your work situation {when}?"),
    },
    ContextRule {
        name: "workplace conflict",
        category: RuleCategory::Topic,
        predicate: Predicate::Topic("workplace conflict"),
        template: Template::fixed("Workplace conflicts can be so stressful - they can make going to work feel like walking into a minefield. Whether it's with your boss or colleagues, these situations can really impact your mental health. What's been happening that's been so difficult?"),
    },
    ContextRule {
        name: "academic pressure",
        category: RuleCategory::Topic,
        predicate: Predicate::Topic("academic pressure"),
        template: Template::fixed("Academic pressure can be intense, especially when it feels like your entire future depends on your performance. Exams and tests can trigger so much anxiety and self-doubt. What's been most stressful about your academic situation lately?"),
    },
    ContextRule {
        name: "academic workload",
        category: RuleCategory::Topic,
        predicate: Predicate::Topic("academic workload"),
        template: Template::fixed("The workload in school can feel absolutely overwhelming - it's like there's always another assignment, another deadline, another expectation. It can feel impossible to keep up. What's been most challenging about managing your academic workload?"),
    },
    ContextRule {
        name: "parent relationships",
        category: RuleCategory::Topic,
        predicate: Predicate::Topic("parent relationships"),
        template: Template::fixed("Relationships with parents can be so complex - they can be our greatest source of love and support, but also our deepest wounds. What's been happening with your parents that's been affecting you? Family dynamics can be really challenging to navigate."),
    },
    ContextRule {
        name: "sibling relationships",
        category: RuleCategory::Topic,
        predicate: Predicate::Topic("sibling relationships"),
        template: Template::fixed("Sibling relationships can be incredibly complicated - there's so much history, competition, and love all mixed together. What's been happening with your siblings that's been difficult for you?"),
    },
    ContextRule {
        name: "relationship ending",
        category: RuleCategory::Topic,
        predicate: Predicate::Topic("relationship ending"),
        template: Template::fixed("The end of a relationship can feel like losing a part of yourself. It's normal to feel a mix of emotions - grief, anger, confusion, even relief. Breakups and divorces are major life transitions. How are you coping with this change?"),
    },
    // emotions
    ContextRule {
        name: "stress",
        category: RuleCategory::Emotion,
        predicate: Predicate::Emotion(Emotion::Stress),
        template: Template::fixed("I can hear how stressed you're feeling about {topic}. Stress can be so overwhelming - it affects your sleep, your mood, your ability to think clearly. What's been most stressful about {topic} for you?"),
    },
    ContextRule {
        name: "anxiety",
        category: RuleCategory::Emotion,
        predicate: Predicate::Emotion(Emotion::Anxiety),
        template: Template::fixed("Anxiety about {topic} can be so overwhelming - it's like your mind and body are constantly on high alert. What's been most anxiety-provoking about {topic} recently? I'm here to listen without judgment."),
    },
    ContextRule {
        name: "depression",
        category: RuleCategory::Emotion,
        predicate: Predicate::Emotion(Emotion::Depression),
        template: Template::fixed("Depression can feel incredibly isolating and overwhelming {when}. It's not just feeling sad - it's a real struggle that affects every part of your life. What's been most difficult about this for you {when}?"),
    },
    ContextRule {
        name: "loneliness",
        category: RuleCategory::Emotion,
        predicate: Predicate::Emotion(Emotion::Loneliness),
        template: Template::fixed("Feeling lonely {when} can be one of the most painful experiences. It's not just about being physically alone - it's feeling disconnected from others. What does loneliness feel like for you right now?"),
    },
    ContextRule {
        name: "anger",
        category: RuleCategory::Emotion,
        predicate: Predicate::Emotion(Emotion::Anger),
        template: Template::fixed("Anger about {topic} is a powerful emotion that can feel overwhelming. It's often covering up other feelings like hurt, fear, or frustration. What's been triggering these angry feelings for you?"),
    },
    ContextRule {
        name: "happiness",
        category: RuleCategory::Emotion,
        predicate: Predicate::Emotion(Emotion::Happiness),
        template: Template::with_default("It's wonderful to hear you're feeling happy about {topic}! Positive emotions are just as important to acknowledge as difficult ones. What's been bringing you this happiness? I'd love to hear more about it.", "this"),
    },
    // standalone keywords
    ContextRule {
        name: "self-worth",
        category: RuleCategory::Keyword,
        predicate: Predicate::AnyKeyword(&["worthless", "not good enough", "failure", "useless"]),
        template: Template::fixed("Those feelings of not being good enough about {topic} can be so painful and persistent. It's like having a harsh critic living inside your head. Where do you think these beliefs about yourself come from?"),
    },
    ContextRule {
        name: "identity",
        category: RuleCategory::Keyword,
        predicate: Predicate::AnyKeyword(&[
            "gay", "lesbian", "bisexual", "trans", "lgbt", "queer", "coming out",
        ]),
        template: Template::fixed("Sharing your identity can be both liberating and scary. It takes real courage to be authentic about who you are. How are you feeling about this aspect of yourself? Your identity is valid and worthy of celebration."),
    },
    ContextRule {
        name: "sleep",
        category: RuleCategory::Keyword,
        predicate: Predicate::AnyKeyword(&["sleep", "insomnia", "tired", "exhausted"]),
        template: Template::fixed("Sleep problems related to {topic} can affect every aspect of your life - your mood, energy, concentration, even your physical health. What's been interfering with your sleep lately?"),
    },
    ContextRule {
        name: "financial stress",
        category: RuleCategory::Keyword,
        predicate: Predicate::AnyKeyword(&["money", "financial", "bills", "debt", "poor"]),
        template: Template::with_default("Financial stress about {topic} can be incredibly overwhelming - it affects your sense of security and can impact every area of your life. What's been most concerning about {topic}?", "your financial situation"),
    },
    ContextRule {
        name: "social anxiety",
        category: RuleCategory::Keyword,
        predicate: Predicate::AnyKeyword(&["social anxiety", "people", "crowd", "party", "meeting"]),
        template: Template::with_default("{Topic} can feel so overwhelming when you're dealing with anxiety. It's like your mind is constantly scanning for threats. What makes {topic} most challenging for you?", "social situations"),
    },
    ContextRule {
        name: "perfectionism",
        category: RuleCategory::Keyword,
        predicate: Predicate::AnyKeyword(&["perfect", "perfectionist", "mistake", "failure"]),
        template: Template::fixed("Perfectionism about {topic} can be so exhausting - it's like having impossible standards that you can never quite meet. What would it feel like to give yourself permission to be human and make mistakes?"),
    },
];

/// First-match selector over `CONTEXT_RULES`
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextSelector;

impl ContextSelector {
    /// Create new selector
    pub fn new() -> Self {
        Self
    }

    /// First rule whose predicate holds, if any
    pub fn matching_rule(&self, text: &str, details: &DetailTags) -> Option<&'static ContextRule> {
        let lower = text.to_lowercase();
        CONTEXT_RULES
            .iter()
            .find(|rule| rule.predicate.matches(&lower, details))
    }

    /// Rendered reply of the first matching rule, `None` when nothing matches
    pub fn select(&self, text: &str, details: &DetailTags) -> Option<String> {
        self.matching_rule(text, details)
            .map(|rule| rule.template.render(details))
    }
}

/// Upper-case the first character
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DetailExtractor;
    use crate::types::TimeFrame;

    fn select(text: &str) -> Option<String> {
        let details = DetailExtractor::new().extract(text);
        ContextSelector::new().select(text, &details)
    }

    fn rule_name(text: &str) -> Option<&'static str> {
        let details = DetailExtractor::new().extract(text);
        ContextSelector::new()
            .matching_rule(text, &details)
            .map(|r| r.name)
    }

    #[test]
    fn test_crisis_short_circuits() {
        assert_eq!(select("I want to kill myself").as_deref(), Some(CRISIS_RESPONSE));
        // topic and emotion would match too, crisis still wins
        assert_eq!(
            select("My boss makes me so stressed I want to die").as_deref(),
            Some(CRISIS_RESPONSE)
        );
    }

    #[test]
    fn test_crisis_is_first_rule() {
        assert_eq!(CONTEXT_RULES[0].category, RuleCategory::Crisis);
    }

    #[test]
    fn test_categories_in_priority_order() {
        let order: Vec<RuleCategory> = CONTEXT_RULES.iter().map(|r| r.category).collect();
        let mut sorted = order.clone();
        sorted.sort_by_key(|c| *c as u8);
        assert_eq!(order, sorted);
    }

    #[test]
    fn test_topic_rule_beats_emotion_rule() {
        // topic "job market" and emotion stress both present
        assert_eq!(rule_name("I am stressed about the job market"), Some("job market"));
    }

    #[test]
    fn test_work_stress_time_interpolation() {
        let recent = select("Work has been rough today").unwrap();
        assert!(recent.contains("building up lately"));

        let other = select("Work has been rough").unwrap();
        assert!(other.contains("building up recently"));
    }

    #[test]
    fn test_emotion_rule_topic_default() {
        let reply = select("I'm so nervous").unwrap();
        assert!(reply.starts_with("Anxiety about this situation"));
    }

    #[test]
    fn test_emotion_rule_topic_interpolation() {
        // topic "promotion" has no topic rule, falls through to anxiety
        let reply = select("I'm nervous about the promotion").unwrap();
        assert!(reply.starts_with("Anxiety about promotion"), "got: {}", reply);
    }

    #[test]
    fn test_happiness_default_is_this() {
        let reply = select("I feel so proud").unwrap();
        assert!(reply.contains("feeling happy about this!"));
    }

    #[test]
    fn test_keyword_triggers() {
        assert_eq!(rule_name("I can't sleep at night"), Some("sleep"));
        assert_eq!(rule_name("I'm coming out to everyone"), Some("identity"));
        assert_eq!(rule_name("The bills keep piling up"), Some("financial stress"));
        assert_eq!(rule_name("Everything must be perfect"), Some("perfectionism"));
    }

    #[test]
    fn test_social_anxiety_capitalizes_default() {
        let reply = select("There's a party on Friday").unwrap();
        assert!(reply.starts_with("Social situations can feel"), "got: {}", reply);
    }

    #[test]
    fn test_no_match_returns_none() {
        assert_eq!(select("The sky was grey."), None);
    }

    #[test]
    fn test_template_render_with_tags() {
        let template = Template::fixed("{Topic} {when} {topic}");
        let details = DetailTags {
            topic: Some("grief or loss"),
            emotion: None,
            time: Some(TimeFrame::Recent),
        };
        assert_eq!(template.render(&details), "Grief or loss lately grief or loss");
    }

    #[test]
    fn test_determinism() {
        let text = "I feel lonely lately";
        let first = select(text);
        assert!(first.is_some());
        for _ in 0..100 {
            assert_eq!(select(text), first);
        }
    }
}
