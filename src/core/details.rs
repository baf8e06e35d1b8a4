//! DetailExtractor: maps raw text to {topic, emotion, time}
//!
//! Topic groups are evaluated in `TOPIC_GROUPS` order and every group whose
//! trigger fires assigns `topic`, so the LAST firing group wins. Inside a
//! group, sub-topics are tried in order and the first match wins, with the
//! group's fallback last. Emotion and time each use a single first-match chain.
//!
//! All matching is substring matching on the lower-cased text ("ex" fires on
//! "next", "test" on "latest"). The tables are deliberately literal.

use crate::types::{DetailTags, Emotion, TimeFrame};

/// One specific sub-topic inside a group
#[derive(Debug)]
pub struct Subtopic {
    pub keywords: &'static [&'static str],
    pub topic: &'static str,
}

/// A topic rule group: trigger set, ordered sub-topics, catch-all
#[derive(Debug)]
pub struct TopicGroup {
    pub name: &'static str,
    pub triggers: &'static [&'static str],
    pub subtopics: &'static [Subtopic],
    pub fallback: &'static str,
}

impl TopicGroup {
    /// Topic this group assigns for the (lower-cased) text, if its trigger fires
    pub fn resolve(&self, lower: &str) -> Option<&'static str> {
        if !contains_any(lower, self.triggers) {
            return None;
        }
        let topic = self
            .subtopics
            .iter()
            .find(|s| contains_any(lower, s.keywords))
            .map(|s| s.topic)
            .unwrap_or(self.fallback);
        Some(topic)
    }
}

/// Topic groups in evaluation order
pub static TOPIC_GROUPS: &[TopicGroup] = &[
    TopicGroup {
        name: "work",
        triggers: &[
            "job", "work", "career", "employment", "office", "promotion", "unemployment",
            "boss", "colleague", "coworker", "manager", "layoff", "fired", "resign",
            "burnout", "imposter syndrome", "overwork", "deadline", "workload",
        ],
        subtopics: &[
            Subtopic { keywords: &["market"], topic: "job market" },
            Subtopic { keywords: &["interview"], topic: "job interview" },
            Subtopic { keywords: &["boss", "manager"], topic: "workplace conflict" },
            Subtopic { keywords: &["colleague", "coworker"], topic: "workplace relationships" },
            Subtopic { keywords: &["burnout"], topic: "burnout" },
            Subtopic { keywords: &["imposter"], topic: "imposter syndrome" },
            Subtopic { keywords: &["promotion"], topic: "promotion" },
            Subtopic {
                keywords: &["unemployment", "layoff", "fired", "resign"],
                topic: "job loss",
            },
        ],
        fallback: "work stress",
    },
    TopicGroup {
        name: "academic",
        triggers: &[
            "school", "college", "university", "exam", "test", "assignment", "homework",
            "professor", "teacher", "class", "grade", "graduation", "bullying", "harassment",
        ],
        subtopics: &[
            Subtopic { keywords: &["exam", "test"], topic: "academic pressure" },
            Subtopic { keywords: &["assignment", "homework"], topic: "academic workload" },
            Subtopic { keywords: &["bullying", "harassment"], topic: "bullying or harassment" },
            Subtopic { keywords: &["graduation"], topic: "graduation stress" },
        ],
        fallback: "academic stress",
    },
    TopicGroup {
        name: "family",
        triggers: &[
            "family", "parents", "mom", "dad", "sibling", "brother", "sister", "child",
            "children", "son", "daughter", "parenting", "pregnancy", "baby", "caregiving",
            "divorce", "separation", "stepfamily", "adoption", "foster",
        ],
        subtopics: &[
            Subtopic { keywords: &["parents", "mom", "dad"], topic: "parent relationships" },
            Subtopic {
                keywords: &["sibling", "brother", "sister"],
                topic: "sibling relationships",
            },
            Subtopic { keywords: &["child", "children", "son", "daughter"], topic: "parenting" },
            Subtopic { keywords: &["pregnancy", "baby"], topic: "pregnancy or new baby" },
            Subtopic { keywords: &["caregiving"], topic: "caregiving" },
            Subtopic { keywords: &["divorce", "separation"], topic: "divorce or separation" },
            Subtopic { keywords: &["adoption", "foster"], topic: "adoption or foster care" },
        ],
        fallback: "family dynamics",
    },
    TopicGroup {
        name: "relationship",
        triggers: &[
            "relationship", "partner", "boyfriend", "girlfriend", "spouse", "husband", "wife",
            "dating", "marriage", "roommate", "neighbor", "friend", "friendship", "ex",
            "breakup", "divorce", "cheating", "infidelity", "jealous", "trust",
        ],
        subtopics: &[
            Subtopic { keywords: &["breakup", "divorce", "ex"], topic: "relationship ending" },
            Subtopic {
                keywords: &["marriage", "spouse", "husband", "wife"],
                topic: "marriage",
            },
            Subtopic {
                keywords: &["dating", "boyfriend", "girlfriend", "partner"],
                topic: "dating or partnership",
            },
            Subtopic { keywords: &["roommate"], topic: "roommate issues" },
            Subtopic { keywords: &["neighbor"], topic: "neighbor issues" },
            Subtopic { keywords: &["friend", "friendship"], topic: "friendship" },
            Subtopic {
                keywords: &["cheating", "infidelity", "jealous", "trust"],
                topic: "trust or infidelity",
            },
        ],
        fallback: "relationship issues",
    },
    TopicGroup {
        name: "health and life transition",
        triggers: &[
            "move", "moving", "immigration", "immigrant", "visa", "citizenship", "retirement",
            "aging", "elderly", "disability", "chronic illness", "pain", "disease", "diagnosis",
            "hospital", "doctor", "therapy", "treatment", "medication", "addiction", "alcohol",
            "drugs", "smoking", "recovery", "trauma", "ptsd", "ocd", "adhd", "autism",
            "bereavement", "grief", "mourning", "loss", "death", "funeral",
        ],
        subtopics: &[
            Subtopic {
                keywords: &["move", "moving", "immigration", "immigrant", "visa", "citizenship"],
                topic: "moving or immigration",
            },
            Subtopic {
                keywords: &["retirement", "aging", "elderly"],
                topic: "retirement or aging",
            },
            Subtopic { keywords: &["disability"], topic: "disability" },
            Subtopic {
                keywords: &["chronic illness", "pain", "disease", "diagnosis"],
                topic: "chronic illness or pain",
            },
            Subtopic {
                keywords: &["hospital", "doctor", "therapy", "treatment", "medication"],
                topic: "medical treatment",
            },
            Subtopic {
                keywords: &["addiction", "alcohol", "drugs", "smoking", "recovery"],
                topic: "addiction or recovery",
            },
            Subtopic {
                keywords: &["trauma", "ptsd", "ocd", "adhd", "autism"],
                topic: "mental health condition",
            },
            Subtopic {
                keywords: &["bereavement", "grief", "mourning", "loss", "death", "funeral"],
                topic: "grief or loss",
            },
        ],
        fallback: "life transition",
    },
];

/// Emotion chain, first match wins
pub static EMOTION_RULES: &[(Emotion, &[&str])] = &[
    (
        Emotion::Stress,
        &["stressed", "stress", "overwhelmed", "burned out", "exhausted", "tired", "fatigued", "drained"],
    ),
    (
        Emotion::Anxiety,
        &[
            "anxious", "anxiety", "worried", "nervous", "panicked", "panic", "fear", "afraid",
            "scared", "terrified",
        ],
    ),
    (
        Emotion::Depression,
        &[
            "depressed", "depression", "sad", "down", "hopeless", "helpless", "empty", "numb",
            "crying", "tearful", "blue",
        ],
    ),
    (
        Emotion::Anger,
        &["angry", "furious", "rage", "mad", "irritated", "annoyed", "resentful", "frustrated"],
    ),
    (
        Emotion::Loneliness,
        &["lonely", "alone", "isolated", "abandoned", "left out", "unwanted"],
    ),
    (
        Emotion::Happiness,
        &[
            "happy", "joy", "excited", "grateful", "hopeful", "relieved", "peaceful", "content",
            "satisfied", "confident", "curious", "proud", "optimistic",
        ],
    ),
    (
        Emotion::Shame,
        &[
            "ashamed", "shame", "guilty", "guilt", "regret", "embarrassed", "inadequate",
            "worthless", "useless", "not good enough", "failure", "inferior",
        ],
    ),
    (
        Emotion::Boredom,
        &["bored", "apathetic", "indifferent", "unmotivated", "disinterested"],
    ),
    (Emotion::Motivation, &["motivated", "determined", "driven", "inspired"]),
];

/// Time-frame chain, first match wins
pub static TIME_RULES: &[(TimeFrame, &[&str])] = &[
    (
        TimeFrame::Recent,
        &["today", "tonight", "this morning", "this evening", "right now", "currently"],
    ),
    (
        TimeFrame::Ongoing,
        &["always", "never", "constantly", "all the time", "forever", "every day", "everyday"],
    ),
    (
        TimeFrame::Recent,
        &["recently", "lately", "past few days", "last week", "last month"],
    ),
];

/// Rule-based extractor, a pure function of its input
#[derive(Debug, Default, Clone, Copy)]
pub struct DetailExtractor;

impl DetailExtractor {
    /// Create new extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract tags from raw text
    pub fn extract(&self, text: &str) -> DetailTags {
        let lower = text.to_lowercase();
        DetailTags {
            topic: self.topic(&lower),
            emotion: first_match(&lower, EMOTION_RULES),
            time: first_match(&lower, TIME_RULES),
        }
    }

    /// Every group is evaluated; a later firing group overwrites an earlier one
    fn topic(&self, lower: &str) -> Option<&'static str> {
        let mut topic = None;
        for group in TOPIC_GROUPS {
            if let Some(t) = group.resolve(lower) {
                topic = Some(t);
            }
        }
        topic
    }
}

/// Substring test against a keyword list
pub(crate) fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lower.contains(k))
}

fn first_match<T: Copy>(lower: &str, rules: &[(T, &[&str])]) -> Option<T> {
    rules
        .iter()
        .find(|(_, keywords)| contains_any(lower, keywords))
        .map(|(value, _)| *value)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> DetailTags {
        DetailExtractor::new().extract(text)
    }

    #[test]
    fn test_empty_tags_for_plain_text() {
        let tags = extract("The sky was grey.");
        assert!(tags.is_empty(), "Expected no tags, got {:?}", tags);
    }

    #[test]
    fn test_work_fallback_topic() {
        let tags = extract("I am so happy about my new job!");
        assert_eq!(tags.topic, Some("work stress"));
        assert_eq!(tags.emotion, Some(Emotion::Happiness));
        assert_eq!(tags.time, None);
    }

    #[test]
    fn test_subtopic_order_within_group() {
        // "market" is checked before "boss"
        let tags = extract("My boss keeps talking about the job market");
        assert_eq!(tags.topic, Some("job market"));

        let tags = extract("My boss yelled at me");
        assert_eq!(tags.topic, Some("workplace conflict"));
    }

    #[test]
    fn test_last_group_wins() {
        // work group fires first, family group fires later and overwrites
        let tags = extract("My job is fine but my parents are fighting");
        assert_eq!(tags.topic, Some("parent relationships"));

        // academic fires, then health fires last
        let tags = extract("I failed my exam after the funeral");
        assert_eq!(tags.topic, Some("grief or loss"));
    }

    #[test]
    fn test_divorce_fires_family_then_relationship() {
        // "divorce" triggers both groups; relationship comes later
        let tags = extract("The divorce was finalised");
        assert_eq!(tags.topic, Some("relationship ending"));
    }

    #[test]
    fn test_substring_semantics_preserved() {
        // "next" contains "ex", which triggers the relationship group
        let tags = extract("What comes next?");
        assert_eq!(tags.topic, Some("relationship ending"));
    }

    #[test]
    fn test_emotion_first_match_wins() {
        // stress is checked before anxiety
        let tags = extract("I'm stressed and anxious");
        assert_eq!(tags.emotion, Some(Emotion::Stress));

        let tags = extract("I feel so lonely");
        assert_eq!(tags.emotion, Some(Emotion::Loneliness));

        let tags = extract("I feel worthless");
        assert_eq!(tags.emotion, Some(Emotion::Shame));
    }

    #[test]
    fn test_time_chain() {
        assert_eq!(extract("I cried today").time, Some(TimeFrame::Recent));
        assert_eq!(extract("It happens all the time").time, Some(TimeFrame::Ongoing));
        assert_eq!(extract("I feel lonely lately").time, Some(TimeFrame::Recent));
        // "today" is checked before "always"
        assert_eq!(extract("Today, like always").time, Some(TimeFrame::Recent));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract("MY BOSS").topic, extract("my boss").topic);
    }

    #[test]
    fn test_determinism() {
        let text = "I'm anxious about my upcoming exam and my parents' expectations";
        let first = extract(text);
        for _ in 0..100 {
            assert_eq!(extract(text), first);
        }
    }

    #[test]
    fn test_group_resolve_requires_trigger() {
        let work = &TOPIC_GROUPS[0];
        assert_eq!(work.name, "work");
        // "market" alone is a sub-pattern, not a trigger
        assert_eq!(work.resolve("the stock market"), None);
        assert_eq!(work.resolve("the job market"), Some("job market"));
    }
}
