//! ContentFilter: rejects candidates that break the focused-listener frame
//!
//! Checks run in order on the lower-cased text; any hit rejects.

use crate::core::details::contains_any;

/// Self-referential phrasing
pub const SELF_REFERENCES: &[&str] = &[
    "i am", "i'm a", "i work as", "i do", "my job", "my profession", "i study",
    "i'm studying", "i work for", "analyst", "assistant", "software company",
];

/// Questions about the listener's occupation
pub const OCCUPATION_QUESTIONS: &[&str] = &[
    "what do you do", "what do you work", "what's your job", "what's your profession",
    "what do you do for work", "what do you do for a living", "what's your occupation",
];

/// Off-topic personal-interest questions
pub const OFF_TOPIC_QUESTIONS: &[&str] = &[
    "what kind of pets", "do you have pets", "what pets", "what hobbies",
    "what do you like to do", "what do you enjoy", "what do you do for fun",
    "what are your interests", "do you have any pets", "do you have a pet",
];

/// Generic acknowledgements, rejected only in very short candidates
pub const GENERIC_ACKNOWLEDGEMENTS: &[&str] = &[
    "hello", "hi", "how are you", "that is nice", "that is good", "thank you",
    "good job", "well done", "that is great",
];

/// Generic acknowledgements only count below this many words
const GENERIC_MAX_WORDS: usize = 5;

/// Minimum number of distinct words
const MIN_DISTINCT_WORDS: usize = 3;

/// Why a candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SelfReference,
    OccupationQuestion,
    OffTopicQuestion,
    GenericAcknowledgement,
    TooFewWords,
}

/// Strict deny-list filter
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentFilter;

impl ContentFilter {
    pub fn new() -> Self {
        Self
    }

    /// First failing check, or `None` if the candidate is clean
    pub fn check(&self, candidate: &str) -> Option<Rejection> {
        let lower = candidate.to_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();

        if contains_any(&lower, SELF_REFERENCES) {
            return Some(Rejection::SelfReference);
        }
        if contains_any(&lower, OCCUPATION_QUESTIONS) {
            return Some(Rejection::OccupationQuestion);
        }
        if contains_any(&lower, OFF_TOPIC_QUESTIONS) {
            return Some(Rejection::OffTopicQuestion);
        }
        if words.len() < GENERIC_MAX_WORDS && contains_any(&lower, GENERIC_ACKNOWLEDGEMENTS) {
            return Some(Rejection::GenericAcknowledgement);
        }

        let mut distinct = words.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < MIN_DISTINCT_WORDS {
            return Some(Rejection::TooFewWords);
        }

        None
    }

    /// The candidate unchanged, or `None` if any check fails
    pub fn apply<'a>(&self, candidate: &'a str) -> Option<&'a str> {
        match self.check(candidate) {
            None => Some(candidate),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_self_reference_regardless_of_content() {
        let filter = ContentFilter::new();
        assert_eq!(
            filter.check("I'm a good listener, how does that feel for you?"),
            Some(Rejection::SelfReference)
        );
        assert_eq!(
            filter.check("That sounds hard. Honestly my job is to help you explore it."),
            Some(Rejection::SelfReference)
        );
    }

    #[test]
    fn test_rejects_occupation_question() {
        let filter = ContentFilter::new();
        assert_eq!(
            filter.check("That sounds hard. What do you do for a living?"),
            Some(Rejection::OccupationQuestion)
        );
    }

    #[test]
    fn test_rejects_off_topic_question() {
        let filter = ContentFilter::new();
        assert_eq!(
            filter.check("That sounds hard. Do you have any pets at home?"),
            Some(Rejection::OffTopicQuestion)
        );
    }

    #[test]
    fn test_generic_only_rejected_when_short() {
        let filter = ContentFilter::new();
        assert_eq!(filter.check("Well done, really."), Some(Rejection::GenericAcknowledgement));
        assert_eq!(
            filter.check("Well done for naming that, how did it feel to say it out loud?"),
            None
        );
    }

    #[test]
    fn test_rejects_too_few_distinct_words() {
        let filter = ContentFilter::new();
        assert_eq!(filter.check("okay okay okay okay okay"), Some(Rejection::TooFewWords));
        assert_eq!(filter.check(""), Some(Rejection::TooFewWords));
    }

    #[test]
    fn test_accepts_clean_candidate() {
        let filter = ContentFilter::new();
        let text = "That sounds really difficult. What has been weighing on you most?";
        assert_eq!(filter.apply(text), Some(text));
    }
}
