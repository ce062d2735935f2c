//! Situational context derived from request text.
//!
//! [`SituationalContext::classify`] runs four independent keyword tables over
//! the lowercased request. Tables are scanned in order and the first entry
//! with a matching keyword wins; nothing matching yields the neutral default.

use serde::{Deserialize, Serialize};

/// Emotional state expressed by the requester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Neutral,
    Happy,
    Frustrated,
    Urgent,
    Confused,
    Excited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    #[default]
    Moderate,
    Complex,
    Expert,
}

/// Tone the answer should be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Formal,
    Casual,
    Empathetic,
    Direct,
    Supportive,
}

const MOOD_KEYWORDS: &[(Mood, &[&str])] = &[
    (
        Mood::Frustrated,
        &["frustrat", "annoy", "angry", "not working", "doesn't work", "broken", "fed up"],
    ),
    (Mood::Urgent, &["urgent", "asap", "immediately", "right now", "emergency"]),
    (
        Mood::Confused,
        &["confus", "don't understand", "do not understand", "unclear", "lost", "what does"],
    ),
    (Mood::Excited, &["excited", "amazing", "awesome", "can't wait", "!!"]),
    (Mood::Happy, &["happy", "thanks", "thank you", "great", "love", "glad"]),
];

const URGENCY_KEYWORDS: &[(Urgency, &[&str])] = &[
    (
        Urgency::Critical,
        &["critical", "emergency", "outage", "production down", "data loss", "security breach"],
    ),
    (Urgency::High, &["urgent", "asap", "immediately", "deadline", "today"]),
    (Urgency::Low, &["no rush", "whenever", "eventually", "someday", "low priority"]),
];

const COMPLEXITY_KEYWORDS: &[(Complexity, &[&str])] = &[
    (
        Complexity::Expert,
        &["architecture", "algorithm", "distributed", "optimiz", "formal proof", "concurrency"],
    ),
    (
        Complexity::Complex,
        &["integrat", "multiple", "analy", "compare", "trade-off", "tradeoff", "strategy"],
    ),
    (
        Complexity::Simple,
        &["what is", "simple", "quick question", "basic", "define", "example of"],
    ),
];

const TONE_KEYWORDS: &[(Tone, &[&str])] = &[
    (Tone::Empathetic, &["worried", "sad", "struggling", "stressed", "i feel", "overwhelmed"]),
    (Tone::Direct, &["just tell me", "directly", "bottom line", "short answer", "tl;dr"]),
    (Tone::Supportive, &["help me", "guidance", "support", "advice", "encourage"]),
    (Tone::Casual, &["hey", "hi ", "lol", "cool", "btw", "gonna"]),
];

fn first_match<T: Copy>(text: &str, table: &[(T, &[&str])]) -> Option<T> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(value, _)| *value)
}

/// Lightweight situational profile of one request (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SituationalContext {
    pub mood: Mood,
    pub urgency: Urgency,
    pub complexity: Complexity,
    pub tone: Tone,
}

impl SituationalContext {
    /// Derive a context from raw request text.
    pub fn classify(text: &str) -> Self {
        let lowered = text.to_lowercase();
        Self {
            mood: first_match(&lowered, MOOD_KEYWORDS).unwrap_or_default(),
            urgency: first_match(&lowered, URGENCY_KEYWORDS).unwrap_or_default(),
            complexity: first_match(&lowered, COMPLEXITY_KEYWORDS).unwrap_or_default(),
            tone: first_match(&lowered, TONE_KEYWORDS).unwrap_or_default(),
        }
    }

    /// Guidance lines appended to an instruction prefix.
    ///
    /// Neutral dimensions contribute nothing, so the default context
    /// produces an empty list.
    pub fn guidance(&self) -> Vec<&'static str> {
        let mut lines = Vec::new();

        match self.mood {
            Mood::Frustrated => lines.push(
                "The user is frustrated: be patient, acknowledge the problem and get straight to a fix.",
            ),
            Mood::Urgent => lines.push("The user is in a hurry: be concise and lead with the answer."),
            Mood::Confused => {
                lines.push("The user is confused: explain step by step and avoid jargon.")
            }
            Mood::Excited => lines.push("The user is excited: match their energy while staying accurate."),
            Mood::Happy => lines.push("The user is in a good mood: keep the tone warm."),
            Mood::Neutral => {}
        }

        match self.urgency {
            Urgency::Critical => lines.push(
                "This is critical: give the immediate mitigation first, then the full explanation.",
            ),
            Urgency::High => lines.push("This is time sensitive: prioritise actionable steps."),
            Urgency::Low => lines.push("There is no time pressure: thoroughness is welcome."),
            Urgency::Medium => {}
        }

        match self.complexity {
            Complexity::Expert => {
                lines.push("The question is expert level: use precise technical depth.")
            }
            Complexity::Complex => {
                lines.push("The question has several parts: structure the answer clearly.")
            }
            Complexity::Simple => lines.push("The question is simple: keep the answer short."),
            Complexity::Moderate => {}
        }

        match self.tone {
            Tone::Casual => lines.push("Write in a relaxed, conversational tone."),
            Tone::Empathetic => lines.push("Write with empathy and reassurance."),
            Tone::Direct => lines.push("Be direct; skip preamble."),
            Tone::Supportive => lines.push("Be encouraging and supportive."),
            Tone::Formal => {}
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_nothing_matches() {
        let ctx = SituationalContext::classify("Describe the weather pattern in spring.");
        assert_eq!(ctx, SituationalContext::default());
        assert_eq!(ctx.mood, Mood::Neutral);
        assert_eq!(ctx.urgency, Urgency::Medium);
        assert_eq!(ctx.complexity, Complexity::Moderate);
        assert_eq!(ctx.tone, Tone::Formal);
        assert!(ctx.guidance().is_empty());
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let ctx = SituationalContext::classify("URGENT: Production DOWN, this is CRITICAL");
        assert_eq!(ctx.mood, Mood::Urgent);
        assert_eq!(ctx.urgency, Urgency::Critical);
    }

    #[test]
    fn test_first_match_wins() {
        // "frustrated" comes before "urgent" in the mood table
        let ctx = SituationalContext::classify("I'm frustrated and this is urgent");
        assert_eq!(ctx.mood, Mood::Frustrated);
        assert_eq!(ctx.urgency, Urgency::High);
    }

    #[test]
    fn test_dimensions_are_independent() {
        let ctx = SituationalContext::classify(
            "hey, just tell me the distributed consensus algorithm, no rush",
        );
        assert_eq!(ctx.mood, Mood::Neutral);
        assert_eq!(ctx.urgency, Urgency::Low);
        assert_eq!(ctx.complexity, Complexity::Expert);
        assert_eq!(ctx.tone, Tone::Direct);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let text = "Thanks! Can you help me compare multiple options?";
        let first = SituationalContext::classify(text);
        let second = SituationalContext::classify(text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_guidance_for_frustrated_mood() {
        let ctx = SituationalContext {
            mood: Mood::Frustrated,
            ..Default::default()
        };
        let guidance = ctx.guidance();
        assert_eq!(guidance.len(), 1);
        assert!(guidance[0].contains("patient"));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_value(SituationalContext::default()).unwrap();
        assert_eq!(json["mood"], "neutral");
        assert_eq!(json["tone"], "formal");
    }
}
