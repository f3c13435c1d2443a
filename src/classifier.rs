use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Match,
    Training,
    General,
    Recovery,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Match => "match",
            EventType::Training => "training",
            EventType::General => "general",
            EventType::Recovery => "recovery",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides what kind of question the user asked.
pub trait QueryClassifier {
    fn classify(&self, query: &str) -> EventType;
}

const RECOVERY_WORDS: &[&str] = &["injury", "injured", "hamstring", "ankle", "acl", "recover", "rehab", "pulled", "sprain", "tear"];
const MATCH_WORDS: &[&str] = &["match", "kickoff", "kick-off", "fixture", "game", "play ", "playing", " vs ", "versus"];
const TRAINING_WORDS: &[&str] = &["train", "session", "practice"];

/// Keyword classifier. Injury wording wins over everything else, then match
/// wording, then training.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl QueryClassifier for KeywordClassifier {
    fn classify(&self, query: &str) -> EventType {
        let q = format!(" {} ", query.to_lowercase());
        let any = |words: &[&str]| words.iter().any(|w| q.contains(w));
        if any(RECOVERY_WORDS) {
            EventType::Recovery
        } else if any(MATCH_WORDS) {
            EventType::Match
        } else if any(TRAINING_WORDS) {
            EventType::Training
        } else {
            EventType::General
        }
    }
}
