use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::date_parser::parse_date;
use crate::llm::TextGenerator;
use crate::model::intent::{Intent, SidePreference};
use crate::prompts;

/// Fields the extraction capability may return. Any of them may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    pub date: Option<NaiveDate>,
    pub opponent: Option<String>,
    pub side: Option<SidePreference>,
}

/// Turns query text into an [`Intent`]: dates deterministically, opponent and
/// home/away wording through the optional extractor.
pub struct IntentParser<'a> {
    extractor: Option<&'a dyn TextGenerator>,
}

impl<'a> IntentParser<'a> {
    pub fn new(extractor: Option<&'a dyn TextGenerator>) -> Self {
        Self { extractor }
    }

    /// Never fails; an unavailable or confused extractor just leaves fields empty.
    #[instrument(level = "info", skip(self, text))]
    pub fn parse(&self, text: &str, today: NaiveDate) -> Intent {
        let found = parse_date(text, today);
        let mut intent = Intent {
            target_date: found.as_ref().map(|m| m.date),
            relative_date_expression: found.map(|m| m.expression),
            ..Intent::default()
        };

        let Some(extractor) = self.extractor else {
            return intent;
        };
        let prompt = prompts::fixture_extraction(text, today, intent.target_date);
        let extraction = match extractor.complete(&prompt) {
            Ok(reply) => parse_extraction(&reply),
            Err(e) => {
                warn!(error = %e, "Fixture extraction unavailable");
                Extraction::default()
            }
        };
        debug!(?extraction, "Extraction result");

        if intent.target_date.is_none() {
            intent.target_date = extraction.date;
        }
        intent.opponent_fragment = extraction.opponent;
        intent.side_preference = extraction.side;
        intent
    }
}

/// Best-effort read of the extractor's JSON reply. Code fences are tolerated;
/// anything malformed becomes `None`.
pub fn parse_extraction(reply: &str) -> Extraction {
    let trimmed = strip_code_fence(reply);
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) else {
        warn!("Extraction reply was not a JSON object");
        return Extraction::default();
    };

    let date = map
        .get("date")
        .and_then(Value::as_str)
        .and_then(|d| d.get(..10))
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
    let opponent = map
        .get("opponent")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
        .map(str::to_string);
    let side = map
        .get("ha")
        .or_else(|| map.get("home_away"))
        .and_then(Value::as_str)
        .and_then(SidePreference::from_wording);

    Extraction { date, opponent, side }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

/// Plain "home" / "away" wording in the raw query, used when the extractor
/// gave no side. Mentions of both cancel out.
pub fn side_from_wording(text: &str) -> Option<SidePreference> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split(|c: char| !c.is_alphanumeric()).collect();
    let home = words.contains(&"home");
    let away = words.contains(&"away");
    match (home, away) {
        (true, false) => Some(SidePreference::Home),
        (false, true) => Some(SidePreference::Away),
        _ => None,
    }
}
