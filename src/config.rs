use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use dotenv::dotenv;

use crate::error::AgentError;
use crate::training::TrainingSchedule;

pub const DEFAULT_CLUB_ID: &str = "7732";
pub const DEFAULT_TEAM_NAME: &str = "Ramsey (IoM)";
pub const DEFAULT_TIMEZONE: &str = "Europe/Isle_of_Man";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CACHE_PATH: &str = ".cache/team_locations.json";
pub const DEFAULT_LOCATION: &str = "Isle of Man";

/// What the report says when an exact-date question matches no fixture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoMatchPolicy {
    /// Say plainly that nothing was found.
    #[default]
    Explicit,
    /// Also name the closest fixture as a hint.
    SuggestClosest,
}

impl FromStr for NoMatchPolicy {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "explicit" => Ok(NoMatchPolicy::Explicit),
            "suggest-closest" | "suggest_closest" | "closest" => Ok(NoMatchPolicy::SuggestClosest),
            other => Err(AgentError::Config(format!("unknown NO_MATCH_POLICY '{other}'"))),
        }
    }
}

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Clone, Debug)]
pub struct Config {
    pub pitchero_club_id: String,
    pub club_name: String,
    pub calendar_ics_url: Option<String>,
    pub timezone: Tz,
    pub google_maps_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub location_cache_path: PathBuf,
    pub training: TrainingSchedule,
    pub default_location: String,
    pub no_match_policy: NoMatchPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, AgentError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AgentError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let timezone_name = or_default("CLUB_TIMEZONE", DEFAULT_TIMEZONE);
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|e| AgentError::Config(format!("CLUB_TIMEZONE '{timezone_name}': {e}")))?;

        let training_days = match get("TRAINING_DAYS") {
            Some(raw) => parse_weekdays(&raw)?,
            None => TrainingSchedule::default().days,
        };
        let training = TrainingSchedule {
            days: training_days,
            location: or_default("TRAINING_LOCATION", &TrainingSchedule::default().location),
        };

        let no_match_policy = match get("NO_MATCH_POLICY") {
            Some(raw) => raw.parse()?,
            None => NoMatchPolicy::default(),
        };

        Ok(Self {
            pitchero_club_id: or_default("PITCHERO_CLUB_ID", DEFAULT_CLUB_ID),
            club_name: or_default("PITCHERO_TEAM_NAME", DEFAULT_TEAM_NAME),
            calendar_ics_url: get("CALENDAR_ICS_URL"),
            timezone,
            google_maps_api_key: get("GOOGLE_MAPS_API_KEY"),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            openai_base_url: or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            location_cache_path: PathBuf::from(or_default("LOCATION_CACHE_PATH", DEFAULT_CACHE_PATH)),
            training,
            default_location: or_default("DEFAULT_LOCATION", DEFAULT_LOCATION),
            no_match_policy,
        })
    }

    /// Current date at the club.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

fn parse_weekdays(raw: &str) -> Result<Vec<Weekday>, AgentError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Weekday>()
                .map_err(|_| AgentError::Config(format!("TRAINING_DAYS entry '{s}' is not a weekday")))
        })
        .collect()
}
