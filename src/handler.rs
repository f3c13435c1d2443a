use chrono::NaiveDate;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::cache::{JsonFileCache, LocationCache, MemoryCache};
use crate::classifier::{EventType, KeywordClassifier};
use crate::config::Config;
use crate::error::AgentError;
use crate::ical::IcalCalendar;
use crate::llm::OpenAiChat;
use crate::pitchero::PitcheroCalendar;
use crate::places::GooglePlaces;
use crate::planner::{Collaborators, Planner, PlannerSettings, PlannerState};
use crate::store::CalendarProvider;
use crate::weather::GoogleWeather;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub query: String,
    /// Overrides the club-local current date, mostly for replaying questions.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
    #[serde(default)]
    pub event_type: Option<EventType>,
}

const EMPTY_QUERY_MESSAGE: &str = "Ask about a match, a training session or an injury.";

#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let payload = event.payload;
    if payload.query.trim().is_empty() {
        return Ok(Response { message: EMPTY_QUERY_MESSAGE.to_string(), event_type: None });
    }
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration rejected");
            return Ok(config_error_response(&e));
        }
    };

    // Every upstream client is blocking, so the whole pipeline runs on the blocking pool.
    let state = tokio::task::spawn_blocking(move || run_query(&config, &payload.query, payload.today)).await?;

    info!(event_type = ?state.event_type, "Prepared report");
    Ok(Response { message: state.report, event_type: state.event_type })
}

/// Reply sent when the environment cannot be turned into a [`Config`].
pub fn config_error_response(e: &AgentError) -> Response {
    Response { message: format!("The planner is misconfigured and cannot answer right now ({e})."), event_type: None }
}

/// Wire the live collaborators from `config` and run one query end to end.
pub fn run_query(config: &Config, query: &str, today: Option<NaiveDate>) -> PlannerState {
    let today = today.unwrap_or_else(|| config.today());

    let calendar: Box<dyn CalendarProvider> = match &config.calendar_ics_url {
        Some(url) => Box::new(IcalCalendar::from_url(url, config.timezone)),
        None => Box::new(PitcheroCalendar::for_club(&config.pitchero_club_id)),
    };
    let places = GooglePlaces::new(config.google_maps_api_key.clone());
    let forecast = GoogleWeather::new(config.google_maps_api_key.clone());
    let text = OpenAiChat::new(&config.openai_base_url, &config.openai_model, config.openai_api_key.clone());
    let mut cache: Box<dyn LocationCache> = match JsonFileCache::open(&config.location_cache_path) {
        Ok(cache) => Box::new(cache),
        Err(e) => {
            warn!(error = %e, "Location cache unavailable; using an in-memory cache for this query");
            Box::new(MemoryCache::default())
        }
    };

    let settings = PlannerSettings::from_config(config);
    let mut planner = Planner::new(
        &settings,
        Collaborators {
            classifier: &KeywordClassifier,
            calendar: calendar.as_ref(),
            places: &places,
            forecast: &forecast,
            text: &text,
            cache: cache.as_mut(),
        },
    );
    planner.run(query, today)
}
