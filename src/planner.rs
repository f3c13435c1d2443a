//! The query pipeline as an explicit state machine.
//!
//! ```text
//! Classify --(recovery)--> RecoveryBranch --> Output
//!    \--(otherwise)--> GatherInfo --> FetchAux --> Output
//! ```
//!
//! Every stage records what it could and turns failures into text, so
//! `Output` is always reached and always renders a report.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::advice;
use crate::cache::LocationCache;
use crate::classifier::{EventType, QueryClassifier};
use crate::config::{Config, NoMatchPolicy};
use crate::date_parser::parse_date;
use crate::intent::{side_from_wording, IntentParser};
use crate::llm::TextGenerator;
use crate::model::fixture::{Fixture, ResolutionMethod, ResolvedMatch, Side};
use crate::model::intent::Intent;
use crate::places::PlacesLookup;
use crate::report;
use crate::resolver;
use crate::store::{CalendarProvider, FixtureStore};
use crate::training::TrainingSchedule;
use crate::weather::{ForecastProvider, WeatherAdapter, WeatherOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Classify,
    GatherInfo,
    FetchAux,
    RecoveryBranch,
    Output,
}

/// Transition function. `None` once the report has been produced.
pub fn next_stage(stage: Stage, event_type: Option<EventType>) -> Option<Stage> {
    match stage {
        Stage::Classify if event_type == Some(EventType::Recovery) => Some(Stage::RecoveryBranch),
        Stage::Classify => Some(Stage::GatherInfo),
        Stage::GatherInfo => Some(Stage::FetchAux),
        Stage::FetchAux | Stage::RecoveryBranch => Some(Stage::Output),
        Stage::Output => None,
    }
}

/// Everything gathered for one query.
#[derive(Clone, Debug, Default)]
pub struct PlannerState {
    pub query: String,
    pub event_type: Option<EventType>,
    pub intent: Option<Intent>,
    pub resolution: Option<ResolutionMethod>,
    pub fixture: Option<Fixture>,
    /// Why there is no fixture, when there is none for a match question.
    pub fixture_note: Option<String>,
    pub date: Option<NaiveDate>,
    pub opponent: Option<String>,
    pub side: Option<Side>,
    /// Name shown on the Location line.
    pub location: Option<String>,
    /// Name to geocode when there is no fixture to take it from.
    pub place: Option<String>,
    pub weather: Option<WeatherOutcome>,
    pub tips: Option<String>,
    /// Stages visited, in order.
    pub trace: Vec<Stage>,
    pub report: String,
}

#[derive(Clone, Debug)]
pub struct PlannerSettings {
    pub club: String,
    pub training: TrainingSchedule,
    pub default_location: String,
    pub no_match_policy: NoMatchPolicy,
}

impl PlannerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            club: config.club_name.clone(),
            training: config.training.clone(),
            default_location: config.default_location.clone(),
            no_match_policy: config.no_match_policy,
        }
    }
}

/// External capabilities the planner sequences.
pub struct Collaborators<'a> {
    pub classifier: &'a dyn QueryClassifier,
    pub calendar: &'a dyn CalendarProvider,
    pub places: &'a dyn PlacesLookup,
    pub forecast: &'a dyn ForecastProvider,
    pub text: &'a dyn TextGenerator,
    pub cache: &'a mut dyn LocationCache,
}

pub struct Planner<'a> {
    settings: &'a PlannerSettings,
    deps: Collaborators<'a>,
}

impl<'a> Planner<'a> {
    pub fn new(settings: &'a PlannerSettings, deps: Collaborators<'a>) -> Self {
        Self { settings, deps }
    }

    /// Run the pipeline for one query, resolving relative dates against `today`.
    #[instrument(level = "info", skip(self, query))]
    pub fn run(&mut self, query: &str, today: NaiveDate) -> PlannerState {
        let mut state = PlannerState { query: query.to_string(), ..PlannerState::default() };
        let mut stage = Some(Stage::Classify);
        while let Some(current) = stage {
            state.trace.push(current);
            match current {
                Stage::Classify => self.classify(&mut state),
                Stage::GatherInfo => self.gather_info(&mut state, today),
                Stage::FetchAux => self.fetch_aux(&mut state, today),
                Stage::RecoveryBranch => self.recovery(&mut state),
                Stage::Output => state.report = report::render(&state),
            }
            stage = next_stage(current, state.event_type);
        }
        info!(event_type = ?state.event_type, stages = state.trace.len(), "Planner finished");
        state
    }

    fn classify(&self, state: &mut PlannerState) {
        let event_type = self.deps.classifier.classify(&state.query);
        info!(%event_type, "Classified query");
        state.event_type = Some(event_type);
    }

    fn gather_info(&mut self, state: &mut PlannerState, today: NaiveDate) {
        match state.event_type {
            Some(EventType::Match) => self.gather_match(state, today),
            Some(EventType::Training) => {
                let from = parse_date(&state.query, today).map_or(today, |m| m.date);
                state.date = self.settings.training.next_session(from);
                state.location = Some(self.settings.training.location.clone());
                state.place = state.location.clone();
            }
            _ => {
                state.date = Some(parse_date(&state.query, today).map_or(today, |m| m.date));
                state.location = Some(self.settings.default_location.clone());
                state.place = state.location.clone();
            }
        }
    }

    fn gather_match(&mut self, state: &mut PlannerState, today: NaiveDate) {
        let mut intent = IntentParser::new(Some(self.deps.text)).parse(&state.query, today);
        if intent.side_preference.is_none() {
            intent.side_preference = side_from_wording(&state.query);
        }

        let mut store = FixtureStore::new(self.deps.calendar, &self.settings.club);
        match resolver::resolve(&intent, &mut store, today) {
            Ok(ResolvedMatch::Found { fixture, method }) => {
                state.resolution = Some(method);
                state.date = Some(fixture.date);
                state.opponent = Some(fixture.opponent.clone());
                state.side = Some(fixture.side_for(&self.settings.club));
                state.location = Some(fixture.venue.clone());
                state.fixture = Some(fixture);
            }
            Ok(ResolvedMatch::NoMatch { nearest }) => {
                state.resolution = Some(ResolutionMethod::NoMatch);
                state.date = intent.target_date;
                state.fixture_note = Some(self.no_match_note(&intent, nearest.as_ref()));
            }
            Err(e) => {
                warn!(error = %e, "Fixture lookup failed");
                state.date = intent.target_date;
                state.fixture_note = Some(format!("Fixture information currently unavailable ({e})"));
            }
        }
        if state.fixture.is_none() {
            state.location = Some(self.settings.default_location.clone());
            state.place = state.location.clone();
        }
        state.intent = Some(intent);
    }

    fn no_match_note(&self, intent: &Intent, nearest: Option<&Fixture>) -> String {
        let mut note = match (intent.target_date, intent.opponent()) {
            (Some(date), _) if !intent.has_fixture_hints() => format!("No fixture found on {date}"),
            (_, Some(opponent)) => format!("No upcoming fixture found against {opponent}"),
            _ => "No upcoming fixture found".to_string(),
        };
        if self.settings.no_match_policy == NoMatchPolicy::SuggestClosest {
            if let Some(f) = nearest {
                let side = f.side_for(&self.settings.club);
                note.push_str(&format!("; closest fixture is {} vs {} ({})", f.date, f.opponent, side.code()));
            }
        }
        note
    }

    fn fetch_aux(&mut self, state: &mut PlannerState, today: NaiveDate) {
        let when = state.date.unwrap_or(today);
        let venue_weather = {
            let mut adapter = WeatherAdapter::new(self.deps.places, self.deps.forecast, &mut *self.deps.cache);
            match (&state.fixture, &state.place) {
                (Some(fixture), _) => Some(adapter.resolve_fixture_weather(fixture, today)),
                (None, Some(place)) => Some(adapter.resolve_place_weather(place, when, today)),
                (None, None) => None,
            }
        };

        if let Some(vw) = venue_weather {
            if let Some(entry) = vw.location {
                state.location = Some(entry.city_country);
            }
            state.weather = Some(vw.weather);
        }

        let event_type = state.event_type.unwrap_or(EventType::General);
        let forecast = state.weather.as_ref().and_then(WeatherOutcome::forecast);
        state.tips = Some(advice::nutrition_tips(self.deps.text, event_type.as_str(), when, forecast));
    }

    fn recovery(&self, state: &mut PlannerState) {
        state.tips = Some(advice::recovery_plan(self.deps.text, &state.query));
    }
}
