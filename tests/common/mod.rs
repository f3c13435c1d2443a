#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::NaiveDate;
use rugby_planner_lambda_rust::error::AgentError;
use rugby_planner_lambda_rust::llm::{Prompt, TextGenerator};
use rugby_planner_lambda_rust::model::fixture::Fixture;
use rugby_planner_lambda_rust::model::forecast::DailyForecast;
use rugby_planner_lambda_rust::model::location::{Coordinates, Place};
use rugby_planner_lambda_rust::places::PlacesLookup;
use rugby_planner_lambda_rust::store::CalendarProvider;
use rugby_planner_lambda_rust::weather::ForecastProvider;

pub const CLUB: &str = "Ramsey (IoM)";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A fixture with the club at home, or away at the opponent's ground.
pub fn fixture(on: NaiveDate, opponent: &str, home: bool) -> Fixture {
    let home_side = if home { CLUB.to_string() } else { opponent.to_string() };
    Fixture {
        date: on,
        opponent: opponent.to_string(),
        venue: home_side.clone(),
        home_side,
        competition: None,
        team_name: Some(CLUB.to_string()),
        kick_off: None,
    }
}

/// In-memory calendar that records which months were asked for.
#[derive(Default)]
pub struct FakeCalendar {
    pub fixtures: Vec<Fixture>,
    pub fail: bool,
    pub calls: RefCell<Vec<(i32, u32)>>,
}

impl FakeCalendar {
    pub fn with(fixtures: Vec<Fixture>) -> Self {
        Self { fixtures, ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CalendarProvider for FakeCalendar {
    fn fetch_month(&self, _club: &str, year: i32, month: u32) -> Result<Vec<Fixture>, AgentError> {
        self.calls.borrow_mut().push((year, month));
        if self.fail {
            return Err(AgentError::upstream("calendar", "connection refused"));
        }
        Ok(self
            .fixtures
            .iter()
            .filter(|f| f.date.format("%Y-%m").to_string() == format!("{year:04}-{month:02}"))
            .cloned()
            .collect())
    }
}

/// Places lookup answering from a fixed table.
#[derive(Default)]
pub struct FakePlaces {
    pub places: HashMap<String, Place>,
    pub not_configured: bool,
    pub calls: Cell<usize>,
}

impl FakePlaces {
    pub fn with(query: &str, address: &str, latitude: f64, longitude: f64) -> Self {
        let mut places = HashMap::new();
        places.insert(
            query.to_string(),
            Place {
                display_name: Some(query.to_string()),
                formatted_address: Some(address.to_string()),
                coordinates: Coordinates { latitude, longitude },
            },
        );
        Self { places, ..Self::default() }
    }

    pub fn not_configured() -> Self {
        Self { not_configured: true, ..Self::default() }
    }
}

impl PlacesLookup for FakePlaces {
    fn lookup(&self, query: &str) -> Result<Option<Place>, AgentError> {
        self.calls.set(self.calls.get() + 1);
        if self.not_configured {
            return Err(AgentError::NotConfigured { service: "Google Maps" });
        }
        Ok(self.places.get(query).cloned())
    }
}

/// Forecast provider returning the same day repeatedly.
#[derive(Default)]
pub struct FakeForecast {
    pub fail: bool,
    pub calls: RefCell<Vec<u32>>,
}

impl FakeForecast {
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

pub fn sample_forecast() -> DailyForecast {
    DailyForecast {
        summary: "Light rain".to_string(),
        max_temp_c: Some(13.2),
        precip_probability: Some(0.6),
        wind_kph: Some(24.1),
    }
}

impl ForecastProvider for FakeForecast {
    fn daily(&self, _coordinates: Coordinates, days: u32) -> Result<Vec<DailyForecast>, AgentError> {
        self.calls.borrow_mut().push(days);
        if self.fail {
            return Err(AgentError::upstream("forecast", "timed out"));
        }
        Ok((0..days).map(|_| sample_forecast()).collect())
    }
}

/// Text generator with canned replies: extraction prompts get `extraction`,
/// everything else gets `advice`.
pub struct FakeText {
    pub extraction: Result<String, ()>,
    pub advice: Result<String, ()>,
    pub prompts: RefCell<Vec<Prompt>>,
}

impl FakeText {
    pub fn replying(extraction: &str, advice: &str) -> Self {
        Self { extraction: Ok(extraction.to_string()), advice: Ok(advice.to_string()), prompts: RefCell::new(Vec::new()) }
    }

    pub fn unconfigured() -> Self {
        Self { extraction: Err(()), advice: Err(()), prompts: RefCell::new(Vec::new()) }
    }
}

impl TextGenerator for FakeText {
    fn complete(&self, prompt: &Prompt) -> Result<String, AgentError> {
        self.prompts.borrow_mut().push(prompt.clone());
        let reply = if prompt.system.contains("extract structured info") { &self.extraction } else { &self.advice };
        reply.clone().map_err(|_| AgentError::NotConfigured { service: "OpenAI" })
    }
}
