//! Venue location and short-range forecast for a fixture or training slot.
//!
//! Locations come from the cache first and from the places capability on a
//! miss. Forecasts are only requested inside [`FORECAST_HORIZON_DAYS`]; past
//! that the outcome is [`WeatherOutcome::BeyondHorizon`], which is a normal
//! answer rather than a failure.

use chrono::NaiveDate;
use tracing::{error, info, info_span, instrument, warn};
use ureq::Agent;

use crate::cache::LocationCache;
use crate::error::AgentError;
use crate::model::fixture::Fixture;
use crate::model::forecast::{DailyForecast, ForecastDaysResponse};
use crate::model::location::{Coordinates, LocationCacheEntry};
use crate::places::PlacesLookup;

/// Furthest day ahead a forecast is requested for.
pub const FORECAST_HORIZON_DAYS: i64 = 10;

const SERVICE: &str = "forecast";
const FORECAST_URL: &str = "https://weather.googleapis.com/v1/forecast/days:lookup";

/// Daily forecasts starting today.
pub trait ForecastProvider {
    /// Forecasts for `days` consecutive days, index 0 being today.
    fn daily(&self, coordinates: Coordinates, days: u32) -> Result<Vec<DailyForecast>, AgentError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum WeatherOutcome {
    Forecast(DailyForecast),
    BeyondHorizon { date: NaiveDate },
    Unavailable { reason: String },
}

impl WeatherOutcome {
    fn unavailable(reason: impl Into<String>) -> Self {
        WeatherOutcome::Unavailable { reason: reason.into() }
    }

    /// One-line description for outcomes that carry no forecast.
    pub fn explanation(&self) -> Option<String> {
        match self {
            WeatherOutcome::Forecast(_) => None,
            WeatherOutcome::BeyondHorizon { date } => Some(format!(
                "No forecast available yet for {date} (more than {FORECAST_HORIZON_DAYS} days out)"
            )),
            WeatherOutcome::Unavailable { reason } => Some(format!("Currently unavailable ({reason})")),
        }
    }

    pub fn forecast(&self) -> Option<&DailyForecast> {
        match self {
            WeatherOutcome::Forecast(f) => Some(f),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VenueWeather {
    pub location: Option<LocationCacheEntry>,
    pub weather: WeatherOutcome,
}

/// Resolves where and what the weather will be, sequentially and without retries.
pub struct WeatherAdapter<'a> {
    places: &'a dyn PlacesLookup,
    forecast: &'a dyn ForecastProvider,
    cache: &'a mut dyn LocationCache,
}

impl<'a> WeatherAdapter<'a> {
    pub fn new(places: &'a dyn PlacesLookup, forecast: &'a dyn ForecastProvider, cache: &'a mut dyn LocationCache) -> Self {
        Self { places, forecast, cache }
    }

    /// Weather at the home side's ground on the fixture date.
    pub fn resolve_fixture_weather(&mut self, fixture: &Fixture, today: NaiveDate) -> VenueWeather {
        let variants = team_query_variants(&fixture.home_side);
        self.resolve(&fixture.home_side, &variants, fixture.date, today)
    }

    /// Weather for a named place (training ground, region) on `date`.
    pub fn resolve_place_weather(&mut self, place: &str, date: NaiveDate, today: NaiveDate) -> VenueWeather {
        self.resolve(place, &[place.to_string()], date, today)
    }

    #[instrument(level = "info", skip(self, variants))]
    fn resolve(&mut self, name: &str, variants: &[String], date: NaiveDate, today: NaiveDate) -> VenueWeather {
        let delta = (date - today).num_days();
        let located = self.locate(name, variants);
        if delta > FORECAST_HORIZON_DAYS {
            info!(%date, delta, "Date beyond forecast horizon");
            if let Err(e) = &located {
                warn!(error = %e, name, "Location lookup failed");
            }
            return VenueWeather { location: located.ok().flatten(), weather: WeatherOutcome::BeyondHorizon { date } };
        }
        let location = match located {
            Ok(location) => location,
            Err(e) => {
                warn!(error = %e, name, "Location lookup failed");
                return VenueWeather { location: None, weather: WeatherOutcome::unavailable(unavailable_reason(&e)) };
            }
        };

        if delta < 0 {
            return VenueWeather { location, weather: WeatherOutcome::unavailable("date is in the past") };
        }
        let Some(entry) = location.as_ref() else {
            return VenueWeather { location, weather: WeatherOutcome::unavailable("geocoding returned no results") };
        };

        let days = (delta + 1).clamp(1, FORECAST_HORIZON_DAYS) as u32;
        let weather = match self.forecast.daily(entry.coordinates, days) {
            Ok(mut forecasts) if !forecasts.is_empty() => {
                // At most ten days are served; the last one stands in for the horizon day.
                let index = (delta as usize).min(forecasts.len() - 1);
                WeatherOutcome::Forecast(forecasts.swap_remove(index))
            }
            Ok(_) => WeatherOutcome::unavailable("forecast returned no days"),
            Err(e) => {
                warn!(error = %e, "Forecast lookup failed");
                WeatherOutcome::unavailable(unavailable_reason(&e))
            }
        };
        VenueWeather { location, weather }
    }

    /// Cached location for `name`, or the first places hit among `variants`.
    fn locate(&mut self, name: &str, variants: &[String]) -> Result<Option<LocationCacheEntry>, AgentError> {
        if name.trim().is_empty() {
            return Ok(None);
        }
        if let Some(hit) = self.cache.get(name) {
            return Ok(Some(hit));
        }

        let mut last_err = None;
        for query in variants {
            match self.places.lookup(query) {
                Ok(Some(place)) => {
                    let entry = LocationCacheEntry::from_place(name.trim(), place);
                    if let Err(e) = self.cache.put(entry.clone()) {
                        warn!(error = %e, "Could not persist location cache entry");
                    }
                    info!(name, city_country = %entry.city_country, "Geocoded location");
                    return Ok(Some(entry));
                }
                Ok(None) => continue,
                Err(e @ AgentError::NotConfigured { .. }) => return Err(e),
                Err(e) => last_err = Some(e),
            }
        }
        last_err.map_or(Ok(None), Err)
    }
}

fn team_query_variants(team: &str) -> Vec<String> {
    let team = team.trim();
    vec![team.to_string(), format!("{team} rugby club"), format!("{team} RUFC")]
}

fn unavailable_reason(e: &AgentError) -> String {
    match e {
        AgentError::NotConfigured { service } => format!("no {service} API key configured"),
        other => other.to_string(),
    }
}

/// Google Weather daily forecast lookup.
#[derive(Debug, Clone)]
pub struct GoogleWeather {
    api_key: Option<String>,
    agent: Agent,
}

impl GoogleWeather {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key, agent: crate::http::agent() }
    }
}

impl ForecastProvider for GoogleWeather {
    #[instrument(level = "info", skip(self))]
    fn daily(&self, coordinates: Coordinates, days: u32) -> Result<Vec<DailyForecast>, AgentError> {
        let api_key = self.api_key.as_deref().ok_or(AgentError::NotConfigured { service: "Google Maps" })?;
        let response = {
            let _span = info_span!("forecast_fetch", url = FORECAST_URL, days).entered();
            self.agent
                .get(FORECAST_URL)
                .header("X-Goog-Api-Key", api_key)
                .query("location.latitude", coordinates.latitude.to_string())
                .query("location.longitude", coordinates.longitude.to_string())
                .query("days", days.to_string())
                .query("languageCode", "en")
                .call()
        }
        .map_err(|e| {
            error!(error = %e, "Forecast request failed");
            AgentError::upstream(SERVICE, e)
        })?;

        let parsed: ForecastDaysResponse = response
            .into_body()
            .read_json()
            .map_err(|e| AgentError::malformed(SERVICE, e))?;
        Ok(parsed.forecast_days.iter().map(|d| d.to_daily()).collect())
    }
}
