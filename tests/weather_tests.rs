mod common;

use common::{date, fixture, FakeForecast, FakePlaces};
use rugby_planner_lambda_rust::cache::{JsonFileCache, LocationCache, MemoryCache};
use rugby_planner_lambda_rust::model::forecast::ForecastDaysResponse;
use rugby_planner_lambda_rust::model::location::{city_country, Coordinates, LocationCacheEntry};
use rugby_planner_lambda_rust::weather::{WeatherAdapter, WeatherOutcome};

fn douglas_places() -> FakePlaces {
    FakePlaces::with("Douglas RFC", "Port-e-Chee, Douglas, Isle of Man", 54.16, -4.48)
}

fn cached(team: &str) -> LocationCacheEntry {
    LocationCacheEntry {
        team_name: team.to_string(),
        coordinates: Coordinates { latitude: 54.32, longitude: -4.38 },
        display_name: None,
        formatted_address: None,
        city_country: "Ramsey, Isle of Man".to_string(),
    }
}

#[test]
fn fixture_beyond_horizon_never_calls_forecast() {
    let places = douglas_places();
    let forecast = FakeForecast::default();
    let mut cache = MemoryCache::default();
    let today = date(2025, 10, 1);

    let vw = WeatherAdapter::new(&places, &forecast, &mut cache)
        .resolve_fixture_weather(&fixture(date(2025, 10, 12), "Douglas RFC", false), today);

    assert_eq!(vw.weather, WeatherOutcome::BeyondHorizon { date: date(2025, 10, 12) });
    assert_eq!(forecast.call_count(), 0);
    assert_eq!(
        vw.weather.explanation().as_deref(),
        Some("No forecast available yet for 2025-10-12 (more than 10 days out)")
    );
    // Location is still resolved for the report
    assert_eq!(vw.location.map(|l| l.city_country), Some("Port-e-Chee, Isle of Man".to_string()));
}

#[test]
fn beyond_horizon_even_without_a_places_key() {
    let places = FakePlaces::not_configured();
    let forecast = FakeForecast::default();
    let mut cache = MemoryCache::default();

    let vw = WeatherAdapter::new(&places, &forecast, &mut cache)
        .resolve_fixture_weather(&fixture(date(2025, 10, 20), "Douglas RFC", false), date(2025, 10, 1));

    assert_eq!(vw.weather, WeatherOutcome::BeyondHorizon { date: date(2025, 10, 20) });
    assert!(vw.location.is_none());
    assert_eq!(forecast.call_count(), 0);
}

#[test]
fn fixture_inside_horizon_picks_the_right_day() {
    let places = douglas_places();
    let forecast = FakeForecast::default();
    let mut cache = MemoryCache::default();

    let vw = WeatherAdapter::new(&places, &forecast, &mut cache)
        .resolve_fixture_weather(&fixture(date(2025, 10, 4), "Douglas RFC", false), date(2025, 10, 1));

    assert_eq!(vw.weather, WeatherOutcome::Forecast(common::sample_forecast()));
    assert_eq!(*forecast.calls.borrow(), vec![4]);
}

#[test]
fn horizon_day_is_still_forecast() {
    let places = douglas_places();
    let forecast = FakeForecast::default();
    let mut cache = MemoryCache::default();

    let vw = WeatherAdapter::new(&places, &forecast, &mut cache)
        .resolve_fixture_weather(&fixture(date(2025, 10, 11), "Douglas RFC", false), date(2025, 10, 1));

    assert!(vw.weather.forecast().is_some());
    assert_eq!(*forecast.calls.borrow(), vec![10]);
}

#[test]
fn cached_location_skips_places() {
    let places = FakePlaces::default();
    let forecast = FakeForecast::default();
    let mut cache = MemoryCache::default();
    cache.put(cached("Ramsey (IoM)")).unwrap();

    let vw = WeatherAdapter::new(&places, &forecast, &mut cache)
        .resolve_fixture_weather(&fixture(date(2025, 10, 4), "Castletown", true), date(2025, 10, 4));

    assert_eq!(places.calls.get(), 0);
    assert!(vw.weather.forecast().is_some());
}

#[test]
fn places_miss_tries_name_variants_and_caches_hit() {
    let places = FakePlaces::with("Castletown rugby club", "Poulsom Park, Castletown, Isle of Man", 54.07, -4.65);
    let forecast = FakeForecast::default();
    let mut cache = MemoryCache::default();
    let f = fixture(date(2025, 10, 4), "Castletown", false);

    let vw = WeatherAdapter::new(&places, &forecast, &mut cache).resolve_fixture_weather(&f, date(2025, 10, 1));

    assert_eq!(places.calls.get(), 2);
    assert!(vw.location.is_some());
    assert_eq!(cache.get("  CASTLETOWN ").map(|e| e.city_country), Some("Poulsom Park, Isle of Man".to_string()));
}

#[test]
fn no_places_result_is_unavailable() {
    let places = FakePlaces::default();
    let forecast = FakeForecast::default();
    let mut cache = MemoryCache::default();

    let vw = WeatherAdapter::new(&places, &forecast, &mut cache)
        .resolve_place_weather("Atlantis", date(2025, 10, 2), date(2025, 10, 1));

    assert_eq!(vw.weather, WeatherOutcome::Unavailable { reason: "geocoding returned no results".to_string() });
    assert_eq!(places.calls.get(), 1);
    assert_eq!(forecast.call_count(), 0);
}

#[test]
fn missing_key_is_explained() {
    let places = FakePlaces::not_configured();
    let forecast = FakeForecast::default();
    let mut cache = MemoryCache::default();

    let vw = WeatherAdapter::new(&places, &forecast, &mut cache)
        .resolve_fixture_weather(&fixture(date(2025, 10, 4), "Douglas RFC", false), date(2025, 10, 1));

    // No further name variants once the capability is known to be unconfigured
    assert_eq!(places.calls.get(), 1);
    assert_eq!(
        vw.weather.explanation().as_deref(),
        Some("Currently unavailable (no Google Maps API key configured)")
    );
}

#[test]
fn forecast_failure_is_unavailable_not_fatal() {
    let places = douglas_places();
    let forecast = FakeForecast { fail: true, ..FakeForecast::default() };
    let mut cache = MemoryCache::default();

    let vw = WeatherAdapter::new(&places, &forecast, &mut cache)
        .resolve_fixture_weather(&fixture(date(2025, 10, 2), "Douglas RFC", false), date(2025, 10, 1));

    assert!(matches!(vw.weather, WeatherOutcome::Unavailable { .. }));
    assert!(vw.location.is_some());
}

#[test]
fn past_date_is_unavailable() {
    let places = douglas_places();
    let forecast = FakeForecast::default();
    let mut cache = MemoryCache::default();

    let vw = WeatherAdapter::new(&places, &forecast, &mut cache)
        .resolve_fixture_weather(&fixture(date(2025, 9, 27), "Douglas RFC", false), date(2025, 10, 1));

    assert_eq!(vw.weather, WeatherOutcome::Unavailable { reason: "date is in the past".to_string() });
    assert_eq!(forecast.call_count(), 0);
}

#[test]
fn json_cache_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".cache").join("team_locations.json");

    let mut cache = JsonFileCache::open(&path).unwrap();
    assert!(cache.is_empty());
    cache.put(cached("Ramsey (IoM)")).unwrap();
    assert!(path.exists());

    let reopened = JsonFileCache::open(&path).unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get("ramsey (iom)"), Some(cached("Ramsey (IoM)")));
}

#[test]
fn corrupt_cache_file_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("team_locations.json");
    std::fs::write(&path, "not json").unwrap();

    let mut cache = JsonFileCache::open(&path).unwrap();
    assert!(cache.is_empty());
    cache.put(cached("Douglas RFC")).unwrap();
    assert_eq!(JsonFileCache::open(&path).unwrap().len(), 1);
}

#[test]
fn city_country_keeps_first_and_last_parts() {
    assert_eq!(city_country("Mooragh Park, Ramsey, Isle of Man"), "Mooragh Park, Isle of Man");
    assert_eq!(city_country("Ramsey"), "Ramsey");
}

#[test]
fn google_forecast_day_is_collapsed() {
    let body = r#"{
        "forecastDays": [{
            "daytimeForecast": {
                "weatherCondition": { "description": { "text": "Showers" } },
                "precipitation": { "probability": { "percent": 70 } },
                "wind": { "speed": { "value": 10, "unit": "MILES_PER_HOUR" } }
            },
            "maxTemperature": { "degrees": 12.5 }
        }]
    }"#;
    let parsed: ForecastDaysResponse = serde_json::from_str(body).unwrap();
    let day = parsed.forecast_days[0].to_daily();

    assert_eq!(day.summary, "Showers");
    assert_eq!(day.max_temp_c, Some(12.5));
    assert_eq!(day.precip_probability, Some(0.7));
    let wind = day.wind_kph.unwrap();
    assert!((wind - 16.0934).abs() < 1e-6, "wind was {wind}");
}

#[test]
fn small_rain_percentages_are_scaled() {
    let body = r#"{"forecastDays": [{"daytimeForecast": {"precipitation": {"probability": {"percent": 1}}}}]}"#;
    let parsed: ForecastDaysResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.forecast_days[0].to_daily().precip_probability, Some(0.01));

    let body = r#"{"forecastDays": [{"daytimeForecast": {"precipitation": {"probability": {"percent": 0}}}}]}"#;
    let parsed: ForecastDaysResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.forecast_days[0].to_daily().precip_probability, Some(0.0));
}
