use crate::classifier::EventType;
use crate::model::forecast::DailyForecast;
use crate::planner::PlannerState;
use crate::weather::WeatherOutcome;

/// Render the final report. Field order is fixed:
/// header, Date, Opposition, Location, Weather, Tips. Empty fields are left out.
pub fn render(state: &PlannerState) -> String {
    let header = match state.event_type {
        Some(et) => format!("=== {} ===", et.as_str().to_uppercase()),
        None => "=== ===".to_string(),
    };

    if state.event_type == Some(EventType::Recovery) {
        let plan = state.tips.as_deref().unwrap_or_default();
        return format!("{header}\n{plan}").trim().to_string();
    }

    let mut lines = vec![header];
    if let Some(date) = state.date {
        lines.push(format!("Date: {date}"));
    }
    match (&state.opponent, &state.fixture_note) {
        (Some(opponent), _) => {
            let suffix = state.side.map(|s| format!(" ({})", s.code())).unwrap_or_default();
            lines.push(format!("Opposition: {opponent}{suffix}"));
        }
        (None, Some(note)) => lines.push(format!("Opposition: {note}")),
        (None, None) => {}
    }
    if let Some(location) = state.location.as_deref().filter(|l| !l.is_empty() && *l != "Unavailable") {
        lines.push(format!("Location: {location}"));
    }
    if let Some(weather) = &state.weather {
        lines.push(weather_line(weather));
    }
    if let Some(tips) = state.tips.as_deref().filter(|t| !t.trim().is_empty()) {
        lines.push("Tips:".to_string());
        lines.push(tips.trim_end().to_string());
    }
    lines.join("\n")
}

fn weather_line(weather: &WeatherOutcome) -> String {
    match (weather.forecast(), weather.explanation()) {
        (Some(f), _) => forecast_line(f),
        (None, Some(text)) => format!("Weather: {text}"),
        (None, None) => "Weather: Unavailable".to_string(),
    }
}

fn forecast_line(f: &DailyForecast) -> String {
    let mut parts = vec![format!("Weather: {}", f.summary)];
    if let Some(t) = f.max_temp_c {
        parts.push(format!("{t:.0}°C"));
    }
    if let Some(p) = f.precip_probability {
        parts.push(format!("rain {}%", (p * 100.0).round() as i64));
    }
    if let Some(w) = f.wind_kph {
        parts.push(format!("wind {w:.0} kph"));
    }
    parts.join(" | ")
}
