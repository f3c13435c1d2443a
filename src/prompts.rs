use chrono::NaiveDate;

use crate::llm::Prompt;
use crate::model::forecast::DailyForecast;

pub fn fixture_extraction(query: &str, today: NaiveDate, resolved_date: Option<NaiveDate>) -> Prompt {
    let system = format!(
        "You extract structured info from a user's rugby fixture question. \
         Output STRICT JSON with keys: date, opponent, ha. \
         - date must be ISO YYYY-MM-DD or null. Today is {today}; if a named date has already passed this year, use next year. \
         - opponent is the opponent team name if mentioned, else null. Use the short official name (e.g. 'Ormskirk'). \
         - ha is 'h' for home or 'a' for away if clearly implied ('at Ormskirk' -> 'a', 'home vs X' -> 'h'), else null."
    );
    let prefix = resolved_date.map(|d| format!("Resolved date: {d}\n\n")).unwrap_or_default();
    let user = format!(
        "{prefix}User query:\n{query}\n\n\
         Return only JSON, no extra text. Example: {{\"date\": \"2025-10-18\", \"opponent\": \"Ormskirk\", \"ha\": \"h\"}}"
    );
    Prompt { system, user, temperature: 0.0 }
}

pub fn nutrition_tips(event_type: &str, when: NaiveDate, weather: Option<&DailyForecast>) -> Prompt {
    let system = "You are a rugby performance nutrition assistant. Provide SHORT, practical tips. \
                  Always include hydration, carbs/protein timing, and weather-appropriate gear. \
                  Keep to 6-10 bullets; no long paragraphs."
        .to_string();
    let weather_line = match weather {
        Some(w) => format!(
            "{} | {} | rain {} | wind {}",
            w.summary,
            w.max_temp_c.map_or("N/A".to_string(), |t| format!("{t}°C")),
            w.precip_probability.map_or("N/A".to_string(), |p| format!("{}%", (p * 100.0).round())),
            w.wind_kph.map_or("N/A".to_string(), |k| format!("{} kph", k.round())),
        ),
        None => "unknown".to_string(),
    };
    let user = format!(
        "Context:\n- Event type: {event_type}\n- Date: {when}\n- Weather: {weather_line}\n\n\
         Output a concise bullet list only. Example style:\n- Hydration...\n- Pre-...\n- Gear...\n- Post-...\n"
    );
    Prompt { system, user, temperature: 0.3 }
}

pub fn recovery_plan(query: &str) -> Prompt {
    let system = "You are a rugby physio assistant. Create a short, practical recovery plan. \
                  Assume a non-emergency soft-tissue injury unless the user states otherwise. \
                  Always include a phased timeline, pain-free progression gates and a clear referral disclaimer. \
                  Keep it concise (8-12 bullets)."
        .to_string();
    let user = format!(
        "User context: {query}\n\nOutput format:\n\
         - Phase 1 (Days X-Y): ...\n- Phase 2 (Days X-Y): ...\n- Phase 3 (Week X): ...\n\
         - Return-to-play criteria: ...\n- Disclaimer: ...\n"
    );
    Prompt { system, user, temperature: 0.3 }
}
