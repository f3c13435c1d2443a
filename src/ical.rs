use std::cell::OnceCell;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::Component;
use tracing::{error, info, info_span, warn};
use ureq::Agent;

use crate::error::AgentError;
use crate::model::fixture::{normalize_team_name, Fixture};
use crate::store::CalendarProvider;

const SERVICE: &str = "calendar";

/// Club fixtures from an iCalendar feed. The feed is downloaded once per
/// instance and filtered per month.
pub struct IcalCalendar {
    url: String,
    timezone: Tz,
    agent: Agent,
    events: OnceCell<Vec<IcalEvent>>,
}

/// One VEVENT reduced to the fields a fixture needs.
#[derive(Clone, Debug)]
struct IcalEvent {
    start: NaiveDateTime,
    home: String,
    away: String,
    location: String,
    competition: Option<String>,
}

impl IcalCalendar {
    pub fn from_url(url: &str, timezone: Tz) -> Self {
        Self { url: url.to_string(), timezone, agent: crate::http::agent(), events: OnceCell::new() }
    }

    /// Build from a raw ICS string (no network).
    pub fn from_ics(ics: &str, timezone: Tz) -> Result<Self, AgentError> {
        let events = parse_events(ics, timezone)?;
        let calendar = Self { url: String::new(), timezone, agent: crate::http::agent(), events: OnceCell::new() };
        let _ = calendar.events.set(events);
        Ok(calendar)
    }

    fn events(&self) -> Result<&[IcalEvent], AgentError> {
        if let Some(events) = self.events.get() {
            return Ok(events);
        }
        let body = self.download()?;
        let events = parse_events(&body, self.timezone)?;
        info!(count = events.len(), "Parsed ICS feed");
        Ok(self.events.get_or_init(|| events))
    }

    fn download(&self) -> Result<String, AgentError> {
        let response = {
            let _span = info_span!("ics_fetch", url = %self.url).entered();
            self.agent.get(&self.url).call()
        }
        .map_err(|e| {
            error!(error = %e, url = %self.url, "ICS request failed");
            AgentError::upstream(SERVICE, e)
        })?;
        response.into_body().read_to_string().map_err(|e| {
            error!(error = %e, "Failed to read ICS body");
            AgentError::upstream(SERVICE, e)
        })
    }
}

impl CalendarProvider for IcalCalendar {
    fn fetch_month(&self, club: &str, year: i32, month: u32) -> Result<Vec<Fixture>, AgentError> {
        let club_key = normalize_team_name(club);
        let fixtures = self
            .events()?
            .iter()
            .filter(|e| e.start.year() == year && e.start.month() == month)
            .filter_map(|e| {
                let opponent = if normalize_team_name(&e.home) == club_key {
                    e.away.clone()
                } else if normalize_team_name(&e.away) == club_key {
                    e.home.clone()
                } else {
                    return None;
                };
                let venue = if e.location.is_empty() { e.home.clone() } else { e.location.clone() };
                Some(Fixture {
                    date: e.start.date(),
                    opponent,
                    home_side: e.home.clone(),
                    venue,
                    competition: e.competition.clone(),
                    team_name: Some(club.to_string()),
                    kick_off: Some(e.start.time()),
                })
            })
            .collect();
        Ok(fixtures)
    }
}

fn parse_events(ics: &str, timezone: Tz) -> Result<Vec<IcalEvent>, AgentError> {
    let calendar: icalendar::Calendar = icalendar::parser::read_calendar(ics)
        .map_err(|e| {
            error!(error = %e, "ICS parse error");
            AgentError::malformed(SERVICE, e)
        })?
        .into();

    let mut events = Vec::new();
    for comp in &calendar.components {
        if let icalendar::CalendarComponent::Event(e) = comp {
            let summary = e.property_value("SUMMARY").unwrap_or("");
            let Some((competition, home, away)) = split_home_away(summary) else {
                warn!(summary, "Skipping ICS event that is not a fixture");
                continue;
            };
            let dtstart = e.property_value("DTSTART").unwrap_or("");
            let Some(start) = parse_dt(dtstart, timezone) else {
                warn!(dtstart, "Skipping ICS event with invalid DTSTART");
                continue;
            };
            let location = e.property_value("LOCATION").map(first_location_line).unwrap_or_default();
            events.push(IcalEvent { start, home, away, location, competition });
        }
    }
    Ok(events)
}

/// Parse DTSTART into club-local time. UTC stamps (trailing `Z`) are converted.
fn parse_dt(s: &str, timezone: Tz) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    let (s2, is_utc) = match s.strip_suffix('Z') {
        Some(stripped) => (stripped, true),
        None => (s, false),
    };
    for pat in ["%Y%m%dT%H%M%S", "%Y%m%dT%H%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s2, pat) {
            if is_utc {
                return Some(Utc.from_utc_datetime(&dt).with_timezone(&timezone).naive_local());
            }
            return Some(dt);
        }
    }
    // All-day dates (no time)
    NaiveDate::parse_from_str(s2, "%Y%m%d").ok()?.and_hms_opt(0, 0, 0)
}

/// Split a summary like `"League - Home vs Away"` or `"Away @ Home"` into
/// `(competition, home, away)`.
fn split_home_away(summary: &str) -> Option<(Option<String>, String, String)> {
    let (prefix, matchup) = match summary.rfind(" - ") {
        Some(idx) if summary[idx + 3..].contains(" @ ") || summary[idx + 3..].contains(" vs ") => {
            (Some(summary[..idx].trim().to_string()), &summary[idx + 3..])
        }
        _ => (None, summary),
    };
    let (home, away) = if let Some((home, away)) = matchup.split_once(" vs ") {
        (home, away)
    } else if let Some((away, home)) = matchup.split_once(" @ ") {
        (home, away)
    } else {
        return None;
    };
    let (home, away) = (home.trim(), away.trim());
    if home.is_empty() || away.is_empty() {
        return None;
    }
    Some((prefix.filter(|p| !p.is_empty()), home.to_string(), away.to_string()))
}

fn first_location_line(location: &str) -> String {
    let name = location
        .split_once('\n')
        .or_else(|| location.split_once("\\n"))
        .map_or(location, |(name, _)| name);
    name.trim().to_string()
}
