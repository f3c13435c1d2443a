use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{error, info, info_span, instrument, warn};
use ureq::Agent;

use crate::error::AgentError;
use crate::model::calendar::{CalendarDocument, CalendarFixture};
use crate::model::fixture::{normalize_team_name, Fixture};
use crate::store::CalendarProvider;

const SERVICE: &str = "calendar";

/// Live Pitchero club calendar, one month page per request.
#[derive(Debug, Clone)]
pub struct PitcheroCalendar {
    base_url: String,
    agent: Agent,
}

impl PitcheroCalendar {
    pub fn for_club(club_id: &str) -> Self {
        Self::with_base_url(format!("https://www.pitchero.com/data/club/{club_id}/calendar"))
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url, agent: crate::http::agent() }
    }

    /// Turn a raw month document into the club's fixtures (no network).
    pub fn from_json(body: &str, club: &str) -> Result<Vec<Fixture>, AgentError> {
        let doc = Self::deserialize_calendar(body).map_err(|e| AgentError::malformed(SERVICE, e))?;
        Ok(Self::build_fixtures(doc, club))
    }

    #[instrument(level = "info", skip(body), fields(bytes = body.len()))]
    fn deserialize_calendar(body: &str) -> Result<CalendarDocument, serde_json::Error> {
        serde_json::from_str::<CalendarDocument>(body)
    }

    /// Flatten the day buckets into fixtures for `club`, skipping rows for the
    /// club's other teams and rows with no usable date.
    fn build_fixtures(doc: CalendarDocument, club: &str) -> Vec<Fixture> {
        let club_key = normalize_team_name(club);
        let mut fixtures = Vec::new();

        for day in doc.data.days {
            let day_date = day.date.as_deref().and_then(parse_day);
            for raw in day.fixtures {
                let belongs_to_club = raw
                    .team_name
                    .as_deref()
                    .is_none_or(|t| normalize_team_name(t) == club_key);
                if !belongs_to_club {
                    continue;
                }
                match Self::to_fixture(raw, day_date, club) {
                    Some(f) => fixtures.push(f),
                    None => warn!("Skipping calendar row without a date or home side"),
                }
            }
        }
        fixtures
    }

    fn to_fixture(raw: CalendarFixture, day_date: Option<NaiveDate>, club: &str) -> Option<Fixture> {
        let date = day_date.or_else(|| raw.date_time.as_deref().and_then(|s| s.get(..10)).and_then(parse_day))?;
        let kick_off = raw.date_time.as_deref().and_then(parse_kick_off);

        let home_name = raw.home_side.and_then(|s| s.name).filter(|s| !s.trim().is_empty());
        let away_name = raw.away_side.and_then(|s| s.name).filter(|s| !s.trim().is_empty());
        let club_is_home = home_name.as_deref().map(|h| normalize_team_name(h) == normalize_team_name(club));

        let opponent = raw
            .opponent
            .filter(|s| !s.trim().is_empty())
            .or_else(|| match club_is_home {
                Some(true) => away_name.clone(),
                Some(false) => home_name.clone(),
                None => None,
            })
            .unwrap_or_else(|| "TBC".to_string());

        // Without a named home side, fall back to the source's own h/a flag.
        let home_side = match home_name {
            Some(h) => h,
            None => match raw.ha.as_deref().map(str::to_lowercase).as_deref() {
                Some("h") => club.to_string(),
                Some("a") => opponent.clone(),
                _ => return None,
            },
        };

        let venue = raw.venue.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| home_side.clone());

        Some(Fixture {
            date,
            opponent,
            home_side,
            venue,
            competition: raw.competition.filter(|s| !s.trim().is_empty()),
            team_name: raw.team_name,
            kick_off,
        })
    }
}

impl CalendarProvider for PitcheroCalendar {
    #[instrument(level = "info", skip(self))]
    fn fetch_month(&self, club: &str, year: i32, month: u32) -> Result<Vec<Fixture>, AgentError> {
        let response_result = {
            let _span = info_span!("pitchero_fetch", url = %self.base_url, year, month).entered();
            self.agent
                .get(&self.base_url)
                .query("year", year.to_string())
                .query("month", month.to_string())
                .query("showCompleteWeeks", "1")
                .call()
        };
        let response = response_result.map_err(|e| {
            error!(error = %e, url = %self.base_url, "Calendar request failed");
            AgentError::upstream(SERVICE, e)
        })?;
        let body = response.into_body().read_to_string().map_err(|e| {
            error!(error = %e, "Failed to read calendar response body");
            AgentError::upstream(SERVICE, e)
        })?;
        let fixtures = Self::from_json(&body, club).inspect_err(|e| {
            error!(error = %e, "Failed to deserialize calendar document");
        })?;
        info!(year, month, count = fixtures.len(), "Fetched Pitchero month");
        Ok(fixtures)
    }
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn parse_kick_off(s: &str) -> Option<NaiveTime> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local().time())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.time()))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.time()))
        .ok()
}
