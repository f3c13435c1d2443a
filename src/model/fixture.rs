use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A scheduled match for the club, as returned by a calendar provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub date: NaiveDate,
    pub opponent: String,
    /// Name of the team hosting the match.
    pub home_side: String,
    pub venue: String,
    pub competition: Option<String>,
    /// Which of the club's teams the calendar row belongs to, when the source says.
    pub team_name: Option<String>,
    pub kick_off: Option<NaiveTime>,
}

impl Fixture {
    /// Canonical home/away code for `club` in this fixture.
    pub fn side_for(&self, club: &str) -> Side {
        if normalize_team_name(&self.home_side) == normalize_team_name(club) {
            Side::Home
        } else {
            Side::Away
        }
    }
}

/// Lower-case and collapse runs of whitespace so that `" Ramsey  (IoM) "` and
/// `"ramsey (iom)"` compare equal.
pub fn normalize_team_name(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn code(self) -> &'static str {
        match self {
            Side::Home => "H",
            Side::Away => "A",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionMethod {
    ExactDate,
    NextVsOpponent,
    NextBySide,
    NextFixture,
    NoMatch,
}

/// Outcome of resolving an intent against the fixture store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedMatch {
    Found { fixture: Fixture, method: ResolutionMethod },
    /// Nothing matched. `nearest` is only ever a hint for the caller, never the answer.
    NoMatch { nearest: Option<Fixture> },
}

impl ResolvedMatch {
    pub fn method(&self) -> ResolutionMethod {
        match self {
            ResolvedMatch::Found { method, .. } => *method,
            ResolvedMatch::NoMatch { .. } => ResolutionMethod::NoMatch,
        }
    }

    pub fn fixture(&self) -> Option<&Fixture> {
        match self {
            ResolvedMatch::Found { fixture, .. } => Some(fixture),
            ResolvedMatch::NoMatch { .. } => None,
        }
    }
}
