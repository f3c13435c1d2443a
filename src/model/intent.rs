use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::fixture::Side;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidePreference {
    Home,
    Away,
    #[default]
    Any,
}

impl SidePreference {
    /// Map home/away wording ("h", "home", "host", "away", "visiting", ...) to a preference.
    pub fn from_wording(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "h" | "home" | "host" | "hosting" | "hosts" => Some(SidePreference::Home),
            "a" | "away" | "visiting" | "visitors" | "road" => Some(SidePreference::Away),
            "any" | "either" => Some(SidePreference::Any),
            _ => None,
        }
    }

    /// The side a fixture must have to satisfy this preference, if any.
    pub fn required_side(self) -> Option<Side> {
        match self {
            SidePreference::Home => Some(Side::Home),
            SidePreference::Away => Some(Side::Away),
            SidePreference::Any => None,
        }
    }
}

/// What the user asked for, derived once from the query text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub target_date: Option<NaiveDate>,
    pub relative_date_expression: Option<String>,
    pub opponent_fragment: Option<String>,
    pub side_preference: Option<SidePreference>,
}

impl Intent {
    /// HOME or AWAY, ignoring an explicit ANY.
    pub fn required_side(&self) -> Option<Side> {
        self.side_preference.and_then(SidePreference::required_side)
    }

    /// Trimmed opponent fragment, ignoring a blank one.
    pub fn opponent(&self) -> Option<&str> {
        self.opponent_fragment.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// True when the intent carries an opponent or a home/away constraint.
    pub fn has_fixture_hints(&self) -> bool {
        self.opponent().is_some() || self.required_side().is_some()
    }
}
