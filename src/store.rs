use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::AgentError;
use crate::model::fixture::Fixture;

/// A source of fixtures, one calendar month per call.
pub trait CalendarProvider {
    /// Fetch the club's fixtures for a month. Upstream failures must be returned,
    /// never replaced with empty or synthesised data.
    fn fetch_month(&self, club: &str, year: i32, month: u32) -> Result<Vec<Fixture>, AgentError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// Iterate `count` months forward starting with `self`, wrapping December to January.
    pub fn forward(self, count: usize) -> impl Iterator<Item = YearMonth> {
        std::iter::successors(Some(self), |ym| Some(ym.next())).take(count)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)?.pred_opt()
    }
}

/// Fixtures for one club, fetched lazily per month and kept for the life of a query.
pub struct FixtureStore<'a> {
    provider: &'a dyn CalendarProvider,
    club: String,
    months: HashMap<YearMonth, Vec<Fixture>>,
}

impl<'a> FixtureStore<'a> {
    pub fn new(provider: &'a dyn CalendarProvider, club: &str) -> Self {
        Self { provider, club: club.to_string(), months: HashMap::new() }
    }

    pub fn club(&self) -> &str {
        &self.club
    }

    /// Fixtures for a month in date order. Same-day fixtures keep the order the
    /// provider listed them in.
    pub fn month(&mut self, ym: YearMonth) -> Result<&[Fixture], AgentError> {
        if !self.months.contains_key(&ym) {
            let mut fixtures = self.provider.fetch_month(&self.club, ym.year, ym.month)?;
            fixtures.sort_by_key(|f| f.date);
            debug!(year = ym.year, month = ym.month, count = fixtures.len(), "Fetched fixture month");
            self.months.insert(ym, fixtures);
        }
        Ok(self.months.get(&ym).map(Vec::as_slice).unwrap_or_default())
    }

    /// How many month pages have been fetched so far.
    pub fn fetched_months(&self) -> usize {
        self.months.len()
    }
}
