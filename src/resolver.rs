//! Picks the single fixture that answers a match query.
//!
//! Rules, first hit wins:
//! 1. exact date (with a closest-fixture hint when nothing is on that day),
//! 2. next fixture against a named opponent,
//! 3. next home or away fixture,
//! 4. the next fixture of any kind.
//!
//! Forward scans start at today's month and give up after
//! [`FORWARD_SCAN_MONTHS`] month pages.

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::error::AgentError;
use crate::model::fixture::{Fixture, ResolutionMethod, ResolvedMatch};
use crate::model::intent::Intent;
use crate::store::{FixtureStore, YearMonth};

/// A target date this close to the end of its month also pulls the following month.
pub const MONTH_END_LOOKAHEAD_DAYS: i64 = 3;

/// Month pages scanned forward before a search reports no match.
pub const FORWARD_SCAN_MONTHS: usize = 12;

/// Resolve `intent` against the club's fixtures. Only calendar failures are errors;
/// an exhausted search is [`ResolvedMatch::NoMatch`].
#[instrument(level = "info", skip(intent, store), fields(club = %store.club()))]
pub fn resolve(intent: &Intent, store: &mut FixtureStore<'_>, today: NaiveDate) -> Result<ResolvedMatch, AgentError> {
    let club = store.club().to_string();

    if let Some(target) = intent.target_date {
        let candidates = exact_date_window(store, target)?;
        if let Some(fixture) = candidates.iter().find(|f| f.date == target) {
            info!(date = %target, "Resolved fixture by exact date");
            return Ok(ResolvedMatch::Found { fixture: fixture.clone(), method: ResolutionMethod::ExactDate });
        }
        if !intent.has_fixture_hints() {
            let nearest = nearest_to(&candidates, target).cloned();
            info!(date = %target, has_nearest = nearest.is_some(), "No fixture on requested date");
            return Ok(ResolvedMatch::NoMatch { nearest });
        }
    }

    let side = intent.required_side();

    if let Some(fragment) = intent.opponent() {
        let needle = fragment.to_lowercase();
        return scan_forward(store, today, ResolutionMethod::NextVsOpponent, |f| {
            f.opponent.to_lowercase().contains(&needle) && side.is_none_or(|s| f.side_for(&club) == s)
        });
    }

    if let Some(side) = side {
        return scan_forward(store, today, ResolutionMethod::NextBySide, |f| f.side_for(&club) == side);
    }

    scan_forward(store, today, ResolutionMethod::NextFixture, |_| true)
}

/// Fixtures from the target's month, plus the next month near a month end, in date order.
fn exact_date_window(store: &mut FixtureStore<'_>, target: NaiveDate) -> Result<Vec<Fixture>, AgentError> {
    let ym = YearMonth::of(target);
    let mut fixtures = store.month(ym)?.to_vec();

    let near_month_end = ym
        .last_day()
        .is_some_and(|last| (last - target).num_days() < MONTH_END_LOOKAHEAD_DAYS);
    if near_month_end {
        fixtures.extend_from_slice(store.month(ym.next())?);
        fixtures.sort_by_key(|f| f.date);
    }
    Ok(fixtures)
}

/// Closest fixture by absolute day distance; the earlier one wins a tie.
fn nearest_to(fixtures: &[Fixture], target: NaiveDate) -> Option<&Fixture> {
    fixtures.iter().min_by_key(|f| (f.date - target).num_days().abs())
}

fn scan_forward<F>(
    store: &mut FixtureStore<'_>,
    today: NaiveDate,
    method: ResolutionMethod,
    matches: F,
) -> Result<ResolvedMatch, AgentError>
where
    F: Fn(&Fixture) -> bool,
{
    for ym in YearMonth::of(today).forward(FORWARD_SCAN_MONTHS) {
        let fixtures = store.month(ym)?;
        if let Some(fixture) = fixtures.iter().find(|f| f.date >= today && matches(f)) {
            info!(?method, date = %fixture.date, opponent = %fixture.opponent, "Resolved fixture by forward scan");
            return Ok(ResolvedMatch::Found { fixture: fixture.clone(), method });
        }
    }
    info!(?method, months = FORWARD_SCAN_MONTHS, "Forward scan exhausted without a match");
    Ok(ResolvedMatch::NoMatch { nearest: None })
}
