mod common;

use common::date;
use rugby_planner_lambda_rust::date_parser::parse_date;

// Wednesday
fn today() -> chrono::NaiveDate {
    date(2025, 10, 15)
}

fn parsed(text: &str) -> Option<chrono::NaiveDate> {
    parse_date(text, today()).map(|m| m.date)
}

#[test]
fn weekday_phrases() {
    assert_eq!(parsed("who do we play this Saturday?"), Some(date(2025, 10, 18)));
    assert_eq!(parsed("what about on saturday"), Some(date(2025, 10, 18)));
    assert_eq!(parsed("saturday's game"), Some(date(2025, 10, 18)));
    // Today is Wednesday: "wednesday" is today, "next wednesday" a week out
    assert_eq!(parsed("training wednesday"), Some(date(2025, 10, 15)));
    assert_eq!(parsed("next wednesday"), Some(date(2025, 10, 22)));
    assert_eq!(parsed("next monday"), Some(date(2025, 10, 20)));
}

#[test]
fn relative_offsets() {
    assert_eq!(parsed("match in 3 weeks"), Some(date(2025, 11, 5)));
    assert_eq!(parsed("in two days"), Some(date(2025, 10, 17)));
    assert_eq!(parsed("in a week"), Some(date(2025, 10, 22)));
    assert_eq!(parsed("tomorrow"), Some(date(2025, 10, 16)));
    assert_eq!(parsed("tonight"), Some(today()));
    assert_eq!(parsed("next week"), Some(date(2025, 10, 22)));
    assert_eq!(parsed("this weekend"), Some(date(2025, 10, 18)));
}

#[test]
fn calendar_dates() {
    assert_eq!(parsed("game on 2025-11-01"), Some(date(2025, 11, 1)));
    assert_eq!(parsed("18/10"), Some(date(2025, 10, 18)));
    assert_eq!(parsed("18/10/2026"), Some(date(2026, 10, 18)));
    assert_eq!(parsed("the 25th of October"), Some(date(2025, 10, 25)));
    assert_eq!(parsed("Nov 8th 2025"), Some(date(2025, 11, 8)));
}

#[test]
fn past_day_month_rolls_to_next_year() {
    assert_eq!(parsed("march 1"), Some(date(2026, 3, 1)));
    assert_eq!(parsed("1st october"), Some(date(2026, 10, 1)));
}

#[test]
fn explicit_date_beats_relative_phrase() {
    assert_eq!(parsed("next week, on 2025-12-06"), Some(date(2025, 12, 6)));
}

#[test]
fn expression_is_reported() {
    let m = parse_date("are we at home this Saturday", today()).expect("date expected");
    assert_eq!(m.expression, "this saturday");
    let m = parse_date("in 3 weeks?", today()).expect("date expected");
    assert_eq!(m.expression, "in 3 weeks");
}

#[test]
fn no_date_found() {
    assert_eq!(parsed("who do we play against Douglas"), None);
    assert_eq!(parsed(""), None);
    assert_eq!(parsed("31/02"), None);
}
