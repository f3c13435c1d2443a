use chrono::{NaiveDate, NaiveTime};

use rugby_planner_lambda_rust::error::AgentError;
use rugby_planner_lambda_rust::model::fixture::Side;
use rugby_planner_lambda_rust::pitchero::PitcheroCalendar;

const CLUB: &str = "Ramsey (IoM)";

fn load_sample() -> String {
    std::fs::read_to_string("tests/sample_calendar.json").expect("failed to read sample_calendar.json")
}

#[test]
fn builds_club_fixtures_from_month_document() {
    let fixtures = PitcheroCalendar::from_json(&load_sample(), CLUB).expect("from_json failed");

    // Colts row and the row with no home side or h/a flag are dropped
    let opponents: Vec<&str> = fixtures.iter().map(|f| f.opponent.as_str()).collect();
    assert_eq!(opponents, vec!["Douglas RFC", "Castletown", "Southern Nomads"]);
}

#[test]
fn away_fixture_keeps_venue_and_kick_off() {
    let fixtures = PitcheroCalendar::from_json(&load_sample(), CLUB).unwrap();
    let douglas = &fixtures[0];

    assert_eq!(douglas.date, NaiveDate::from_ymd_opt(2025, 10, 4).unwrap());
    assert_eq!(douglas.side_for(CLUB), Side::Away);
    assert_eq!(douglas.venue, "Port-e-Chee");
    assert_eq!(douglas.competition.as_deref(), Some("Manx Shield"));
    assert_eq!(douglas.kick_off, NaiveTime::from_hms_opt(14, 30, 0));
}

#[test]
fn opponent_is_derived_from_sides_when_missing() {
    let fixtures = PitcheroCalendar::from_json(&load_sample(), CLUB).unwrap();
    let castletown = &fixtures[1];

    assert_eq!(castletown.opponent, "Castletown");
    assert_eq!(castletown.side_for(CLUB), Side::Home);
    // No venue given: the home side's ground
    assert_eq!(castletown.venue, CLUB);
}

#[test]
fn home_away_flag_fills_missing_home_side() {
    let fixtures = PitcheroCalendar::from_json(&load_sample(), CLUB).unwrap();
    let nomads = &fixtures[2];

    assert_eq!(nomads.home_side, CLUB);
    assert_eq!(nomads.side_for(CLUB), Side::Home);
}

#[test]
fn empty_and_malformed_documents() {
    assert!(PitcheroCalendar::from_json(r#"{"data": {"days": []}}"#, CLUB).unwrap().is_empty());
    assert!(PitcheroCalendar::from_json("{}", CLUB).unwrap().is_empty());

    let err = PitcheroCalendar::from_json("<html>maintenance</html>", CLUB).unwrap_err();
    assert!(matches!(err, AgentError::MalformedResponse { service: "calendar", .. }), "got {err:?}");
}
