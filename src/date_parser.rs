//! Deterministic date resolution for free-text questions.
//!
//! Everything is resolved against a caller-supplied `today`; nothing here
//! touches the clock or the network.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// A date found in the text and the words it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateMatch {
    pub date: NaiveDate,
    pub expression: String,
}

/// Find the first date the text refers to. Explicit calendar dates win over
/// relative phrases.
pub fn parse_date(text: &str, today: NaiveDate) -> Option<DateMatch> {
    let tokens = tokenize(text);
    let t: Vec<&str> = tokens.iter().map(String::as_str).collect();

    iso_date(&t)
        .or_else(|| numeric_date(&t, today))
        .or_else(|| day_month(&t, today))
        .or_else(|| named_day(&t, today))
        .or_else(|| in_n_units(&t, today))
        .or_else(|| next_week(&t, today))
        .or_else(|| weekend(&t, today))
        .or_else(|| weekday_phrase(&t, today))
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '/' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(|s| s.trim_matches('-').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn found(date: NaiveDate, words: &[&str]) -> Option<DateMatch> {
    Some(DateMatch { date, expression: words.join(" ") })
}

fn iso_date(t: &[&str]) -> Option<DateMatch> {
    t.iter().find_map(|tok| {
        let date = NaiveDate::parse_from_str(tok, "%Y-%m-%d").ok()?;
        found(date, &[*tok])
    })
}

/// UK ordering: `18/10` or `18/10/2025`.
fn numeric_date(t: &[&str], today: NaiveDate) -> Option<DateMatch> {
    t.iter().find_map(|tok| {
        let parts: Vec<&str> = tok.split('/').collect();
        let (day, month, year) = match parts.as_slice() {
            [d, m] => (d.parse().ok()?, m.parse().ok()?, None),
            [d, m, y] => {
                let y: i32 = y.parse().ok()?;
                (d.parse().ok()?, m.parse().ok()?, Some(if y < 100 { 2000 + y } else { y }))
            }
            _ => return None,
        };
        let date = resolve_day_month(day, month, year, today)?;
        found(date, &[*tok])
    })
}

/// `18 october`, `18th of oct 2025`, `october 18`, `oct 18th`.
fn day_month(t: &[&str], today: NaiveDate) -> Option<DateMatch> {
    for i in 0..t.len() {
        if let Some(day) = day_number(t[i]) {
            let month_idx = if t.get(i + 1) == Some(&"of") { i + 2 } else { i + 1 };
            if let Some(month) = t.get(month_idx).and_then(|m| month_number(m)) {
                let year = t.get(month_idx + 1).and_then(|y| year_number(y));
                let end = month_idx + 1 + usize::from(year.is_some());
                if let Some(date) = resolve_day_month(day, month, year, today) {
                    return found(date, &t[i..end]);
                }
            }
        }
        if let Some(month) = month_number(t[i]) {
            if let Some(day) = t.get(i + 1).and_then(|d| day_number(d)) {
                let year = t.get(i + 2).and_then(|y| year_number(y));
                let end = i + 2 + usize::from(year.is_some());
                if let Some(date) = resolve_day_month(day, month, year, today) {
                    return found(date, &t[i..end]);
                }
            }
        }
    }
    None
}

fn named_day(t: &[&str], today: NaiveDate) -> Option<DateMatch> {
    t.iter().find_map(|tok| match *tok {
        "today" | "tonight" => found(today, &[*tok]),
        "tomorrow" => found(today.checked_add_days(Days::new(1))?, &[*tok]),
        _ => None,
    })
}

/// `in 3 weeks`, `in two days`, `in a week`.
fn in_n_units(t: &[&str], today: NaiveDate) -> Option<DateMatch> {
    t.windows(3).find_map(|w| {
        if w[0] != "in" {
            return None;
        }
        let n = count_word(w[1])?;
        let days = match w[2] {
            "day" | "days" => n,
            "week" | "weeks" => n * 7,
            _ => return None,
        };
        found(today.checked_add_days(Days::new(days))?, w)
    })
}

fn next_week(t: &[&str], today: NaiveDate) -> Option<DateMatch> {
    t.windows(2)
        .find(|w| w[0] == "next" && w[1] == "week")
        .and_then(|w| found(today.checked_add_days(Days::new(7))?, w))
}

/// `this weekend` / `weekend`: the coming Saturday, or today on a Saturday.
fn weekend(t: &[&str], today: NaiveDate) -> Option<DateMatch> {
    let idx = t.iter().position(|tok| *tok == "weekend")?;
    let start = if idx > 0 && t[idx - 1] == "this" { idx - 1 } else { idx };
    found(on_or_after(today, Weekday::Sat), &t[start..=idx])
}

/// `saturday`, `on saturday`, `this saturday` (on or after today) and
/// `next saturday` (strictly after today).
fn weekday_phrase(t: &[&str], today: NaiveDate) -> Option<DateMatch> {
    let idx = t.iter().position(|tok| weekday(tok).is_some())?;
    let wd = weekday(t[idx])?;
    match idx.checked_sub(1).map(|p| t[p]) {
        Some("next") => found(strictly_after(today, wd), &t[idx - 1..=idx]),
        Some("this") | Some("on") => found(on_or_after(today, wd), &t[idx - 1..=idx]),
        _ => found(on_or_after(today, wd), &t[idx..=idx]),
    }
}

fn on_or_after(today: NaiveDate, wd: Weekday) -> NaiveDate {
    let ahead = (7 + wd.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    today + Days::new(u64::from(ahead))
}

fn strictly_after(today: NaiveDate, wd: Weekday) -> NaiveDate {
    let date = on_or_after(today, wd);
    if date == today { today + Days::new(7) } else { date }
}

/// Build a date from day and month; without a year, a date already gone this
/// year rolls over to next year.
fn resolve_day_month(day: u32, month: u32, year: Option<i32>, today: NaiveDate) -> Option<NaiveDate> {
    match year {
        Some(y) => NaiveDate::from_ymd_opt(y, month, day),
        None => {
            let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
            match this_year {
                Some(d) if d >= today => Some(d),
                _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
            }
        }
    }
}

fn day_number(tok: &str) -> Option<u32> {
    let digits = tok
        .strip_suffix("st")
        .or_else(|| tok.strip_suffix("nd"))
        .or_else(|| tok.strip_suffix("rd"))
        .or_else(|| tok.strip_suffix("th"))
        .unwrap_or(tok);
    let day: u32 = digits.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

fn year_number(tok: &str) -> Option<i32> {
    let year: i32 = tok.parse().ok()?;
    (2000..=2100).contains(&year).then_some(year)
}

fn month_number(tok: &str) -> Option<u32> {
    let month = match tok {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn weekday(tok: &str) -> Option<Weekday> {
    let wd = match tok {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tues" | "tue" => Weekday::Tue,
        "wednesday" | "weds" => Weekday::Wed,
        "thursday" | "thurs" | "thur" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(wd)
}

fn count_word(tok: &str) -> Option<u64> {
    if let Ok(n) = tok.parse::<u64>() {
        return (n <= 366).then_some(n);
    }
    let n = match tok {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => return None,
    };
    Some(n)
}
