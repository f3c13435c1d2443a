use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Weekly training slots at the club's ground.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainingSchedule {
    pub days: Vec<Weekday>,
    pub location: String,
}

impl TrainingSchedule {
    /// First training day on or after `from`. `None` only for an empty schedule.
    pub fn next_session(&self, from: NaiveDate) -> Option<NaiveDate> {
        let offset = self
            .days
            .iter()
            .map(|wd| (7 + wd.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7)
            .min()?;
        from.checked_add_days(Days::new(u64::from(offset)))
    }
}

impl Default for TrainingSchedule {
    fn default() -> Self {
        Self { days: vec![Weekday::Tue, Weekday::Thu], location: "Ramsey, Isle of Man".to_string() }
    }
}
