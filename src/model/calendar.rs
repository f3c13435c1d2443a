use serde::{Deserialize, Serialize};

/// Pitchero month calendar document: `{ data: { days: [ { date, fixtures } ] } }`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CalendarDocument {
    #[serde(default)]
    pub data: CalendarData,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CalendarData {
    #[serde(default)]
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fixtures: Vec<CalendarFixture>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarFixture {
    pub date_time: Option<String>,
    pub opponent: Option<String>,
    pub team_name: Option<String>,
    pub home_side: Option<SideRef>,
    pub away_side: Option<SideRef>,
    pub ha: Option<String>,
    pub venue: Option<String>,
    pub competition: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SideRef {
    pub name: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
