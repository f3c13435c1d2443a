use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One geocoded place, as kept in the location cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationCacheEntry {
    pub team_name: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    /// Short "City, Country" label used in reports.
    pub city_country: String,
}

impl LocationCacheEntry {
    pub fn from_place(team_name: &str, place: Place) -> Self {
        let city_country = place
            .formatted_address
            .as_deref()
            .map(city_country)
            .filter(|s| !s.is_empty())
            .or_else(|| place.display_name.clone())
            .unwrap_or_else(|| team_name.to_string());
        Self {
            team_name: team_name.to_string(),
            coordinates: place.coordinates,
            display_name: place.display_name,
            formatted_address: place.formatted_address,
            city_country,
        }
    }
}

/// A result from the places capability.
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    pub display_name: Option<String>,
    pub formatted_address: Option<String>,
    pub coordinates: Coordinates,
}

/// Reduce a formatted address to "first part, last part".
/// `"Mooragh Park, Ramsey, Isle of Man"` becomes `"Mooragh Park, Isle of Man"`.
pub fn city_country(formatted: &str) -> String {
    let parts: Vec<&str> = formatted.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [] => formatted.trim().to_string(),
        [only] => (*only).to_string(),
        [first, .., last] => format!("{first}, {last}"),
    }
}

// Google Places text search wire types.

#[derive(Debug, Serialize, Deserialize)]
pub struct PlacesSearchResponse {
    #[serde(default)]
    pub places: Vec<PlaceRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub location: Option<LatLng>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocalizedText {
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
