use serde_json::json;
use tracing::{error, info_span, instrument};
use ureq::Agent;

use crate::error::AgentError;
use crate::model::location::{Coordinates, Place, PlacesSearchResponse};

const SERVICE: &str = "places";
const SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchText";
const FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.location";

/// Name to coordinates lookup.
pub trait PlacesLookup {
    /// `Ok(None)` when the service answered but found nothing.
    fn lookup(&self, query: &str) -> Result<Option<Place>, AgentError>;
}

/// Google Places text search.
#[derive(Debug, Clone)]
pub struct GooglePlaces {
    api_key: Option<String>,
    agent: Agent,
}

impl GooglePlaces {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key, agent: crate::http::agent() }
    }
}

impl PlacesLookup for GooglePlaces {
    #[instrument(level = "info", skip(self))]
    fn lookup(&self, query: &str) -> Result<Option<Place>, AgentError> {
        let api_key = self.api_key.as_deref().ok_or(AgentError::NotConfigured { service: "Google Maps" })?;
        let response = {
            let _span = info_span!("places_search", url = SEARCH_URL).entered();
            self.agent
                .post(SEARCH_URL)
                .header("X-Goog-Api-Key", api_key)
                .header("X-Goog-FieldMask", FIELD_MASK)
                .send_json(json!({ "textQuery": query }))
        }
        .map_err(|e| {
            error!(error = %e, "Places request failed");
            AgentError::upstream(SERVICE, e)
        })?;

        let parsed: PlacesSearchResponse = response
            .into_body()
            .read_json()
            .map_err(|e| AgentError::malformed(SERVICE, e))?;

        Ok(parsed.places.into_iter().find_map(|p| {
            let location = p.location?;
            Some(Place {
                display_name: p.display_name.and_then(|d| d.text),
                formatted_address: p.formatted_address,
                coordinates: Coordinates { latitude: location.latitude?, longitude: location.longitude? },
            })
        }))
    }
}
