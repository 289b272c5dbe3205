//! Reverse geocoding: device coordinates to a place name like `"Toronto, ON"`.

use std::future::Future;
use std::time::Duration;

use localeats_core::Coordinates;
use reqwest::Client;
use serde::Deserialize;

use crate::error::SearchError;

pub const DEFAULT_GEOCODER_URL: &str =
    "https://api.bigdatacloud.net/data/reverse-geocode-client";

pub trait ReverseGeocoder: Send + Sync {
    /// Returns a human-readable place name for `coordinates`.
    fn locate(
        &self,
        coordinates: Coordinates,
    ) -> impl Future<Output = Result<String, SearchError>> + Send;
}

/// Keyless client-side reverse-geocoding endpoint.
pub struct HttpReverseGeocoder {
    client: Client,
    base_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GeocodeResponse {
    city: String,
    locality: String,
    principal_subdivision: String,
    /// ISO 3166-2, e.g. `"CA-ON"`.
    principal_subdivision_code: String,
    country_name: String,
}

impl GeocodeResponse {
    fn place_name(&self) -> Option<String> {
        let place = [&self.city, &self.locality]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty());

        let region = self
            .principal_subdivision_code
            .split_once('-')
            .map(|(_, code)| code.trim())
            .into_iter()
            .chain([
                self.principal_subdivision.trim(),
                self.country_name.trim(),
            ])
            .find(|s| !s.is_empty());

        match (place, region) {
            (Some(place), Some(region)) => Some(format!("{place}, {region}")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_owned()),
            (None, None) => None,
        }
    }
}

impl HttpReverseGeocoder {
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_owned(),
        })
    }
}

impl ReverseGeocoder for HttpReverseGeocoder {
    async fn locate(&self, coordinates: Coordinates) -> Result<String, SearchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("localityLanguage", "en".to_owned()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.base_url.clone(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<GeocodeResponse>(&body).map_err(|e| {
            SearchError::Deserialize {
                context: "reverse geocode response".to_owned(),
                source: e,
            }
        })?;

        parsed.place_name().ok_or_else(|| {
            SearchError::Geocode(format!(
                "no place name for {},{}",
                coordinates.latitude, coordinates.longitude
            ))
        })
    }
}
