//! Wire types for the business-search API and the search proxy.
//!
//! ## Upstream response
//!
//! Only the fields the result cards need are modelled. Observed quirks:
//! - `total` counts every match, not just the 50 in `businesses`.
//! - `price` is missing entirely for businesses without a price tier.
//! - `image_url` may be an empty string.
//! - `distance` is in meters and is a float.
//! - `is_closed` means closed right now for this client's purposes.

use localeats_core::ResultRecord;
use serde::{Deserialize, Serialize};

/// Top-level response from `GET /v3/businesses/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessSearchResponse {
    #[serde(default)]
    pub total: Option<u32>,

    #[serde(default)]
    pub businesses: Vec<Business>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Business {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub categories: Vec<Category>,

    /// Meters from the search coordinates.
    #[serde(default)]
    pub distance: f64,

    #[serde(default)]
    pub rating: f64,

    /// Currency symbols, e.g. `"$$"`.
    #[serde(default)]
    pub price: Option<String>,

    #[serde(default)]
    pub is_closed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub title: String,
}

/// Body of `POST /api/search/restaurants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRequest {
    pub api_string: String,
}

/// Proxy reply. Success carries `results` and `numberOfHits`; failure only
/// `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResponse {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ResultRecord>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_hits: Option<u32>,
}

impl BridgeResponse {
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            results: None,
            number_of_hits: None,
        }
    }
}
