//! Normalization from raw business-search responses to [`SearchOutcome`].
//!
//! Everything here is pure: the same payload always yields the same outcome.

use localeats_core::{HoursLabel, ResultRecord, SearchOutcome};

use crate::error::SearchError;
use crate::types::{Business, BusinessSearchResponse};

/// Converts a decoded upstream response into a [`SearchOutcome`].
///
/// A missing or zero `total` is [`SearchOutcome::NoResults`] no matter what
/// `businesses` holds. Otherwise every business becomes one record, in
/// upstream order.
#[must_use]
pub fn normalize(response: &BusinessSearchResponse) -> SearchOutcome {
    let total_hits = match response.total {
        Some(total) if total > 0 => total,
        _ => return SearchOutcome::NoResults,
    };

    let records = response
        .businesses
        .iter()
        .enumerate()
        .map(|(index, business)| normalize_business(index, business))
        .collect();

    SearchOutcome::Success {
        records,
        total_hits,
    }
}

/// Like [`normalize`], but also folds a failed fetch into
/// [`SearchOutcome::UpstreamError`]. The cause is logged, never returned.
#[must_use]
pub fn normalize_result(result: Result<BusinessSearchResponse, SearchError>) -> SearchOutcome {
    match result {
        Ok(response) => normalize(&response),
        Err(e) => {
            tracing::warn!(error = %e, "business search failed");
            SearchOutcome::upstream_error()
        }
    }
}

/// Normalizes a raw JSON body. A malformed payload is an upstream error.
#[must_use]
pub fn normalize_body(body: &str) -> SearchOutcome {
    normalize_result(
        serde_json::from_str::<BusinessSearchResponse>(body).map_err(|e| {
            SearchError::Deserialize {
                context: "business search response".to_owned(),
                source: e,
            }
        }),
    )
}

fn normalize_business(index: usize, business: &Business) -> ResultRecord {
    let category = business
        .categories
        .iter()
        .map(|c| c.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    // Businesses without a price tier omit the field entirely.
    let price_level = business
        .price
        .as_deref()
        .map_or(0, |symbols| symbols.chars().count());

    let hours_label = if business.is_closed {
        HoursLabel::ClosedForNow
    } else {
        HoursLabel::OpenNow
    };

    ResultRecord {
        search_index: index,
        store_id: business.id.clone(),
        image: business.image_url.clone().unwrap_or_default(),
        store_name: business.name.clone(),
        category,
        distance_label: distance_label(business.distance),
        rating: business.rating,
        price_level,
        hours_label,
    }
}

/// Formats a distance in meters as kilometers with one decimal place.
/// Halfway values round up, so 1250 m is "1.3 km away".
#[must_use]
pub fn distance_label(meters: f64) -> String {
    format!("{:.1} km away", (meters / 100.0).round() / 10.0)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
