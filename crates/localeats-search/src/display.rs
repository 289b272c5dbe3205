//! Strings shown around a result list: header, filter chips, outcome messages
//! and bookmark flags.

use std::collections::{BTreeSet, HashSet};

use localeats_core::{
    FilterState, HoursFilter, LocationObject, MinRating, PriceLevel, ResultRecord, SearchOutcome,
};
use serde::Serialize;

use crate::query::{PriceSelection, QueryParams};

pub const NO_LOCATION_MESSAGE: &str = "No location specified!";
pub const NO_RESULTS_MESSAGE: &str = "No results found! Try searching something else";

/// Header title for a search, e.g. `"Ramen"` or `"Affordable Restaurants"`.
///
/// A term wins and is capitalized. Without one, the price tier picks a
/// generic title. `None` means the page shows no header.
#[must_use]
pub fn search_title(params: &QueryParams, filters: &FilterState) -> Option<String> {
    let term = params
        .term
        .as_deref()
        .or(filters.term.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(term) = term {
        return Some(capitalize(term));
    }

    let tier = match &params.price {
        Some(PriceSelection::Tiers(tiers)) => tiers.first().copied(),
        Some(PriceSelection::Off) => None,
        None => filters.price.tier(),
    };
    match tier {
        Some(1 | 2) => Some("Affordable Restaurants".to_owned()),
        Some(3 | 4) => Some("Pricier Restaurants".to_owned()),
        _ => None,
    }
}

/// `"Ramen near Toronto, ON"`, or just the title without a location.
#[must_use]
pub fn search_header(title: &str, location: Option<&LocationObject>) -> String {
    match location {
        Some(location) => format!("{title} near {}", location.location_string),
        None => title.to_owned(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// `10000` meters renders as `"10km"`, `2500` as `"2.5km"`.
#[must_use]
pub fn distance_filter_label(radius_meters: u32) -> String {
    format!("{}km", f64::from(radius_meters) / 1000.0)
}

#[must_use]
pub fn price_label(price: PriceLevel) -> String {
    price
        .tier()
        .map_or_else(|| "any".to_owned(), |tier| format!("{tier} of 4"))
}

#[must_use]
pub fn rating_label(rating: MinRating) -> String {
    match rating.stars() {
        None => "any".to_owned(),
        Some(1) => "1 star".to_owned(),
        Some(n) => format!("{n} stars"),
    }
}

#[must_use]
pub fn hours_label(hours: HoursFilter) -> &'static str {
    match hours {
        HoursFilter::Any => "any",
        HoursFilter::OpenNow => "open now",
    }
}

/// Message shown instead of a result list, `None` on success.
#[must_use]
pub fn outcome_message(outcome: &SearchOutcome) -> Option<&str> {
    match outcome {
        SearchOutcome::Success { .. } => None,
        SearchOutcome::NoResults => Some(NO_RESULTS_MESSAGE),
        SearchOutcome::UpstreamError { message } => Some(message.as_str()),
        SearchOutcome::NoLocation => Some(NO_LOCATION_MESSAGE),
    }
}

/// Saved store ids.
pub trait BookmarkSet {
    fn is_bookmarked(&self, store_id: &str) -> bool;
}

impl BookmarkSet for HashSet<String> {
    fn is_bookmarked(&self, store_id: &str) -> bool {
        self.contains(store_id)
    }
}

impl BookmarkSet for BTreeSet<String> {
    fn is_bookmarked(&self, store_id: &str) -> bool {
        self.contains(store_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedRecord<'a> {
    #[serde(flatten)]
    pub record: &'a ResultRecord,
    /// Always `false` without an active session.
    pub bookmarked: bool,
}

/// Pairs each record with its bookmark flag. Bookmarks belong to a signed-in
/// user, so nothing is flagged when `session_active` is false.
#[must_use]
pub fn annotate_bookmarks<'a, B: BookmarkSet + ?Sized>(
    records: &'a [ResultRecord],
    bookmarks: &B,
    session_active: bool,
) -> Vec<AnnotatedRecord<'a>> {
    records
        .iter()
        .map(|record| AnnotatedRecord {
            record,
            bookmarked: session_active && bookmarks.is_bookmarked(&record.store_id),
        })
        .collect()
}
