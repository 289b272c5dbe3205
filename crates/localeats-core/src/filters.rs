//! Search filter selections.
//!
//! Every filter is a closed enum with a `FromStr` impl that accepts the
//! values the web client puts in its URLs (`"any"`, `"1"`, `"open_now"`,
//! `"review_count"`, ...) and an `as_param` accessor that yields the value
//! the upstream search API expects, or `None` when the filter should not be
//! sent at all.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Number of results per upstream page. Offsets are always a multiple of it.
pub const PAGE_SIZE: u32 = 50;

/// Last page whose offset still fits in a `u32`. Higher pages clamp to it.
pub const MAX_PAGE: u32 = u32::MAX / PAGE_SIZE + 1;

/// Search radius used until the user picks a distance.
pub const DEFAULT_RADIUS_METERS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceLevel {
    #[default]
    Any,
    Inexpensive,
    Moderate,
    Pricey,
    UltraHighEnd,
}

impl PriceLevel {
    /// Number of currency symbols for this tier, `None` for [`PriceLevel::Any`].
    #[must_use]
    pub fn tier(self) -> Option<u8> {
        match self {
            Self::Any => None,
            Self::Inexpensive => Some(1),
            Self::Moderate => Some(2),
            Self::Pricey => Some(3),
            Self::UltraHighEnd => Some(4),
        }
    }

    #[must_use]
    pub fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(Self::Inexpensive),
            2 => Some(Self::Moderate),
            3 => Some(Self::Pricey),
            4 => Some(Self::UltraHighEnd),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_param(self) -> Option<String> {
        self.tier().map(|t| t.to_string())
    }
}

impl FromStr for PriceLevel {
    type Err = CoreError;

    /// `"false"` is what the web client writes when the price filter is
    /// switched off, so it parses as [`PriceLevel::Any`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "any" | "false" | "" => Ok(Self::Any),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(Self::from_tier)
                .ok_or_else(|| CoreError::InvalidFilter {
                    field: "price",
                    value: s.to_owned(),
                }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinRating {
    #[default]
    Any,
    One,
    Two,
    Three,
    Four,
    Five,
}

impl MinRating {
    #[must_use]
    pub fn stars(self) -> Option<u8> {
        match self {
            Self::Any => None,
            Self::One => Some(1),
            Self::Two => Some(2),
            Self::Three => Some(3),
            Self::Four => Some(4),
            Self::Five => Some(5),
        }
    }

    #[must_use]
    pub fn from_stars(stars: u8) -> Option<Self> {
        match stars {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            5 => Some(Self::Five),
            _ => None,
        }
    }
}

impl FromStr for MinRating {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "any" | "" => Ok(Self::Any),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(Self::from_stars)
                .ok_or_else(|| CoreError::InvalidFilter {
                    field: "rating",
                    value: s.to_owned(),
                }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursFilter {
    #[default]
    Any,
    OpenNow,
}

impl HoursFilter {
    /// Value of the upstream `open_now` parameter; absent unless filtering.
    #[must_use]
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::OpenNow => Some("true"),
        }
    }
}

impl FromStr for HoursFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "any" | "false" | "" => Ok(Self::Any),
            "open_now" | "true" => Ok(Self::OpenNow),
            _ => Err(CoreError::InvalidFilter {
                field: "hours",
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    BestMatch,
    Rating,
    ReviewCount,
    Distance,
}

impl SortBy {
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            Self::BestMatch => "best_match",
            Self::Rating => "rating",
            Self::ReviewCount => "review_count",
            Self::Distance => "distance",
        }
    }
}

impl FromStr for SortBy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "best_match" => Ok(Self::BestMatch),
            "rating" => Ok(Self::Rating),
            "review_count" => Ok(Self::ReviewCount),
            "distance" => Ok(Self::Distance),
            _ => Err(CoreError::InvalidFilter {
                field: "sort_by",
                value: s.to_owned(),
            }),
        }
    }
}

/// The user's current search refinements plus the selected page.
///
/// The page offset is private so it can only move in whole pages; it is not
/// persisted and starts at the first page whenever the state is reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub radius_meters: u32,
    pub price: PriceLevel,
    pub min_rating: MinRating,
    pub hours: HoursFilter,
    pub sort_by: SortBy,
    pub term: Option<String>,
    #[serde(skip)]
    page_offset: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_RADIUS_METERS,
            price: PriceLevel::Any,
            min_rating: MinRating::Any,
            hours: HoursFilter::Any,
            sort_by: SortBy::BestMatch,
            term: None,
            page_offset: 0,
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn page_offset(&self) -> u32 {
        self.page_offset
    }

    /// 1-indexed page the offset points at.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.page_offset / PAGE_SIZE + 1
    }

    /// Selects a 1-indexed page. Page `0` is treated as page `1` and pages
    /// past [`MAX_PAGE`] as [`MAX_PAGE`].
    pub fn set_page(&mut self, page: u32) {
        self.page_offset = (page.clamp(1, MAX_PAGE) - 1) * PAGE_SIZE;
    }

    /// Sets the offset directly, rounding down to the start of its page.
    pub fn set_offset(&mut self, offset: u32) {
        self.page_offset = offset - offset % PAGE_SIZE;
    }

    /// Serializes the non-default filters back into URL query parameters,
    /// in the order the search page reads them.
    #[must_use]
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("radius", self.radius_meters.to_string())];
        if self.page_offset > 0 {
            params.push(("offset", self.page_offset.to_string()));
        }
        if self.hours == HoursFilter::OpenNow {
            params.push(("hours", "open_now".to_owned()));
        }
        if self.sort_by != SortBy::BestMatch {
            params.push(("sort_by", self.sort_by.as_param().to_owned()));
        }
        if let Some(price) = self.price.as_param() {
            params.push(("price", price));
        }
        if let Some(term) = self.term.as_deref().filter(|t| !t.trim().is_empty()) {
            params.push(("term", term.to_owned()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_parses_tiers_and_off_values() {
        assert_eq!("2".parse::<PriceLevel>().unwrap(), PriceLevel::Moderate);
        assert_eq!("false".parse::<PriceLevel>().unwrap(), PriceLevel::Any);
        assert_eq!("any".parse::<PriceLevel>().unwrap(), PriceLevel::Any);
        assert!("5".parse::<PriceLevel>().is_err());
        assert!("$$".parse::<PriceLevel>().is_err());
    }

    #[test]
    fn price_param_is_absent_for_any() {
        assert_eq!(PriceLevel::Any.as_param(), None);
        assert_eq!(PriceLevel::UltraHighEnd.as_param().as_deref(), Some("4"));
    }

    #[test]
    fn rating_parses_one_to_five() {
        assert_eq!("5".parse::<MinRating>().unwrap(), MinRating::Five);
        assert_eq!("any".parse::<MinRating>().unwrap(), MinRating::Any);
        assert!("0".parse::<MinRating>().is_err());
    }

    #[test]
    fn hours_accepts_url_spellings() {
        assert_eq!("open_now".parse::<HoursFilter>().unwrap(), HoursFilter::OpenNow);
        assert_eq!("true".parse::<HoursFilter>().unwrap(), HoursFilter::OpenNow);
        assert_eq!("any".parse::<HoursFilter>().unwrap(), HoursFilter::Any);
        assert!("sometimes".parse::<HoursFilter>().is_err());
    }

    #[test]
    fn sort_by_round_trips_through_param() {
        for sort in [
            SortBy::BestMatch,
            SortBy::Rating,
            SortBy::ReviewCount,
            SortBy::Distance,
        ] {
            assert_eq!(sort.as_param().parse::<SortBy>().unwrap(), sort);
        }
    }

    #[test]
    fn invalid_filter_error_names_the_field() {
        let err = "newest".parse::<SortBy>().unwrap_err();
        assert_eq!(err.to_string(), "invalid sort_by filter: \"newest\"");
    }

    #[test]
    fn set_page_keeps_offset_on_page_boundary() {
        let mut filters = FilterState::default();
        filters.set_page(3);
        assert_eq!(filters.page_offset(), 100);
        assert_eq!(filters.current_page(), 3);

        filters.set_page(0);
        assert_eq!(filters.page_offset(), 0);
        assert_eq!(filters.current_page(), 1);
    }

    #[test]
    fn set_page_clamps_huge_pages_to_a_page_boundary() {
        let mut filters = FilterState::default();
        filters.set_page(u32::MAX);
        assert_eq!(filters.page_offset() % PAGE_SIZE, 0);
        assert_eq!(filters.current_page(), MAX_PAGE);

        filters.set_page(MAX_PAGE);
        assert_eq!(filters.page_offset(), u32::MAX - u32::MAX % PAGE_SIZE);
    }

    #[test]
    fn set_offset_rounds_down_to_page_start() {
        let mut filters = FilterState::default();
        filters.set_offset(149);
        assert_eq!(filters.page_offset(), 100);
    }

    #[test]
    fn to_query_params_skips_defaults() {
        let filters = FilterState::default();
        assert_eq!(filters.to_query_params(), vec![("radius", "10000".to_owned())]);
    }

    #[test]
    fn to_query_params_includes_selected_filters() {
        let mut filters = FilterState {
            radius_meters: 5_000,
            price: PriceLevel::Moderate,
            hours: HoursFilter::OpenNow,
            sort_by: SortBy::Rating,
            term: Some("ramen".to_owned()),
            ..FilterState::default()
        };
        filters.set_page(2);
        assert_eq!(
            filters.to_query_params(),
            vec![
                ("radius", "5000".to_owned()),
                ("offset", "50".to_owned()),
                ("hours", "open_now".to_owned()),
                ("sort_by", "rating".to_owned()),
                ("price", "2".to_owned()),
                ("term", "ramen".to_owned()),
            ]
        );
    }

    #[test]
    fn deserializing_fills_missing_fields_with_defaults() {
        let filters: FilterState = serde_json::from_str(r#"{"price":"pricey"}"#).unwrap();
        assert_eq!(filters.price, PriceLevel::Pricey);
        assert_eq!(filters.radius_meters, DEFAULT_RADIUS_METERS);
        assert_eq!(filters.page_offset(), 0);
    }
}
