//! Upstream request assembly.
//!
//! Three sources feed one search request, highest precedence first:
//!
//! 1. [`QueryParams`]: values from a shared or bookmarked search-page URL,
//! 2. [`FilterState`]: the user's in-memory filter selections,
//! 3. [`LocationObject`]: coordinates of the resolved location.
//!
//! The builder never fails. Missing coordinates simply leave `latitude` and
//! `longitude` out of the request; callers check for a location first.

use localeats_core::{
    Coordinates, FilterState, HoursFilter, LocationObject, PriceLevel, SortBy, PAGE_SIZE,
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.yelp.com/v3/businesses/search";

/// Escaped inside parameter values. Spaces are deliberately not in the set.
const VALUE_ESCAPES: &AsciiSet = &CONTROLS
    .add(b'&')
    .add(b'#')
    .add(b'=')
    .add(b'%')
    .add(b'+')
    .add(b'?');

/// A price filter as it appears in a URL: either switched off (`false`) or
/// one or more tiers (`"1"`, `"1,2"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSelection {
    Off,
    Tiers(Vec<u8>),
}

impl PriceSelection {
    /// Returns `None` for blank or unparseable input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Some(Self::Off);
        }
        trimmed
            .split(',')
            .map(|tier| {
                tier.trim()
                    .parse::<u8>()
                    .ok()
                    .filter(|n| (1..=4).contains(n))
            })
            .collect::<Option<Vec<_>>>()
            .map(Self::Tiers)
    }

    fn as_param(&self) -> Option<String> {
        match self {
            Self::Off => None,
            Self::Tiers(tiers) => Some(
                tiers
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }
}

/// Search-page URL parameters. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub radius: Option<u32>,
    pub offset: Option<u32>,
    /// Only set when the URL carried both `latitude` and `longitude`.
    pub coordinates: Option<Coordinates>,
    pub hours: Option<HoursFilter>,
    pub sort_by: Option<SortBy>,
    pub price: Option<PriceSelection>,
    pub term: Option<String>,
}

impl QueryParams {
    /// Parses a raw query string such as `radius=5000&term=pad+thai`.
    ///
    /// A leading `?` is ignored, `+` decodes to a space and values are
    /// percent-decoded. Malformed values are logged and skipped.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect::<Vec<_>>();
        Self::from_pairs(pairs)
    }

    /// Builds params from already-decoded key/value pairs. Later duplicates
    /// win, empty values count as absent and unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        let mut latitude = None;
        let mut longitude = None;

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }

            let accepted = match key {
                "radius" => value.parse().ok().map(|v| params.radius = Some(v)),
                "offset" => value.parse().ok().map(|v| params.offset = Some(v)),
                "latitude" => value.parse::<f64>().ok().map(|v| latitude = Some(v)),
                "longitude" => value.parse::<f64>().ok().map(|v| longitude = Some(v)),
                "hours" => value.parse().ok().map(|v| params.hours = Some(v)),
                "sort_by" => value.parse().ok().map(|v| params.sort_by = Some(v)),
                "price" => PriceSelection::parse(value).map(|v| params.price = Some(v)),
                "term" => {
                    params.term = Some(value.to_owned());
                    Some(())
                }
                _ => {
                    tracing::debug!(param = key, "ignoring unknown search parameter");
                    Some(())
                }
            };

            if accepted.is_none() {
                tracing::warn!(param = key, value, "ignoring malformed search parameter");
            }
        }

        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => {
                params.coordinates = Some(Coordinates {
                    latitude,
                    longitude,
                });
            }
            (None, None) => {}
            _ => tracing::warn!("ignoring URL coordinates: latitude and longitude must both be set"),
        }

        params
    }

    /// Copy without the `offset` override, so the filter state's page wins.
    #[must_use]
    pub fn without_offset(&self) -> Self {
        Self {
            offset: None,
            ..self.clone()
        }
    }

    /// Copy without `offset` or URL coordinates, so a newly chosen location
    /// is the one searched.
    #[must_use]
    pub fn without_location(&self) -> Self {
        Self {
            offset: None,
            coordinates: None,
            ..self.clone()
        }
    }

    /// Moves every value a filter can hold into `filters` and returns what
    /// is left: the URL coordinates, plus a multi-tier price selection that
    /// no single [`PriceLevel`] can represent. The offset is dropped.
    #[must_use]
    pub fn fold_into(&self, filters: &mut FilterState) -> Self {
        if let Some(radius) = self.radius {
            filters.radius_meters = radius;
        }
        if let Some(hours) = self.hours {
            filters.hours = hours;
        }
        if let Some(sort_by) = self.sort_by {
            filters.sort_by = sort_by;
        }
        if let Some(term) = self.term.as_deref().filter(|t| !t.trim().is_empty()) {
            filters.term = Some(term.to_owned());
        }

        let price = match &self.price {
            Some(PriceSelection::Off) => {
                filters.price = PriceLevel::Any;
                None
            }
            Some(PriceSelection::Tiers(tiers)) => match tiers.as_slice() {
                [tier] => match PriceLevel::from_tier(*tier) {
                    Some(level) => {
                        filters.price = level;
                        None
                    }
                    None => self.price.clone(),
                },
                _ => self.price.clone(),
            },
            None => None,
        };

        Self {
            coordinates: self.coordinates,
            price,
            ..Self::default()
        }
    }
}

fn decode_component(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// One fully-formed upstream request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    url: String,
    params: Vec<(&'static str, String)>,
}

impl QueryDescriptor {
    /// Absolute request URL, including the query string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parameters in emission order, without empty values.
    #[must_use]
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Offset the request starts at; `0` when the parameter was omitted.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.get("offset")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    endpoint: String,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_ENDPOINT)
    }
}

impl QueryBuilder {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_owned(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Merges URL params, filters and location into one request.
    ///
    /// Parameters are emitted as `limit, radius, offset, latitude, longitude,
    /// open_now, sort_by, price, term`. `limit=50` is always present and
    /// `radius` always resolves to a value. Filter values equal to the
    /// upstream defaults (offset `0`, `best_match`) are left out unless the
    /// URL asked for them.
    ///
    /// The upstream mangles multi-word terms, so the first space in the
    /// assembled string becomes `_`. Any later spaces are left for the HTTP
    /// client to percent-encode.
    #[must_use]
    pub fn build(
        &self,
        params: &QueryParams,
        filters: &FilterState,
        location: Option<&LocationObject>,
    ) -> QueryDescriptor {
        let coordinates = params
            .coordinates
            .or_else(|| location.map(LocationObject::coordinates));
        let hours = params.hours.unwrap_or(filters.hours);
        let offset = params
            .offset
            .or_else(|| Some(filters.page_offset()).filter(|o| *o > 0));
        let sort_by = params
            .sort_by
            .or_else(|| Some(filters.sort_by).filter(|s| *s != SortBy::BestMatch));
        let price = match &params.price {
            Some(selection) => selection.as_param(),
            None => filters.price.as_param(),
        };
        let term = params
            .term
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| filters.term.as_deref().filter(|t| !t.trim().is_empty()));

        let candidates: [(&'static str, Option<String>); 9] = [
            ("limit", Some(PAGE_SIZE.to_string())),
            (
                "radius",
                Some(params.radius.unwrap_or(filters.radius_meters).to_string()),
            ),
            ("offset", offset.map(|o| o.to_string())),
            ("latitude", coordinates.map(|c| c.latitude.to_string())),
            ("longitude", coordinates.map(|c| c.longitude.to_string())),
            ("open_now", hours.as_param().map(str::to_owned)),
            ("sort_by", sort_by.map(|s| s.as_param().to_owned())),
            ("price", price),
            ("term", term.map(str::to_owned)),
        ];

        let params: Vec<(&'static str, String)> = candidates
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
            .collect();

        let mut url = self.endpoint.clone();
        for (index, (key, value)) in params.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };
            url.push_str(&format!(
                "{separator}{key}={}",
                utf8_percent_encode(value, VALUE_ESCAPES)
            ));
        }
        let url = url.replacen(' ', "_", 1);

        QueryDescriptor { url, params }
    }
}
