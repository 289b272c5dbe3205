//! Display-ready search results and the outcome of one search attempt.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoursLabel {
    #[serde(rename = "Open now")]
    OpenNow,
    #[serde(rename = "Closed for now")]
    ClosedForNow,
}

impl HoursLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenNow => "Open now",
            Self::ClosedForNow => "Closed for now",
        }
    }
}

impl std::fmt::Display for HoursLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One restaurant card. Wire names follow the search proxy's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// Zero-based position in the upstream response.
    pub search_index: usize,
    #[serde(rename = "storeID")]
    pub store_id: String,
    pub image: String,
    pub store_name: String,
    /// Category titles joined with `", "`.
    pub category: String,
    /// e.g. `"1.2 km away"`.
    #[serde(rename = "distance")]
    pub distance_label: String,
    pub rating: f64,
    /// Number of currency symbols in the upstream price string.
    pub price_level: usize,
    #[serde(rename = "hours")]
    pub hours_label: HoursLabel,
}

/// Terminal result of one search. Exactly one is published per search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Success {
        records: Vec<ResultRecord>,
        total_hits: u32,
    },
    NoResults,
    UpstreamError {
        message: String,
    },
    NoLocation,
}

impl SearchOutcome {
    /// Message shown for any transport failure; the cause is only logged.
    pub const UPSTREAM_ERROR_MESSAGE: &'static str =
        "Something's gone wrong! Reload the page or search for something else";

    #[must_use]
    pub fn upstream_error() -> Self {
        Self::UpstreamError {
            message: Self::UPSTREAM_ERROR_MESSAGE.to_owned(),
        }
    }

    /// Total upstream hits; zero for every variant but `Success`.
    #[must_use]
    pub fn total_hits(&self) -> u32 {
        match self {
            Self::Success { total_hits, .. } => *total_hits,
            Self::NoResults | Self::UpstreamError { .. } | Self::NoLocation => 0,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[ResultRecord] {
        match self {
            Self::Success { records, .. } => records,
            Self::NoResults | Self::UpstreamError { .. } | Self::NoLocation => &[],
        }
    }
}
