use serde::{Deserialize, Serialize};

/// Raw device coordinates, before reverse geocoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The location every search is anchored to.
///
/// Field names match the saved-state format of the web client
/// (`latitude`, `longitude`, `locationString`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationObject {
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable place name, e.g. `"Toronto, ON"`.
    pub location_string: String,
}

impl LocationObject {
    #[must_use]
    pub fn new(coordinates: Coordinates, location_string: impl Into<String>) -> Self {
        Self {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            location_string: location_string.into(),
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
