//! Location resolution.
//!
//! Every search is anchored to a [`LocationObject`]. [`LocationResolver`]
//! answers "where are we searching?" in this order:
//!
//! 1. the location already held by this process,
//! 2. the location saved by a previous session (promoted into process state
//!    on first read),
//! 3. nothing, in which case the caller prompts the user.
//!
//! Resolution never fails. Storage and geocoding problems are logged and the
//! chain moves on.

mod geocode;
mod storage;

use std::sync::{Mutex, MutexGuard, PoisonError};

use localeats_core::{Coordinates, LocationObject};

pub use geocode::{HttpReverseGeocoder, ReverseGeocoder, DEFAULT_GEOCODER_URL};
pub use storage::{
    LocationStorage, MemoryStorage, StateFile, BOOKMARKS_KEY, FILTERS_KEY, LOCATION_KEY,
};

#[derive(Debug, Default)]
struct Slot {
    location: Option<LocationObject>,
    storage_checked: bool,
}

pub struct LocationResolver<S> {
    storage: S,
    slot: Mutex<Slot>,
}

impl<S: LocationStorage> LocationResolver<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            slot: Mutex::new(Slot::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current location, consulting saved state at most once.
    pub fn resolve(&self) -> Option<LocationObject> {
        let mut slot = self.lock();
        if let Some(location) = &slot.location {
            return Some(location.clone());
        }
        if slot.storage_checked {
            return None;
        }
        slot.storage_checked = true;

        match self.storage.load() {
            Ok(Some(location)) => {
                tracing::debug!(location = %location.location_string, "restored saved location");
                slot.location = Some(location.clone());
                Some(location)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved location");
                None
            }
        }
    }

    /// Replaces the process location and persists it.
    ///
    /// A failed save is logged; the location is still used for this process.
    pub fn submit(&self, location: LocationObject) {
        if let Err(e) = self.storage.save(&location) {
            tracing::warn!(error = %e, "could not save location");
        }
        let mut slot = self.lock();
        slot.location = Some(location);
        slot.storage_checked = true;
    }

    /// Forgets the location in this process and in saved state.
    pub fn clear(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "could not clear saved location");
        }
        let mut slot = self.lock();
        slot.location = None;
        slot.storage_checked = true;
    }

    /// Turns device coordinates into a location and submits it.
    ///
    /// `None` means geolocation was denied or unavailable: no request is made
    /// and the usual precedence chain answers. A failed reverse-geocode falls
    /// back the same way.
    pub async fn detect<G: ReverseGeocoder>(
        &self,
        geocoder: &G,
        coordinates: Option<Coordinates>,
    ) -> Option<LocationObject> {
        let Some(coordinates) = coordinates else {
            tracing::debug!("no device coordinates, using saved location");
            return self.resolve();
        };

        match geocoder.locate(coordinates).await {
            Ok(place) => {
                let location = LocationObject::new(coordinates, place);
                self.submit(location.clone());
                Some(location)
            }
            Err(e) => {
                tracing::warn!(error = %e, "reverse geocoding failed, using saved location");
                self.resolve()
            }
        }
    }
}
