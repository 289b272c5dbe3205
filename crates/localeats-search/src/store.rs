//! Shared search state: current filters plus the latest published outcome.
//!
//! The lock is only ever held for short synchronous sections and never across
//! an `.await`. Outcomes are tagged with the sequence number of the search
//! that produced them and only the most recently started search may publish.

use std::sync::{Mutex, MutexGuard, PoisonError};

use localeats_core::{FilterState, SearchOutcome};

use crate::pagination::PaginationPlan;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Settled(SearchOutcome),
}

#[derive(Debug)]
struct StoreState {
    filters: FilterState,
    phase: SearchPhase,
    plan: Option<PaginationPlan>,
    latest_sequence: u64,
}

#[derive(Debug)]
pub struct FilterStore {
    state: Mutex<StoreState>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl FilterStore {
    #[must_use]
    pub fn new(filters: FilterState) -> Self {
        Self {
            state: Mutex::new(StoreState {
                filters,
                phase: SearchPhase::Idle,
                plan: None,
                latest_sequence: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn filters(&self) -> FilterState {
        self.lock().filters.clone()
    }

    /// Applies `update` to the filters and returns the new value.
    pub fn update_filters<F>(&self, update: F) -> FilterState
    where
        F: FnOnce(&mut FilterState),
    {
        let mut state = self.lock();
        update(&mut state.filters);
        state.filters.clone()
    }

    pub fn reset_filters(&self) {
        self.lock().filters = FilterState::default();
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.lock().phase.clone()
    }

    /// The last published outcome, if a search has settled.
    #[must_use]
    pub fn outcome(&self) -> Option<SearchOutcome> {
        match &self.lock().phase {
            SearchPhase::Settled(outcome) => Some(outcome.clone()),
            SearchPhase::Idle | SearchPhase::Loading => None,
        }
    }

    #[must_use]
    pub fn plan(&self) -> Option<PaginationPlan> {
        self.lock().plan
    }

    /// Marks search `sequence` as the latest one and enters `Loading`.
    pub(crate) fn begin(&self, sequence: u64) {
        let mut state = self.lock();
        if sequence > state.latest_sequence {
            state.latest_sequence = sequence;
            state.phase = SearchPhase::Loading;
        }
    }

    /// Publishes an outcome unless a newer search has started since.
    /// Returns whether it was published.
    pub(crate) fn publish(
        &self,
        sequence: u64,
        outcome: SearchOutcome,
        plan: Option<PaginationPlan>,
    ) -> bool {
        let mut state = self.lock();
        if sequence != state.latest_sequence {
            tracing::debug!(
                sequence,
                latest = state.latest_sequence,
                "discarding stale search outcome"
            );
            return false;
        }
        state.phase = SearchPhase::Settled(outcome);
        state.plan = plan;
        true
    }
}

#[cfg(test)]
mod tests {
    use localeats_core::SortBy;

    use super::*;

    #[test]
    fn starts_idle_with_given_filters() {
        let store = FilterStore::default();
        assert_eq!(store.phase(), SearchPhase::Idle);
        assert_eq!(store.filters(), FilterState::default());
        assert!(store.outcome().is_none());
        assert!(store.plan().is_none());
    }

    #[test]
    fn update_and_reset_filters() {
        let store = FilterStore::default();
        let updated = store.update_filters(|f| f.sort_by = SortBy::Distance);
        assert_eq!(updated.sort_by, SortBy::Distance);
        assert_eq!(store.filters().sort_by, SortBy::Distance);

        store.reset_filters();
        assert_eq!(store.filters(), FilterState::default());
    }

    #[test]
    fn latest_sequence_publishes() {
        let store = FilterStore::default();
        store.begin(1);
        assert_eq!(store.phase(), SearchPhase::Loading);
        assert!(store.publish(1, SearchOutcome::NoResults, None));
        assert_eq!(store.outcome(), Some(SearchOutcome::NoResults));
    }

    #[test]
    fn stale_sequence_is_discarded() {
        let store = FilterStore::default();
        store.begin(1);
        store.begin(2);
        assert!(store.publish(2, SearchOutcome::NoLocation, None));
        assert!(!store.publish(1, SearchOutcome::NoResults, None));
        assert_eq!(store.outcome(), Some(SearchOutcome::NoLocation));
    }

    #[test]
    fn begin_with_older_sequence_is_ignored() {
        let store = FilterStore::default();
        store.begin(3);
        store.publish(3, SearchOutcome::NoResults, None);
        store.begin(2);
        assert_eq!(store.outcome(), Some(SearchOutcome::NoResults));
    }
}
