//! Search orchestration.
//!
//! Every trigger (new URL params, a filter change, a page change, a new
//! location) runs the same pipeline: resolve location, build the request,
//! send it through a [`SearchBackend`], publish the outcome to the
//! [`FilterStore`].
//!
//! Searches are never cancelled. Each one takes a sequence number when it
//! starts and the store drops any outcome whose number is no longer the
//! latest, so a slow response can never overwrite a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use localeats_core::{FilterState, LocationObject, SearchOutcome};

use crate::error::{JumpError, SearchError};
use crate::location::{LocationResolver, LocationStorage};
use crate::pagination::{validate_jump, PaginationPlan};
use crate::query::{QueryBuilder, QueryDescriptor, QueryParams};
use crate::store::FilterStore;

/// Transport that turns a built request into an outcome.
pub trait SearchBackend: Send + Sync {
    fn search(
        &self,
        query: &QueryDescriptor,
    ) -> impl Future<Output = Result<SearchOutcome, SearchError>> + Send;
}

pub struct SearchOrchestrator<B, S> {
    backend: B,
    resolver: LocationResolver<S>,
    store: FilterStore,
    builder: QueryBuilder,
    sequence: AtomicU64,
    last_params: Mutex<QueryParams>,
}

impl<B: SearchBackend, S: LocationStorage> SearchOrchestrator<B, S> {
    #[must_use]
    pub fn new(
        backend: B,
        resolver: LocationResolver<S>,
        store: FilterStore,
        builder: QueryBuilder,
    ) -> Self {
        Self {
            backend,
            resolver,
            store,
            builder,
            sequence: AtomicU64::new(0),
            last_params: Mutex::new(QueryParams::default()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    #[must_use]
    pub fn resolver(&self) -> &LocationResolver<S> {
        &self.resolver
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs one search for `params` against the current filters.
    ///
    /// Returns the outcome if it was published, or `None` if a newer search
    /// started while this one was in flight.
    pub async fn search(&self, params: &QueryParams) -> Option<SearchOutcome> {
        *self.last_params.lock().unwrap_or_else(PoisonError::into_inner) = params.clone();

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.begin(sequence);

        let Some(location) = self.resolver.resolve() else {
            tracing::info!(sequence, "no location available, skipping search");
            return self.finish(sequence, SearchOutcome::NoLocation, None);
        };

        let filters = self.store.filters();
        let descriptor = self.builder.build(params, &filters, Some(&location));
        tracing::debug!(sequence, url = descriptor.url(), "searching");

        let outcome = match self.backend.search(&descriptor).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(sequence, error = %e, "search failed");
                SearchOutcome::upstream_error()
            }
        };

        let plan = PaginationPlan::new(outcome.total_hits(), descriptor.offset());
        self.finish(sequence, outcome, plan)
    }

    fn finish(
        &self,
        sequence: u64,
        outcome: SearchOutcome,
        plan: Option<PaginationPlan>,
    ) -> Option<SearchOutcome> {
        self.store
            .publish(sequence, outcome.clone(), plan)
            .then_some(outcome)
    }

    fn last_params(&self) -> QueryParams {
        self.last_params
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Moves to a 1-indexed page and re-runs the last search from there.
    pub async fn go_to_page(&self, page: u32) -> Option<SearchOutcome> {
        self.store.update_filters(|f| f.set_page(page));
        let params = self.last_params().without_offset();
        self.search(&params).await
    }

    /// Validates free-text page input against the current plan, then moves
    /// there.
    ///
    /// # Errors
    ///
    /// Returns [`JumpError`] for unusable input. Results are left untouched.
    pub async fn jump_to_page(&self, raw: &str) -> Result<Option<SearchOutcome>, JumpError> {
        let required = self.store.plan().map_or(0, |p| p.required_pages);
        let page = validate_jump(required, raw)?;
        Ok(self.go_to_page(page).await)
    }

    /// Changes filters and searches again from the first page.
    ///
    /// URL values are folded into the filters before `update` runs, so the
    /// change applies even to keys the URL had set. A multi-tier URL price
    /// survives until the price filter itself changes.
    pub async fn apply_filters<F>(&self, update: F) -> Option<SearchOutcome>
    where
        F: FnOnce(&mut FilterState),
    {
        let last = self.last_params();
        let mut params = QueryParams::default();
        self.store.update_filters(|f| {
            params = last.fold_into(f);
            let price = f.price;
            update(f);
            if f.price != price {
                params.price = None;
            }
            f.set_page(1);
        });
        self.search(&params).await
    }

    /// Switches location and searches again from the first page. URL
    /// coordinates are dropped so the new location is the one searched.
    pub async fn set_location(&self, location: LocationObject) -> Option<SearchOutcome> {
        self.resolver.submit(location);
        self.store.update_filters(|f| f.set_page(1));
        let params = self.last_params().without_location();
        self.search(&params).await
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
