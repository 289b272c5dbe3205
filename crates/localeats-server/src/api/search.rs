//! `POST /api/search/restaurants`: the internal request bridge.
//!
//! Clients send a fully-built upstream URL as `apiString`; the proxy adds the
//! API key, fetches, normalizes and replies with display-ready records.
//! Replies keep the bridge's flat wire shape instead of the `{ data, meta }`
//! envelope.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use localeats_core::SearchOutcome;
use localeats_search::{normalize, BridgeRequest, BridgeResponse, SearchError};

use crate::middleware::RequestId;

use super::AppState;

pub(super) const FETCHED_MESSAGE: &str = "Data fetched";
pub(super) const FAILED_MESSAGE: &str = "Request failed";
pub(super) const MALFORMED_MESSAGE: &str = "Request body must be JSON with an apiString";
pub(super) const FOREIGN_ENDPOINT_MESSAGE: &str = "apiString must target the search endpoint";

type BridgeReply = (StatusCode, Json<BridgeResponse>);

fn fetched(records: Vec<localeats_core::ResultRecord>, total_hits: u32) -> BridgeReply {
    (
        StatusCode::CREATED,
        Json(BridgeResponse {
            message: FETCHED_MESSAGE.to_owned(),
            results: Some(records),
            number_of_hits: Some(total_hits),
        }),
    )
}

fn rejected(message: &str) -> BridgeReply {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(BridgeResponse::failure(message)),
    )
}

pub(super) async fn search_restaurants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<BridgeRequest>, JsonRejection>,
) -> BridgeReply {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(request_id = %req_id.0, error = %rejection, "malformed search request");
            return rejected(MALFORMED_MESSAGE);
        }
    };

    match state.upstream.fetch(&request.api_string).await {
        Ok(response) => match normalize(&response) {
            SearchOutcome::Success {
                records,
                total_hits,
            } => {
                tracing::debug!(request_id = %req_id.0, total_hits, "search fetched");
                fetched(records, total_hits)
            }
            SearchOutcome::NoResults => fetched(Vec::new(), 0),
            SearchOutcome::UpstreamError { .. } | SearchOutcome::NoLocation => {
                rejected(FAILED_MESSAGE)
            }
        },
        Err(SearchError::InvalidEndpoint { url }) => {
            tracing::warn!(request_id = %req_id.0, url = %url, "refused to proxy foreign URL");
            rejected(FOREIGN_ENDPOINT_MESSAGE)
        }
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "upstream search failed");
            rejected(FAILED_MESSAGE)
        }
    }
}
