//! Wells query endpoint

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::api::extractors::{FormPairs, QueryPairs};
use crate::api::types::ApiError;
use crate::data::WellStores;
use crate::domain::wells::WellsResponse;
use crate::domain::{ClientRequest, DatasetRegistry};

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct WellsApiState {
    pub registry: Arc<DatasetRegistry>,
    pub stores: WellStores,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(registry: Arc<DatasetRegistry>, stores: WellStores) -> Router<()> {
    let state = WellsApiState { registry, stores };
    Router::new()
        .route("/{dataset}", get(query_wells).post(query_wells_form))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Query one page of well coordinates
///
/// Filters: `completed`/`abandoned` take `START..END` dates, `rate`/`depth`/
/// `bedrock` take `START:END` integers, categorical filters take
/// comma-separated category names. `page`, `total` and `chunk` steer paging.
#[utoipa::path(
    get,
    path = "/api/v1/wells/{dataset}",
    tag = "wells",
    params(
        ("dataset" = String, Path, description = "Dataset slug, e.g. alberta"),
        ("completed" = Option<String>, Query, description = "Completion date range, e.g. 2001-01-01..2005-12-31"),
        ("rate" = Option<String>, Query, description = "Yield range, e.g. 10:50"),
        ("use" = Option<String>, Query, description = "Comma-separated water use categories"),
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("total" = Option<i64>, Query, description = "Known row count from a previous page"),
        ("chunk" = Option<i64>, Query, description = "Page size to report when nothing matches")
    ),
    responses(
        (status = 200, description = "One page of wells", body = WellsResponse),
        (status = 400, description = "Invalid filter parameters"),
        (status = 404, description = "Unknown dataset")
    )
)]
pub async fn query_wells(
    State(state): State<WellsApiState>,
    Path(dataset): Path<String>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Response, ApiError> {
    respond(&state, &dataset, &pairs).await
}

/// Query one page of well coordinates from a urlencoded form
#[utoipa::path(
    post,
    path = "/api/v1/wells/{dataset}",
    tag = "wells",
    params(
        ("dataset" = String, Path, description = "Dataset slug, e.g. alberta")
    ),
    request_body(content_type = "application/x-www-form-urlencoded", content = String),
    responses(
        (status = 200, description = "One page of wells", body = WellsResponse),
        (status = 400, description = "Invalid filter parameters"),
        (status = 404, description = "Unknown dataset")
    )
)]
pub async fn query_wells_form(
    State(state): State<WellsApiState>,
    Path(dataset): Path<String>,
    FormPairs(pairs): FormPairs,
) -> Result<Response, ApiError> {
    respond(&state, &dataset, &pairs).await
}

async fn respond(
    state: &WellsApiState,
    dataset: &str,
    pairs: &[(String, String)],
) -> Result<Response, ApiError> {
    let started = Instant::now();
    let retriever = state
        .registry
        .get(dataset)
        .ok_or_else(|| ApiError::unknown_dataset(dataset))?;
    let store = state.stores.get(dataset).ok_or_else(|| {
        ApiError::service_unavailable(format!("Dataset '{}' has no open store", dataset))
    })?;

    let request = ClientRequest::decode(pairs, retriever)?;
    let response = retriever.retrieve(store.repository(), &request).await?;

    let body = serde_json::to_vec(&response).map_err(|e| {
        tracing::error!(error = %e, dataset, "Failed to encode response");
        ApiError::internal("Failed to encode response")
    })?;
    tracing::debug!(
        dataset,
        bytes = body.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Response encoded"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        body,
    )
        .into_response())
}
