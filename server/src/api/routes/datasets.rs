//! Dataset discovery endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::domain::DatasetRegistry;
use crate::domain::wells::DatasetDescription;

pub fn routes(registry: Arc<DatasetRegistry>) -> Router<()> {
    Router::new()
        .route("/datasets", get(list_datasets))
        .with_state(registry)
}

/// List datasets with their supported filters and category names
#[utoipa::path(
    get,
    path = "/api/v1/datasets",
    tag = "datasets",
    responses(
        (status = 200, description = "Shipped datasets", body = Vec<DatasetDescription>)
    )
)]
pub async fn list_datasets(
    State(registry): State<Arc<DatasetRegistry>>,
) -> Json<Vec<DatasetDescription>> {
    Json(registry.iter().map(|r| r.describe()).collect())
}
