use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ApiError;
use crate::store::{Collection, Document, Filter};
use crate::AppState;

/// Handler for GET /services
pub async fn list_services_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    tracing::debug!("Fetching all services");

    let services = state.store.find(Collection::Services, &Filter::new()).await?;

    tracing::debug!("Retrieved {} services", services.len());
    Ok(Json(services))
}

/// Handler for GET /services/:id
/// An unknown id answers `null` rather than 404
pub async fn get_service_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    tracing::debug!("Fetching service with id: {}", id);

    let service = state.store.find_by_id(Collection::Services, &id).await?;
    if service.is_none() {
        tracing::debug!("Service with id {} not found", id);
    }

    Ok(Json(service))
}
