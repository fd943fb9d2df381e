// HTTP handlers for booking endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::auth::AuthenticatedUser;
use crate::bookings::{new_booking, BookingsQuery, UpdateStatusRequest};
use crate::error::ApiError;
use crate::store::{Collection, DeleteAck, Document, Filter, InsertAck, UpdateAck};
use crate::AppState;

/// Handler for GET /bookings?email=
/// Lists the caller's bookings; asking for someone else's is refused (402).
///
/// Without `email` the listing is scoped to the caller instead of being
/// refused as a mismatch. This is a deliberate relaxation: it can only ever
/// return the caller's own bookings.
pub async fn list_bookings_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let email = user.authorize_email(query.email.as_deref())?;

    let mut filter = Filter::new();
    filter.insert("email".to_string(), Value::String(email.to_string()));

    let bookings = state.store.find(Collection::Bookings, &filter).await?;

    tracing::debug!("Retrieved {} bookings for {}", bookings.len(), email);
    Ok(Json(bookings))
}

/// Handler for POST /bookings
pub async fn create_booking_handler(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<Json<InsertAck>, ApiError> {
    let ack = state
        .store
        .insert_one(Collection::Bookings, new_booking(body))
        .await?;

    tracing::info!("Created booking with id: {}", ack.inserted_id);
    Ok(Json(ack))
}

/// Handler for DELETE /bookings/:id
/// Reports `deletedCount: 0` for unknown ids instead of failing
pub async fn delete_booking_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    let ack = state.store.delete_one(Collection::Bookings, &id).await?;

    tracing::info!("Deleted {} booking(s) with id: {}", ack.deleted_count, id);
    Ok(Json(ack))
}

/// Handler for PATCH /bookings/:id
/// Sets `status` only; every other field is left as stored
pub async fn update_booking_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateAck>, ApiError> {
    let status = request.status;
    let ack = state
        .store
        .update_fields(Collection::Bookings, &id, request.into_fields())
        .await?;

    tracing::info!(
        "Booking {} status set to {} (matched {}, modified {})",
        id,
        status,
        ack.matched_count,
        ack.modified_count
    );
    Ok(Json(ack))
}
