use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tourbook_core::models::{Booking, BookingRequest, InsertOutcome, NewBooking};
use tourbook_shared::Masked;
use tracing::info;

use crate::{
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookingsData/user/{email}", get(bookings_for_user))
        .route("/bookingsData/{id}", delete(cancel_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BookingRequest>,
) -> Result<(StatusCode, Json<InsertOutcome>), AppError> {
    let booking = NewBooking::try_from(req)?;
    let user = Masked(booking.user_email.clone());
    let id = state.repos.bookings.create_booking(booking).await?;
    info!(booking_id = %id, %user, "Booking created");
    Ok((StatusCode::CREATED, Json(InsertOutcome::new(id))))
}

async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.repos.bookings.list_bookings().await?))
}

async fn bookings_for_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(
        state.repos.bookings.list_bookings_for_user(&email).await?,
    ))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .repos
        .bookings
        .cancel_booking(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking not found."))?;
    Ok(Json(json!({
        "success": true,
        "message": "Booking and assigned tour deleted successfully.",
    })))
}
