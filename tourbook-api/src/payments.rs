use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tourbook_core::models::{NewPayment, PaymentRequest};
use tourbook_core::payment::to_minor_units;
use tracing::info;

use crate::{
    error::{ApiJson, AppError},
    state::AppState,
};

const CARD_ONLY: &[&str] = &["card"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/payments", post(record_payment))
}

#[derive(Debug, Deserialize)]
struct IntentRequest {
    #[serde(default)]
    id: String,
}

async fn create_payment_intent(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<IntentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = state
        .repos
        .bookings
        .get_booking(&req.id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    let amount = to_minor_units(booking.price)?;
    let intent = state
        .gateway
        .create_intent(amount, &state.payments.currency, CARD_ONLY)
        .await?;
    info!(booking_id = %booking.id, intent_id = %intent.id, amount, "Payment intent created");

    Ok(Json(json!({
        "clientSecret": intent.client_secret,
        "bookingData": booking,
    })))
}

async fn record_payment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let payment = NewPayment::try_from(req)?;
    if !state.repos.payments.record_payment(payment).await? {
        return Err(AppError::not_found("Booking not found"));
    }
    Ok(Json(json!({ "success": true })))
}
