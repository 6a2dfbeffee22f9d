use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tourbook_core::models::{
    AdminProfileRequest, AdminProfileUpdate, AdminProfileUpdateRequest, Extra, InsertOutcome,
    NewAdminProfile,
};
use tourbook_core::validation::strip_reserved;
use tourbook_shared::Masked;
use tracing::info;

use crate::{
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/usersInfo/{email}", put(save_tourist_profile))
        .route("/admin/profile", post(create_admin_profile))
        .route(
            "/admin/profile/{email}",
            axum::routing::get(get_admin_profile).patch(update_admin_profile),
        )
}

async fn save_tourist_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    ApiJson(mut fields): ApiJson<Extra>,
) -> Result<Json<Value>, AppError> {
    strip_reserved(&mut fields, &[]);
    let result = state
        .repos
        .profiles
        .save_tourist_profile(&email, fields)
        .await?;
    info!(email = %Masked(&email), "Tourist profile saved");
    Ok(Json(json!({
        "success": true,
        "message": "Profile saved",
        "result": result,
    })))
}

async fn create_admin_profile(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AdminProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let profile = NewAdminProfile::try_from(req)?;
    match state.repos.profiles.create_admin_profile(profile).await? {
        None => Ok(Json(json!({ "success": false, "message": "Already exists" }))),
        Some(id) => Ok(Json(json!({
            "success": true,
            "result": InsertOutcome::new(id),
        }))),
    }
}

async fn get_admin_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let profile = state.repos.profiles.find_admin_profile(&email).await?;
    let body = match profile {
        Some(profile) => serde_json::to_value(profile)
            .map_err(|e| AppError::Internal(e.to_string()))?,
        None => json!({}),
    };
    Ok(Json(body))
}

async fn update_admin_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    ApiJson(req): ApiJson<AdminProfileUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    let update = AdminProfileUpdate::try_from(req)?;
    let outcome = state
        .repos
        .profiles
        .update_admin_profile(&email, update)
        .await?;
    Ok(Json(json!({ "success": outcome.modified() })))
}
