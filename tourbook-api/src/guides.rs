use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tourbook_core::models::{GuideProfileRequest, GuideProfileUpdate, TourGuide};
use tourbook_core::validation::present;
use tracing::info;

use crate::{
    error::{ApiJson, AppError},
    state::AppState,
};

const RANDOM_GUIDES: usize = 6;
const GUIDE_NOT_FOUND: &str = "Tour guide not found";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tourGuides", get(list_guides))
        .route("/tourGuides/random", get(random_guides))
        .route("/tourGuides/{id}", axum::routing::patch(update_profile))
        .route("/tour-guides", get(guide_by_email))
        .route("/tourGuide/profile", get(guide_profile))
        .route("/tourGuide/profileById/{id}", get(guide_by_id))
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

async fn list_guides(State(state): State<AppState>) -> Result<Json<Vec<TourGuide>>, AppError> {
    Ok(Json(state.repos.guides.list_guides().await?))
}

async fn random_guides(State(state): State<AppState>) -> Result<Json<Vec<TourGuide>>, AppError> {
    Ok(Json(state.repos.guides.sample_guides(RANDOM_GUIDES).await?))
}

async fn guide_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<TourGuide>, AppError> {
    let email = present(query.email).ok_or_else(|| AppError::bad_request("Email is required"))?;
    find_by_email(&state, &email).await
}

async fn guide_profile(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<TourGuide>, AppError> {
    let email = query.email.unwrap_or_default();
    find_by_email(&state, &email).await
}

async fn find_by_email(state: &AppState, email: &str) -> Result<Json<TourGuide>, AppError> {
    state
        .repos
        .guides
        .find_guide_by_email(email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(GUIDE_NOT_FOUND))
}

async fn guide_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TourGuide>, AppError> {
    state
        .repos
        .guides
        .get_guide(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(GUIDE_NOT_FOUND))
}

async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<GuideProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let update = GuideProfileUpdate::try_from(req)?;
    let outcome = state.repos.guides.update_guide_profile(&id, update).await?;
    if !outcome.modified() {
        return Err(AppError::not_found(
            "Tour guide not found or no changes made",
        ));
    }
    info!(guide_id = %id, "Guide profile updated");
    Ok(Json(json!({ "success": true, "message": "Profile updated" })))
}
