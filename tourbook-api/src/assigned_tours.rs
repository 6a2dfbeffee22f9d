use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tourbook_core::models::{
    AssignedTour, AssignedTourRequest, AssignedTourStatus, AssignmentKey, AssignmentKeyRequest,
    NewAssignedTour, UpdateOutcome,
};
use tracing::info;

use crate::{
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assignedTours", post(assign_tour).get(list_assigned_tours))
        .route("/assignedTours/cancel", delete(cancel_assignment))
        .route("/assignedTours/{email}", get(tours_for_guide))
        .route(
            "/assignedTours/accept/{id}",
            patch(|state: State<AppState>, id: Path<String>| {
                set_status(state, id, AssignedTourStatus::Accepted)
            }),
        )
        .route(
            "/assignedTours/reject/{id}",
            patch(|state: State<AppState>, id: Path<String>| {
                set_status(state, id, AssignedTourStatus::Rejected)
            }),
        )
}

async fn assign_tour(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AssignedTourRequest>,
) -> Result<Json<Value>, AppError> {
    let tour = NewAssignedTour::try_from(req)?;
    let id = state.repos.assigned_tours.assign_tour(tour).await?;
    info!(assignment_id = %id, "Tour assigned");
    Ok(Json(json!({ "success": true, "insertedId": id })))
}

async fn list_assigned_tours(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignedTour>>, AppError> {
    Ok(Json(state.repos.assigned_tours.list_assigned_tours().await?))
}

async fn tours_for_guide(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<AssignedTour>>, AppError> {
    Ok(Json(
        state
            .repos
            .assigned_tours
            .assigned_tours_for_guide(&email)
            .await?,
    ))
}

async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    status: AssignedTourStatus,
) -> Result<Json<UpdateOutcome>, AppError> {
    let outcome = state
        .repos
        .assigned_tours
        .set_assigned_tour_status(&id, status)
        .await?;
    info!(assignment_id = %id, status = status.as_str(), "Assigned tour status set");
    Ok(Json(outcome))
}

async fn cancel_assignment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AssignmentKeyRequest>,
) -> Result<Json<Value>, AppError> {
    let key = AssignmentKey::try_from(req)?;
    let deleted = state.repos.assigned_tours.cancel_assigned_tour(&key).await?;
    Ok(Json(json!({ "success": deleted })))
}
