use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::patch,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tourbook_core::models::{ApplicationRequest, DeleteOutcome, GuideApplication, NewApplication};
use tourbook_shared::pagination::PageQuery;
use tourbook_shared::{Masked, Pagination};
use tracing::info;

use crate::{
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tourGuideApplication",
            axum::routing::post(submit_application).get(list_applications),
        )
        .route(
            "/tourGuideApplication/{id}",
            patch(accept_application).delete(reject_application),
        )
}

#[derive(Serialize)]
struct ApplicationPage {
    data: Vec<GuideApplication>,
    total: u64,
}

async fn submit_application(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ApplicationRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let application = NewApplication::try_from(req)?;
    let applicant = Masked(application.email.clone());
    let id = state.repos.applications.submit_application(application).await?;
    info!(application_id = %id, %applicant, "Guide application submitted");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Application submitted successfully",
            "insertedId": id,
        })),
    ))
}

async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApplicationPage>, AppError> {
    let pagination = Pagination::from_query(&query);
    let (data, total) = state
        .repos
        .applications
        .list_applications(pagination)
        .await?;
    Ok(Json(ApplicationPage { data, total }))
}

async fn accept_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let accepted = state
        .repos
        .applications
        .accept_application(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Application not found"))?;
    Ok(Json(json!({
        "success": true,
        "updated": accepted.updated,
        "addedToTourGuides": !accepted.guide_id.is_empty(),
    })))
}

async fn reject_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let deleted = state.repos.applications.reject_application(&id).await?;
    Ok(Json(DeleteOutcome::new(deleted)))
}
