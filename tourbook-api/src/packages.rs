use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tourbook_core::models::{InsertOutcome, NewPackage, PackageRequest, TourPackage};
use tracing::info;

use crate::{
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/packages", post(create_package).get(list_packages))
        .route("/addPackage", post(create_package))
        .route("/packages/{id}", get(get_package))
}

async fn create_package(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PackageRequest>,
) -> Result<(StatusCode, Json<InsertOutcome>), AppError> {
    let package = NewPackage::try_from(req)?;
    let id = state.repos.packages.create_package(package).await?;
    info!(package_id = %id, "Package created");
    Ok((StatusCode::CREATED, Json(InsertOutcome::new(id))))
}

async fn list_packages(State(state): State<AppState>) -> Result<Json<Vec<TourPackage>>, AppError> {
    Ok(Json(state.repos.packages.list_packages().await?))
}

async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TourPackage>, AppError> {
    state
        .repos
        .packages
        .get_package(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Package not found"))
}
