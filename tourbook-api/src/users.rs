use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tourbook_core::directory::{merge_page, DirectoryFilter, DirectoryPage};
use tourbook_core::models::{
    InsertOutcome, NewUser, Registration, UserProfileRequest, UserProfileSave, UserProfileUpdate,
    UserRequest,
};
use tourbook_shared::pagination::PageQuery;
use tourbook_shared::{Masked, Pagination};
use tracing::info;

use crate::{
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register_user).get(user_directory))
        .route("/users/profile/{email}", put(save_profile))
}

#[derive(Debug, Default, Deserialize)]
struct DirectoryQuery {
    search: Option<String>,
    role: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

async fn register_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserRequest>,
) -> Result<Response, AppError> {
    let user = NewUser::try_from(req)?;
    let email = Masked(user.email.clone());
    match state.repos.users.register_user(user).await? {
        Registration::Existing(id) => Ok(Json(json!({
            "message": "User already exists",
            "insertedId": id,
        }))
        .into_response()),
        Registration::Created(id) => {
            info!(user_id = %id, %email, "User registered");
            Ok((StatusCode::CREATED, Json(InsertOutcome::new(id))).into_response())
        }
    }
}

async fn save_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    ApiJson(req): ApiJson<UserProfileRequest>,
) -> Result<Response, AppError> {
    let update = UserProfileUpdate::from(req);
    let body = match state.repos.users.save_user_profile(&email, update).await? {
        UserProfileSave::Inserted(id) => json!({
            "success": true,
            "message": "User inserted",
            "data": InsertOutcome::new(id),
        }),
        UserProfileSave::Updated(outcome) => json!({
            "success": true,
            "message": "User updated",
            "data": outcome,
        }),
    };
    Ok(Json(body).into_response())
}

/// Tourist profiles, admin profiles and guides, merged and paged.
async fn user_directory(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<DirectoryPage>, AppError> {
    let pagination = Pagination::from_query(&PageQuery {
        page: query.page,
        limit: query.limit,
    });
    let filter = DirectoryFilter::new(query.search, query.role);
    let groups = state.repos.profiles.directory_candidates(&filter).await?;
    Ok(Json(merge_page(groups, pagination)))
}
