//! Story endpoints for guides and users. Both parents expose the same
//! operations, so every handler takes the [`StoryOwner`] it works on.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tourbook_core::models::{
    ImageRequest, NewStory, Story, StoryCard, StoryEdit, StoryEditRequest, StoryOwner,
    StoryRequest,
};
use tourbook_core::validation::present;
use tourbook_shared::pagination::parse_positive;
use tourbook_shared::Masked;
use tracing::info;

use crate::{
    error::{ApiJson, AppError},
    guides::EmailQuery,
    state::AppState,
};

const DEFAULT_RANDOM_STORIES: usize = 4;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tourGuide/stories",
            post(|state: State<AppState>, body: ApiJson<StoryRequest>| {
                create_story(state, StoryOwner::Guide, body)
            })
            .get(guide_stories),
        )
        .route(
            "/tourGuide/stories/{id}",
            delete(|state: State<AppState>, id: Path<String>, query: Query<EmailQuery>| {
                delete_story(state, StoryOwner::Guide, id, query)
            }),
        )
        .route(
            "/tourGuide/story/{id}",
            get(|state: State<AppState>, id: Path<String>| get_story(state, StoryOwner::Guide, id)),
        )
        .route(
            "/tourGuide/story/add-image/{id}",
            patch(|state: State<AppState>, id: Path<String>, body: ApiJson<ImageRequest>| {
                add_image(state, StoryOwner::Guide, id, body)
            }),
        )
        .route(
            "/tourGuide/story/remove-image/{id}",
            patch(|state: State<AppState>, id: Path<String>, body: ApiJson<ImageRequest>| {
                remove_image(state, StoryOwner::Guide, id, body)
            }),
        )
        .route(
            "/tourGuide/story/update/{id}",
            patch(|state: State<AppState>, id: Path<String>, body: ApiJson<StoryEditRequest>| {
                edit_story(state, StoryOwner::Guide, id, body)
            }),
        )
        .route(
            "/users/stories",
            post(|state: State<AppState>, body: ApiJson<StoryRequest>| {
                create_story(state, StoryOwner::User, body)
            })
            .get(user_stories),
        )
        .route(
            "/add/stories",
            post(|state: State<AppState>, body: ApiJson<StoryRequest>| {
                create_story(state, StoryOwner::User, body)
            }),
        )
        .route(
            "/users/stories/{id}",
            delete(|state: State<AppState>, id: Path<String>, query: Query<EmailQuery>| {
                delete_story(state, StoryOwner::User, id, query)
            }),
        )
        .route("/users/storiesAll", get(all_user_stories))
        .route("/users/randomStories", get(random_user_stories))
        .route("/users/allStories", get(recent_user_stories))
        .route(
            "/user/story/{id}",
            get(|state: State<AppState>, id: Path<String>| get_story(state, StoryOwner::User, id)),
        )
        .route(
            "/user/story/add-image/{id}",
            patch(|state: State<AppState>, id: Path<String>, body: ApiJson<ImageRequest>| {
                add_image(state, StoryOwner::User, id, body)
            }),
        )
        .route(
            "/user/story/remove-image/{id}",
            patch(|state: State<AppState>, id: Path<String>, body: ApiJson<ImageRequest>| {
                remove_image(state, StoryOwner::User, id, body)
            }),
        )
        .route(
            "/user/story/update/{id}",
            patch(|state: State<AppState>, id: Path<String>, body: ApiJson<StoryEditRequest>| {
                edit_story(state, StoryOwner::User, id, body)
            }),
        )
}

#[derive(Debug, Default, Deserialize)]
struct LimitQuery {
    limit: Option<String>,
}

async fn create_story(
    State(state): State<AppState>,
    owner: StoryOwner,
    ApiJson(req): ApiJson<StoryRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let story = NewStory::try_from(req)?;
    let author = Masked(story.email.clone());
    let story = state
        .repos
        .stories
        .push_story(owner, story)
        .await?
        .ok_or_else(|| AppError::not_found(owner.not_found_message()))?;
    info!(?owner, story_id = %story.id, %author, "Story saved");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Story saved successfully",
            "story": story,
        })),
    ))
}

async fn get_story(
    State(state): State<AppState>,
    owner: StoryOwner,
    Path(id): Path<String>,
) -> Result<Json<Story>, AppError> {
    state
        .repos
        .stories
        .find_story(owner, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Story not found"))
}

async fn delete_story(
    State(state): State<AppState>,
    owner: StoryOwner,
    Path(id): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Value>, AppError> {
    let email = query.email.unwrap_or_default();
    if !state.repos.stories.pull_story(owner, &email, &id).await? {
        return Err(AppError::not_found("Story not found or already deleted."));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Story deleted successfully.",
    })))
}

async fn add_image(
    State(state): State<AppState>,
    owner: StoryOwner,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ImageRequest>,
) -> Result<Json<Value>, AppError> {
    let url = req.into_url()?;
    let result = state.repos.stories.add_story_image(owner, &id, &url).await?;
    Ok(Json(json!({ "success": true, "result": result })))
}

async fn remove_image(
    State(state): State<AppState>,
    owner: StoryOwner,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ImageRequest>,
) -> Result<Json<Value>, AppError> {
    let url = req.into_url()?;
    let result = state
        .repos
        .stories
        .remove_story_image(owner, &id, &url)
        .await?;
    Ok(Json(json!({ "success": true, "result": result })))
}

async fn edit_story(
    State(state): State<AppState>,
    owner: StoryOwner,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StoryEditRequest>,
) -> Result<Json<Value>, AppError> {
    let edit = StoryEdit::try_from(req)?;
    let result = state.repos.stories.edit_story(owner, &id, edit).await?;
    Ok(Json(json!({ "success": true, "result": result })))
}

/// All guides' stories, or one guide's with `?email=`.
async fn guide_stories(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Story>>, AppError> {
    let stories = match present(query.email) {
        Some(email) => state
            .repos
            .stories
            .stories_of(StoryOwner::Guide, &email)
            .await?
            .unwrap_or_default(),
        None => state.repos.stories.all_stories(StoryOwner::Guide).await?,
    };
    Ok(Json(stories))
}

async fn user_stories(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Story>>, AppError> {
    let email = query.email.unwrap_or_default();
    state
        .repos
        .stories
        .stories_of(StoryOwner::User, &email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(StoryOwner::User.not_found_message()))
}

async fn all_user_stories(State(state): State<AppState>) -> Result<Json<Vec<Story>>, AppError> {
    Ok(Json(state.repos.stories.all_stories(StoryOwner::User).await?))
}

async fn random_user_stories(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<StoryCard>>, AppError> {
    let limit = parse_positive(query.limit.as_deref())
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(DEFAULT_RANDOM_STORIES);
    Ok(Json(
        state
            .repos
            .stories
            .sample_stories(StoryOwner::User, limit)
            .await?,
    ))
}

async fn recent_user_stories(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoryCard>>, AppError> {
    Ok(Json(
        state.repos.stories.recent_stories(StoryOwner::User).await?,
    ))
}
