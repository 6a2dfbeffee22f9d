use axum::{extract::State, middleware, routing::get, Json, Router};
use serde::Serialize;
use tourbook_core::models::{StoryOwner, CLIENT_ROLE, GUIDE_ROLE};

use crate::{
    error::AppError,
    middleware::{require_admin, verify_identity},
    state::AppState,
};

/// Admin-only routes. Layers run outermost first, so identity is verified
/// before the admin policy is checked.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(dashboard_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state, verify_identity))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_payments: f64,
    pub total_tour_guides: u64,
    pub total_packages: u64,
    pub total_clients: u64,
    pub total_stories: u64,
}

async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let repos = &state.repos;
    let (total_payments, total_tour_guides, total_packages, total_clients, user_stories, guide_stories) =
        tokio::try_join!(
            repos.payments.total_payments(),
            repos.guides.count_guides_with_role(GUIDE_ROLE),
            repos.packages.count_packages(),
            repos.users.count_users_with_role(CLIENT_ROLE),
            repos.stories.count_stories(StoryOwner::User),
            repos.stories.count_stories(StoryOwner::Guide),
        )?;

    Ok(Json(DashboardStats {
        total_payments,
        total_tour_guides,
        total_packages,
        total_clients,
        total_stories: user_stories + guide_stories,
    }))
}
