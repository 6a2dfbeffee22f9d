use axum::{http::Method, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod applications;
pub mod assigned_tours;
pub mod bookings;
pub mod error;
pub mod guides;
pub mod middleware;
pub mod packages;
pub mod payments;
pub mod profiles;
pub mod state;
pub mod stories;
pub mod users;

pub use state::{AppState, PaymentSettings};

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .route("/", get(|| async { "Server is running" }))
        .merge(packages::routes())
        .merge(applications::routes())
        .merge(guides::routes())
        .merge(stories::routes())
        .merge(bookings::routes())
        .merge(users::routes())
        .merge(profiles::routes())
        .merge(assigned_tours::routes())
        .merge(payments::routes())
        .merge(admin::routes(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
