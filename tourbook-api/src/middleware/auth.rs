use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use tourbook_core::identity::Identity;
use tourbook_shared::Masked;
use tracing::{debug, warn};

use crate::{error::AppError, state::AppState};

pub const UNAUTHORIZED: &str = "unauthorized access";
pub const FORBIDDEN: &str = "forbidden access";
pub const ADMIN_REQUIRED: &str = "Forbidden: admin access required";

/// Verifies the bearer token on every request and attaches the decoded
/// [`Identity`] to the request extensions.
pub async fn verify_identity(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.map_err(|_| AppError::Unauthorized(UNAUTHORIZED.to_string()))?;

    let identity = state.verifier.verify(bearer.token()).await.map_err(|err| {
        debug!("Token verification failed: {}", err);
        AppError::Forbidden(FORBIDDEN.to_string())
    })?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Must run after [`verify_identity`].
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .ok_or_else(|| AppError::Unauthorized(UNAUTHORIZED.to_string()))?;

    if !state.admin_policy.permits(identity) {
        let email = identity.email.clone().unwrap_or_default();
        warn!(subject = %identity.subject, email = %Masked(email), "Admin access denied");
        return Err(AppError::Forbidden(ADMIN_REQUIRED.to_string()));
    }

    Ok(next.run(req).await)
}
