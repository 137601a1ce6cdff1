use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use crate::core::app::AppState;

/// Name of the cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "session";

/// Resolve the session cookie to a `User` extension, or redirect to the
/// configured login entry point with the original path in `next`.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());

    if let Some(token) = token {
        if let Ok(user) = state.auth_service.validate_session(&token).await {
            request.extensions_mut().insert(user);
            return next.run(request).await;
        }
    }

    let login_url = &state.config.auth.login_url;
    Redirect::to(&format!("{}?next={}", login_url, request.uri().path())).into_response()
}
