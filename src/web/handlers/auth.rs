use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::core::app::AppState;
use crate::core::error::{AppError, AppResult};
use crate::core::types::{CreateUserRequest, LoginRequest};
use crate::web::handlers::render;
use crate::web::middleware::SESSION_COOKIE;
use crate::web::routes::LOGIN_PATH;

#[derive(Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build()
}

/// Only same-site continuation targets survive the login round-trip.
fn safe_next(next: Option<String>) -> String {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//"))
        .unwrap_or_else(|| "/boards".to_string())
}

pub async fn login_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NextQuery>,
) -> AppResult<Response> {
    Ok(render(&state, "login", &json!({ "next": query.next }))?.into_response())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let request = LoginRequest {
        username: form.username.clone(),
        password: form.password,
    };

    match state.auth_service.login(request).await {
        Ok((_user, session)) => {
            let jar = jar.add(session_cookie(session.token));
            Ok((jar, Redirect::to(&safe_next(form.next))).into_response())
        }
        Err(AppError::Auth(message)) => Ok(render(
            &state,
            "login",
            &json!({
                "error": message,
                "username": form.username,
                "next": form.next,
            }),
        )?
        .into_response()),
        Err(e) => Err(e),
    }
}

pub async fn register_form(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    Ok(render(&state, "register", &json!({}))?.into_response())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let email = Some(form.email.trim().to_string()).filter(|e| !e.is_empty());
    let request = CreateUserRequest {
        username: form.username.clone(),
        email,
        password: form.password,
    };

    match state.auth_service.register(request).await {
        Ok(user) => {
            // New accounts go straight to a logged-in session
            let session = state.auth_service.create_session(user.id).await?;
            let jar = jar.add(session_cookie(session.token));
            Ok((jar, Redirect::to("/boards")).into_response())
        }
        Err(AppError::Auth(message)) => Ok(render(
            &state,
            "register",
            &json!({
                "error": message,
                "username": form.username,
            }),
        )?
        .into_response()),
        Err(e) => Err(e),
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.auth_service.logout(cookie.value()).await?;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Redirect::to(LOGIN_PATH)).into_response())
}
