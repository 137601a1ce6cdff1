pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod templates;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::core::error::AppError;

/// Errors that escape a handler become user-visible pages. Missing
/// authentication is a redirect to the login entry point, everything else a
/// small error page with the matching status.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, AppError::Unauthenticated) {
            return Redirect::to(routes::LOGIN_PATH).into_response();
        }

        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &self {
            AppError::Forbidden(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(_) => "The submitted form was invalid".to_string(),
            AppError::Auth(msg) => msg.clone(),
            _ => {
                tracing::error!("Request failed: {}", self);
                "Something went wrong".to_string()
            }
        };

        let page = format!(
            "<!DOCTYPE html>\n<html><head><title>{status}</title>\
             <link rel=\"stylesheet\" href=\"/static/style.css\"></head>\
             <body><main class=\"error\"><h1>{status}</h1><p>{message}</p>\
             <p><a href=\"/boards\">Back to the board</a></p></main></body></html>",
            status = status,
            message = message,
        );

        (status, Html(page)).into_response()
    }
}
