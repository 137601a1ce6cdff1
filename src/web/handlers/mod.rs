pub mod auth;
pub mod board;
pub mod comment;

use axum::response::Html;
use serde_json::Value;

use crate::core::app::AppState;
use crate::core::error::AppResult;

pub(crate) fn render(state: &AppState, name: &str, data: &Value) -> AppResult<Html<String>> {
    Ok(Html(state.templates.render(name, data)?))
}
