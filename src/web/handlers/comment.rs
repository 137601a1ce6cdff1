use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde_json::json;
use std::sync::Arc;

use crate::core::app::AppState;
use crate::core::error::{AppError, AppResult};
use crate::core::types::{CommentForm, User};
use crate::web::handlers::render;

pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    match state.comment_service.create(id, &form, Some(&user)).await {
        Ok(_) => Ok(Redirect::to(&format!("/boards/{}", id)).into_response()),
        Err(AppError::Validation(errors)) => {
            // Redisplay the detail page with the rejected comment input
            let detail = state.board_service.get_detail(id, Some(&user)).await?;
            let is_owner = detail.board.writer == user.id;

            Ok(render(
                &state,
                "board_detail",
                &json!({
                    "user": user,
                    "detail": detail,
                    "is_owner": is_owner,
                    "comment_errors": errors,
                    "comment_body": form.body,
                }),
            )?
            .into_response())
        }
        Err(e) => Err(e),
    }
}
