use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::board::service::page_number;
use crate::core::app::AppState;
use crate::core::error::{AppError, AppResult};
use crate::core::types::{Board, BoardForm, BoardType, FieldError, User};
use crate::web::handlers::render;

#[derive(Deserialize)]
pub struct ListQuery {
    /// Kept as a raw string: malformed values degrade to page 1 instead of
    /// rejecting the request.
    pub page: Option<String>,
}

fn type_options(selected: &str) -> Vec<Value> {
    BoardType::all()
        .iter()
        .map(|t| {
            json!({
                "value": t.as_str(),
                "selected": t.as_str() == selected,
            })
        })
        .collect()
}

async fn list_page(
    state: &AppState,
    user: &User,
    filter: Option<BoardType>,
    heading: &str,
    base_path: &str,
    query: &ListQuery,
) -> AppResult<Response> {
    let number = page_number(query.page.as_deref());
    let page = state.board_service.list(filter, number, Some(user)).await?;

    Ok(render(
        state,
        "board_list",
        &json!({
            "user": user,
            "heading": heading,
            "base_path": base_path,
            "page": page,
        }),
    )?
    .into_response())
}

pub async fn list_all(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    list_page(&state, &user, None, "All Posts", "/boards", &query).await
}

pub async fn list_notice(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    list_page(
        &state,
        &user,
        Some(BoardType::Notice),
        "Notice",
        "/boards/notice",
        &query,
    )
    .await
}

pub async fn list_contest(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    list_page(
        &state,
        &user,
        Some(BoardType::Contest),
        "Contest",
        "/boards/contest",
        &query,
    )
    .await
}

pub async fn list_kquestion(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    list_page(
        &state,
        &user,
        Some(BoardType::Kquestion),
        "K-Question",
        "/boards/kquestion",
        &query,
    )
    .await
}

pub async fn list_tutoring(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    list_page(
        &state,
        &user,
        Some(BoardType::Tutoring),
        "Tutoring",
        "/boards/tutoring",
        &query,
    )
    .await
}

pub async fn list_dsum(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    list_page(
        &state,
        &user,
        Some(BoardType::Dsum),
        "D-Sum",
        "/boards/dsum",
        &query,
    )
    .await
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let detail = state.board_service.get_detail(id, Some(&user)).await?;
    let is_owner = detail.board.writer == user.id;

    Ok(render(
        &state,
        "board_detail",
        &json!({
            "user": user,
            "detail": detail,
            "is_owner": is_owner,
        }),
    )?
    .into_response())
}

fn form_page(
    state: &AppState,
    user: &User,
    heading: &str,
    action: &str,
    form: &BoardForm,
    errors: &[FieldError],
) -> AppResult<Response> {
    Ok(render(
        state,
        "board_form",
        &json!({
            "user": user,
            "heading": heading,
            "action": action,
            "form": form,
            "types": type_options(&form.board_type),
            "errors": errors,
        }),
    )?
    .into_response())
}

pub async fn create_form(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> AppResult<Response> {
    form_page(
        &state,
        &user,
        "New Post",
        "/boards/new",
        &BoardForm::default(),
        &[],
    )
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Form(form): Form<BoardForm>,
) -> AppResult<Response> {
    match state.board_service.create(&form, Some(&user)).await {
        Ok(id) => Ok(Redirect::to(&format!("/boards/{}", id)).into_response()),
        Err(AppError::Validation(errors)) => {
            form_page(&state, &user, "New Post", "/boards/new", &form, &errors)
        }
        Err(e) => Err(e),
    }
}

fn edit_form_of(board: &Board) -> BoardForm {
    BoardForm {
        title: board.title.clone(),
        body: board.body.clone(),
        board_type: board.board_type.as_str().to_string(),
    }
}

pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let board = state.board_service.get_owned(id, Some(&user)).await?;
    form_page(
        &state,
        &user,
        "Edit Post",
        &format!("/boards/{}/edit", id),
        &edit_form_of(&board),
        &[],
    )
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Form(form): Form<BoardForm>,
) -> AppResult<Response> {
    match state.board_service.update(id, &form, Some(&user)).await {
        Ok(()) => Ok(Redirect::to(&format!("/boards/{}", id)).into_response()),
        Err(AppError::Validation(errors)) => form_page(
            &state,
            &user,
            "Edit Post",
            &format!("/boards/{}/edit", id),
            &form,
            &errors,
        ),
        Err(e) => Err(e),
    }
}

pub async fn delete_form(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let board = state.board_service.get_owned(id, Some(&user)).await?;

    Ok(render(
        &state,
        "board_delete",
        &json!({
            "user": user,
            "board": board,
        }),
    )?
    .into_response())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state.board_service.delete(id, Some(&user)).await?;
    Ok(Redirect::to("/boards").into_response())
}
