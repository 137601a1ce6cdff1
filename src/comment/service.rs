use std::sync::Arc;

use chrono::Utc;

use crate::board::access;
use crate::core::error::{AppError, AppResult};
use crate::core::types::{Comment, CommentForm, User};
use crate::storage::database::Database;
use crate::storage::{parse_timestamp, parse_uuid};

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    board_id: i64,
    writer_id: String,
    writer_name: String,
    body: String,
    created_at: String,
}

impl CommentRow {
    fn into_comment(self) -> AppResult<Comment> {
        Ok(Comment {
            id: self.id,
            board_id: self.board_id,
            writer: parse_uuid(&self.writer_id)?,
            writer_name: self.writer_name,
            body: self.body,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

pub struct CommentService {
    db: Arc<Database>,
}

impl CommentService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Attach a comment to a post. Any authenticated user may comment.
    pub async fn create(
        &self,
        board_id: i64,
        form: &CommentForm,
        caller: Option<&User>,
    ) -> AppResult<i64> {
        access::read(caller).require()?;
        let user = caller.ok_or(AppError::Unauthenticated)?;

        let body = form.validate().map_err(AppError::Validation)?;

        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM boards WHERE id = ?")
            .bind(board_id)
            .fetch_optional(self.db.pool())
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!("No post with id {}", board_id)));
        }

        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (board_id, writer_id, body, created_at) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(board_id)
        .bind(user.id.to_string())
        .bind(&body)
        .bind(now.to_rfc3339())
        .fetch_one(self.db.pool())
        .await?;

        Ok(id)
    }

    /// Comments of one post, newest first. Insertion order breaks timestamp
    /// ties.
    pub async fn list_for_board(&self, board_id: i64) -> AppResult<Vec<Comment>> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            "SELECT c.id, c.board_id, c.writer_id, u.username AS writer_name, \
             c.body, c.created_at \
             FROM comments c JOIN users u ON c.writer_id = u.id \
             WHERE c.board_id = ? \
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(board_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(CommentRow::into_comment).collect()
    }
}
