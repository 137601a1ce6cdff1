use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::board::access;
use crate::comment::service::CommentService;
use crate::core::error::{AppError, AppResult};
use crate::core::types::{Board, BoardDetail, BoardForm, BoardType, User};
use crate::storage::database::Database;
use crate::storage::{parse_timestamp, parse_uuid};

/// Listing slices the filtered set into fixed pages of this many posts.
pub const PAGE_SIZE: u32 = 4;

/// One page of a descending-id-ordered board listing. Pages are 1-indexed;
/// a page past the end is empty rather than an error.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub per_page: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev: u32,
    pub next: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u32, per_page: u32, total_items: u32) -> Self {
        let total_pages = (total_items + per_page - 1) / per_page;
        Self {
            items,
            number,
            per_page,
            total_items,
            total_pages,
            has_prev: number > 1,
            has_next: number < total_pages,
            prev: number.saturating_sub(1).max(1),
            next: (number + 1).min(total_pages.max(1)),
        }
    }
}

/// Parse a `page` query value. Absent, non-numeric and sub-1 values all
/// degrade to the first page.
pub fn page_number(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

#[derive(sqlx::FromRow)]
struct BoardRow {
    id: i64,
    writer_id: String,
    writer_name: String,
    board_type: String,
    title: String,
    body: String,
    created_at: String,
}

impl BoardRow {
    fn into_board(self) -> AppResult<Board> {
        let board_type = BoardType::parse(&self.board_type)
            .ok_or_else(|| AppError::Internal(format!("Invalid board type: {}", self.board_type)))?;
        Ok(Board {
            id: self.id,
            writer: parse_uuid(&self.writer_id)?,
            writer_name: self.writer_name,
            board_type,
            title: self.title,
            body: self.body,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

const SELECT_BOARD: &str = "SELECT b.id, b.writer_id, u.username AS writer_name, \
     b.board_type, b.title, b.body, b.created_at \
     FROM boards b JOIN users u ON b.writer_id = u.id";

pub struct BoardService {
    db: Arc<Database>,
    comments: Arc<CommentService>,
}

impl BoardService {
    pub fn new(db: Arc<Database>, comments: Arc<CommentService>) -> Self {
        Self { db, comments }
    }

    /// Create a new post. The writer is always the authenticated caller;
    /// nothing in the form can override it.
    pub async fn create(&self, form: &BoardForm, caller: Option<&User>) -> AppResult<i64> {
        access::read(caller).require()?;
        let user = caller.ok_or(AppError::Unauthenticated)?;

        let fields = form.validate().map_err(AppError::Validation)?;
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO boards (writer_id, board_type, title, body, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(user.id.to_string())
        .bind(fields.board_type.as_str())
        .bind(&fields.title)
        .bind(&fields.body)
        .bind(now.to_rfc3339())
        .fetch_one(self.db.pool())
        .await?;

        Ok(id)
    }

    /// Fetch a post by id, without any access decision attached.
    async fn get(&self, id: i64) -> AppResult<Board> {
        let row: Option<BoardRow> = sqlx::query_as(&format!("{} WHERE b.id = ?", SELECT_BOARD))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.ok_or_else(|| AppError::NotFound(format!("No post with id {}", id)))?
            .into_board()
    }

    /// Fetch a post together with its comments, newest comment first.
    pub async fn get_detail(&self, id: i64, caller: Option<&User>) -> AppResult<BoardDetail> {
        access::read(caller).require()?;

        let board = self.get(id).await?;
        let comments = self.comments.list_for_board(board.id).await?;

        Ok(BoardDetail { board, comments })
    }

    /// Fetch a post for its edit/delete forms. Owner rule applies to the
    /// form-display path as well as the submission path.
    pub async fn get_owned(&self, id: i64, caller: Option<&User>) -> AppResult<Board> {
        let board = self.get(id).await?;
        access::owner(caller, &board).require()?;
        Ok(board)
    }

    /// Update title, body and type of an owned post. The writer is immutable.
    pub async fn update(&self, id: i64, form: &BoardForm, caller: Option<&User>) -> AppResult<()> {
        let board = self.get(id).await?;
        access::owner(caller, &board).require()?;

        let fields = form.validate().map_err(AppError::Validation)?;

        sqlx::query("UPDATE boards SET title = ?, body = ?, board_type = ? WHERE id = ?")
            .bind(&fields.title)
            .bind(&fields.body)
            .bind(fields.board_type.as_str())
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Delete an owned post. Its comments go with it (schema cascade).
    pub async fn delete(&self, id: i64, caller: Option<&User>) -> AppResult<()> {
        let board = self.get(id).await?;
        access::owner(caller, &board).require()?;

        sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// List posts, newest id first, optionally restricted to one type.
    /// All six route variants funnel through here with a different filter.
    pub async fn list(
        &self,
        filter: Option<BoardType>,
        page: u32,
        caller: Option<&User>,
    ) -> AppResult<Page<Board>> {
        access::read(caller).require()?;

        let page = page.max(1);
        let offset = (page - 1) * PAGE_SIZE;

        let (total, rows): (u32, Vec<BoardRow>) = match filter {
            Some(board_type) => {
                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM boards WHERE board_type = ?")
                        .bind(board_type.as_str())
                        .fetch_one(self.db.pool())
                        .await?;
                let rows: Vec<BoardRow> = sqlx::query_as(&format!(
                    "{} WHERE b.board_type = ? ORDER BY b.id DESC LIMIT ? OFFSET ?",
                    SELECT_BOARD
                ))
                .bind(board_type.as_str())
                .bind(PAGE_SIZE as i64)
                .bind(offset as i64)
                .fetch_all(self.db.pool())
                .await?;
                (total as u32, rows)
            }
            None => {
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boards")
                    .fetch_one(self.db.pool())
                    .await?;
                let rows: Vec<BoardRow> = sqlx::query_as(&format!(
                    "{} ORDER BY b.id DESC LIMIT ? OFFSET ?",
                    SELECT_BOARD
                ))
                .bind(PAGE_SIZE as i64)
                .bind(offset as i64)
                .fetch_all(self.db.pool())
                .await?;
                (total as u32, rows)
            }
        };

        let items = rows
            .into_iter()
            .map(BoardRow::into_board)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(items, page, PAGE_SIZE, total))
    }
}
