use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Post category. Every board row carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardType {
    General,
    Notice,
    Contest,
    Kquestion,
    Tutoring,
    Dsum,
}

impl BoardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardType::General => "general",
            BoardType::Notice => "notice",
            BoardType::Contest => "contest",
            BoardType::Kquestion => "kquestion",
            BoardType::Tutoring => "tutoring",
            BoardType::Dsum => "dsum",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "general" => Some(BoardType::General),
            "notice" => Some(BoardType::Notice),
            "contest" => Some(BoardType::Contest),
            "kquestion" => Some(BoardType::Kquestion),
            "tutoring" => Some(BoardType::Tutoring),
            "dsum" => Some(BoardType::Dsum),
            _ => None,
        }
    }

    pub fn all() -> &'static [BoardType] {
        &[
            BoardType::General,
            BoardType::Notice,
            BoardType::Contest,
            BoardType::Kquestion,
            BoardType::Tutoring,
            BoardType::Dsum,
        ]
    }
}

impl std::fmt::Display for BoardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Templates show timestamps as-is, so serialize them human-readable.
fn display_timestamp<S: serde::Serializer>(
    dt: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&dt.format("%Y-%m-%d %H:%M").to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub id: i64,
    pub writer: Uuid,
    pub writer_name: String,
    pub board_type: BoardType,
    pub title: String,
    pub body: String,
    #[serde(serialize_with = "display_timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    pub board_id: i64,
    pub writer: Uuid,
    pub writer_name: String,
    pub body: String,
    #[serde(serialize_with = "display_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A board together with its comments, newest comment first.
#[derive(Debug, Clone, Serialize)]
pub struct BoardDetail {
    pub board: Board,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// One validation failure, addressed to a form field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw create/update form input. The writer never appears here: it is taken
/// from the authenticated caller, not the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, rename = "type")]
    pub board_type: String,
}

/// A `BoardForm` that passed validation.
#[derive(Debug, Clone)]
pub struct BoardFields {
    pub title: String,
    pub body: String,
    pub board_type: BoardType,
}

impl BoardForm {
    pub fn validate(&self) -> Result<BoardFields, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }

        let body = self.body.trim();
        if body.is_empty() {
            errors.push(FieldError::new("body", "Body is required"));
        }

        let board_type = match BoardType::parse(self.board_type.trim()) {
            Some(t) => Some(t),
            None => {
                errors.push(FieldError::new("type", "Unknown post type"));
                None
            }
        };

        match board_type {
            Some(board_type) if errors.is_empty() => Ok(BoardFields {
                title: title.to_string(),
                body: body.to_string(),
                board_type,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub body: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<String, Vec<FieldError>> {
        let body = self.body.trim();
        if body.is_empty() {
            return Err(vec![FieldError::new("body", "Comment body is required")]);
        }
        Ok(body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_type_round_trips() {
        for t in BoardType::all() {
            assert_eq!(BoardType::parse(t.as_str()), Some(*t));
        }
    }

    #[test]
    fn board_type_rejects_unknown() {
        assert_eq!(BoardType::parse("free"), None);
        assert_eq!(BoardType::parse(""), None);
        assert_eq!(BoardType::parse("Notice"), None);
    }

    #[test]
    fn board_form_valid_input_is_trimmed() {
        let form = BoardForm {
            title: "  hello ".to_string(),
            body: " world\n".to_string(),
            board_type: "notice".to_string(),
        };
        let fields = form.validate().unwrap();
        assert_eq!(fields.title, "hello");
        assert_eq!(fields.body, "world");
        assert_eq!(fields.board_type, BoardType::Notice);
    }

    #[test]
    fn board_form_collects_field_errors() {
        let form = BoardForm {
            title: "   ".to_string(),
            body: String::new(),
            board_type: "unknown".to_string(),
        };
        let errors = form.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "body", "type"]);
    }

    #[test]
    fn comment_form_rejects_blank_body() {
        let form = CommentForm {
            body: "  ".to_string(),
        };
        assert!(form.validate().is_err());
        let form = CommentForm {
            body: "nice post".to_string(),
        };
        assert_eq!(form.validate().unwrap(), "nice post");
    }
}
