use crate::core::error::{AppError, AppResult};
use crate::core::types::{Board, User};

/// Outcome of an access check. Checks run at the top of every service
/// operation, before any read or mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    Unauthenticated,
}

impl Decision {
    pub fn require(self) -> AppResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AppError::Forbidden(
                "Only the writer may modify this post".to_string(),
            )),
            Decision::Unauthenticated => Err(AppError::Unauthenticated),
        }
    }
}

/// Any authenticated user may read, list, create posts and comment.
pub fn read(caller: Option<&User>) -> Decision {
    match caller {
        Some(_) => Decision::Allow,
        None => Decision::Unauthenticated,
    }
}

/// Update and delete are reserved for the board's writer. The same rule
/// covers the form-display and form-submission paths.
pub fn owner(caller: Option<&User>, board: &Board) -> Decision {
    match caller {
        Some(user) if user.id == board.writer => Decision::Allow,
        Some(_) => Decision::Deny,
        None => Decision::Unauthenticated,
    }
}
