//! Field rules for tasks and todos.

use crate::error::{StoreError, StoreResult};
use crate::types::{NewTodo, TodoUpdate};

/// Maximum todo title length, in characters.
pub const TODO_TITLE_MAX_CHARS: usize = 200;

/// Maximum todo description length, in characters.
pub const TODO_DESCRIPTION_MAX_CHARS: usize = 2000;

/// Trim a task title, rejecting empty or whitespace-only input.
pub fn task_title(title: &str) -> StoreResult<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation("title", "Title is required"));
    }
    Ok(trimmed)
}

/// A todo title must hold 1 to 200 characters. Whitespace counts.
pub fn todo_title(title: &str) -> StoreResult<()> {
    let len = title.chars().count();
    if len == 0 {
        return Err(StoreError::validation("title", "Title is required"));
    }
    if len > TODO_TITLE_MAX_CHARS {
        return Err(StoreError::validation(
            "title",
            format!(
                "Title must be at most {} characters (got {})",
                TODO_TITLE_MAX_CHARS, len
            ),
        ));
    }
    Ok(())
}

pub fn todo_description(description: Option<&str>) -> StoreResult<()> {
    let Some(description) = description else {
        return Ok(());
    };
    let len = description.chars().count();
    if len > TODO_DESCRIPTION_MAX_CHARS {
        return Err(StoreError::validation(
            "description",
            format!(
                "Description must be at most {} characters (got {})",
                TODO_DESCRIPTION_MAX_CHARS, len
            ),
        ));
    }
    Ok(())
}

impl NewTodo {
    pub fn validate(&self) -> StoreResult<()> {
        todo_title(&self.title)?;
        todo_description(self.description.as_deref())
    }
}

impl TodoUpdate {
    /// Validate only the supplied fields.
    pub fn validate(&self) -> StoreResult<()> {
        if let Some(title) = &self.title {
            todo_title(title)?;
        }
        if let Some(description) = &self.description {
            todo_description(description.as_deref())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_task_title_trims() {
        assert_eq!(task_title("  Buy milk \n").unwrap(), "Buy milk");
    }

    #[test]
    fn test_task_title_rejects_blank() {
        for title in ["", "   ", "\t\n"] {
            let err = task_title(title).unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);
            assert_eq!(err.to_string(), "Title is required");
        }
    }

    #[test]
    fn test_todo_title_bounds() {
        assert!(todo_title("").is_err());
        assert!(todo_title("x").is_ok());
        assert!(todo_title(&"x".repeat(200)).is_ok());
        assert!(todo_title(&"x".repeat(201)).is_err());
        // Counted in characters, not bytes.
        assert!(todo_title(&"é".repeat(200)).is_ok());
    }

    #[test]
    fn test_todo_description_bounds() {
        assert!(todo_description(None).is_ok());
        assert!(todo_description(Some("")).is_ok());
        assert!(todo_description(Some(&"d".repeat(2000))).is_ok());
        let err = todo_description(Some(&"d".repeat(2001))).unwrap_err();
        assert_eq!(err.field(), Some("description"));
    }

    #[test]
    fn test_update_validates_supplied_fields_only() {
        assert!(TodoUpdate::default().validate().is_ok());
        assert!(TodoUpdate::default().title("").validate().is_err());
        assert!(TodoUpdate::default().description(None).validate().is_ok());
    }
}
