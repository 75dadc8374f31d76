//! Core types for both phases.
//!
//! Phase 1 `Task` and Phase 2 `Todo` are separate types with
//! separate validation rules (see `validation`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A task held by the JSON-file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Status label used by the CLI.
    pub fn status_label(&self) -> &'static str {
        if self.completed { "completed" } else { "pending" }
    }
}

/// Todo priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// A todo row from the relational store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Field-wise update of a todo. Only the slots that are `Some` get applied.
///
/// `description` is doubly optional: `None` leaves it untouched while
/// `Some(None)` (an explicit JSON `null`) clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
}

impl TodoUpdate {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.is_complete.is_none()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn is_complete(mut self, is_complete: bool) -> Self {
        self.is_complete = Some(is_complete);
        self
    }
}

/// Deserialize a present field (including `null`) as `Some(..)`.
/// Absent fields fall back to `#[serde(default)]`, i.e. `None`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_new_todo_defaults() {
        let todo: NewTodo = serde_json::from_str(r#"{"title":"Write docs"}"#).unwrap();
        assert_eq!(todo.title, "Write docs");
        assert_eq!(todo.description, None);
        assert_eq!(todo.priority, Priority::Medium);
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let absent: TodoUpdate = serde_json::from_str(r#"{"priority":"high"}"#).unwrap();
        assert_eq!(absent.description, None);
        assert_eq!(absent.priority, Some(Priority::High));

        let cleared: TodoUpdate = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: TodoUpdate = serde_json::from_str(r#"{"description":"more"}"#).unwrap();
        assert_eq!(set.description, Some(Some("more".to_string())));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(TodoUpdate::default().is_empty());
        assert!(!TodoUpdate::default().is_complete(true).is_empty());
    }

    #[test]
    fn test_task_defaults_missing_fields() {
        let task: Task = serde_json::from_str(r#"{"id":4,"title":"Old"}"#).unwrap();
        assert_eq!(task.description, "");
        assert!(!task.completed);
        assert_eq!(task.status_label(), "pending");
    }
}
