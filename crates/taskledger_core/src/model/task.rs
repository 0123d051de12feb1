//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its stable identifier.
//! - Expose the persisted-state validity check used by repositories.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - A persisted task always passes `Task::validate()`.

use crate::model::now_epoch_ms;
use crate::validation::validate_task;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    /// Sanitized title, 1-100 characters.
    pub title: String,
    /// Sanitized description, 1-500 characters.
    pub description: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Creates a task with a generated id and the current timestamp.
    ///
    /// Callers are expected to pass already-sanitized text.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, description, now_epoch_ms())
    }

    /// Creates a task with caller-provided identity and creation time.
    ///
    /// Used by storage read paths. Does not validate.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            created_at,
        }
    }

    /// Checks the required/length constraints on the stored fields.
    ///
    /// # Errors
    /// - Returns every violated rule, title first.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        let outcome = validate_task(Some(&self.title), Some(&self.description));
        if outcome.valid {
            Ok(())
        } else {
            Err(TaskValidationError {
                errors: outcome.errors,
            })
        }
    }
}

/// Task field constraint violations, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskValidationError {
    pub errors: Vec<String>,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid task: {}", self.errors.join("; "))
    }
}

impl Error for TaskValidationError {}

#[cfg(test)]
mod tests {
    use super::Task;

    #[test]
    fn new_task_gets_unique_ids() {
        let first = Task::new("a", "b");
        let second = Task::new("a", "b");
        assert_ne!(first.id, second.id);
        assert!(first.created_at > 0);
    }

    #[test]
    fn validate_reports_both_fields_in_order() {
        let task = Task::new("", "x".repeat(501));
        let err = task.validate().unwrap_err();
        assert_eq!(
            err.errors,
            vec![
                "Title is required".to_string(),
                "Description must not exceed 500 characters".to_string(),
            ]
        );
    }

    #[test]
    fn serializes_with_client_facing_keys() {
        let task = Task::new("Title", "Body");
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["_id"], task.id.to_string());
        assert!(json.get("id").is_none());
        assert_eq!(json["title"], "Title");
        assert!(json["createdAt"].is_i64());
        assert!(json.get("created_at").is_none());
    }
}
