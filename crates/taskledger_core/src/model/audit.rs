//! Audit log domain model.
//!
//! # Responsibility
//! - Define the append-only audit entry and its closed action set.
//! - Compute the minimal field diff recorded for task mutations.
//!
//! # Invariants
//! - `ChangedFields` only ever carries fields whose value actually changed.
//! - Delete entries carry no field diff.
//! - `task_id` is a weak reference; the task may no longer exist.

use crate::model::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an audit entry.
pub type AuditEntryId = Uuid;

/// Mutation kind recorded by an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "Create Task")]
    Create,
    #[serde(rename = "Update Task")]
    Update,
    #[serde(rename = "Delete Task")]
    Delete,
}

impl AuditAction {
    /// Storage token for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Parses a storage token produced by [`AuditAction::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// New values of the task fields touched by one mutation.
///
/// Serialized as a JSON object holding only the present fields, e.g.
/// `{"title": "New"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ChangedFields {
    /// Full field set of a freshly created task.
    pub fn all_of(task: &Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            description: Some(task.description.clone()),
        }
    }

    /// Diff between the stored task and the incoming sanitized values.
    pub fn between(stored: &Task, title: &str, description: &str) -> Self {
        Self {
            title: (stored.title != title).then(|| title.to_string()),
            description: (stored.description != description).then(|| description.to_string()),
        }
    }

    /// Returns whether no field changed.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// Names of the changed fields, in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(2);
        if self.title.is_some() {
            names.push("title");
        }
        if self.description.is_some() {
            names.push("description");
        }
        names
    }

    /// Writes the changed values into `task`, leaving other fields alone.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
    }
}

/// Immutable record of one task mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    #[serde(rename = "_id")]
    pub id: AuditEntryId,
    /// Unix epoch milliseconds at append time.
    pub timestamp: i64,
    pub action: AuditAction,
    pub task_id: TaskId,
    /// `None` for deletes.
    #[serde(rename = "updatedContent")]
    pub changed_fields: Option<ChangedFields>,
    pub notes: Option<String>,
}

/// Append request for the audit log.
///
/// `timestamp` is filled in at append time when left unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub task_id: TaskId,
    pub changed_fields: Option<ChangedFields>,
    pub notes: Option<String>,
    pub timestamp: Option<i64>,
}

impl NewAuditEntry {
    pub fn new(action: AuditAction, task_id: TaskId, changed_fields: Option<ChangedFields>) -> Self {
        Self {
            action,
            task_id,
            changed_fields,
            notes: None,
            timestamp: None,
        }
    }

    /// Attaches free-text notes. The task service never sets them; other
    /// callers of the audit log may.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
