//! Task use-case service.
//!
//! # Responsibility
//! - Sanitize, then validate, incoming task fields.
//! - Pair every successful task mutation with exactly one audit entry.
//!
//! # Invariants
//! - Sanitization always runs before validation, at create and update.
//! - Updates record only fields whose sanitized value differs from the
//!   stored one; a no-op update is saved but appends nothing.
//! - Each mutation and its audit append run inside the task repository's
//!   write scope. With SQLite repositories sharing one connection the two
//!   writes commit together; other stores may apply them separately.

use crate::model::audit::{AuditAction, ChangedFields, NewAuditEntry};
use crate::model::task::{Task, TaskId};
use crate::pagination::{Page, PageRequest};
use crate::repo::audit_repo::AuditLogRepository;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::RepoError;
use crate::service::audit_service::AuditLogService;
use crate::validation::{sanitize_optional, validate_task};
use log::info;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Caller-fixable field problems, in rule order.
    Validation(Vec<String>),
    /// The id does not reference an existing task.
    NotFound(TaskId),
    /// Persistence failure. Never retried here.
    Store(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "validation failed: {}", errors.join("; ")),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err.errors),
            other => Self::Store(other),
        }
    }
}

/// Raw title/description as supplied by a caller.
///
/// `None` means the field was absent from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TaskInput {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }
}

/// Task service facade over task and audit repositories.
pub struct TaskService<R: TaskRepository, L: AuditLogRepository> {
    tasks: R,
    audit: AuditLogService<L>,
}

impl<R: TaskRepository, L: AuditLogRepository> TaskService<R, L> {
    pub fn new(tasks: R, audit: L) -> Self {
        Self {
            tasks,
            audit: AuditLogService::new(audit),
        }
    }

    /// Lists tasks newest first, optionally filtered by a search term.
    ///
    /// The term is trimmed before the substring match, so `" bug"` matches
    /// like `"bug"` and a blank term lists everything.
    pub fn list(&self, request: PageRequest, search: Option<&str>) -> TaskServiceResult<Page<Task>> {
        let search = search.map(str::trim).filter(|term| !term.is_empty());
        let total = self.tasks.count_tasks(search)?;
        let items = self.tasks.list_tasks(&TaskListQuery {
            search: search.map(str::to_string),
            limit: Some(request.limit()),
            offset: request.offset(),
        })?;
        Ok(request.into_page(items, total))
    }

    /// Gets one task by id.
    pub fn get(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .get_task(id)?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Creates a task and records a `Create` entry holding both fields.
    pub fn create(&self, input: &TaskInput) -> TaskServiceResult<Task> {
        let (title, description) = prepare_fields(input)?;
        let task = Task::new(title, description);

        self.tasks.write_scope(|| -> TaskServiceResult<()> {
            self.tasks.create_task(&task)?;
            self.audit.append(NewAuditEntry::new(
                AuditAction::Create,
                task.id,
                Some(ChangedFields::all_of(&task)),
            ))?;
            Ok(())
        })?;

        info!("event=task_create module=service status=ok task_id={}", task.id);
        Ok(task)
    }

    /// Applies new field values and records an `Update` entry with the diff.
    ///
    /// # Errors
    /// - `Validation` is checked before the task is looked up.
    /// - `NotFound` when `id` is absent or already deleted.
    pub fn update(&self, id: TaskId, input: &TaskInput) -> TaskServiceResult<Task> {
        let (title, description) = prepare_fields(input)?;

        let (task, changes) = self
            .tasks
            .write_scope(|| -> TaskServiceResult<(Task, ChangedFields)> {
                let mut task = self
                    .tasks
                    .get_task(id)?
                    .ok_or(TaskServiceError::NotFound(id))?;
                let changes = ChangedFields::between(&task, &title, &description);
                changes.apply_to(&mut task);
                self.tasks.update_task(&task)?;

                if !changes.is_empty() {
                    self.audit.append(NewAuditEntry::new(
                        AuditAction::Update,
                        id,
                        Some(changes.clone()),
                    ))?;
                }
                Ok((task, changes))
            })?;

        info!(
            "event=task_update module=service status=ok task_id={} changed=[{}]",
            id,
            changes.field_names().join(",")
        );
        Ok(task)
    }

    /// Removes a task and records a `Delete` entry without a diff.
    pub fn delete(&self, id: TaskId) -> TaskServiceResult<()> {
        self.tasks.write_scope(|| -> TaskServiceResult<()> {
            self.tasks.delete_task(id)?;
            self.audit
                .append(NewAuditEntry::new(AuditAction::Delete, id, None))?;
            Ok(())
        })?;

        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }
}

/// Sanitizes both fields, then validates what would be stored.
fn prepare_fields(input: &TaskInput) -> TaskServiceResult<(String, String)> {
    let title = sanitize_optional(input.title.as_deref());
    let description = sanitize_optional(input.description.as_deref());
    let outcome = validate_task(title.as_deref(), description.as_deref());

    match (title, description) {
        (Some(title), Some(description)) if outcome.valid => Ok((title, description)),
        _ => Err(TaskServiceError::Validation(outcome.errors)),
    }
}
