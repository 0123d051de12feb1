//! Core domain logic for TaskLedger.
//! This crate is the single source of truth for task and audit invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod repo;
pub mod service;
pub mod validation;

pub use auth::{CredentialConfigError, CredentialVerifier, StaticCredentials};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::audit::{AuditAction, AuditEntryId, AuditLogEntry, ChangedFields, NewAuditEntry};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use pagination::{Page, PageRequest};
pub use repo::audit_repo::{AuditLogRepository, SqliteAuditLogRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::audit_service::AuditLogService;
pub use service::task_service::{TaskInput, TaskService, TaskServiceError, TaskServiceResult};
pub use validation::{sanitize_input, validate_task, TaskValidation};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
