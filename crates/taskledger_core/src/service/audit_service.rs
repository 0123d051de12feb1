//! Audit log use-case service.
//!
//! # Invariants
//! - Entries are only ever appended; this service has no mutation path.
//! - A missing timestamp is filled with the current time at append.

use crate::model::audit::{AuditLogEntry, NewAuditEntry};
use crate::model::now_epoch_ms;
use crate::pagination::{Page, PageRequest};
use crate::repo::audit_repo::AuditLogRepository;
use crate::repo::RepoResult;
use log::debug;
use uuid::Uuid;

/// Append/list facade over an audit log repository.
pub struct AuditLogService<L: AuditLogRepository> {
    repo: L,
}

impl<L: AuditLogRepository> AuditLogService<L> {
    pub fn new(repo: L) -> Self {
        Self { repo }
    }

    /// Stores one entry and returns it as persisted.
    pub fn append(&self, entry: NewAuditEntry) -> RepoResult<AuditLogEntry> {
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            timestamp: entry.timestamp.unwrap_or_else(now_epoch_ms),
            action: entry.action,
            task_id: entry.task_id,
            changed_fields: entry.changed_fields,
            notes: entry.notes,
        };
        self.repo.append_entry(&entry)?;
        debug!(
            "event=audit_append module=service status=ok action={} task_id={}",
            entry.action.as_str(),
            entry.task_id
        );
        Ok(entry)
    }

    /// Lists entries newest first.
    pub fn list(&self, request: PageRequest) -> RepoResult<Page<AuditLogEntry>> {
        let total = self.repo.count_entries()?;
        let items = self.repo.list_entries(request.limit(), request.offset())?;
        Ok(request.into_page(items, total))
    }
}
