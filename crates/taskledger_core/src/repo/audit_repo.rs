//! Append-only audit log repository.
//!
//! # Invariants
//! - No update or delete path exists for stored entries.
//! - List order is `timestamp DESC`, newest insertion first on ties.
//! - `changed_fields` is stored as a JSON object, or NULL.

use crate::model::audit::{AuditAction, AuditEntryId, AuditLogEntry, ChangedFields};
use crate::repo::{count_to_u64, offset_to_i64, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Storage contract for audit entries.
pub trait AuditLogRepository {
    fn append_entry(&self, entry: &AuditLogEntry) -> RepoResult<AuditEntryId>;
    fn list_entries(&self, limit: u32, offset: u64) -> RepoResult<Vec<AuditLogEntry>>;
    fn count_entries(&self) -> RepoResult<u64>;
}

/// SQLite-backed audit log repository.
pub struct SqliteAuditLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuditLogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AuditLogRepository for SqliteAuditLogRepository<'_> {
    fn append_entry(&self, entry: &AuditLogEntry) -> RepoResult<AuditEntryId> {
        let changed_fields = entry
            .changed_fields
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|err| RepoError::InvalidData(format!("unencodable changed_fields: {err}")))?;

        self.conn.execute(
            "INSERT INTO audit_logs (id, timestamp, action, task_id, changed_fields, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                entry.id.to_string(),
                entry.timestamp,
                entry.action.as_str(),
                entry.task_id.to_string(),
                changed_fields,
                entry.notes.as_deref(),
            ],
        )?;

        Ok(entry.id)
    }

    fn list_entries(&self, limit: u32, offset: u64) -> RepoResult<Vec<AuditLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, action, task_id, changed_fields, notes
             FROM audit_logs
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?1 OFFSET ?2;",
        )?;
        let mut rows = stmt.query(params![i64::from(limit), offset_to_i64(offset)?])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn count_entries(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM audit_logs;", [], |row| row.get(0))?;
        count_to_u64(count, "audit_logs")
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<AuditLogEntry> {
    let id_text: String = row.get("id")?;
    let task_id_text: String = row.get("task_id")?;

    let action_text: String = row.get("action")?;
    let action = AuditAction::parse(&action_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid action `{action_text}` in audit_logs.action"))
    })?;

    let changed_fields = match row.get::<_, Option<String>>("changed_fields")? {
        Some(json) => Some(serde_json::from_str::<ChangedFields>(&json).map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid changed_fields for audit entry {id_text}: {err}"
            ))
        })?),
        None => None,
    };

    Ok(AuditLogEntry {
        id: parse_uuid(&id_text, "audit_logs.id")?,
        timestamp: row.get("timestamp")?,
        action,
        task_id: parse_uuid(&task_id_text, "audit_logs.task_id")?,
        changed_fields,
        notes: row.get("notes")?,
    })
}
