use rusqlite::params;
use taskledger_core::db::open_db_in_memory;
use taskledger_core::{
    AuditAction, AuditLogService, ChangedFields, NewAuditEntry, PageRequest, RepoError,
    SqliteAuditLogRepository,
};
use uuid::Uuid;

#[test]
fn append_assigns_id_and_timestamp_when_missing() {
    let conn = open_db_in_memory().unwrap();
    let service = AuditLogService::new(SqliteAuditLogRepository::new(&conn));

    let task_id = Uuid::new_v4();
    let entry = service
        .append(NewAuditEntry::new(AuditAction::Delete, task_id, None))
        .unwrap();
    assert!(entry.timestamp > 0);
    assert_eq!(entry.task_id, task_id);

    let page = service.list(PageRequest::default()).unwrap();
    assert_eq!(page.items, vec![entry]);
}

#[test]
fn append_keeps_supplied_timestamp_and_notes() {
    let conn = open_db_in_memory().unwrap();
    let service = AuditLogService::new(SqliteAuditLogRepository::new(&conn));

    let changes = ChangedFields {
        title: Some("Renamed".to_string()),
        description: None,
    };
    let entry = service
        .append(
            NewAuditEntry::new(AuditAction::Update, Uuid::new_v4(), Some(changes.clone()))
                .at(42)
                .with_notes("bulk import"),
        )
        .unwrap();

    let stored = &service.list(PageRequest::default()).unwrap().items[0];
    assert_eq!(stored.id, entry.id);
    assert_eq!(stored.timestamp, 42);
    assert_eq!(stored.notes.as_deref(), Some("bulk import"));
    assert_eq!(stored.changed_fields.as_ref(), Some(&changes));
}

#[test]
fn list_is_newest_first_and_paginated() {
    let conn = open_db_in_memory().unwrap();
    let service = AuditLogService::new(SqliteAuditLogRepository::new(&conn));
    let task_id = Uuid::new_v4();

    for timestamp in [300, 100, 200, 200] {
        service
            .append(NewAuditEntry::new(AuditAction::Update, task_id, None).at(timestamp))
            .unwrap();
    }

    let first = service.list(PageRequest::new(Some(1), Some(3))).unwrap();
    let timestamps: Vec<i64> = first.items.iter().map(|entry| entry.timestamp).collect();
    assert_eq!(timestamps, vec![300, 200, 200]);
    assert_eq!(first.total, 4);
    assert_eq!(first.total_pages, 2);

    let second = service.list(PageRequest::new(Some(2), Some(3))).unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].timestamp, 100);
}

#[test]
fn empty_log_reports_one_page() {
    let conn = open_db_in_memory().unwrap();
    let service = AuditLogService::new(SqliteAuditLogRepository::new(&conn));

    let page = service.list(PageRequest::default()).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page, 1);
}

#[test]
fn entries_outlive_their_task() {
    let conn = open_db_in_memory().unwrap();
    let service = AuditLogService::new(SqliteAuditLogRepository::new(&conn));

    // No task row exists for this id; the reference is weak.
    let orphan = Uuid::new_v4();
    service
        .append(NewAuditEntry::new(AuditAction::Delete, orphan, None))
        .unwrap();
    assert_eq!(service.list(PageRequest::default()).unwrap().items[0].task_id, orphan);
}

#[test]
fn corrupted_changed_fields_are_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO audit_logs (id, timestamp, action, task_id, changed_fields)
         VALUES (?1, 1, 'update', ?2, 'not json');",
        params![Uuid::new_v4().to_string(), Uuid::new_v4().to_string()],
    )
    .unwrap();

    let service = AuditLogService::new(SqliteAuditLogRepository::new(&conn));
    assert!(matches!(
        service.list(PageRequest::default()),
        Err(RepoError::InvalidData(_))
    ));
}
