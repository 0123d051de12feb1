//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD plus filtered, paginated reads over the `tasks` table.
//! - Provide the write scope inside which services pair a task mutation
//!   with its audit append.
//!
//! # Invariants
//! - List order is `created_at DESC`, newest insertion first on ties.
//! - Search is a substring match on title or description after Unicode
//!   lowercasing of both sides. The term is trimmed first and carries no
//!   pattern syntax.
//! - Search needs the SQL functions registered by `crate::db::open_db*`.
//! - `update_task` never touches `created_at`.

use crate::db::functions::CASEFOLD_CONTAINS;
use crate::model::task::{Task, TaskId};
use crate::repo::{count_to_u64, offset_to_i64, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    created_at
FROM tasks";

/// Filter and window for task list reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Blank or `None` disables filtering.
    pub search: Option<String>,
    /// `None` returns every matching row.
    pub limit: Option<u32>,
    pub offset: u64,
}

/// Storage contract for tasks.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Overwrites title and description. `NotFound` when the id is absent.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    /// Hard delete. `NotFound` when the id is absent.
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn count_tasks(&self, search: Option<&str>) -> RepoResult<u64>;

    /// Runs `op` so that every write it performs commits or fails as one.
    ///
    /// The default has no boundary: writes land as `op` issues them.
    fn write_scope<T, E>(&self, op: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        op()
    }
}

/// SQLite-backed task repository.
///
/// Shares its connection with [`crate::repo::audit_repo::SqliteAuditLogRepository`]
/// when both are built over the same `Connection`, which makes
/// `write_scope` cover audit appends too.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (id, title, description, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                task.created_at,
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET title = ?1, description = ?2
             WHERE id = ?3;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        push_search_filter(&mut sql, &mut bind_values, query.search.as_deref());

        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        let offset = offset_to_i64(query.offset)?;
        match query.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                bind_values.push(Value::Integer(i64::from(limit)));
                bind_values.push(Value::Integer(offset));
            }
            None if offset > 0 => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                bind_values.push(Value::Integer(offset));
            }
            None => {}
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn count_tasks(&self, search: Option<&str>) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM tasks WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        push_search_filter(&mut sql, &mut bind_values, search);

        let count: i64 =
            self.conn
                .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        count_to_u64(count, "tasks")
    }

    fn write_scope<T, E>(&self, op: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|err| E::from(RepoError::from(err)))?;
        // Dropping `tx` on the error path rolls back.
        let value = op()?;
        tx.commit().map_err(|err| E::from(RepoError::from(err)))?;
        Ok(value)
    }
}

fn push_search_filter(sql: &mut String, bind_values: &mut Vec<Value>, search: Option<&str>) {
    let Some(term) = search.map(str::trim).filter(|term| !term.is_empty()) else {
        return;
    };
    sql.push_str(&format!(
        " AND ({CASEFOLD_CONTAINS}(title, ?1) OR {CASEFOLD_CONTAINS}(description, ?1))"
    ));
    bind_values.push(Value::Text(term.to_string()));
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let task = Task::with_id(
        parse_uuid(&id_text, "tasks.id")?,
        row.get::<_, String>("title")?,
        row.get::<_, String>("description")?,
        row.get("created_at")?,
    );
    task.validate().map_err(|err| {
        RepoError::InvalidData(format!("task {id_text} violates field rules: {err}"))
    })?;
    Ok(task)
}
