//! Application-defined SQL functions.
//!
//! # Invariants
//! - Every connection returned by `open_db*` has these registered.

use super::DbResult;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// SQL name of [`casefold_contains`].
pub const CASEFOLD_CONTAINS: &str = "casefold_contains";

/// Substring test after Unicode lowercasing of both sides.
pub fn casefold_contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub(super) fn register_functions(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        CASEFOLD_CONTAINS,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get::<Option<String>>(0)?;
            let needle = ctx.get::<Option<String>>(1)?;
            Ok(match (haystack, needle) {
                (Some(haystack), Some(needle)) => casefold_contains(&haystack, &needle),
                _ => false,
            })
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{casefold_contains, register_functions};
    use rusqlite::Connection;

    #[test]
    fn folds_non_ascii_letters() {
        assert!(casefold_contains("Été planning", "été"));
        assert!(casefold_contains("Ärger im Büro", "BÜRO"));
        assert!(!casefold_contains("Sale 500 units", "50%"));
    }

    #[test]
    fn sql_function_treats_null_as_no_match() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();

        let hit: bool = conn
            .query_row("SELECT casefold_contains('ÄRGER', 'ärger');", [], |row| {
                row.get(0)
            })
            .unwrap();
        let null: bool = conn
            .query_row("SELECT casefold_contains(NULL, 'x');", [], |row| row.get(0))
            .unwrap();
        assert!(hit);
        assert!(!null);
    }
}
