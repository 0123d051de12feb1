//! Domain model for tasks and their audit trail.
//!
//! # Responsibility
//! - Define canonical records used by core business logic.
//! - Keep the task diff shape (`ChangedFields`) next to the records it
//!   describes.
//!
//! # Invariants
//! - Every task and audit entry is identified by a stable UUID.
//! - Tasks are hard-deleted; audit entries keep a weak `task_id` reference.

pub mod audit;
pub mod task;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clamps to `0` if the system clock is set before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
