/// Identifier assigned to each simulation run. UUID v7, so runs sort by start time.
pub type RunId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Allocate a fresh [`RunId`].
pub fn new_run_id() -> RunId {
    uuid::Uuid::now_v7()
}
