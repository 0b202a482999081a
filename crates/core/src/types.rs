/// All primary keys are server-generated UUIDs, never caller-supplied.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
