//! Primitive aliases used in every model.

/// Primary and foreign keys (`BIGINT` / `BIGSERIAL`).
pub type DbId = i64;

/// Stored as `TIMESTAMPTZ`, always handled in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
