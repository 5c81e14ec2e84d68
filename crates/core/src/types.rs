/// Record identifier: `customers.id` (BIGSERIAL) and the `{id}` path segment.
pub type DbId = i64;

/// Server-assigned timestamps, stored as TIMESTAMPTZ and sent as RFC 3339.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
