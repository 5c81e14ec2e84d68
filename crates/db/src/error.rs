/// Errors raised by a [`CustomerStore`](crate::store::CustomerStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Another customer already uses this email.
    #[error("A customer with email {0} already exists")]
    DuplicateEmail(String),
}
