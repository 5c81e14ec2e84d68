use crate::api::ApiError;
use crate::model::FormErrors;

/// Errors surfaced by the client controller.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The form failed client-side checks; nothing was sent.
    #[error("Invalid form: {0}")]
    InvalidForm(FormErrors),

    /// A request for the same control is already in flight.
    #[error("A request is already in progress")]
    Busy,

    /// Submit was requested with no create/edit form open.
    #[error("No customer form is open")]
    EditorClosed,

    /// Confirm-delete was requested with no delete dialog open.
    #[error("No customer is selected for deletion")]
    NoDeleteTarget,

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type ClientResult<T> = Result<T, ClientError>;
