use thiserror::Error;

/// Every failure a news operation can report to its caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NewsError {
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Limit query must be a positive number, got: {0}")]
    InvalidLimit(String),

    #[error("Page query must be a positive number, got: {0}")]
    InvalidPage(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Unknown sort column: {0}")]
    UnknownSortColumn(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for field: {0}")]
    InvalidField(String),

    #[error("Article not found")]
    ArticleNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Topic not found")]
    TopicNotFound,

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// The coarse family of a `NewsError`, used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BadRequest,
    NotFound,
    Internal,
}

impl NewsError {
    pub fn class(&self) -> ErrorClass {
        match self {
            NewsError::InvalidId(_)
            | NewsError::InvalidLimit(_)
            | NewsError::InvalidPage(_)
            | NewsError::InvalidOrder(_)
            | NewsError::MissingField(_)
            | NewsError::InvalidField(_) => ErrorClass::BadRequest,

            // An unknown sort column is reported as a missing resource, not a bad request.
            NewsError::UnknownSortColumn(_)
            | NewsError::ArticleNotFound
            | NewsError::CommentNotFound
            | NewsError::UserNotFound
            | NewsError::TopicNotFound => ErrorClass::NotFound,

            NewsError::InternalError(_) => ErrorClass::Internal,
        }
    }
}
