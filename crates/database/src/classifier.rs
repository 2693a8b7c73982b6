//! Maps storage outcomes onto the `NewsError` taxonomy.

use crate::error::{DbError, StorageErrorCode};
use crate::executor::Row;
use core_types::NewsError;

/// Reclassifies a failed statement.
///
/// Foreign-key failures are resolved by constraint name; one that cannot be
/// attributed is reported against the article.
pub fn classify(err: DbError) -> NewsError {
    match err {
        DbError::Storage {
            code: StorageErrorCode::NotNullViolation,
            column,
            ..
        } => NewsError::MissingField(column.unwrap_or_else(|| "unknown".to_string())),
        DbError::Storage {
            code: StorageErrorCode::InvalidTextRepresentation,
            column,
            ..
        } => NewsError::InvalidField(column.unwrap_or_else(|| "input".to_string())),
        DbError::Storage {
            code: StorageErrorCode::ForeignKeyViolation,
            constraint,
            ..
        } => missing_reference(constraint.as_deref()),
        // Vote increments are the only arithmetic done on stored integers.
        DbError::Storage {
            code: StorageErrorCode::NumericValueOutOfRange,
            column,
            ..
        } => NewsError::InvalidField(column.unwrap_or_else(|| "inc_votes".to_string())),
        other => {
            tracing::error!(error = %other, "Unclassified database failure.");
            NewsError::InternalError(other.to_string())
        }
    }
}

fn missing_reference(constraint: Option<&str>) -> NewsError {
    match constraint {
        Some(name) if name.ends_with("author_fkey") => NewsError::UserNotFound,
        Some(name) if name.ends_with("topic_fkey") => NewsError::TopicNotFound,
        _ => NewsError::ArticleNotFound,
    }
}

/// Resolves a lookup that must yield exactly one row.
///
/// A storage failure is classified first; a successful but empty result is
/// then reported as `not_found`.
pub fn expect_row(
    result: Result<Vec<Row>, DbError>,
    not_found: NewsError,
) -> Result<Row, NewsError> {
    result
        .map_err(classify)?
        .into_iter()
        .next()
        .ok_or(not_found)
}
