use sqlx::postgres::PgDatabaseError;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database request failed: {0}")]
    QueryError(sqlx::Error),

    #[error("Storage rejected the statement ({code}): {message}")]
    Storage {
        code: StorageErrorCode,
        constraint: Option<String>,
        column: Option<String>,
        message: String,
    },

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Column `{column}` has unsupported type {type_name}")]
    UnsupportedColumn { column: String, type_name: String },
}

/// The vendor error codes this layer knows how to reclassify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageErrorCode {
    NotNullViolation,
    InvalidTextRepresentation,
    ForeignKeyViolation,
    NumericValueOutOfRange,
    Other(String),
}

impl StorageErrorCode {
    pub fn from_sqlstate(code: &str) -> Self {
        match code {
            "23502" => StorageErrorCode::NotNullViolation,
            "22P02" => StorageErrorCode::InvalidTextRepresentation,
            "23503" => StorageErrorCode::ForeignKeyViolation,
            "22003" => StorageErrorCode::NumericValueOutOfRange,
            other => StorageErrorCode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageErrorCode::NotNullViolation => f.write_str("not-null-violation"),
            StorageErrorCode::InvalidTextRepresentation => {
                f.write_str("invalid-text-representation")
            }
            StorageErrorCode::ForeignKeyViolation => f.write_str("foreign-key-violation"),
            StorageErrorCode::NumericValueOutOfRange => f.write_str("numeric-value-out-of-range"),
            StorageErrorCode::Other(code) => write!(f, "sqlstate {code}"),
        }
    }
}

/// Database errors keep their SQLSTATE and constraint so they can be classified later.
/// Everything else (pool, I/O, protocol) stays opaque.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let code = db_err
                    .code()
                    .map(|c| StorageErrorCode::from_sqlstate(&c))
                    .unwrap_or_else(|| StorageErrorCode::Other("unknown".to_string()));
                let column = db_err
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(|pg| pg.column())
                    .map(str::to_owned);
                DbError::Storage {
                    code,
                    constraint: db_err.constraint().map(str::to_owned),
                    column,
                    message: db_err.message().to_owned(),
                }
            }
            _ => DbError::QueryError(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sqlstates_map_to_named_codes() {
        assert_eq!(StorageErrorCode::from_sqlstate("23502"), StorageErrorCode::NotNullViolation);
        assert_eq!(
            StorageErrorCode::from_sqlstate("22P02"),
            StorageErrorCode::InvalidTextRepresentation
        );
        assert_eq!(StorageErrorCode::from_sqlstate("23503"), StorageErrorCode::ForeignKeyViolation);
        assert_eq!(
            StorageErrorCode::from_sqlstate("22003"),
            StorageErrorCode::NumericValueOutOfRange
        );
        assert_eq!(
            StorageErrorCode::from_sqlstate("23505"),
            StorageErrorCode::Other("23505".into())
        );
    }

    #[test]
    fn non_database_errors_stay_opaque() {
        assert!(matches!(DbError::from(sqlx::Error::PoolTimedOut), DbError::QueryError(_)));
    }
}
