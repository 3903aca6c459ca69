//! Classification of raw `sqlx` errors into domain-relevant categories.
//!
//! SQLite reports constraint failures through the database error message;
//! we inspect the error kind (and fall back to the message text) so the
//! HTTP layer can map them to sensible status codes.

use sqlx::error::ErrorKind;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated: {message}")]
    UniqueViolation { message: String },

    #[error("foreign key constraint violated: {message}")]
    ForeignKeyViolation { message: String },

    #[error("check constraint violated: {message}")]
    CheckViolation { message: String },

    #[error(transparent)]
    Other(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation { message },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation => DbError::CheckViolation { message },
                    _ => DbError::Other(err),
                }
            }
            _ => DbError::Other(err),
        }
    }
}
