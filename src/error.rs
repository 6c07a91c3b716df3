use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classifies a failed write against the table's integrity rules so
    /// callers can tell a duplicate key from a dangling owner reference.
    pub(crate) fn for_write(err: sqlx::Error, table: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    return AppError::Constraint(format!("duplicate key in {}", table));
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return AppError::ForeignKey(format!(
                        "{} row references a missing owner",
                        table
                    ));
                }
                _ => {}
            }
        }
        AppError::Database(err)
    }

    pub fn log_and_record(&self, ctx: &str) {
        match self {
            AppError::Database(err) => {
                error!(context = %ctx, db_error = %err, "Database error");
            }
            AppError::Constraint(msg) => {
                warn!(message = %msg, context = %ctx, "Constraint violation");
            }
            AppError::ForeignKey(msg) => {
                warn!(message = %msg, context = %ctx, "Foreign key violation");
            }
            AppError::Validation(msg) => {
                warn!(message = %msg, context = %ctx, "Validation error");
            }
            AppError::Session(msg) => {
                error!(message = %msg, context = %ctx, "Session store error");
            }
            AppError::Internal(msg) => {
                error!(message = %msg, context = %ctx, "Internal error");
            }
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("Cryptography error: {}", error))
    }
}
