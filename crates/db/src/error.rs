//! Mapping of driver errors into [`AppError`].

use hornero_shared::{AppError, AppResult};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};

/// Server error code of a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// Converts driver results into [`AppResult`].
pub trait MongoResultExt<T> {
    /// Maps a driver error to `AppError::Database`, naming the failed operation.
    fn or_db(self, operation: &str) -> AppResult<T>;
}

impl<T> MongoResultExt<T> for Result<T, MongoError> {
    fn or_db(self, operation: &str) -> AppResult<T> {
        self.map_err(|e| {
            tracing::error!(operation, error = %e, "MongoDB operation failed");
            AppError::Database(format!("{operation}: {e}"))
        })
    }
}

/// Whether an insert failed on a unique index.
#[must_use]
pub fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

/// Maps a stored value that no longer parses.
pub(crate) fn corrupt(field: &str, value: &str, reason: impl std::fmt::Display) -> AppError {
    AppError::Database(format!("stored {field} {value:?} is invalid: {reason}"))
}
