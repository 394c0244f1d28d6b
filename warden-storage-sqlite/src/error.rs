use warden_core::{Error, error::StorageError};

/// Map a sqlx error that has no domain meaning to a storage error.
///
/// A closed pool means the call was abandoned while in flight, which surfaces as cancellation
/// rather than as a database failure.
pub(crate) fn map_sqlx_err(error: sqlx::Error) -> Error {
    match error {
        sqlx::Error::PoolClosed => Error::Storage(StorageError::Cancelled),
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            Error::Storage(StorageError::Connection(error.to_string()))
        }
        other => Error::Storage(StorageError::Database(other.to_string())),
    }
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::ErrorKind;

    #[test]
    fn test_pool_closed_is_cancellation() {
        assert_eq!(map_sqlx_err(sqlx::Error::PoolClosed).kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let error = map_sqlx_err(sqlx::Error::RowNotFound);
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert!(matches!(error, Error::Storage(StorageError::Database(_))));

        let error = map_sqlx_err(sqlx::Error::PoolTimedOut);
        assert!(matches!(error, Error::Storage(StorageError::Connection(_))));
    }
}
