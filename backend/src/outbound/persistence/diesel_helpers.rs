//! Shared error mapping for the Diesel repositories.

use tracing::debug;

use crate::domain::IdValidationError;
use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Map pool errors to store connection errors.
pub fn map_pool_error(error: PoolError) -> StoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreError::connection(message)
        }
    }
}

/// Map Diesel errors to store errors.
///
/// Unique violations keep the constraint name so callers can tell an email
/// clash from an address clash.
pub fn map_diesel_error(error: diesel::result::Error) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => StoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::duplicate(info.constraint_name().unwrap_or("unknown"))
        }
        _ => StoreError::query("database error"),
    }
}

/// A stored identifier that fails validation means the table is corrupt.
pub fn map_row_error(error: IdValidationError) -> StoreError {
    StoreError::query(format!("invalid stored row: {error}"))
}

/// Convert a batch of rows, failing on the first invalid one.
pub fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = IdValidationError>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(map_row_error))
        .collect()
}
