//! Column decoding and error mapping shared by the MySQL repositories

use sqlx::mysql::MySqlRow;
use sqlx::{Decode, MySql, Row, Type};
use uuid::Uuid;

use tg_core::errors::{DomainError, RepositoryError};

/// Wrap a failed statement into a `RepositoryError`, logging the cause
pub(crate) fn storage_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        tracing::error!(operation, error = %e, "Database statement failed");
        RepositoryError::with_source(format!("Failed to {}", operation), e).into()
    }
}

/// True when the statement hit a unique index
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Decode a column, mapping failures to `RepositoryError`
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(name).map_err(|e| {
        RepositoryError::with_source(format!("Failed to get {}", name), e).into()
    })
}

/// Decode a `CHAR(36)` id column
pub(crate) fn uuid_column(row: &MySqlRow, name: &str) -> Result<Uuid, DomainError> {
    let raw: String = column(row, name)?;
    parse_uuid(&raw, name)
}

/// Decode a nullable `CHAR(36)` id column
pub(crate) fn optional_uuid_column(row: &MySqlRow, name: &str) -> Result<Option<Uuid>, DomainError> {
    let raw: Option<String> = column(row, name)?;
    raw.map(|value| parse_uuid(&value, name)).transpose()
}

fn parse_uuid(raw: &str, name: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|e| {
        RepositoryError::with_source(format!("Invalid UUID in {}", name), e).into()
    })
}
