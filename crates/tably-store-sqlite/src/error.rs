//! Error type for `tably-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tably_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("unique constraint violated: {0}")]
  Constraint(String),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("user not found: {0}")]
  UserNotFound(uuid::Uuid),

  #[error("email cannot be changed after the account is created")]
  EmailImmutable,

  #[error("authority already exists: {0:?}")]
  DuplicateAuthority(String),
}

/// Surface SQLite constraint failures (duplicate unique key, broken foreign
/// key) as their own variant so boundaries can report a conflict instead of
/// a generic storage fault.
impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
        code,
        message,
      )) if code.code == rusqlite::ErrorCode::ConstraintViolation => {
        Error::Constraint(message.unwrap_or_else(|| code.to_string()))
      }
      other => Error::Database(other),
    }
  }
}

impl From<Error> for tably_core::Error {
  fn from(e: Error) -> Self {
    use tably_core::Error as Core;
    match e {
      Error::Core(c) => c,
      Error::Constraint(m) => Core::Constraint(m),
      Error::UserNotFound(id) => Core::UserNotFound(id),
      Error::EmailImmutable => Core::EmailImmutable,
      Error::DuplicateAuthority(n) => Core::DuplicateAuthority(n),
      other => Core::Storage(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
