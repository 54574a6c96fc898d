//! Error types for `tably-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("not a valid email address: {0:?}")]
  InvalidEmail(String),

  #[error("email exceeds 50 characters ({0})")]
  EmailTooLong(usize),

  #[error("password must be between 8 and 80 characters (got {0})")]
  PasswordLength(usize),

  #[error("email cannot be changed after the account is created")]
  EmailImmutable,

  #[error("unique constraint violated: {0}")]
  Constraint(String),

  #[error("authority already exists: {0:?}")]
  DuplicateAuthority(String),

  #[error("unknown account state: {0:?}")]
  UnknownAccountState(String),

  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
