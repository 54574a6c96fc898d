//! User — an account holding credentials, lifecycle state, an optional
//! owned restaurant, and a set of authorities.
//!
//! The user is the aggregate root for its owned restaurant: a restaurant
//! embedded in a user write is persisted in the same transaction
//! (cascading save). Authorities are always loaded eagerly with the user.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  Error, Result,
  authority::Authority,
  entity::EntityMetadata,
  restaurant::{NewRestaurant, Restaurant},
};

pub const EMAIL_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 80;

// ─── Account state ───────────────────────────────────────────────────────────

/// Account lifecycle state. Transition rules are external policy; the store
/// treats this as an opaque stored value.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccountState {
  #[default]
  Pending,
  Active,
  Disabled,
}

// ─── Entity ──────────────────────────────────────────────────────────────────

/// A stored user account.
///
/// `password_hash` is write-only: it is never serialized into a response.
/// Callers hand users to the boundary as a [`UserView`](crate::view::UserView)
/// projection, which omits the hash in every scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub meta:          EntityMetadata,
  pub email:         String,
  pub name:          Option<String>,
  pub surname:       Option<String>,
  /// Argon2 PHC string. Never surfaced.
  pub password_hash: String,
  pub account_state: AccountState,
  pub restaurant:    Option<Restaurant>,
  pub authorities:   BTreeSet<Authority>,
}

/// Payload for creating a user. The boundary validates the plaintext
/// password and hashes it before building this record; the store never sees
/// a plaintext credential.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub name:          Option<String>,
  pub surname:       Option<String>,
  pub password_hash: String,
  pub account_state: AccountState,
  /// Embedded restaurant to persist in the same transaction, if any.
  pub restaurant:    Option<NewRestaurant>,
  /// Grants to record at creation; duplicates collapse under set semantics.
  pub authorities:   Vec<Authority>,
}

/// Partial update applied to an existing user. `None` leaves a field
/// unchanged. An `email` differing from the stored value is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
  pub email:         Option<String>,
  pub name:          Option<String>,
  pub surname:       Option<String>,
  pub account_state: Option<AccountState>,
}

// ─── Field validation ────────────────────────────────────────────────────────

/// Syntactic email check: one `@`, non-empty local part, dotted domain, no
/// whitespace. Deliverability is out of scope.
pub fn validate_email(email: &str) -> Result<()> {
  let len = email.chars().count();
  if len > EMAIL_MAX_LEN {
    return Err(Error::EmailTooLong(len));
  }

  let invalid = || Error::InvalidEmail(email.to_owned());

  let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
  if local.is_empty()
    || domain.is_empty()
    || domain.contains('@')
    || !domain.contains('.')
    || domain.starts_with('.')
    || domain.ends_with('.')
    || email.chars().any(char::is_whitespace)
  {
    return Err(invalid());
  }
  Ok(())
}

/// Length check applied to the plaintext password at the boundary, before
/// hashing. The storage layer only ever holds the hash.
pub fn validate_password(password: &str) -> Result<()> {
  let len = password.chars().count();
  if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
    return Err(Error::PasswordLength(len));
  }
  Ok(())
}
