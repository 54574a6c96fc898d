//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, account states via their strum string form.

use std::{collections::BTreeSet, str::FromStr as _};

use chrono::{DateTime, Utc};
use tably_core::{
  authority::Authority,
  entity::EntityMetadata,
  restaurant::Restaurant,
  user::{AccountState, User},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── AccountState ────────────────────────────────────────────────────────────

pub fn encode_account_state(state: AccountState) -> String {
  state.to_string()
}

pub fn decode_account_state(s: &str) -> Result<AccountState> {
  AccountState::from_str(s).map_err(|_| {
    Error::Core(tably_core::Error::UnknownAccountState(s.to_owned()))
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `restaurants` row.
pub struct RawRestaurant {
  pub restaurant_id: String,
  pub created_at:    String,
  pub updated_at:    String,
  pub name:          String,
  pub description:   Option<String>,
  pub active:        bool,
}

impl RawRestaurant {
  pub fn into_restaurant(self) -> Result<Restaurant> {
    Ok(Restaurant {
      meta:        EntityMetadata {
        id:         decode_uuid(&self.restaurant_id)?,
        created_at: decode_dt(&self.created_at)?,
        updated_at: decode_dt(&self.updated_at)?,
      },
      name:        self.name,
      description: self.description,
      active:      self.active,
    })
  }
}

/// Raw strings read from a `users` row plus its eagerly-joined relations.
pub struct RawUser {
  pub user_id:       String,
  pub created_at:    String,
  pub updated_at:    String,
  pub email:         String,
  pub name:          Option<String>,
  pub surname:       Option<String>,
  pub password_hash: String,
  pub account_state: String,
  pub restaurant:    Option<RawRestaurant>,
  pub authorities:   Vec<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      meta:          EntityMetadata {
        id:         decode_uuid(&self.user_id)?,
        created_at: decode_dt(&self.created_at)?,
        updated_at: decode_dt(&self.updated_at)?,
      },
      email:         self.email,
      name:          self.name,
      surname:       self.surname,
      password_hash: self.password_hash,
      account_state: decode_account_state(&self.account_state)?,
      restaurant:    self
        .restaurant
        .map(RawRestaurant::into_restaurant)
        .transpose()?,
      authorities:   self
        .authorities
        .into_iter()
        .map(Authority::new)
        .collect::<BTreeSet<_>>(),
    })
  }
}
