//! Authority — a named permission grantable to a user account.
//!
//! Authorities are reference data: rows are created and managed
//! independently of users and are never owned by one. A user's grants are
//! held as a [`BTreeSet`](std::collections::BTreeSet) so membership is
//! duplicate-free and iteration order is deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A role name such as `"ROLE_OWNER"`. Unique across the authority table.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
  pub fn new(name: impl Into<String>) -> Self { Self(name.into()) }

  pub fn name(&self) -> &str { &self.0 }
}

impl fmt::Display for Authority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for Authority {
  fn from(name: &str) -> Self { Self(name.to_owned()) }
}
