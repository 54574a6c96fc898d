//! Shared identity and audit fields.
//!
//! Every persisted entity embeds [`EntityMetadata`] by value rather than
//! inheriting from a base record. The store assigns the id and both
//! timestamps at insert time; `updated_at` is bumped on every write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity plus audit timestamps, embedded in each entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
  pub id:         Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl EntityMetadata {
  /// Fresh metadata for a row being inserted now.
  pub fn new_now() -> Self {
    let now = Utc::now();
    Self { id: Uuid::new_v4(), created_at: now, updated_at: now }
  }
}
