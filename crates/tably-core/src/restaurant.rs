//! Restaurant — a dining establishment, optionally owned by one user.

use serde::{Deserialize, Serialize};

use crate::entity::EntityMetadata;

/// A stored restaurant. Exclusively owned by zero or one user; the ownership
/// link lives on the user side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
  #[serde(flatten)]
  pub meta:        EntityMetadata,
  pub name:        String,
  pub description: Option<String>,
  pub active:      bool,
}

/// Payload for creating a restaurant. Carries no identifier — the store
/// assigns a fresh one on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRestaurant {
  pub name:        String,
  pub description: Option<String>,
  #[serde(default = "default_active")]
  pub active:      bool,
}

fn default_active() -> bool { true }
