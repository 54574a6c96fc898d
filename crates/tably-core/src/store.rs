//! The `DirectoryStore` trait.
//!
//! Implemented by storage backends (e.g. `tably-store-sqlite`). The HTTP
//! boundary depends on this abstraction, not on any concrete backend. The
//! controller layer above it is a pure pass-through, so these operations are
//! the business surface: identifier → entity lookup, listing, creation.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  authority::Authority,
  restaurant::{NewRestaurant, Restaurant},
  user::{NewUser, User, UserUpdate},
};

/// Abstraction over a Tably directory backend.
///
/// Backend errors must convert into [`crate::Error`] so boundaries can
/// classify them (not-found, constraint violation, storage fault) without
/// knowing the concrete backend type.
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Restaurants ───────────────────────────────────────────────────────

  /// Persist a new restaurant. Any identifier in the payload is impossible
  /// by construction — the store assigns a fresh one and returns the stored
  /// entity.
  fn add_restaurant(
    &self,
    input: NewRestaurant,
  ) -> impl Future<Output = Result<Restaurant, Self::Error>> + Send + '_;

  /// Retrieve a restaurant by id. Returns `None` if not found; the boundary
  /// maps a miss to its not-found response.
  fn get_restaurant(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Restaurant>, Self::Error>> + Send + '_;

  /// List all restaurants in storage-default order. Empty is valid.
  fn list_restaurants(
    &self,
  ) -> impl Future<Output = Result<Vec<Restaurant>, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create a user, cascading the embedded restaurant (if any) and the
  /// authority grants in the same transaction. The user is the aggregate
  /// root for its owned restaurant.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id with the owned restaurant and the full authority
  /// set loaded eagerly. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Apply a partial update. The email column is immutable: an update
  /// carrying an email different from the stored one is rejected.
  fn update_user(
    &self,
    id: Uuid,
    update: UserUpdate,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Authorities ───────────────────────────────────────────────────────

  /// Create a new authority. Names are unique; duplicates are rejected.
  fn add_authority(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Authority, Self::Error>> + Send + '_;

  /// List all known authorities, ordered by name.
  fn list_authorities(
    &self,
  ) -> impl Future<Output = Result<Vec<Authority>, Self::Error>> + Send + '_;

  /// Grant an authority to a user. Idempotent: granting an authority the
  /// user already holds leaves the set unchanged.
  fn grant_authority(
    &self,
    user_id: Uuid,
    authority: Authority,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Revoke an authority from a user. Revoking an absent grant is a no-op.
  fn revoke_authority(
    &self,
    user_id: Uuid,
    authority: Authority,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;
}
