//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: [`CreateUserBody`]; returns 201 + `User`-scope view |
//! | `GET`  | `/users/:id` | Optional `?view=basic\|user`; defaults to basic |
//! | `PATCH`| `/users/:id` | Partial update; email changes are rejected |
//! | `POST` | `/users/:id/authorities` | Grant; body `{"authority":"..."}` |
//! | `DELETE` | `/users/:id/authorities/:name` | Revoke |
//!
//! Field validation (email format and length, password length) happens here,
//! before anything reaches the store. The plaintext password is hashed with
//! argon2 and discarded; responses carry [`UserView`] projections, which
//! exclude the hash in every scope.

use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rand_core::OsRng;
use serde::Deserialize;
use tably_core::{
  authority::Authority,
  restaurant::NewRestaurant,
  store::DirectoryStore,
  user::{self, AccountState, NewUser, UserUpdate},
  view::{UserView, ViewScope},
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Create ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
  pub email:         String,
  pub name:          Option<String>,
  pub surname:       Option<String>,
  /// Plaintext; validated for length, hashed, never stored or echoed.
  pub password:      String,
  #[serde(default)]
  pub account_state: AccountState,
  /// Embedded restaurant, persisted in the same transaction as the user.
  pub restaurant:    Option<NewRestaurant>,
  #[serde(default)]
  pub authorities:   Vec<Authority>,
}

fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| {
      ApiError::Store(tably_core::Error::Storage(format!("argon2 error: {e}")))
    })
}

/// `POST /users` — returns 201 + the created user under the `User` scope.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateUserBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  user::validate_email(&body.email)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  user::validate_password(&body.password)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let input = NewUser {
    email:         body.email,
    name:          body.name,
    surname:       body.surname,
    password_hash: hash_password(&body.password)?,
    account_state: body.account_state,
    restaurant:    body.restaurant,
    authorities:   body.authorities,
  };

  let created = store
    .create_user(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(created.to_view(ViewScope::User))))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
  pub view: Option<ViewScope>,
}

/// `GET /users/:id[?view=basic|user]`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<ViewParams>,
) -> Result<Json<UserView>, ApiError>
where
  S: DirectoryStore,
{
  let user = store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user.to_view(params.view.unwrap_or_default())))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PATCH /users/:id` — body is a partial [`UserUpdate`]. An email differing
/// from the stored one is rejected with 400.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UserUpdate>,
) -> Result<Json<UserView>, ApiError>
where
  S: DirectoryStore,
{
  if let Some(email) = &body.email {
    user::validate_email(email)
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  }

  let updated = store
    .update_user(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(updated.to_view(ViewScope::User)))
}

// ─── Grants ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GrantBody {
  pub authority: String,
}

/// `POST /users/:id/authorities` — body: `{"authority":"ROLE_..."}`.
pub async fn grant<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<GrantBody>,
) -> Result<Json<UserView>, ApiError>
where
  S: DirectoryStore,
{
  let user = store
    .grant_authority(id, Authority::new(body.authority))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(user.to_view(ViewScope::User)))
}

/// `DELETE /users/:id/authorities/:name`
pub async fn revoke<S>(
  State(store): State<Arc<S>>,
  Path((id, name)): Path<(Uuid, String)>,
) -> Result<Json<UserView>, ApiError>
where
  S: DirectoryStore,
{
  let user = store
    .revoke_authority(id, Authority::new(name))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(user.to_view(ViewScope::User)))
}
