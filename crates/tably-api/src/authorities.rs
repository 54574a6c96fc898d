//! Handlers for `/authorities` endpoints.
//!
//! Authorities are reference data managed independently of users; this is
//! the administrative surface for creating and listing them.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tably_core::{authority::Authority, store::DirectoryStore};

use crate::error::ApiError;

/// `GET /authorities`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Authority>>, ApiError>
where
  S: DirectoryStore,
{
  let authorities = store
    .list_authorities()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(authorities))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /authorities` — body: `{"name":"ROLE_..."}`; 409 on duplicates.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let authority = store
    .add_authority(body.name)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(authority)))
}
