//! Handlers for `/restaurants` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/restaurants` | All restaurants; empty array is valid |
//! | `GET`  | `/restaurants/:id` | 404 if not found |
//! | `POST` | `/restaurants` | Body: [`NewRestaurant`]; returns 201 |
//!
//! The handlers are pure pass-throughs: the path id is resolved to an entity
//! by the store lookup, and a miss becomes the standard 404 body.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use tably_core::{
  restaurant::{NewRestaurant, Restaurant},
  store::DirectoryStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /restaurants`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Restaurant>>, ApiError>
where
  S: DirectoryStore,
{
  let restaurants = store
    .list_restaurants()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(restaurants))
}

/// `GET /restaurants/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Restaurant>, ApiError>
where
  S: DirectoryStore,
{
  let restaurant = store
    .get_restaurant(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("restaurant {id} not found")))?;
  Ok(Json(restaurant))
}

/// `POST /restaurants` — returns 201 + the stored entity with its assigned
/// identifier.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewRestaurant>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let restaurant = store
    .add_restaurant(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(restaurant)))
}
