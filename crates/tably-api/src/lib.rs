//! JSON REST API for the Tably restaurant directory.
//!
//! Exposes an axum [`Router`] backed by any
//! [`tably_core::store::DirectoryStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tably_api::api_router(store.clone()))
//! ```

pub mod authorities;
pub mod error;
pub mod restaurants;
pub mod users;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use serde::Deserialize;
use tably_core::store::DirectoryStore;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `TABLY_`-prefixed environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Restaurants
    .route(
      "/restaurants",
      get(restaurants::list::<S>).post(restaurants::create::<S>),
    )
    .route("/restaurants/{id}", get(restaurants::get_one::<S>))
    // Users
    .route("/users", post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>).patch(users::update::<S>),
    )
    .route("/users/{id}/authorities", post(users::grant::<S>))
    .route(
      "/users/{id}/authorities/{name}",
      delete(users::revoke::<S>),
    )
    // Authorities
    .route(
      "/authorities",
      get(authorities::list::<S>).post(authorities::create::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tably_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::api_router;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.expect("in-memory store");
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let request = match body {
      Some(json_body) => Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json_body.to_string()))
        .unwrap(),
      None => Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    // Extractor rejections (e.g. a malformed JSON body) come back as plain
    // text rather than JSON.
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
      })
    };
    (status, value)
  }

  fn owner_body() -> Value {
    json!({
      "email": "jan@example.com",
      "name": "Jan",
      "surname": "Kowalski",
      "password": "correct horse battery",
      "restaurant": { "name": "Pizza Place" },
      "authorities": ["ROLE_OWNER", "ROLE_ADMIN", "ROLE_OWNER"]
    })
  }

  // ── Restaurants ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn restaurant_add_get_list_roundtrip() {
    let app = app().await;

    let (status, created) = send(
      &app,
      "POST",
      "/restaurants",
      Some(json!({ "name": "Pizza Place" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Pizza Place");
    let id = created["id"].as_str().expect("assigned id").to_owned();

    let (status, fetched) =
      send(&app, "GET", &format!("/restaurants/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, all) = send(&app, "GET", "/restaurants", None).await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["id"], id.as_str());
  }

  #[tokio::test]
  async fn unknown_restaurant_is_404() {
    let app = app().await;
    let (status, body) = send(
      &app,
      "GET",
      &format!("/restaurants/{}", uuid::Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn malformed_restaurant_payload_is_rejected() {
    let app = app().await;
    let (status, _) =
      send(&app, "POST", "/restaurants", Some(json!({ "active": true })))
        .await;
    assert!(status.is_client_error());
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn created_user_never_echoes_the_password() {
    let app = app().await;

    let (status, created) =
      send(&app, "POST", "/users", Some(owner_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());

    // Creation responds with the User scope: gated fields are present,
    // duplicate grants collapsed.
    assert_eq!(created["surname"], "Kowalski");
    assert_eq!(created["account_state"], "pending");
    assert_eq!(created["restaurant"]["name"], "Pizza Place");
    assert_eq!(created["authorities"].as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn view_scopes_gate_fields() {
    let app = app().await;
    let (_, created) = send(&app, "POST", "/users", Some(owner_body())).await;
    let id = created["id"].as_str().unwrap().to_owned();

    let (status, basic) =
      send(&app, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(basic["email"], "jan@example.com");
    assert!(basic.get("surname").is_none());
    assert!(basic.get("account_state").is_none());
    assert!(basic.get("restaurant").is_none());

    let (_, full) =
      send(&app, "GET", &format!("/users/{id}?view=user"), None).await;
    assert_eq!(full["surname"], "Kowalski");
    assert_eq!(full["restaurant"]["name"], "Pizza Place");
  }

  #[tokio::test]
  async fn invalid_email_is_400() {
    let app = app().await;
    let mut body = owner_body();
    body["email"] = json!("not-an-email");
    let (status, response) = send(&app, "POST", "/users", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().contains("email"));
  }

  #[tokio::test]
  async fn short_password_is_400() {
    let app = app().await;
    let mut body = owner_body();
    body["password"] = json!("short");
    let (status, _) = send(&app, "POST", "/users", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn email_change_is_rejected() {
    let app = app().await;
    let (_, created) = send(&app, "POST", "/users", Some(owner_body())).await;
    let id = created["id"].as_str().unwrap().to_owned();

    let (status, body) = send(
      &app,
      "PATCH",
      &format!("/users/{id}"),
      Some(json!({ "email": "new@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));

    // Other fields still update.
    let (status, updated) = send(
      &app,
      "PATCH",
      &format!("/users/{id}"),
      Some(json!({ "surname": "Nowak", "account_state": "active" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["surname"], "Nowak");
    assert_eq!(updated["account_state"], "active");
  }

  #[tokio::test]
  async fn duplicate_email_is_409() {
    let app = app().await;
    send(&app, "POST", "/users", Some(owner_body())).await;

    let mut second = owner_body();
    second["restaurant"] = Value::Null;
    let (status, _) = send(&app, "POST", "/users", Some(second)).await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  // ── Authorities ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn grant_and_revoke_over_http() {
    let app = app().await;
    let mut body = owner_body();
    body["authorities"] = json!([]);
    let (_, created) = send(&app, "POST", "/users", Some(body)).await;
    let id = created["id"].as_str().unwrap().to_owned();

    let (status, granted) = send(
      &app,
      "POST",
      &format!("/users/{id}/authorities"),
      Some(json!({ "authority": "ROLE_OWNER" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(granted["authorities"], json!(["ROLE_OWNER"]));

    let (status, revoked) = send(
      &app,
      "DELETE",
      &format!("/users/{id}/authorities/ROLE_OWNER"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(revoked["authorities"], json!([]));
  }

  #[tokio::test]
  async fn authority_reference_data_surface() {
    let app = app().await;

    let (status, created) = send(
      &app,
      "POST",
      "/authorities",
      Some(json!({ "name": "ROLE_ADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!("ROLE_ADMIN"));

    let (status, _) = send(
      &app,
      "POST",
      "/authorities",
      Some(json!({ "name": "ROLE_ADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, all) = send(&app, "GET", "/authorities", None).await;
    assert_eq!(all, json!(["ROLE_ADMIN"]));
  }
}
