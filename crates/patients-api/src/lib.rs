//! JSON REST API for the patient record service.
//!
//! Exposes an axum [`Router`] backed by any [`patients_core::PatientStore`].
//! TLS and transport concerns are the caller's responsibility.

pub mod error;
pub mod patients;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use patients_core::store::PatientStore;
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` (with
/// `PATIENTS_*` environment overrides). Resolved once at process start;
/// handlers never read ambient configuration.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database path; `:memory:` gives an ephemeral store for local
  /// development.
  pub store_path: PathBuf,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `store`.
///
/// The store is the only shared state: one long-lived client instance owned
/// by the process and injected into every handler invocation.
pub fn router<S>(store: Arc<S>) -> Router<()>
where
  S: PatientStore + 'static,
{
  Router::new()
    .route(
      "/patients",
      get(patients::list::<S>).post(patients::create::<S>),
    )
    .route(
      "/patients/{id}",
      get(patients::get_one::<S>)
        .put(patients::update_one::<S>)
        .delete(patients::delete_one::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use patients_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(Arc::new(store))
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if !body.is_empty() {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap()
      .to_vec()
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
  }

  fn ana() -> String {
    json!({
      "name": "Ana",
      "phone": "123",
      "email": "a@a.com",
      "birth_date": "1990-01-01",
    })
    .to_string()
  }

  async fn listed_ids(app: &Router) -> std::collections::HashSet<Uuid> {
    let resp = send(app, "GET", "/patients?limit=100", "").await;
    let page = body_json(resp).await;
    page["items"]
      .as_array()
      .unwrap()
      .iter()
      .map(|p| Uuid::parse_str(p["patient_id"].as_str().unwrap()).unwrap())
      .collect()
  }

  /// Create a patient and return its id by diffing the listing before and
  /// after (create responds with an empty body, and listing order is key
  /// order, not insertion order).
  async fn create_and_find_id(app: &Router, body: &str) -> Uuid {
    let before = listed_ids(app).await;

    let resp = send(app, "POST", "/patients", body).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let after = listed_ids(app).await;
    let mut new = after.difference(&before);
    let id = *new.next().expect("created patient present in listing");
    assert!(new.next().is_none(), "more than one new patient appeared");
    id
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_200_with_empty_body() {
    let app = app().await;
    let resp = send(&app, "POST", "/patients", &ana()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
  }

  #[tokio::test]
  async fn create_then_get_roundtrip() {
    let app = app().await;
    create_and_find_id(&app, &ana()).await;

    let resp = send(&app, "GET", "/patients?limit=1", "").await;
    let page = body_json(resp).await;
    let patient = &page["items"][0];

    assert_eq!(patient["name"], "Ana");
    assert_eq!(patient["phone"], "123");
    assert_eq!(patient["email"], "a@a.com");
    assert_eq!(patient["birth_date"], "1990-01-01");
    assert_eq!(patient["active"], true);
    assert_eq!(patient["created_at"], patient["updated_at"]);
    assert!(
      Uuid::parse_str(patient["patient_id"].as_str().unwrap()).is_ok(),
      "patient_id is not a UUID: {patient}"
    );
  }

  #[tokio::test]
  async fn create_with_missing_field_returns_400() {
    let app = app().await;
    let resp =
      send(&app, "POST", "/patients", r#"{"name":"Ana"}"#).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
  }

  #[tokio::test]
  async fn create_with_malformed_json_returns_400() {
    let app = app().await;
    let resp = send(&app, "POST", "/patients", "{not json").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Get ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_missing_returns_404_with_error_body() {
    let app = app().await;
    let id = Uuid::new_v4();
    let resp = send(&app, "GET", &format!("/patients/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = body_json(resp).await;
    assert_eq!(body["error"], "PatientNotFound");
    assert!(
      body["message"].as_str().unwrap().contains(&id.to_string()),
      "message does not name the id: {body}"
    );
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_changes_draft_fields_only() {
    let app = app().await;
    let id = create_and_find_id(&app, &ana()).await;

    let before =
      body_json(send(&app, "GET", &format!("/patients/{id}"), "").await).await;

    let changed = json!({
      "name": "Ana Maria",
      "phone": "456",
      "email": "a@a.com",
      "birth_date": "1990-01-01",
    });
    let resp =
      send(&app, "PUT", &format!("/patients/{id}"), &changed.to_string()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let after =
      body_json(send(&app, "GET", &format!("/patients/{id}"), "").await).await;

    assert_eq!(after["name"], "Ana Maria");
    assert_eq!(after["phone"], "456");
    assert_eq!(after["patient_id"], before["patient_id"]);
    assert_eq!(after["created_at"], before["created_at"]);
    assert_eq!(after["active"], true);
    assert!(
      after["updated_at"].as_i64().unwrap()
        > before["updated_at"].as_i64().unwrap(),
      "updated_at did not increase: {before} -> {after}"
    );
  }

  #[tokio::test]
  async fn update_missing_returns_404_naming_the_id() {
    let app = app().await;
    let id = Uuid::new_v4();
    let resp = send(&app, "PUT", &format!("/patients/{id}"), &ana()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = body_json(resp).await;
    assert_eq!(body["error"], "PatientNotFound");
    assert!(body["message"].as_str().unwrap().contains(&id.to_string()));
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_then_get_returns_404() {
    let app = app().await;
    let id = create_and_find_id(&app, &ana()).await;

    let resp = send(&app, "DELETE", &format!("/patients/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", &format!("/patients/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_missing_returns_404_naming_the_id() {
    let app = app().await;
    let id = Uuid::new_v4();
    let resp = send(&app, "DELETE", &format!("/patients/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains(&id.to_string()));
  }

  // ── List / pagination ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_default_limit_is_five() {
    let app = app().await;
    for i in 0..7 {
      let body = json!({
        "name": format!("Patient {i}"),
        "phone": "123",
        "email": "p@p.com",
        "birth_date": "1990-01-01",
      });
      let resp = send(&app, "POST", "/patients", &body.to_string()).await;
      assert_eq!(resp.status(), StatusCode::OK);
    }

    let page = body_json(send(&app, "GET", "/patients", "").await).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 5);
    assert!(!page["next_token"].is_null());
  }

  #[tokio::test]
  async fn list_paginates_without_repeating_items() {
    let app = app().await;
    for i in 0..5 {
      let body = json!({
        "name": format!("Patient {i}"),
        "phone": "123",
        "email": "p@p.com",
        "birth_date": "1990-01-01",
      });
      send(&app, "POST", "/patients", &body.to_string()).await;
    }

    let mut seen = std::collections::HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;

    loop {
      let uri = match &cursor {
        Some(next) => format!("/patients?limit=2&next={next}"),
        None => "/patients?limit=2".to_string(),
      };
      let page = body_json(send(&app, "GET", &uri, "").await).await;
      pages += 1;

      for item in page["items"].as_array().unwrap() {
        let id = item["patient_id"].as_str().unwrap().to_string();
        assert!(seen.insert(id), "repeated item across pages");
      }

      match page["next_token"].as_str() {
        Some(next) => cursor = Some(next.to_string()),
        None => break,
      }
    }

    assert_eq!(seen.len(), 5);
    assert_eq!(pages, 3);
  }

  #[tokio::test]
  async fn list_with_malformed_limit_returns_400_error_body() {
    let app = app().await;
    let resp = send(&app, "GET", "/patients?limit=abc", "").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
    assert!(body["message"].is_string());
  }

  #[tokio::test]
  async fn list_with_malformed_cursor_returns_400_error_body() {
    let app = app().await;
    let resp = send(&app, "GET", "/patients?next=not-a-uuid", "").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
  }

  #[tokio::test]
  async fn list_with_huge_limit_returns_the_whole_store() {
    let app = app().await;
    send(&app, "POST", "/patients", &ana()).await;

    let resp =
      send(&app, "GET", "/patients?limit=18446744073709551615", "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let page = body_json(resp).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert!(page["next_token"].is_null());
  }

  #[tokio::test]
  async fn non_uuid_path_id_returns_404_error_body() {
    let app = app().await;
    for method in ["GET", "DELETE"] {
      let resp = send(&app, method, "/patients/not-a-uuid", "").await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND);

      let body = body_json(resp).await;
      assert_eq!(body["error"], "PatientNotFound");
      assert!(body["message"].is_string());
    }
  }

  #[tokio::test]
  async fn list_empty_store_returns_empty_page() {
    let app = app().await;
    let page = body_json(send(&app, "GET", "/patients", "").await).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 0);
    assert!(page["next_token"].is_null());
  }

  // ── End-to-end scenario ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn full_patient_lifecycle() {
    let app = app().await;

    // create → 200
    let id = create_and_find_id(&app, &ana()).await;

    // get → 200, active
    let resp = send(&app, "GET", &format!("/patients/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let patient = body_json(resp).await;
    assert_eq!(patient["active"], true);

    // update name → 204
    let changed = json!({
      "name": "Ana Maria",
      "phone": "123",
      "email": "a@a.com",
      "birth_date": "1990-01-01",
    });
    let resp =
      send(&app, "PUT", &format!("/patients/{id}"), &changed.to_string()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // get → new name
    let patient =
      body_json(send(&app, "GET", &format!("/patients/{id}"), "").await).await;
    assert_eq!(patient["name"], "Ana Maria");

    // delete → 204, get → 404
    let resp = send(&app, "DELETE", &format!("/patients/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = send(&app, "GET", &format!("/patients/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
