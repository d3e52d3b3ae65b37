//! Handlers for `/patients` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/patients` | Optional `?limit=<n>&next=<cursor>` |
//! | `GET`    | `/patients/:id` | 404 if not found |
//! | `POST`   | `/patients` | Body: [`PatientDraft`]; 200, empty body |
//! | `PUT`    | `/patients/:id` | Body: [`PatientDraft`]; 204, 404 if absent |
//! | `DELETE` | `/patients/:id` | 204, 404 if absent |
//!
//! Each handler issues exactly one store call; the conditional update and
//! delete rely on the store's own atomic existence check for their 404s.

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
};
use patients_core::{
  patient::{Patient, PatientDraft},
  store::{DEFAULT_PAGE_LIMIT, PatientPage, PatientStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// An unparseable path id can never name a stored record, so it reports the
/// same not-found shape as a missing one.
fn parse_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
  path
    .map(|Path(id)| id)
    .map_err(|e| ApiError::NotFound(e.body_text()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Page size; defaults to 5.
  pub limit: Option<usize>,
  /// Opaque cursor — the last `patient_id` of the previous page.
  pub next:  Option<Uuid>,
}

/// `GET /patients[?limit=<n>][&next=<cursor>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PatientPage>, ApiError>
where
  S: PatientStore,
{
  let Query(params) =
    params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1);
  let page = store
    .list_patients(limit, params.next)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /patients/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Patient>, ApiError>
where
  S: PatientStore,
{
  let id = parse_id(path)?;
  let patient = store
    .get_patient(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::patient_not_found(id))?;
  Ok(Json(patient))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /patients` — body: [`PatientDraft`]; responds 200 with an empty body.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<PatientDraft>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: PatientStore,
{
  let Json(draft) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  store.create_patient(draft).await.map_err(ApiError::store)?;
  Ok(StatusCode::OK)
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /patients/:id` — body: [`PatientDraft`]; responds 204 with no body.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<PatientDraft>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: PatientStore,
{
  let id = parse_id(path)?;
  let Json(draft) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let applied = store
    .update_patient(id, draft)
    .await
    .map_err(ApiError::store)?;
  if !applied {
    return Err(ApiError::patient_not_found(id));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /patients/:id` — responds 204 with no body.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: PatientStore,
{
  let id = parse_id(path)?;
  let removed = store.delete_patient(id).await.map_err(ApiError::store)?;
  if !removed {
    return Err(ApiError::patient_not_found(id));
  }
  Ok(StatusCode::NO_CONTENT)
}
