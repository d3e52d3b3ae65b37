//! The `PatientStore` trait and supporting page type.
//!
//! The trait is implemented by storage backends (e.g.
//! `patients-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::patient::{Patient, PatientDraft};

/// Page size used when a list request carries no explicit limit.
pub const DEFAULT_PAGE_LIMIT: usize = 5;

// ─── Page type ───────────────────────────────────────────────────────────────

/// One page of a bounded scan over the patients table.
///
/// `next_token` is the id of the last item in this page, present iff more
/// records remain beyond it. Feeding it back as the scan cursor resumes the
/// listing without repeating items (absent concurrent mutation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientPage {
  pub items:      Vec<Patient>,
  pub next_token: Option<Uuid>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a patient record store backend.
///
/// Every operation maps to a single store call; the conditional operations
/// (update, delete) are atomic at the store — the existence check and the
/// write happen in one statement.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PatientStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a new record built from `draft`.
  ///
  /// The store generates a fresh v4 `patient_id`, sets `active = true` and
  /// `created_at = updated_at = now`. No uniqueness check is needed since
  /// the id is freshly generated.
  fn create_patient(
    &self,
    draft: PatientDraft,
  ) -> impl Future<Output = Result<Patient, Self::Error>> + Send + '_;

  /// Point lookup by primary key. Returns `None` if not found.
  fn get_patient(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Patient>, Self::Error>> + Send + '_;

  /// Bounded scan of at most `limit` records in the store's native
  /// primary-key order, resuming strictly after `start_after` if given.
  fn list_patients(
    &self,
    limit: usize,
    start_after: Option<Uuid>,
  ) -> impl Future<Output = Result<PatientPage, Self::Error>> + Send + '_;

  /// Conditional update: apply `draft` and refresh `updated_at` only if a
  /// record with `id` exists. Returns whether the update applied.
  ///
  /// `patient_id`, `active` and `created_at` are never modified;
  /// `updated_at` strictly increases on every applied update.
  fn update_patient(
    &self,
    id: Uuid,
    draft: PatientDraft,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Conditional delete: physically remove the record with `id` if it
  /// exists. Returns whether a record was removed.
  fn delete_patient(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
