//! Patient — the sole entity this service stores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored patient record.
///
/// `patient_id` and both timestamps are assigned by the store; callers never
/// supply them. Timestamps are milliseconds since the Unix epoch, and
/// `created_at <= updated_at` holds for every stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
  pub patient_id: Uuid,
  pub name:       String,
  pub phone:      String,
  pub email:      String,
  pub birth_date: NaiveDate,
  /// Set `true` at creation. Updates never touch this field.
  pub active:     bool,
  pub created_at: i64,
  pub updated_at: i64,
}

/// The caller-supplied fields of a patient, used by both create and update.
///
/// All four fields are required; deserialisation fails if any is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDraft {
  pub name:       String,
  pub phone:      String,
  pub email:      String,
  pub birth_date: NaiveDate,
}
