//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings, dates as `YYYY-MM-DD`,
//! timestamps as integer milliseconds since the epoch.

use chrono::NaiveDate;
use patients_core::Patient;
use uuid::Uuid;

use crate::{Error, Result};

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// A `patients` row as it comes off the wire, before column decoding.
pub struct RawPatient {
  pub patient_id: String,
  pub name:       String,
  pub phone:      String,
  pub email:      String,
  pub birth_date: String,
  pub active:     bool,
  pub created_at: i64,
  pub updated_at: i64,
}

impl RawPatient {
  pub fn into_patient(self) -> Result<Patient> {
    Ok(Patient {
      patient_id: decode_uuid(&self.patient_id)?,
      name:       self.name,
      phone:      self.phone,
      email:      self.email,
      birth_date: decode_date(&self.birth_date)?,
      active:     self.active,
      created_at: self.created_at,
      updated_at: self.updated_at,
    })
  }
}
