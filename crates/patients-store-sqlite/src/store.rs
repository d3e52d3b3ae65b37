//! [`SqliteStore`] — the SQLite implementation of [`PatientStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use patients_core::{
  patient::{Patient, PatientDraft},
  store::{PatientPage, PatientStore},
};

use crate::{
  encode::{encode_date, encode_uuid, RawPatient},
  schema::SCHEMA,
  Error, Result,
};

const PATIENT_COLUMNS: &str =
  "patient_id, name, phone, email, birth_date, active, created_at, updated_at";

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPatient> {
  Ok(RawPatient {
    patient_id: row.get(0)?,
    name:       row.get(1)?,
    phone:      row.get(2)?,
    email:      row.get(3)?,
    birth_date: row.get(4)?,
    active:     row.get(5)?,
    created_at: row.get(6)?,
    updated_at: row.get(7)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A patient store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. One instance
/// is opened at process start and shared by every handler invocation.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PatientStore impl ───────────────────────────────────────────────────────

impl PatientStore for SqliteStore {
  type Error = Error;

  async fn create_patient(&self, draft: PatientDraft) -> Result<Patient> {
    let now_ms = Utc::now().timestamp_millis();
    let patient = Patient {
      patient_id: Uuid::new_v4(),
      name:       draft.name,
      phone:      draft.phone,
      email:      draft.email,
      birth_date: draft.birth_date,
      active:     true,
      created_at: now_ms,
      updated_at: now_ms,
    };

    let id_str   = encode_uuid(patient.patient_id);
    let name     = patient.name.clone();
    let phone    = patient.phone.clone();
    let email    = patient.email.clone();
    let date_str = encode_date(patient.birth_date);
    let active   = patient.active;
    let (created_at, updated_at) = (patient.created_at, patient.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO patients (
             patient_id, name, phone, email, birth_date,
             active, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, name, phone, email, date_str, active, created_at,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(patient)
  }

  async fn get_patient(&self, id: Uuid) -> Result<Option<Patient>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPatient> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = ?1"
              ),
              rusqlite::params![id_str],
              row_to_raw,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPatient::into_patient).transpose()
  }

  async fn list_patients(
    &self,
    limit: usize,
    start_after: Option<Uuid>,
  ) -> Result<PatientPage> {
    let cursor_str = start_after.map(encode_uuid);
    // One extra row tells us whether anything remains beyond this page.
    // Saturate: callers may pass any limit, including usize::MAX.
    let fetch = i64::try_from(limit.saturating_add(1)).unwrap_or(i64::MAX);

    let raws: Vec<RawPatient> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PATIENT_COLUMNS} FROM patients
           WHERE ?1 IS NULL OR patient_id > ?1
           ORDER BY patient_id
           LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![cursor_str, fetch], row_to_raw)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut items: Vec<Patient> = raws
      .into_iter()
      .map(RawPatient::into_patient)
      .collect::<Result<_>>()?;

    let next_token = if items.len() > limit {
      items.truncate(limit);
      items.last().map(|p| p.patient_id)
    } else {
      None
    };

    Ok(PatientPage { items, next_token })
  }

  async fn update_patient(&self, id: Uuid, draft: PatientDraft) -> Result<bool> {
    let id_str   = encode_uuid(id);
    let date_str = encode_date(draft.birth_date);
    let now_ms   = Utc::now().timestamp_millis();

    let changed = self
      .conn
      .call(move |conn| {
        // The WHERE clause is the existence condition; the affected-row
        // count reports whether it held. MAX keeps updated_at strictly
        // increasing even when two updates land in the same millisecond.
        let n = conn.execute(
          "UPDATE patients
           SET name = ?2, phone = ?3, email = ?4, birth_date = ?5,
               updated_at = MAX(?6, updated_at + 1)
           WHERE patient_id = ?1",
          rusqlite::params![
            id_str,
            draft.name,
            draft.phone,
            draft.email,
            date_str,
            now_ms,
          ],
        )?;
        Ok(n)
      })
      .await?;

    Ok(changed == 1)
  }

  async fn delete_patient(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM patients WHERE patient_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n)
      })
      .await?;

    Ok(changed == 1)
  }
}
