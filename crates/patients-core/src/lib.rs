//! Core types and trait definitions for the patient record service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod patient;
pub mod store;

pub use patient::{Patient, PatientDraft};
pub use store::{PatientPage, PatientStore};
