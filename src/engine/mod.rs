// SPDX-License-Identifier: PMPL-1.0-or-later

//! Symptom-disease inference
//!
//! `infer` holds the pure operations over a loaded table, `source` decides
//! where a call's table comes from, and `service` is the boundary the
//! calling layer talks to.

pub mod infer;
pub mod service;
pub mod source;

pub use infer::{
    matched_records, most_probable_disease, most_probable_disease_with, rank_diseases,
    suggest_related_symptoms,
};
pub use service::InferenceService;
pub use source::{CsvFileSource, FnSource, SnapshotSource, TableSource};

