// SPDX-License-Identifier: PMPL-1.0-or-later

//! diagno: symptom-disease inference over a static association table.
//!
//! Given a set of observed symptoms, the engine answers two questions
//! against a `disease,symptom,group_number` dataset:
//!
//! 1. **Suggestion**: which other symptoms share a group with the
//!    observed ones (at most four, never echoing the input).
//! 2. **Ranking**: which disease has the most matching records.
//!
//! Matching is exact string equality. The inference operations in
//! [`engine`] are pure functions of (table, symptoms); where the table
//! comes from is decided by a [`engine::TableSource`].

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod report;
pub mod table;
pub mod treatments;
pub mod types;

pub use error::{ComputationError, DataSourceError};
