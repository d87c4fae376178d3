// SPDX-License-Identifier: PMPL-1.0-or-later

//! Association table loading
//!
//! The dataset is a headerless CSV of `disease,symptom,group_number`
//! rows. This layout is shared with existing deployments, so parsing is
//! strict: exactly three fields, integer group numbers, no header skip.

pub mod loader;

pub use loader::{load_table, read_table};
