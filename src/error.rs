// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error taxonomy for the inference engine
//!
//! Loader failures ([`DataSourceError`]) propagate to whoever asked for a
//! table. Failures while filtering or aggregating ([`ComputationError`])
//! are caught at the service boundary and turned into error replies.
//! "Nothing matched" is never an error.

use std::path::PathBuf;
use thiserror::Error;

/// The association dataset could not be read or is malformed.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("cannot read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected 3 fields (disease,symptom,group_number), found {found}")]
    FieldCount { line: u64, found: usize },

    #[error("line {line}: group number {value:?} is not an integer")]
    GroupNumber { line: u64, value: String },

    #[error("line {line}: empty {field} field")]
    EmptyField { line: u64, field: &'static str },

    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// Something went wrong while running an operation over a loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputationError {
    #[error("record {index} is malformed: empty {field}")]
    MalformedRecord { index: usize, field: &'static str },
}

pub type DataSourceResult<T> = Result<T, DataSourceError>;
pub type ComputationResult<T> = Result<T, ComputationError>;
