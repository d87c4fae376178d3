// SPDX-License-Identifier: PMPL-1.0-or-later

//! Inference reports for terminal and file output

pub mod formatter;
pub mod generator;
pub mod output;

use crate::types::DiseaseScore;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use formatter::ReportFormatter;
pub use generator::ReportGenerator;
pub use output::ReportOutputFormat;

/// Result of one CLI inference run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceReport {
    pub generated_at: String,
    pub dataset: String,
    /// Input symptoms, sorted
    pub symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_symptoms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub treatments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranking: Vec<DiseaseScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Write a report in the given format
pub fn save_report<P: AsRef<Path>>(
    report: &InferenceReport,
    path: P,
    format: ReportOutputFormat,
) -> Result<()> {
    ReportFormatter::new().save(report, path, format)
}

/// Print a report to stdout in the given format
pub fn print_report(report: &InferenceReport, format: ReportOutputFormat) -> Result<()> {
    println!("{}", format.serialize(report)?);
    Ok(())
}
