// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed/exported reports

use crate::report::{InferenceReport, ReportFormatter};
use anyhow::Result;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportOutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl ReportOutputFormat {
    pub fn serialize(&self, report: &InferenceReport) -> Result<String> {
        match self {
            ReportOutputFormat::Text => Ok(ReportFormatter::new().render(report)),
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        }
    }
}
