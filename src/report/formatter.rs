// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report formatting and output

use crate::report::{InferenceReport, ReportOutputFormat};
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

pub struct ReportFormatter {
    color: bool,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self { color: true }
    }

    /// Never emits colour codes, whatever the terminal supports
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, text: ColoredString) -> ColoredString {
        if self.color {
            text
        } else {
            text.clear()
        }
    }

    /// Human-readable rendering
    pub fn render(&self, report: &InferenceReport) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.paint("=== DIAGNO ===".bold().cyan())));
        out.push_str(&format!("  Dataset: {}\n", report.dataset));
        out.push_str(&format!("  Symptoms: {}\n\n", report.symptoms.join(", ")));

        if let Some(error) = &report.error {
            out.push_str(&format!("{}\n", self.paint("INFERENCE FAILED".bold().red())));
            out.push_str(&format!("  {}\n", self.paint(error.red())));
            return out;
        }

        if let Some(suggestions) = &report.suggested_symptoms {
            self.render_suggestions(&mut out, suggestions);
        }

        if let Some(disease) = &report.disease {
            self.render_diagnosis(&mut out, disease, report);
        }

        out
    }

    fn render_suggestions(&self, out: &mut String, suggestions: &[String]) {
        out.push_str(&format!("{}\n", self.paint("SUGGESTED SYMPTOMS".bold().yellow())));
        if suggestions.is_empty() {
            out.push_str(&format!(
                "  {}\n",
                self.paint("No related symptoms found".dimmed())
            ));
        }
        for (i, symptom) in suggestions.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, symptom));
        }
    }

    fn render_diagnosis(&self, out: &mut String, disease: &str, report: &InferenceReport) {
        out.push_str(&format!("{}\n", self.paint("MOST PROBABLE DISEASE".bold().yellow())));
        out.push_str(&format!("  {}\n", self.paint(disease.bold().green())));

        if !report.treatments.is_empty() {
            out.push_str("\n  Treatments:\n");
            for treatment in &report.treatments {
                out.push_str(&format!("    - {}\n", treatment));
            }
        }

        if !report.ranking.is_empty() {
            out.push_str(&format!("\n  {:<40} {:>6}\n", "Disease", "Score"));
            out.push_str(&format!("  {}\n", "-".repeat(47)));
            for row in &report.ranking {
                out.push_str(&format!("  {:<40} {:>6}\n", row.disease, row.score));
            }
        }
    }

    pub fn save<P: AsRef<Path>>(
        &self,
        report: &InferenceReport,
        path: P,
        format: ReportOutputFormat,
    ) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let content = match format {
            ReportOutputFormat::Text => Self::plain().render(report),
            other => other.serialize(report)?,
        };
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}
