// SPDX-License-Identifier: PMPL-1.0-or-later

//! `diagno check`: sanity checks over the configured dataset and catalog

use crate::config::{EngineConfig, CACHE_ENV, DATASET_ENV, SCORING_ENV, TREATMENTS_ENV};
use crate::table;
use crate::treatments::TreatmentCatalog;
use crate::types::AssociationTable;
use anyhow::{anyhow, Result};
use colored::*;
use std::env;
use std::fs;
use std::path::Path;

pub fn run_self_diagnostics(config: &EngineConfig) -> Result<()> {
    println!("diagno self-diagnostics");

    let checks = collect_diagnostics(config, |key| env::var(key).ok());

    println!();
    for entry in &checks {
        entry.print();
    }

    if checks.iter().any(|entry| entry.level == Level::Error) {
        Err(anyhow!("self-diagnostics reported issues"))
    } else {
        Ok(())
    }
}

/// Every check, in display order
pub fn collect_diagnostics<F>(config: &EngineConfig, env_lookup: F) -> Vec<Diagnostic>
where
    F: Fn(&str) -> Option<String>,
{
    let mut checks = Vec::new();
    checks.push(Diagnostic::ok(
        "version",
        format!("diagno {}", env!("CARGO_PKG_VERSION")),
    ));
    checks.push(Diagnostic::ok(
        "engine",
        format!(
            "scoring: {:?}, cache table: {}",
            config.scoring, config.cache_table
        ),
    ));

    let table = match check_dataset(&config.dataset) {
        Ok((diagnostic, table)) => {
            checks.push(diagnostic);
            Some(table)
        }
        Err(diagnostic) => {
            checks.push(diagnostic);
            None
        }
    };
    if let Some(table) = &table {
        checks.push(check_table_shape(table));
    }

    match &config.treatments {
        Some(path) => checks.push(check_treatments(path, table.as_ref())),
        None => checks.push(Diagnostic::ok(
            "treatment catalog",
            "disabled".to_string(),
        )),
    }

    for (label, key) in [
        ("dataset override", DATASET_ENV),
        ("treatments override", TREATMENTS_ENV),
        ("cache override", CACHE_ENV),
        ("scoring override", SCORING_ENV),
    ] {
        checks.push(check_env(label, key, &env_lookup));
    }

    checks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub label: &'static str,
    pub level: Level,
    pub detail: String,
}

impl Diagnostic {
    fn new(label: &'static str, level: Level, detail: String) -> Self {
        Self {
            label,
            level,
            detail,
        }
    }

    fn ok(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }

    fn print(&self) {
        println!("  [{}] {:22} {}", self.level.tag(), self.label, self.detail);
    }
}

impl Level {
    fn tag(&self) -> ColoredString {
        match self {
            Level::Ok => "OK".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERR".red(),
        }
    }
}

fn check_dataset(path: &Path) -> std::result::Result<(Diagnostic, AssociationTable), Diagnostic> {
    if !path.is_file() {
        let detail = if path.exists() {
            format!("{} exists but is not a regular file", path.display())
        } else {
            format!("{} missing", path.display())
        };
        return Err(Diagnostic::error("dataset", detail));
    }

    let bytes = fs::read(path).map_err(|err| {
        Diagnostic::error("dataset", format!("unable to read {}: {}", path.display(), err))
    })?;
    let table = table::read_table(bytes.as_slice())
        .map_err(|err| Diagnostic::error("dataset", format!("{}: {}", path.display(), err)))?;

    let fingerprint = blake3::hash(&bytes).to_hex();
    Ok((
        Diagnostic::ok(
            "dataset",
            format!(
                "{} ({} records, blake3 {})",
                path.display(),
                table.len(),
                &fingerprint.as_str()[..16]
            ),
        ),
        table,
    ))
}

fn check_table_shape(table: &AssociationTable) -> Diagnostic {
    if table.is_empty() {
        return Diagnostic::warning(
            "table contents",
            "dataset has no records (every lookup will report no match)".to_string(),
        );
    }
    Diagnostic::ok(
        "table contents",
        format!(
            "{} diseases, {} symptoms",
            table.diseases().len(),
            table.symptoms().len()
        ),
    )
}

fn check_treatments(path: &Path, table: Option<&AssociationTable>) -> Diagnostic {
    if !path.exists() {
        return Diagnostic::warning(
            "treatment catalog",
            format!("{} missing (diagnoses will carry no treatments)", path.display()),
        );
    }

    let catalog = match TreatmentCatalog::load(path) {
        Ok(catalog) => catalog,
        Err(err) => return Diagnostic::error("treatment catalog", format!("{:#}", err)),
    };

    let unknown = table
        .map(|table| {
            let diseases = table.diseases();
            catalog
                .diseases()
                .filter(|name| !diseases.contains(name))
                .count()
        })
        .unwrap_or(0);

    if unknown > 0 {
        Diagnostic::warning(
            "treatment catalog",
            format!(
                "{} entries, {} for diseases absent from the dataset",
                catalog.len(),
                unknown
            ),
        )
    } else {
        Diagnostic::ok("treatment catalog", format!("{} entries", catalog.len()))
    }
}

fn check_env<F>(label: &'static str, env_key: &str, lookup: &F) -> Diagnostic
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(env_key) {
        Some(value) if !value.trim().is_empty() => {
            Diagnostic::ok(label, format!("{}={}", env_key, value))
        }
        _ => Diagnostic::ok(label, format!("not set ({})", env_key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn find<'a>(checks: &'a [Diagnostic], label: &str) -> &'a Diagnostic {
        checks
            .iter()
            .find(|d| d.label == label)
            .unwrap_or_else(|| panic!("no {} check", label))
    }

    #[test]
    fn test_missing_dataset_is_error() {
        let config = EngineConfig {
            dataset: PathBuf::from("/nonexistent/diagno.csv"),
            treatments: None,
            ..EngineConfig::default()
        };
        let checks = collect_diagnostics(&config, no_env);
        assert_eq!(find(&checks, "dataset").level, Level::Error);
    }

    #[test]
    fn test_healthy_setup() {
        let dir = TempDir::new().unwrap();
        let dataset = dir.path().join("dataset.csv");
        let treatments = dir.path().join("treatments.json");
        fs::write(&dataset, "Flu,fever,1\nCold,cough,2\n").unwrap();
        fs::write(&treatments, r#"{"Flu": "rest"}"#).unwrap();

        let config = EngineConfig {
            dataset,
            treatments: Some(treatments),
            ..EngineConfig::default()
        };
        let checks = collect_diagnostics(&config, no_env);
        assert!(checks.iter().all(|d| d.level == Level::Ok), "{:?}", checks);
        assert!(find(&checks, "dataset").detail.contains("2 records"));
        assert!(find(&checks, "table contents").detail.contains("2 diseases"));
    }

    #[test]
    fn test_catalog_for_unknown_disease_warns() {
        let dir = TempDir::new().unwrap();
        let dataset = dir.path().join("dataset.csv");
        let treatments = dir.path().join("treatments.yaml");
        fs::write(&dataset, "Flu,fever,1\n").unwrap();
        fs::write(&treatments, "Measles: isolation\n").unwrap();

        let config = EngineConfig {
            dataset,
            treatments: Some(treatments),
            ..EngineConfig::default()
        };
        let checks = collect_diagnostics(&config, no_env);
        assert_eq!(find(&checks, "treatment catalog").level, Level::Warn);
    }

    #[test]
    fn test_malformed_dataset_is_error() {
        let dir = TempDir::new().unwrap();
        let dataset = dir.path().join("dataset.csv");
        fs::write(&dataset, "Flu,fever\n").unwrap();
        let config = EngineConfig {
            dataset,
            treatments: None,
            ..EngineConfig::default()
        };
        let checks = collect_diagnostics(&config, no_env);
        let check = find(&checks, "dataset");
        assert_eq!(check.level, Level::Error);
        assert!(check.detail.contains("expected 3 fields"));
    }
}
