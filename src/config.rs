// SPDX-License-Identifier: PMPL-1.0-or-later

//! Engine configuration
//!
//! Layering, lowest to highest: built-in defaults, a JSON/YAML config
//! file, `DIAGNO_*` environment variables, command-line flags (applied by
//! the binary).

use crate::engine::{CsvFileSource, InferenceService, SnapshotSource, TableSource};
use crate::treatments::TreatmentCatalog;
use crate::types::ScoringMode;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DATASET_ENV: &str = "DIAGNO_DATASET";
pub const TREATMENTS_ENV: &str = "DIAGNO_TREATMENTS";
pub const CACHE_ENV: &str = "DIAGNO_CACHE_TABLE";
pub const SCORING_ENV: &str = "DIAGNO_SCORING";

const DEFAULT_DATASET: &str = "dataset.csv";
const DEFAULT_TREATMENTS: &str = "treatments.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Headerless `disease,symptom,group_number` CSV
    pub dataset: PathBuf,
    /// Disease → treatments catalog; a missing file means no treatments
    pub treatments: Option<PathBuf>,
    /// Load the dataset once instead of on every call
    pub cache_table: bool,
    pub scoring: ScoringMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            treatments: Some(PathBuf::from(DEFAULT_TREATMENTS)),
            cache_table: false,
            scoring: ScoringMode::Rows,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display())),
            _ => serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display())),
        }
    }

    /// Defaults or the given file, then the process environment
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    /// Overlay `DIAGNO_*` variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dataset) = lookup(DATASET_ENV) {
            self.dataset = PathBuf::from(dataset);
        }
        if let Some(treatments) = lookup(TREATMENTS_ENV) {
            self.treatments = Some(PathBuf::from(treatments));
        }
        if let Some(cache) = lookup(CACHE_ENV) {
            self.cache_table = parse_flag(&cache)
                .ok_or_else(|| anyhow!("{} must be true or false, got {:?}", CACHE_ENV, cache))?;
        }
        if let Some(scoring) = lookup(SCORING_ENV) {
            self.scoring = parse_scoring(&scoring).ok_or_else(|| {
                anyhow!(
                    "{} must be rows or distinct-symptoms, got {:?}",
                    SCORING_ENV,
                    scoring
                )
            })?;
        }
        Ok(())
    }

    pub fn table_source(&self) -> Result<Box<dyn TableSource>> {
        if self.cache_table {
            let snapshot = SnapshotSource::from_path(&self.dataset)
                .with_context(|| format!("caching dataset {}", self.dataset.display()))?;
            Ok(Box::new(snapshot))
        } else {
            Ok(Box::new(CsvFileSource::new(&self.dataset)))
        }
    }

    pub fn treatment_catalog(&self) -> Result<TreatmentCatalog> {
        match &self.treatments {
            Some(path) => TreatmentCatalog::load(path),
            None => Ok(TreatmentCatalog::new()),
        }
    }

    pub fn build_service(&self) -> Result<InferenceService<Box<dyn TableSource>>> {
        Ok(InferenceService::new(self.table_source()?)
            .with_scoring(self.scoring)
            .with_treatments(self.treatment_catalog()?))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_scoring(value: &str) -> Option<ScoringMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "rows" | "records" => Some(ScoringMode::Rows),
        "distinct-symptoms" | "distinct" => Some(ScoringMode::DistinctSymptoms),
        _ => None,
    }
}
