// SPDX-License-Identifier: PMPL-1.0-or-later

//! Optional disease → treatment suggestions
//!
//! The catalog is a JSON or YAML object keyed by disease name. Values may
//! be a single string or a list of strings. A missing catalog file is an
//! empty catalog; an unreadable or unparsable one is an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreatmentCatalog {
    entries: HashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TreatmentValue {
    One(String),
    Many(Vec<String>),
}

impl From<TreatmentValue> for Vec<String> {
    fn from(value: TreatmentValue) -> Self {
        match value {
            TreatmentValue::One(text) => vec![text],
            TreatmentValue::Many(list) => list,
        }
    }
}

impl TreatmentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let raw =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let parsed: HashMap<String, TreatmentValue> =
            match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?,
                _ => serde_json::from_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?,
            };

        Ok(Self {
            entries: parsed
                .into_iter()
                .map(|(disease, value)| (disease, value.into()))
                .collect(),
        })
    }

    pub fn insert(&mut self, disease: impl Into<String>, treatments: Vec<String>) {
        self.entries.insert(disease.into(), treatments);
    }

    pub fn lookup(&self, disease: &str) -> &[String] {
        self.entries
            .get(disease)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn diseases(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
