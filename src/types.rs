// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for diagno
//!
//! The association table and its records, inference outcomes, and the
//! request/reply shapes exchanged with the calling layer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Text reported when no input symptom matches any record.
pub const NO_MATCH_SENTINEL: &str = "No matching disease found.";

/// Upper bound on the number of suggested symptoms.
pub const SUGGESTION_LIMIT: usize = 4;

/// One `disease,symptom,group_number` row of the dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssociationRecord {
    pub disease: String,
    pub symptom: String,
    pub group_number: i64,
}

impl AssociationRecord {
    pub fn new(disease: impl Into<String>, symptom: impl Into<String>, group_number: i64) -> Self {
        Self {
            disease: disease.into(),
            symptom: symptom.into(),
            group_number,
        }
    }
}

/// Ordered, read-only snapshot of the association dataset.
///
/// Tables produced by the loader are validated (no empty disease or
/// symptom). Tables assembled with [`AssociationTable::from_records`] are
/// taken as given; the inference operations report invalid rows they
/// touch as computation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationTable {
    records: Vec<AssociationRecord>,
}

impl AssociationTable {
    pub fn from_records(records: Vec<AssociationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AssociationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct symptoms in first-seen order
    pub fn symptoms(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.symptom.as_str()))
    }

    /// Distinct diseases in first-seen order
    pub fn diseases(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.disease.as_str()))
    }
}

impl FromIterator<AssociationRecord> for AssociationTable {
    fn from_iter<I: IntoIterator<Item = AssociationRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

/// How matched records are scored per disease
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMode {
    /// Every matching row counts, duplicate rows included
    #[default]
    Rows,
    /// Each distinct matching symptom counts once per disease
    DistinctSymptoms,
}

/// Outcome of the disease-ranking operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Disease(String),
    NoMatch,
}

impl Diagnosis {
    pub fn disease(&self) -> Option<&str> {
        match self {
            Diagnosis::Disease(name) => Some(name),
            Diagnosis::NoMatch => None,
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnosis::Disease(name) => write!(f, "{}", name),
            Diagnosis::NoMatch => write!(f, "{}", NO_MATCH_SENTINEL),
        }
    }
}

/// One row of a full disease ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseScore {
    pub disease: String,
    pub score: usize,
}

/// Which operation a request is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Suggest,
    Diagnose,
}

/// Body sent by the calling layer: `{"symptoms": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
}

impl SymptomRequest {
    pub fn new<I, S>(symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symptoms: symptoms.into_iter().map(Into::into).collect(),
        }
    }

    /// Input symptoms as a set; caller order and duplicates are not significant
    pub fn symptom_set(&self) -> HashSet<String> {
        self.symptoms.iter().cloned().collect()
    }
}

/// Reply to a suggestion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestionReply {
    Suggested { suggested_symptoms: Vec<String> },
    Failed { error: String },
}

/// Reply to a diagnosis request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosisReply {
    Found {
        disease: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        treatments: Vec<String>,
    },
    Failed {
        error: String,
    },
}

/// Either reply, for callers that dispatch on [`Operation`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Suggestion(SuggestionReply),
    Diagnosis(DiagnosisReply),
}
