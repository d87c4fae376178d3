// SPDX-License-Identifier: PMPL-1.0-or-later

//! Suggestion and disease-ranking operations
//!
//! Both operations are pure functions of (table, observed symptoms).
//! Ordering is always derived from table order:
//!
//! - suggestions appear in the order their first related record appears;
//! - tied diseases rank by the position of their first matched record.

use crate::error::{ComputationError, ComputationResult};
use crate::types::*;
use std::collections::{HashMap, HashSet};

/// Records whose symptom is one of the observed symptoms (the matched set),
/// paired with their table index.
pub fn matched_records<'a>(
    table: &'a AssociationTable,
    observed: &HashSet<String>,
) -> ComputationResult<Vec<(usize, &'a AssociationRecord)>> {
    let mut matched = Vec::new();
    for (index, record) in table.records().iter().enumerate() {
        if observed.contains(&record.symptom) {
            check_record(index, record)?;
            matched.push((index, record));
        }
    }
    Ok(matched)
}

/// Suggest up to [`SUGGESTION_LIMIT`] symptoms sharing a group with any
/// observed symptom, never echoing an observed one.
///
/// Rule: Related(s) :- Record(_, o, g), Observed(o), Record(_, s, g), ¬Observed(s)
pub fn suggest_related_symptoms(
    table: &AssociationTable,
    observed: &HashSet<String>,
) -> ComputationResult<Vec<String>> {
    let related_groups: HashSet<i64> = matched_records(table, observed)?
        .into_iter()
        .map(|(_, record)| record.group_number)
        .collect();

    if related_groups.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut suggestions = Vec::new();
    for (index, record) in table.records().iter().enumerate() {
        if !related_groups.contains(&record.group_number) {
            continue;
        }
        check_record(index, record)?;
        if observed.contains(&record.symptom) || !seen.insert(record.symptom.as_str()) {
            continue;
        }
        suggestions.push(record.symptom.clone());
        if suggestions.len() == SUGGESTION_LIMIT {
            break;
        }
    }

    Ok(suggestions)
}

/// Most probable disease by matching row count.
pub fn most_probable_disease(
    table: &AssociationTable,
    observed: &HashSet<String>,
) -> ComputationResult<Diagnosis> {
    most_probable_disease_with(table, observed, ScoringMode::Rows)
}

/// Most probable disease under an explicit scoring mode
pub fn most_probable_disease_with(
    table: &AssociationTable,
    observed: &HashSet<String>,
    mode: ScoringMode,
) -> ComputationResult<Diagnosis> {
    let ranking = rank_diseases(table, observed, mode)?;
    Ok(match ranking.into_iter().next() {
        Some(top) => Diagnosis::Disease(top.disease),
        None => Diagnosis::NoMatch,
    })
}

/// Every disease with at least one matching record, highest score first.
///
/// Under [`ScoringMode::Rows`] a disease listing the same symptom twice
/// scores twice for it.
pub fn rank_diseases(
    table: &AssociationTable,
    observed: &HashSet<String>,
    mode: ScoringMode,
) -> ComputationResult<Vec<DiseaseScore>> {
    let matched = matched_records(table, observed)?;

    let mut first_seen: Vec<&str> = Vec::new();
    let mut scores: HashMap<&str, usize> = HashMap::new();
    let mut counted: HashSet<(&str, &str)> = HashSet::new();

    for (_, record) in &matched {
        let disease = record.disease.as_str();
        if mode == ScoringMode::DistinctSymptoms
            && !counted.insert((disease, record.symptom.as_str()))
        {
            continue;
        }
        let score = scores.entry(disease).or_insert_with(|| {
            first_seen.push(disease);
            0
        });
        *score += 1;
    }

    let mut ranking: Vec<DiseaseScore> = first_seen
        .into_iter()
        .map(|disease| DiseaseScore {
            disease: disease.to_string(),
            score: scores[disease],
        })
        .collect();
    // stable: ties keep first-seen order
    ranking.sort_by(|a, b| b.score.cmp(&a.score));

    Ok(ranking)
}

fn check_record(index: usize, record: &AssociationRecord) -> ComputationResult<()> {
    if record.disease.is_empty() {
        return Err(ComputationError::MalformedRecord {
            index,
            field: "disease",
        });
    }
    if record.symptom.is_empty() {
        return Err(ComputationError::MalformedRecord {
            index,
            field: "symptom",
        });
    }
    Ok(())
}
