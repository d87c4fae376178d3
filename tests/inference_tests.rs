// SPDX-License-Identifier: PMPL-1.0-or-later

//! End-to-end inference over a dataset file

use diagno::engine::{most_probable_disease, rank_diseases, suggest_related_symptoms};
use diagno::table::load_table;
use diagno::types::*;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

const DATASET: &str = "\
Flu,fever,1
Flu,cough,1
Flu,fatigue,1
Flu,headache,1
Cold,cough,2
Cold,sneeze,2
Cold,runny nose,2
Migraine,headache,3
Migraine,nausea,3
Migraine,light sensitivity,3
Gastroenteritis,nausea,4
Gastroenteritis,vomiting,4
Gastroenteritis,diarrhea,4
Gastroenteritis,fever,4
";

fn load_fixture() -> (TempDir, AssociationTable) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dataset.csv");
    fs::write(&path, DATASET).unwrap();
    let table = load_table(&path).expect("fixture should load");
    (dir, table)
}

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn literal_table() -> AssociationTable {
    AssociationTable::from_records(vec![
        AssociationRecord::new("Flu", "fever", 1),
        AssociationRecord::new("Flu", "cough", 1),
        AssociationRecord::new("Cold", "cough", 2),
        AssociationRecord::new("Cold", "sneeze", 2),
    ])
}

#[test]
fn test_literal_examples() {
    let table = literal_table();

    assert_eq!(
        suggest_related_symptoms(&table, &set(&["fever"])).unwrap(),
        vec!["cough"]
    );
    assert_eq!(
        most_probable_disease(&table, &set(&["fever", "cough"])).unwrap(),
        Diagnosis::Disease("Flu".to_string())
    );

    let tie = most_probable_disease(&table, &set(&["cough"])).unwrap();
    assert_eq!(tie, Diagnosis::Disease("Flu".to_string()));
}

#[test]
fn test_unknown_symptoms_produce_empty_outcomes() {
    let (_dir, table) = load_fixture();
    let observed = set(&["hiccups", "Fever", "fever "]);

    assert!(suggest_related_symptoms(&table, &observed).unwrap().is_empty());
    let diagnosis = most_probable_disease(&table, &observed).unwrap();
    assert_eq!(diagnosis, Diagnosis::NoMatch);
    assert_eq!(diagnosis.to_string(), NO_MATCH_SENTINEL);
}

#[test]
fn test_suggestions_never_echo_input_and_stay_bounded() {
    let (_dir, table) = load_fixture();
    let symptoms: Vec<&str> = table.symptoms();

    // every single symptom, and every pair
    for (i, first) in symptoms.iter().enumerate() {
        let single = set(&[*first]);
        let suggestions = suggest_related_symptoms(&table, &single).unwrap();
        assert!(suggestions.len() <= SUGGESTION_LIMIT);
        assert!(!suggestions.iter().any(|s| single.contains(s)));

        for second in &symptoms[i + 1..] {
            let pair = set(&[*first, *second]);
            let suggestions = suggest_related_symptoms(&table, &pair).unwrap();
            assert!(suggestions.len() <= SUGGESTION_LIMIT);
            assert!(
                !suggestions.iter().any(|s| pair.contains(s)),
                "{:?} echoed input {:?}",
                suggestions,
                pair
            );
        }
    }
}

#[test]
fn test_suggestions_follow_table_order() {
    let (_dir, table) = load_fixture();
    // fever sits in groups 1 and 4
    let suggestions = suggest_related_symptoms(&table, &set(&["fever"])).unwrap();
    assert_eq!(suggestions, vec!["cough", "fatigue", "headache", "nausea"]);
}

#[test]
fn test_most_probable_is_deterministic() {
    let (_dir, table) = load_fixture();
    let observed = set(&["headache", "nausea", "fever"]);
    let first = most_probable_disease(&table, &observed).unwrap();
    for _ in 0..20 {
        assert_eq!(most_probable_disease(&table, &observed).unwrap(), first);
    }
}

#[test]
fn test_adding_leader_symptom_keeps_it_on_top() {
    let (_dir, table) = load_fixture();
    let base = set(&["nausea", "vomiting"]);
    assert_eq!(
        most_probable_disease(&table, &base).unwrap(),
        Diagnosis::Disease("Gastroenteritis".to_string())
    );

    let mut more = base.clone();
    more.insert("diarrhea".to_string());
    let ranking = rank_diseases(&table, &more, ScoringMode::Rows).unwrap();
    assert_eq!(ranking[0].disease, "Gastroenteritis");
    assert_eq!(ranking[0].score, 3);
}

#[test]
fn test_ranking_lists_every_matched_disease() {
    let (_dir, table) = load_fixture();
    let ranking = rank_diseases(&table, &set(&["headache", "fever"]), ScoringMode::Rows).unwrap();
    let names: Vec<&str> = ranking.iter().map(|r| r.disease.as_str()).collect();
    // Flu 2; Migraine and Gastroenteritis 1 each, in first-matched order
    assert_eq!(names, vec!["Flu", "Migraine", "Gastroenteritis"]);
    assert_eq!(ranking[0].score, 2);
}
