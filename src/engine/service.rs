// SPDX-License-Identifier: PMPL-1.0-or-later

//! Operation boundary for the calling layer
//!
//! Loader failures come back as `Err` untouched. Computation failures are
//! logged and folded into an error reply so the caller can still render a
//! complete response.

use crate::engine::infer;
use crate::engine::source::TableSource;
use crate::error::{ComputationError, DataSourceResult};
use crate::treatments::TreatmentCatalog;
use crate::types::*;
use std::collections::HashSet;
use tracing::{debug, warn};

pub struct InferenceService<S> {
    source: S,
    scoring: ScoringMode,
    treatments: TreatmentCatalog,
}

impl<S: TableSource> InferenceService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            scoring: ScoringMode::default(),
            treatments: TreatmentCatalog::default(),
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_treatments(mut self, treatments: TreatmentCatalog) -> Self {
        self.treatments = treatments;
        self
    }

    pub fn scoring(&self) -> ScoringMode {
        self.scoring
    }

    pub fn treatments(&self) -> &TreatmentCatalog {
        &self.treatments
    }

    pub fn suggest(&self, symptoms: &HashSet<String>) -> DataSourceResult<SuggestionReply> {
        let table = self.source.load()?;
        let reply = match infer::suggest_related_symptoms(&table, symptoms) {
            Ok(suggested_symptoms) => {
                debug!(
                    observed = symptoms.len(),
                    suggested = suggested_symptoms.len(),
                    "suggestion computed"
                );
                SuggestionReply::Suggested { suggested_symptoms }
            }
            Err(err) => {
                warn!(error = %err, "suggestion failed");
                SuggestionReply::Failed {
                    error: err.to_string(),
                }
            }
        };
        Ok(reply)
    }

    pub fn diagnose(&self, symptoms: &HashSet<String>) -> DataSourceResult<DiagnosisReply> {
        let table = self.source.load()?;
        let reply = match infer::most_probable_disease_with(&table, symptoms, self.scoring) {
            Ok(diagnosis) => self.found(symptoms, diagnosis),
            Err(err) => Self::failed(err),
        };
        Ok(reply)
    }

    /// Diagnosis plus the full ranking, both from a single table load.
    /// The ranking is empty when the reply is an error.
    pub fn diagnose_ranked(
        &self,
        symptoms: &HashSet<String>,
    ) -> DataSourceResult<(DiagnosisReply, Vec<DiseaseScore>)> {
        let table = self.source.load()?;
        Ok(match infer::rank_diseases(&table, symptoms, self.scoring) {
            Ok(ranking) => {
                let diagnosis = match ranking.first() {
                    Some(top) => Diagnosis::Disease(top.disease.clone()),
                    None => Diagnosis::NoMatch,
                };
                (self.found(symptoms, diagnosis), ranking)
            }
            Err(err) => (Self::failed(err), Vec::new()),
        })
    }

    fn found(&self, symptoms: &HashSet<String>, diagnosis: Diagnosis) -> DiagnosisReply {
        debug!(observed = symptoms.len(), result = %diagnosis, "diagnosis computed");
        let treatments = diagnosis
            .disease()
            .map(|name| self.treatments.lookup(name).to_vec())
            .unwrap_or_default();
        DiagnosisReply::Found {
            disease: diagnosis.to_string(),
            treatments,
        }
    }

    fn failed(err: ComputationError) -> DiagnosisReply {
        warn!(error = %err, "diagnosis failed");
        DiagnosisReply::Failed {
            error: format!("Error: {}", err),
        }
    }

    /// Dispatch a wire request to the named operation
    pub fn handle(&self, op: Operation, request: &SymptomRequest) -> DataSourceResult<Reply> {
        let symptoms = request.symptom_set();
        Ok(match op {
            Operation::Suggest => Reply::Suggestion(self.suggest(&symptoms)?),
            Operation::Diagnose => Reply::Diagnosis(self.diagnose(&symptoms)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::source::{FnSource, SnapshotSource};
    use crate::error::DataSourceError;

    fn service() -> InferenceService<SnapshotSource> {
        InferenceService::new(SnapshotSource::new(AssociationTable::from_records(vec![
            AssociationRecord::new("Flu", "fever", 1),
            AssociationRecord::new("Flu", "cough", 1),
            AssociationRecord::new("Cold", "cough", 2),
            AssociationRecord::new("Cold", "sneeze", 2),
        ])))
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_suggest_reply() {
        let reply = service().suggest(&set(&["fever"])).unwrap();
        assert_eq!(
            reply,
            SuggestionReply::Suggested {
                suggested_symptoms: vec!["cough".to_string()]
            }
        );
    }

    #[test]
    fn test_no_match_is_sentinel_not_error() {
        let reply = service().diagnose(&set(&["headache"])).unwrap();
        assert_eq!(
            reply,
            DiagnosisReply::Found {
                disease: NO_MATCH_SENTINEL.to_string(),
                treatments: Vec::new()
            }
        );
    }

    #[test]
    fn test_treatments_attached() {
        let mut catalog = TreatmentCatalog::new();
        catalog.insert("Flu", vec!["rest".to_string()]);
        let reply = service()
            .with_treatments(catalog)
            .diagnose(&set(&["fever", "cough"]))
            .unwrap();
        assert_eq!(
            reply,
            DiagnosisReply::Found {
                disease: "Flu".to_string(),
                treatments: vec!["rest".to_string()]
            }
        );
    }

    #[test]
    fn test_computation_error_becomes_reply() {
        let svc = InferenceService::new(SnapshotSource::new(AssociationTable::from_records(
            vec![AssociationRecord::new("", "fever", 1)],
        )));
        let reply = svc.diagnose(&set(&["fever"])).unwrap();
        match reply {
            DiagnosisReply::Failed { error } => assert!(error.starts_with("Error: ")),
            other => panic!("expected error reply, got {:?}", other),
        }
        assert!(matches!(
            svc.suggest(&set(&["fever"])).unwrap(),
            SuggestionReply::Failed { .. }
        ));
    }

    #[test]
    fn test_loader_error_propagates() {
        let svc = InferenceService::new(FnSource(|| {
            Err::<AssociationTable, _>(DataSourceError::FieldCount { line: 1, found: 2 })
        }));
        assert!(matches!(
            svc.suggest(&set(&["fever"])),
            Err(DataSourceError::FieldCount { .. })
        ));
        assert!(svc.diagnose(&set(&["fever"])).is_err());
    }

    #[test]
    fn test_ranked_diagnosis_uses_one_load() {
        let loads = std::sync::atomic::AtomicUsize::new(0);
        let svc = InferenceService::new(FnSource(|| {
            let call = loads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            // every later load would disagree with the first
            let leader = if call == 0 { "Flu" } else { "Cold" };
            Ok::<_, DataSourceError>(AssociationTable::from_records(vec![
                AssociationRecord::new(leader, "fever", 1),
                AssociationRecord::new(leader, "cough", 1),
                AssociationRecord::new("Other", "cough", 2),
            ]))
        }));

        let (reply, ranking) = svc.diagnose_ranked(&set(&["fever", "cough"])).unwrap();
        assert_eq!(loads.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(
            reply,
            DiagnosisReply::Found {
                disease: "Flu".to_string(),
                treatments: Vec::new()
            }
        );
        assert_eq!(ranking[0].disease, "Flu");
        assert_eq!(ranking[0].score, 2);
        assert_eq!(ranking[1].disease, "Other");
    }

    #[test]
    fn test_ranked_diagnosis_matches_plain_diagnosis() {
        let cases: [&[&str]; 4] = [&["fever"], &["cough"], &["sneeze", "cough"], &["headache"]];
        for symptoms in cases {
            let observed = set(symptoms);
            let (ranked, _) = service().diagnose_ranked(&observed).unwrap();
            assert_eq!(ranked, service().diagnose(&observed).unwrap());
        }
    }

    #[test]
    fn test_ranked_diagnosis_reports_computation_error() {
        let svc = InferenceService::new(SnapshotSource::new(AssociationTable::from_records(
            vec![AssociationRecord::new("", "fever", 1)],
        )));
        let (reply, ranking) = svc.diagnose_ranked(&set(&["fever"])).unwrap();
        assert!(matches!(reply, DiagnosisReply::Failed { .. }));
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_handle_dispatch() {
        let req = SymptomRequest::new(["fever", "cough", "fever"]);
        let reply = service().handle(Operation::Diagnose, &req).unwrap();
        assert_eq!(
            serde_json::to_string(&reply).unwrap(),
            r#"{"disease":"Flu"}"#
        );
    }
}
