// SPDX-License-Identifier: PMPL-1.0-or-later

//! Builds reports from service replies

use crate::report::InferenceReport;
use crate::types::*;
use chrono::Utc;
use std::collections::HashSet;

pub struct ReportGenerator {
    dataset: String,
}

impl ReportGenerator {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
        }
    }

    pub fn suggestion(&self, symptoms: &HashSet<String>, reply: SuggestionReply) -> InferenceReport {
        let mut report = self.base(symptoms);
        match reply {
            SuggestionReply::Suggested { suggested_symptoms } => {
                report.suggested_symptoms = Some(suggested_symptoms);
            }
            SuggestionReply::Failed { error } => report.error = Some(error),
        }
        report
    }

    pub fn diagnosis(
        &self,
        symptoms: &HashSet<String>,
        reply: DiagnosisReply,
        ranking: Vec<DiseaseScore>,
    ) -> InferenceReport {
        let mut report = self.base(symptoms);
        match reply {
            DiagnosisReply::Found {
                disease,
                treatments,
            } => {
                report.disease = Some(disease);
                report.treatments = treatments;
                report.ranking = ranking;
            }
            DiagnosisReply::Failed { error } => report.error = Some(error),
        }
        report
    }

    fn base(&self, symptoms: &HashSet<String>) -> InferenceReport {
        let mut sorted: Vec<String> = symptoms.iter().cloned().collect();
        sorted.sort();
        InferenceReport {
            generated_at: Utc::now().to_rfc3339(),
            dataset: self.dataset.clone(),
            symptoms: sorted,
            suggested_symptoms: None,
            disease: None,
            treatments: Vec::new(),
            ranking: Vec::new(),
            error: None,
        }
    }
}
