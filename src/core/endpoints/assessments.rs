//! Assessment endpoints

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::api::{ApiError, ApiGateway, RequestOptions, Transport};
use crate::core::models::{AiSuggestions, Assessment, Finding};

#[derive(Debug, Serialize)]
struct StartRequest {
    organization_id: i64,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    answers: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct NotesRequest<'a> {
    checklist_notes: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct SuggestionRequest<'a> {
    finding_key: &'a str,
    question_label: &'a str,
}

impl<T: Transport> ApiGateway<T> {
    pub async fn start_assessment(&self, organization_id: i64) -> Result<Assessment, ApiError> {
        let options = RequestOptions::post().json(&StartRequest { organization_id })?;
        self.request_json("/assessments/start", options).await
    }

    /// Submit questionnaire answers; the backend scores them.
    pub async fn submit_assessment(
        &self,
        id: i64,
        answers: &BTreeMap<String, String>,
    ) -> Result<Assessment, ApiError> {
        let options = RequestOptions::post().json(&SubmitRequest { answers })?;
        self.request_json(&format!("/assessments/{}/submit", id), options)
            .await
    }

    pub async fn get_assessment(&self, id: i64) -> Result<Assessment, ApiError> {
        self.request_json(&format!("/assessments/{}", id), RequestOptions::get())
            .await
    }

    pub async fn update_checklist_notes(
        &self,
        id: i64,
        checklist_notes: &BTreeMap<String, String>,
    ) -> Result<Assessment, ApiError> {
        let options = RequestOptions::patch().json(&NotesRequest { checklist_notes })?;
        self.request_json(&format!("/assessments/{}", id), options)
            .await
    }

    pub async fn assessment_findings(&self, id: i64) -> Result<Vec<Finding>, ApiError> {
        self.request_json(
            &format!("/assessments/{}/findings", id),
            RequestOptions::get(),
        )
        .await
    }

    pub async fn list_org_assessments(&self, org_id: i64) -> Result<Vec<Assessment>, ApiError> {
        self.request_json(
            &format!("/orgs/{}/assessments", org_id),
            RequestOptions::get(),
        )
        .await
    }

    /// Suggestions for one finding when `finding_key` is given, otherwise for
    /// every finding of the assessment.
    pub async fn ai_suggestions(
        &self,
        assessment_id: i64,
        finding_key: Option<&str>,
        question_label: Option<&str>,
    ) -> Result<AiSuggestions, ApiError> {
        let options = match finding_key {
            Some(finding_key) => RequestOptions::post().json(&SuggestionRequest {
                finding_key,
                question_label: question_label.unwrap_or_default(),
            })?,
            None => RequestOptions::post().body("{}"),
        };
        self.request_json(
            &format!("/assessments/{}/ai-suggestions", assessment_id),
            options,
        )
        .await
    }
}
