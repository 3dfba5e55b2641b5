use crate::domain::questions::AuthQuestion;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadedFile {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub upload_date: Option<String>,
}

/// One prior authorization record. `auth_questions` is only populated once
/// the backend has extracted criteria from the authorization document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PriorAuth {
    pub id: String,
    pub patient_name: String,
    #[serde(default)]
    pub date: String,
    pub procedure: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub auth_document: Option<UploadedFile>,
    #[serde(default)]
    pub clinical_notes: Option<UploadedFile>,
    #[serde(default)]
    pub auth_questions: Option<AuthQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePriorAuthRequest {
    pub patient_name: String,
    pub procedure: String,
    pub auth_document_id: String,
    pub clinical_notes_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdatePriorAuthRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UpdatePriorAuthRequest {
    pub fn is_empty(&self) -> bool {
        self.patient_name.is_none() && self.procedure.is_none() && self.status.is_none()
    }
}

/// Medical necessity question attached to a record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NecessityQuestion {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionAnswerUpdate {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Badge class for a record status. Anything that is not an explicit
/// decision renders as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Approved,
    Denied,
    Pending,
}

impl StatusClass {
    pub fn of(status: &str) -> Self {
        match status {
            "approved" => StatusClass::Approved,
            "denied" => StatusClass::Denied,
            _ => StatusClass::Pending,
        }
    }
}

#[derive(Serialize, Clone)]
pub struct RecordRow {
    pub id: String,
    pub patient_name: String,
    pub date: String,
    pub procedure: String,
    pub status: String,
    pub status_class: StatusClass,
}

#[derive(Serialize)]
pub struct QuestionGroup {
    pub category: String,
    pub questions: Vec<NecessityQuestion>,
}

#[derive(Serialize)]
pub struct ConfigReport {
    pub base_url: String,
    pub base_url_source: String,
    pub config_path: String,
    pub poll_interval_secs: u64,
    pub max_polls: u32,
}
