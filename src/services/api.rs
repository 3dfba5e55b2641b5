//! Thin client over the prior authorization REST API.

use crate::cli::FileType;
use crate::domain::models::{
    CreatePriorAuthRequest, Health, MessageResponse, NecessityQuestion, PriorAuth,
    QuestionAnswerUpdate, UpdatePriorAuthRequest, UploadedFile,
};
use crate::services::upload::PdfUpload;
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("network error: {0}")]
    Network(String),
    /// Every non-2xx status collapses into this one variant.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidBaseUrl(_) => "INVALID_INPUT",
            ApiError::Network(_) => "NETWORK_ERROR",
            ApiError::Http { .. } => "HTTP_ERROR",
            ApiError::Decode(_) => "DECODE_ERROR",
        }
    }
}

/// Backend operations the record and detail state depend on.
pub trait PriorAuthApi: Sync {
    fn list_prior_auths(&self) -> Result<Vec<PriorAuth>, ApiError>;
    fn get_prior_auth(&self, id: &str) -> Result<PriorAuth, ApiError>;
    fn create_prior_auth(&self, req: &CreatePriorAuthRequest) -> Result<PriorAuth, ApiError>;
    fn delete_prior_auth(&self, id: &str) -> Result<(), ApiError>;
    fn upload_file(&self, upload: &PdfUpload, file_type: FileType) -> Result<UploadedFile, ApiError>;
}

pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        // no client-side timeout on any request
        let http = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send(&self, method: Method, segments: &[&str], build: impl FnOnce(RequestBuilder) -> RequestBuilder) -> Result<Response, ApiError> {
        let url = self.url(segments);
        tracing::debug!(%method, path = url.path(), "api request");
        let resp = build(self.http.request(method.clone(), url.clone()))
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        tracing::debug!(%method, path = url.path(), status = status.as_u16(), "api response");
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    fn json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let body = resp.bytes().map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn health(&self) -> Result<Health, ApiError> {
        Self::json(self.send(Method::GET, &["health"], |r| r)?)
    }

    pub fn update_prior_auth(&self, id: &str, req: &UpdatePriorAuthRequest) -> Result<PriorAuth, ApiError> {
        Self::json(self.send(Method::PUT, &["api", "prior-authorizations", id], |r| r.json(req))?)
    }

    /// Raw PDF bytes; the backend answers with a redirect to storage, which
    /// the client follows.
    pub fn fetch_file(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self.send(Method::GET, &["api", "files", id], |r| r)?;
        let body = resp.bytes().map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(body.to_vec())
    }

    pub fn delete_file(&self, id: &str) -> Result<MessageResponse, ApiError> {
        Self::json(self.send(Method::DELETE, &["api", "files", id], |r| r)?)
    }

    pub fn file_url(&self, id: &str) -> String {
        self.url(&["api", "files", id]).to_string()
    }

    pub fn list_questions(&self, auth_id: &str) -> Result<Vec<NecessityQuestion>, ApiError> {
        Self::json(self.send(
            Method::GET,
            &["api", "prior-authorizations", auth_id, "questions"],
            |r| r,
        )?)
    }

    pub fn update_answers(&self, auth_id: &str, answers: &[QuestionAnswerUpdate]) -> Result<MessageResponse, ApiError> {
        Self::json(self.send(
            Method::PUT,
            &["api", "prior-authorizations", auth_id, "questions"],
            |r| r.json(answers),
        )?)
    }
}

impl PriorAuthApi for ApiClient {
    fn list_prior_auths(&self) -> Result<Vec<PriorAuth>, ApiError> {
        Self::json(self.send(Method::GET, &["api", "prior-authorizations"], |r| r)?)
    }

    fn get_prior_auth(&self, id: &str) -> Result<PriorAuth, ApiError> {
        Self::json(self.send(Method::GET, &["api", "prior-authorizations", id], |r| r)?)
    }

    fn create_prior_auth(&self, req: &CreatePriorAuthRequest) -> Result<PriorAuth, ApiError> {
        Self::json(self.send(Method::POST, &["api", "prior-authorizations"], |r| r.json(req))?)
    }

    fn delete_prior_auth(&self, id: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, &["api", "prior-authorizations", id], |r| r)?;
        Ok(())
    }

    fn upload_file(&self, upload: &PdfUpload, file_type: FileType) -> Result<UploadedFile, ApiError> {
        let part = multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload.mime_type)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);
        Self::json(self.send(Method::POST, &["api", "files", "upload"], |r| {
            r.query(&[("file_type", file_type.as_str())]).multipart(form)
        })?)
    }
}
