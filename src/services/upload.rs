//! PDF intake: local validation and the two-document create flow.

use crate::cli::FileType;
use crate::domain::models::{CreatePriorAuthRequest, PriorAuth, UploadedFile};
use crate::services::api::{ApiError, PriorAuthApi};
use std::path::Path;

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const PDF_MIME: &str = "application/pdf";

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("Only PDF files are allowed")]
    NotPdf { path: String },
    #[error("File size must be less than 10MB")]
    TooLarge { path: String, size: u64 },
    #[error("cannot read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

impl UploadError {
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::NotPdf { .. } | UploadError::TooLarge { .. } => "FILE_REJECTED",
            UploadError::Unreadable { .. } => "INVALID_INPUT",
        }
    }
}

/// A PDF that passed local checks and is ready to send.
#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// MIME type as a browser would report it for this file name.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => PDF_MIME,
        _ => "application/octet-stream",
    }
}

impl PdfUpload {
    /// Checks type and size before reading the file, so oversized input is
    /// rejected without touching its contents or the network.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let shown = path.display().to_string();
        if mime_for_path(path) != PDF_MIME {
            return Err(UploadError::NotPdf { path: shown });
        }
        let meta = std::fs::metadata(path).map_err(|e| UploadError::Unreadable {
            path: shown.clone(),
            reason: e.to_string(),
        })?;
        if meta.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge {
                path: shown,
                size: meta.len(),
            });
        }
        let bytes = std::fs::read(path).map_err(|e| UploadError::Unreadable {
            path: shown.clone(),
            reason: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or(shown);
        Ok(Self {
            file_name,
            mime_type: PDF_MIME,
            bytes,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewPriorAuth {
    pub patient_name: String,
    pub procedure: String,
    pub auth_document: PdfUpload,
    pub clinical_notes: PdfUpload,
}

fn join_upload(
    handle: std::thread::ScopedJoinHandle<'_, Result<UploadedFile, ApiError>>,
) -> Result<UploadedFile, ApiError> {
    handle
        .join()
        .unwrap_or_else(|_| Err(ApiError::Network("upload worker panicked".to_string())))
}

/// Uploads both documents in parallel and creates the record only once both
/// succeeded. A file uploaded before its sibling failed stays on the server.
pub fn create_with_documents<A: PriorAuthApi + ?Sized>(
    api: &A,
    form: &NewPriorAuth,
) -> Result<PriorAuth, ApiError> {
    let (doc, notes) = std::thread::scope(|s| {
        let doc = s.spawn(|| api.upload_file(&form.auth_document, FileType::PriorAuthorization));
        let notes = s.spawn(|| api.upload_file(&form.clinical_notes, FileType::ClinicalNotes));
        (join_upload(doc), join_upload(notes))
    });

    let (doc, notes) = match (doc, notes) {
        (Ok(d), Ok(n)) => (d, n),
        (Err(e), other) | (other, Err(e)) => {
            if let Ok(orphan) = other {
                tracing::warn!(file_id = %orphan.id, "sibling upload failed; uploaded file left on server");
            }
            return Err(e);
        }
    };

    tracing::debug!(auth_document_id = %doc.id, clinical_notes_id = %notes.id, "documents uploaded");
    api.create_prior_auth(&CreatePriorAuthRequest {
        patient_name: form.patient_name.clone(),
        procedure: form.procedure.clone(),
        auth_document_id: doc.id,
        clinical_notes_id: notes.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn accepts_small_pdf() {
        let tmp = TempDir::new().expect("tmp");
        let p = tmp.path().join("Notes.PDF");
        fs::write(&p, b"%PDF-1.4\n").expect("write");
        let up = PdfUpload::from_path(&p).expect("valid pdf");
        assert_eq!(up.file_name, "Notes.PDF");
        assert_eq!(up.mime_type, PDF_MIME);
        assert_eq!(up.bytes, b"%PDF-1.4\n");
    }

    #[test]
    fn rejects_non_pdf() {
        let tmp = TempDir::new().expect("tmp");
        let p = tmp.path().join("notes.docx");
        fs::write(&p, b"x").expect("write");
        let err = PdfUpload::from_path(&p).expect_err("must reject");
        assert_eq!(err.to_string(), "Only PDF files are allowed");
        assert_eq!(err.code(), "FILE_REJECTED");
    }

    #[test]
    fn rejects_oversized_pdf() {
        let tmp = TempDir::new().expect("tmp");
        let p = tmp.path().join("big.pdf");
        let f = fs::File::create(&p).expect("create");
        f.set_len(12 * 1024 * 1024).expect("extend");
        let err = PdfUpload::from_path(&p).expect_err("must reject");
        assert!(matches!(err, UploadError::TooLarge { size, .. } if size == 12 * 1024 * 1024));
        assert!(err.to_string().contains("10MB"));
    }

    #[test]
    fn exactly_ten_mib_is_allowed() {
        let tmp = TempDir::new().expect("tmp");
        let p = tmp.path().join("edge.pdf");
        let f = fs::File::create(&p).expect("create");
        f.set_len(MAX_UPLOAD_BYTES).expect("extend");
        assert!(PdfUpload::from_path(&p).is_ok());
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = PdfUpload::from_path(Path::new("/nonexistent/auth.pdf")).expect_err("missing");
        assert!(matches!(err, UploadError::Unreadable { .. }));
    }
}
