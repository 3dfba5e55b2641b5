//! List and detail views assembled from fetched records.

use crate::cli::DetailTab;
use crate::domain::models::{PriorAuth, RecordRow, StatusClass, UploadedFile};
use crate::services::criteria_view::{render_report, CriteriaReport};
use crate::services::detail::Phase;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// `M/D/YYYY`, or the input unchanged when it is not a recognizable date.
/// Offsets are not converted; the calendar date is taken as written.
pub fn format_date(raw: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|d| d.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|d| d.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match parsed {
        Ok(d) => format!("{}/{}/{}", d.month(), d.day(), d.year()),
        Err(_) => raw.to_string(),
    }
}

pub fn record_row(r: &PriorAuth) -> RecordRow {
    RecordRow {
        id: r.id.clone(),
        patient_name: r.patient_name.clone(),
        date: format_date(&r.date),
        procedure: r.procedure.clone(),
        status: r.status.clone(),
        status_class: StatusClass::of(&r.status),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FilePane {
    pub file: UploadedFile,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailSnapshot {
    pub phase: &'static str,
    pub tab: DetailTab,
    pub record: PriorAuth,
    pub status_class: StatusClass,
    pub clinical_notes: Option<FilePane>,
    pub auth_document: Option<FilePane>,
    pub criteria: CriteriaReport,
}

impl DetailSnapshot {
    pub fn new(
        phase: &Phase,
        tab: DetailTab,
        record: &PriorAuth,
        file_url: impl Fn(&str) -> String,
    ) -> Self {
        let pane = |f: &Option<UploadedFile>| {
            f.as_ref().map(|file| FilePane {
                file: file.clone(),
                url: file_url(&file.id),
            })
        };
        Self {
            phase: phase.name(),
            tab,
            status_class: StatusClass::of(&record.status),
            clinical_notes: pane(&record.clinical_notes),
            auth_document: pane(&record.auth_document),
            criteria: CriteriaReport::from_questions(record.auth_questions.as_ref()),
            record: record.clone(),
        }
    }
}

fn pane_line(title: &str, pane: &Option<FilePane>, missing: &str) -> String {
    match pane {
        Some(p) => {
            let name = if p.file.original_name.is_empty() {
                &p.file.filename
            } else {
                &p.file.original_name
            };
            format!("{}: {} <{}>", title, name, p.url)
        }
        None => missing.to_string(),
    }
}

pub fn render_detail(s: &DetailSnapshot) -> Vec<String> {
    let r = &s.record;
    let mut lines = vec![
        r.patient_name.clone(),
        format!("{} • {} [{}]", r.procedure, format_date(&r.date), r.status),
        pane_line("Clinical Notes", &s.clinical_notes, "No clinical notes available"),
        String::new(),
    ];
    match s.tab {
        DetailTab::Criteria => lines.extend(render_report(&s.criteria)),
        DetailTab::Document => {
            lines.push("Original Document".to_string());
            lines.push(pane_line(
                "Prior Authorization Document",
                &s.auth_document,
                "No authorization document available",
            ));
        }
    }
    lines
}
