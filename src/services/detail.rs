//! Detail view state for one record.
//!
//! `Idle -> Loading -> {Ready, Error}`. Every fetch carries a ticket; only
//! the most recently issued ticket may change state, so an older request
//! that resolves late is dropped instead of overwriting newer data.

use crate::cli::DetailTab;
use crate::domain::models::PriorAuth;
use crate::services::api::{ApiError, PriorAuthApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error(ApiError),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: String,
    seq: u64,
}

#[derive(Debug)]
pub struct DetailView {
    id: String,
    phase: Phase,
    record: Option<PriorAuth>,
    tab: DetailTab,
    issued: u64,
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            id: String::new(),
            phase: Phase::Idle,
            record: None,
            tab: DetailTab::Criteria,
            issued: 0,
        }
    }

    fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        self.phase = Phase::Loading;
        FetchTicket {
            id: self.id.clone(),
            seq: self.issued,
        }
    }

    /// Points the view at `id` and starts a full fetch. A cached list
    /// summary, when given, is displayed meanwhile but never treated as
    /// final.
    pub fn mount(&mut self, id: &str, cached: Option<PriorAuth>) -> FetchTicket {
        if self.id != id {
            self.id = id.to_string();
            self.record = None;
        }
        if let Some(summary) = cached.filter(|c| c.id == id) {
            self.record = Some(summary);
        }
        tracing::debug!(id, "detail mount");
        self.issue()
    }

    /// Re-enters `Loading` keeping whatever is currently displayed. This is
    /// also the only way out of `Error`.
    pub fn refresh(&mut self) -> FetchTicket {
        tracing::debug!(id = %self.id, "detail refresh");
        self.issue()
    }

    /// Applies a fetch result. Returns false when the ticket is stale.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<PriorAuth, ApiError>) -> bool {
        if ticket.seq != self.issued || ticket.id != self.id {
            tracing::debug!(id = %ticket.id, seq = ticket.seq, latest = self.issued, "stale detail fetch dropped");
            return false;
        }
        match result {
            Ok(record) => {
                self.record = Some(record);
                self.phase = Phase::Ready;
            }
            Err(e) => {
                tracing::debug!(id = %self.id, error = %e, "detail fetch failed");
                self.phase = Phase::Error(e);
            }
        }
        true
    }

    /// Fetches the record for `ticket` and applies it.
    pub fn load<A: PriorAuthApi + ?Sized>(&mut self, api: &A, ticket: FetchTicket) -> bool {
        let result = api.get_prior_auth(&ticket.id);
        self.complete(ticket, result)
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn record(&self) -> Option<&PriorAuth> {
        self.record.as_ref()
    }

    pub fn has_criteria(&self) -> bool {
        self.record
            .as_ref()
            .map(|r| r.auth_questions.is_some())
            .unwrap_or(false)
    }
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, procedure: &str) -> PriorAuth {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "patient_name": "Jane Doe",
            "date": "2024-03-05T10:00:00",
            "procedure": procedure,
            "status": "pending"
        }))
        .expect("record")
    }

    #[test]
    fn mount_shows_cached_summary_while_loading() {
        let mut view = DetailView::new();
        assert_eq!(view.phase(), &Phase::Idle);
        let ticket = view.mount("pa-1", Some(record("pa-1", "cached")));
        assert_eq!(view.phase(), &Phase::Loading);
        assert_eq!(view.record().map(|r| r.procedure.as_str()), Some("cached"));

        assert!(view.complete(ticket, Ok(record("pa-1", "fresh"))));
        assert_eq!(view.phase(), &Phase::Ready);
        assert_eq!(view.record().map(|r| r.procedure.as_str()), Some("fresh"));
    }

    #[test]
    fn cached_summary_for_other_id_is_ignored() {
        let mut view = DetailView::new();
        view.mount("pa-1", Some(record("pa-2", "other")));
        assert!(view.record().is_none());
    }

    #[test]
    fn refresh_keeps_displayed_record() {
        let mut view = DetailView::new();
        let t = view.mount("pa-1", None);
        view.complete(t, Ok(record("pa-1", "v1")));
        let _t2 = view.refresh();
        assert_eq!(view.phase(), &Phase::Loading);
        assert_eq!(view.record().map(|r| r.procedure.as_str()), Some("v1"));
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut view = DetailView::new();
        let first = view.mount("pa-1", None);
        let second = view.refresh();
        assert!(view.complete(second, Ok(record("pa-1", "newer"))));
        assert!(!view.complete(first, Ok(record("pa-1", "older"))));
        assert_eq!(view.record().map(|r| r.procedure.as_str()), Some("newer"));
        assert_eq!(view.phase(), &Phase::Ready);
    }

    #[test]
    fn error_is_terminal_until_refresh() {
        let mut view = DetailView::new();
        let t = view.mount("pa-1", None);
        let stale = t.clone();
        view.complete(t, Err(ApiError::Http { status: 500 }));
        assert_eq!(view.phase(), &Phase::Error(ApiError::Http { status: 500 }));

        assert!(!view.complete(stale, Ok(record("pa-1", "late"))));
        assert!(matches!(view.phase(), Phase::Error(_)));

        let retry = view.refresh();
        assert!(view.complete(retry, Ok(record("pa-1", "ok"))));
        assert_eq!(view.phase(), &Phase::Ready);
    }

    #[test]
    fn remount_on_new_id_drops_previous_record() {
        let mut view = DetailView::new();
        let t = view.mount("pa-1", None);
        view.complete(t, Ok(record("pa-1", "v1")));
        let old = view.refresh();
        let t2 = view.mount("pa-2", None);
        assert!(view.record().is_none());
        assert!(!view.complete(old, Ok(record("pa-1", "v2"))));
        assert!(view.complete(t2, Ok(record("pa-2", "b"))));
        assert_eq!(view.record().map(|r| r.id.as_str()), Some("pa-2"));
    }

    #[test]
    fn tab_switch_does_not_fetch() {
        let mut view = DetailView::new();
        let t = view.mount("pa-1", None);
        view.complete(t, Ok(record("pa-1", "v1")));
        view.select_tab(DetailTab::Document);
        assert_eq!(view.tab(), DetailTab::Document);
        assert_eq!(view.phase(), &Phase::Ready);
        view.select_tab(DetailTab::Criteria);
        assert_eq!(view.tab(), DetailTab::Criteria);
    }
}
