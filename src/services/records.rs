//! Record list state shared by the list, form, and detail commands.
//!
//! Owned by `main` and handed to command handlers by reference. Each
//! operation clears the previous error, and on failure keeps the message
//! for display and returns the error to the caller.

use crate::domain::models::PriorAuth;
use crate::services::api::{ApiError, PriorAuthApi};
use crate::services::upload::{create_with_documents, NewPriorAuth};

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<PriorAuth>,
    loading: bool,
    error: Option<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[PriorAuth] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&PriorAuth> {
        self.records.iter().find(|r| r.id == id)
    }

    fn begin(&mut self) {
        self.error = None;
        self.loading = true;
    }

    fn track<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        self.loading = false;
        if let Err(e) = &result {
            tracing::debug!(error = %e, "record store operation failed");
            self.error = Some(e.to_string());
        }
        result
    }

    pub fn refresh<A: PriorAuthApi + ?Sized>(&mut self, api: &A) -> Result<(), ApiError> {
        self.begin();
        let fetched = api.list_prior_auths();
        let records = self.track(fetched)?;
        self.records = records;
        Ok(())
    }

    /// Uploads both documents, creates the record, then reloads the list.
    pub fn add<A: PriorAuthApi + ?Sized>(
        &mut self,
        api: &A,
        form: &NewPriorAuth,
    ) -> Result<PriorAuth, ApiError> {
        self.begin();
        let created = create_with_documents(api, form);
        let created = self.track(created)?;
        self.refresh(api)?;
        Ok(created)
    }

    pub fn remove<A: PriorAuthApi + ?Sized>(&mut self, api: &A, id: &str) -> Result<(), ApiError> {
        self.begin();
        let deleted = api.delete_prior_auth(id);
        self.track(deleted)?;
        self.refresh(api)
    }
}
