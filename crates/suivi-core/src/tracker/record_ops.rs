//! Record operations for the Tracker.

use jiff::Timestamp;

use super::Tracker;
use crate::{
    display::RecordExport,
    error::Result,
    models::{Record, RecordSummary},
    params::{ApplyAction, CreateRecord, Id, ListRecords},
    workflow::ActionOutcome,
};

impl Tracker {
    /// Opens a record; its steps are instantiated from the current template.
    pub async fn create_record(&self, params: &CreateRecord) -> Result<Record> {
        let params = params.clone();
        self.with_database(move |db| db.create_record(&params))
            .await
    }

    /// Loads the full graph of a record.
    pub async fn load_record(&self, params: &Id) -> Result<Record> {
        let id = params.id;
        self.with_database(move |db| db.load_record(id)).await
    }

    /// Persists the full graph of a record and returns it as stored.
    ///
    /// Validation slots already set in the database are never overwritten;
    /// a conflicting slot fails with `AlreadyValidated` and nothing is saved.
    pub async fn save_record(&self, record: &Record) -> Result<Record> {
        let record = record.clone();
        self.with_database(move |db| db.save_record(&record))
            .await
    }

    /// Applies a command to a stored record at the current time.
    pub async fn apply_action(&self, params: &ApplyAction) -> Result<(Record, ActionOutcome)> {
        self.apply_action_at(params, Timestamp::now()).await
    }

    /// Applies a command to a stored record as of `now`.
    pub async fn apply_action_at(
        &self,
        params: &ApplyAction,
        now: Timestamp,
    ) -> Result<(Record, ActionOutcome)> {
        let params = params.clone();
        self.with_database(move |db| db.apply_action(&params, now))
            .await
    }

    pub async fn list_records(&self, params: &ListRecords) -> Result<Vec<RecordSummary>> {
        let params = params.clone();
        self.with_database(move |db| db.list_records(&params))
            .await
    }

    pub async fn export_record(&self, params: &Id) -> Result<RecordExport> {
        let id = params.id;
        self.with_database(move |db| db.export_record(id)).await
    }
}
