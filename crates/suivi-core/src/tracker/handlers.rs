//! Operations that return display wrapper types for the Tracker.

use super::Tracker;
use crate::{
    display::{RecordSummaries, StepDefinitions, Users, Workshops},
    error::Result,
    params::{ListRecords, ListUsers},
};

impl Tracker {
    /// Record summaries, newest first, ready for list display.
    pub async fn list_records_summary(&self, params: &ListRecords) -> Result<RecordSummaries> {
        self.list_records(params).await.map(RecordSummaries)
    }

    pub async fn list_users_summary(&self, params: &ListUsers) -> Result<Users> {
        self.list_users(params).await.map(Users)
    }

    pub async fn list_workshops_summary(&self) -> Result<Workshops> {
        self.list_workshops().await.map(Workshops)
    }

    /// The checklist template in order.
    pub async fn list_step_definitions_summary(&self) -> Result<StepDefinitions> {
        self.list_step_definitions().await.map(StepDefinitions)
    }
}
