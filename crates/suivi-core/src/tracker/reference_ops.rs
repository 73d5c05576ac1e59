//! Workshop and step definition operations for the Tracker.

use super::Tracker;
use crate::{
    error::Result,
    models::{StepDefinition, Workshop},
    params::{CreateStepDefinition, CreateWorkshop, Id, RenameWorkshop},
};

impl Tracker {
    pub async fn create_workshop(&self, params: &CreateWorkshop) -> Result<Workshop> {
        let params = params.clone();
        self.with_database(move |db| db.create_workshop(&params))
            .await
    }

    pub async fn list_workshops(&self) -> Result<Vec<Workshop>> {
        self.with_database(|db| db.list_workshops()).await
    }

    /// Renames a workshop, returning it with its previous name.
    pub async fn rename_workshop(&self, params: &RenameWorkshop) -> Result<(Workshop, String)> {
        let params = params.clone();
        self.with_database(move |db| db.rename_workshop(&params))
            .await
    }

    /// Removes a workshop together with every record run in it.
    pub async fn remove_workshop(&self, params: &Id) -> Result<Workshop> {
        let id = params.id;
        self.with_database(move |db| db.delete_workshop(id)).await
    }

    /// Appends a step to the checklist template.
    ///
    /// Records that already have steps keep them; only records loaded for
    /// the first time afterwards pick the new definition up.
    pub async fn add_step_definition(
        &self,
        params: &CreateStepDefinition,
    ) -> Result<StepDefinition> {
        let params = params.clone();
        self.with_database(move |db| db.create_step_definition(&params))
            .await
    }

    pub async fn list_step_definitions(&self) -> Result<Vec<StepDefinition>> {
        self.with_database(|db| db.list_step_definitions()).await
    }
}
