//! Data completeness rules for the timed tasks.

use crate::{
    error::{Result, WorkflowError},
    models::{ComponentMeasurement, MortarMix},
};

/// A task whose required fields must all be filled in before validation.
pub trait Completeness {
    /// Name used in error messages.
    const TASK: &'static str;

    /// Names of the required fields that are still missing.
    fn missing_fields(&self) -> Vec<&'static str>;

    fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Fail with `IncompleteData` listing what is missing.
    fn ensure_complete(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::IncompleteData {
                task: Self::TASK,
                missing,
            })
        }
    }
}

fn blank(text: &str) -> bool {
    text.trim().is_empty()
}

impl Completeness for ComponentMeasurement {
    const TASK: &'static str = "Component measurement";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing: Vec<_> = self
            .quantities()
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect();
        if blank(&self.comments) {
            missing.push("comments");
        }
        missing
    }
}

impl Completeness for MortarMix {
    const TASK: &'static str = "Mortar mix";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.density.is_none() {
            missing.push("density");
        }
        if blank(&self.comments) {
            missing.push("comments");
        }
        missing.extend(
            self.checklist
                .items()
                .into_iter()
                .filter(|(_, done)| !done)
                .map(|(name, _)| name),
        );
        missing
    }
}
