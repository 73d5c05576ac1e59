//! Parameter structures for Suivi operations
//!
//! These structures are shared by every interface (the CLI today) and carry
//! no framework-specific derives. Interface layers define their own argument
//! types and convert them into these with `From`:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │───▶│  Core Params    │───▶│    Tracker      │
//! │  (clap derives) │    │ (serde derives) │    │   operations    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Form payloads for the timed tasks ([`MeasurementInput`], [`MixInput`])
//! keep numeric values as raw strings: blank means "not provided" and parsing
//! happens when the payload is applied, so a malformed number surfaces as
//! [`WorkflowError::InvalidValue`] for the right field.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WorkflowError},
    models::{MixChecklist, Role},
    workflow::Command,
};

/// Generic parameters for operations requiring just an ID.
///
/// Used for operations like load_record, export_record, activate_user,
/// remove_workshop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(WorkflowError::invalid_value(field).with_reason("must not be empty"))
    } else {
        Ok(())
    }
}

/// Parameters for requesting an account.
///
/// The account is created inactive with the requested role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Login name, unique across users
    pub username: String,
    /// Contact address (required)
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Role the account will act with
    pub role: Role,
}

impl SignupRequest {
    /// Check the required fields before anything is stored.
    ///
    /// ```rust
    /// use suivi_core::{models::Role, params::SignupRequest};
    ///
    /// let request = SignupRequest {
    ///     username: "jdupont".to_string(),
    ///     email: String::new(),
    ///     first_name: "Jean".to_string(),
    ///     last_name: "Dupont".to_string(),
    ///     role: Role::Operator,
    /// };
    /// assert!(request.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        require("username", &self.username)?;
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(WorkflowError::invalid_value("email")
                .with_reason(format!("'{}' is not an email address", self.email)));
        }
        Ok(())
    }
}

/// Parameters for listing user accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsers {
    /// Only show activated accounts
    #[serde(default)]
    pub active_only: bool,
}

/// Parameters for opening a new record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRecord {
    /// User running the process
    pub operator_id: u64,
    pub workshop_id: u64,
    /// User inspecting the process; must hold the controller role
    pub controller_id: u64,
}

impl CreateRecord {
    pub fn validate(&self) -> Result<()> {
        if self.operator_id == self.controller_id {
            return Err(WorkflowError::invalid_value("controller_id")
                .with_reason("the controller must be someone other than the operator"));
        }
        Ok(())
    }
}

/// Parameters for listing records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRecords {
    /// Restrict to records run by this operator
    pub operator_id: Option<u64>,
}

/// Parameters for adding a workshop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWorkshop {
    pub name: String,
}

impl CreateWorkshop {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

/// Parameters for renaming a workshop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenameWorkshop {
    pub id: u64,
    pub name: String,
}

impl RenameWorkshop {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

/// Parameters for adding a step to the workflow template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStepDefinition {
    pub name: String,
    pub description: Option<String>,
    /// Instructions (consignes) shown to the operator
    pub instructions: Option<String>,
    /// Position in the checklist, unique across definitions
    pub order: u32,
}

impl CreateStepDefinition {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

/// Component measurement form payload.
///
/// Every quantity is the raw value typed by the operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeasurementInput {
    pub ciment: Option<String>,
    pub sable: Option<String>,
    pub agent_moussant: Option<String>,
    pub fibre_verre: Option<String>,
    pub dsp_xl: Option<String>,
    pub hdr: Option<String>,
    pub eau: Option<String>,
    pub comments: Option<String>,
}

/// Mortar mix form payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MixInput {
    pub density: Option<String>,
    pub comments: Option<String>,
    /// Unticked boxes are simply absent from a form, hence the default
    #[serde(default)]
    pub checklist: MixChecklist,
}

/// Parameters for applying a command to a stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyAction {
    pub record_id: u64,
    /// User performing the action
    pub actor_id: u64,
    pub command: Command,
}
