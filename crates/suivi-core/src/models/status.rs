//! Status enumerations for steps and signer roles.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Inspection outcome of a dynamic step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepValidation {
    /// Not inspected yet
    #[default]
    Pending,

    /// Step passed inspection; the next step unlocks
    Conforming,

    /// Step failed inspection; it stays active until re-inspected
    NonConforming,
}

impl FromStr for StepValidation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" | "en_attente" => Ok(StepValidation::Pending),
            "conforming" | "conforme" => Ok(StepValidation::Conforming),
            "non_conforming" | "nonconforming" | "non_conforme" => {
                Ok(StepValidation::NonConforming)
            }
            _ => Err(format!("Invalid step validation status: {s}")),
        }
    }
}

impl StepValidation {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StepValidation::Pending => "pending",
            StepValidation::Conforming => "conforming",
            StepValidation::NonConforming => "non_conforming",
        }
    }

    /// Label shown on exports and inspection sheets.
    pub fn label(&self) -> &'static str {
        match self {
            StepValidation::Pending => "En attente",
            StepValidation::Conforming => "Conforme",
            StepValidation::NonConforming => "Non conforme",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use suivi_core::models::StepValidation;
    ///
    /// assert_eq!(StepValidation::Conforming.with_icon(), "✓ Conforme");
    /// assert_eq!(StepValidation::NonConforming.with_icon(), "✗ Non conforme");
    /// assert_eq!(StepValidation::Pending.with_icon(), "○ En attente");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepValidation::Conforming => "✓ Conforme",
            StepValidation::NonConforming => "✗ Non conforme",
            StepValidation::Pending => "○ En attente",
        }
    }
}

/// The two signer roles of a record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Runs the process and records the measurements
    Operator,

    /// Inspects the process and rules on conformity
    Controller,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "operator" | "operateur" => Ok(Role::Operator),
            "controller" | "controleur" => Ok(Role::Controller),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

impl Role {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Controller => "controller",
        }
    }
}
