//! User accounts, workshops and step definitions.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::Role;

/// A registered account.
///
/// Accounts are created inactive by signup and activated by an administrator;
/// only active accounts may act on records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier for the user
    pub id: u64,

    /// Login name, unique across users
    pub username: String,

    /// Contact address given at signup
    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// Role requested at signup
    pub role: Role,

    /// Whether an administrator has activated the account
    pub is_active: bool,

    /// Timestamp when the account was requested (UTC)
    pub created_at: Timestamp,
}

impl User {
    /// "First Last", falling back to the username when both are blank.
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

/// A production workshop (atelier) where records are run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workshop {
    pub id: u64,
    pub name: String,
}

/// An ordered checklist entry of the workflow template (étape).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepDefinition {
    /// Unique identifier for the definition
    pub id: u64,

    /// Short name of the step
    pub name: String,

    /// What the step is about
    pub description: String,

    /// Instructions (consignes) the operator must follow
    pub instructions: String,

    /// Position in the template, unique per template
    pub order: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: 1,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role: Role::Operator,
            is_active: true,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_full_name_joins_first_and_last() {
        assert_eq!(user("Jeanne", "Doe").full_name(), "Jeanne Doe");
        assert_eq!(user("Jeanne", "").full_name(), "Jeanne");
    }

    #[test]
    fn test_full_name_falls_back_to_username() {
        assert_eq!(user("", " ").full_name(), "jdoe");
    }
}
