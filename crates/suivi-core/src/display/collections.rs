//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper formats its items with their own `Display` impl and prints a
//! fixed message when empty.

use std::{fmt, ops::Index};

use crate::models::{RecordSummary, StepDefinition, User, Workshop};

macro_rules! collection {
    ($(#[$meta:meta])* $name:ident, $item:ty, $empty:literal) => {
        $(#[$meta])*
        pub struct $name(pub Vec<$item>);

        impl $name {
            /// Check if the collection is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $name {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.is_empty() {
                    writeln!(f, $empty)
                } else {
                    for item in &self.0 {
                        write!(f, "{item}")?;
                    }
                    Ok(())
                }
            }
        }
    };
}

collection!(
    /// Newtype wrapper for displaying record summaries.
    ///
    /// ```rust
    /// use jiff::Timestamp;
    /// use suivi_core::{display::RecordSummaries, models::RecordSummary};
    ///
    /// let summary = RecordSummary {
    ///     id: 4,
    ///     workshop: "Atelier Nord".to_string(),
    ///     created_at: Timestamp::now(),
    ///     total_steps: 5,
    ///     conforming_steps: 2,
    ///     signed: false,
    /// };
    /// let output = RecordSummaries(vec![summary]).to_string();
    /// assert!(output.contains("Atelier Nord"));
    /// ```
    RecordSummaries,
    RecordSummary,
    "No records found."
);

collection!(
    /// Newtype wrapper for displaying user accounts.
    Users,
    User,
    "No users found."
);

collection!(Workshops, Workshop, "No workshops found.");

collection!(
    /// Newtype wrapper for displaying the workflow template, in order.
    StepDefinitions,
    StepDefinition,
    "No step definitions found."
);

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn summary(id: u64, workshop: &str) -> RecordSummary {
        RecordSummary {
            id,
            workshop: workshop.to_string(),
            created_at: Timestamp::from_second(1640995200).unwrap(),
            total_steps: 3,
            conforming_steps: 1,
            signed: id % 2 == 0,
        }
    }

    #[test]
    fn test_record_summaries_display() {
        let summaries = RecordSummaries(vec![summary(1, "Atelier A"), summary(2, "Atelier B")]);
        let output = summaries.to_string();
        assert!(output.contains("## Record 1 (1/3)"));
        assert!(output.contains("## Record 2 (1/3, signed)"));
        assert!(output.contains("Atelier B"));
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].id, 2);
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(RecordSummaries(vec![]).to_string(), "No records found.\n");
        assert_eq!(Users(vec![]).to_string(), "No users found.\n");
        assert_eq!(Workshops(vec![]).to_string(), "No workshops found.\n");
        assert!(StepDefinitions(vec![]).is_empty());
    }

    #[test]
    fn test_workshops_display() {
        let workshops = Workshops(vec![
            Workshop {
                id: 1,
                name: "Atelier Nord".to_string(),
            },
            Workshop {
                id: 2,
                name: "Atelier Sud".to_string(),
            },
        ]);
        assert_eq!(workshops.to_string(), "- 1. Atelier Nord\n- 2. Atelier Sud\n");
    }
}
