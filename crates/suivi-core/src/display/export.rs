//! Flat export projection of a record.
//!
//! [`RecordExport`] is what leaves the system: names instead of ids, labels
//! instead of enum values, steps in checklist order and incidents newest
//! first. It renders as a markdown sheet and serializes to JSON.

use std::fmt;

use jiff::Timestamp;
use serde::Serialize;

use super::datetime::{Elapsed, LocalDateTime, MaybeDateTime};
use crate::models::{Record, User, Workshop};

/// One checklist row of an exported record.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StepRow {
    pub name: String,
    pub instructions: String,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    /// Working time as `H:MM:SS`
    pub duration: Option<String>,
    /// Validation label, e.g. "Conforme"
    pub validation: String,
    pub observations: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IncidentRow {
    pub created_at: Timestamp,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RetrospectiveRow {
    pub comment: String,
    pub created_at: Timestamp,
}

/// Export of one record with everything resolved to display values.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordExport {
    pub record_id: u64,
    pub workshop: String,
    /// Operator full name
    pub operator: String,
    /// Controller full name
    pub controller: String,
    pub created_at: Timestamp,
    pub steps: Vec<StepRow>,
    pub incidents: Vec<IncidentRow>,
    pub retrospective: Option<RetrospectiveRow>,
}

impl RecordExport {
    pub fn new(record: &Record, workshop: &Workshop, operator: &User, controller: &User) -> Self {
        let mut steps: Vec<_> = record.steps.iter().collect();
        steps.sort_by_key(|step| step.order());

        let mut incidents: Vec<_> = record
            .incidents
            .iter()
            .map(|incident| IncidentRow {
                created_at: incident.created_at,
                description: incident.description.clone(),
            })
            .collect();
        incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Self {
            record_id: record.id,
            workshop: workshop.name.clone(),
            operator: operator.full_name(),
            controller: controller.full_name(),
            created_at: record.created_at,
            steps: steps
                .into_iter()
                .map(|step| StepRow {
                    name: step.name().to_string(),
                    instructions: step.definition.instructions.clone(),
                    started_at: step.timer.started_at,
                    finished_at: step.timer.finished_at,
                    duration: step.timer.duration().map(|d| Elapsed(&d).to_string()),
                    validation: step.status.label().to_string(),
                    observations: step.observations.clone(),
                })
                .collect(),
            incidents,
            retrospective: record.retrospective.as_ref().map(|r| RetrospectiveRow {
                comment: r.comment.clone(),
                created_at: r.created_at,
            }),
        }
    }
}

/// Table cell text: pipes escaped, line breaks flattened.
struct Cell<'a>(&'a str);

impl<'a> fmt::Display for Cell<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.replace('|', "\\|").replace(['\r', '\n'], " ");
        f.write_str(text.trim())
    }
}

impl fmt::Display for RecordExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Record {}", self.record_id)?;
        writeln!(f)?;
        writeln!(f, "- Atelier: {}", self.workshop)?;
        writeln!(f, "- Opérateur: {}", self.operator)?;
        writeln!(f, "- Contrôleur: {}", self.controller)?;
        writeln!(f, "- Date création: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        writeln!(
            f,
            "| Étape | Consignes | Début | Fin | Durée | Validation | Observations |"
        )?;
        writeln!(f, "|---|---|---|---|---|---|---|")?;
        for row in &self.steps {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} | {} | {} |",
                Cell(&row.name),
                Cell(&row.instructions),
                MaybeDateTime(row.started_at.as_ref()),
                MaybeDateTime(row.finished_at.as_ref()),
                row.duration.as_deref().unwrap_or("-"),
                row.validation,
                Cell(&row.observations)
            )?;
        }

        writeln!(f, "\n## Incidents\n")?;
        if self.incidents.is_empty() {
            writeln!(f, "None.")?;
        }
        for incident in &self.incidents {
            writeln!(
                f,
                "- {}: {}",
                LocalDateTime(&incident.created_at),
                incident.description
            )?;
        }

        writeln!(f, "\n## Retour d'expérience\n")?;
        match &self.retrospective {
            Some(retrospective) => writeln!(
                f,
                "{} ({})",
                retrospective.comment,
                LocalDateTime(&retrospective.created_at)
            ),
            None => writeln!(f, "None."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Incident, Retrospective, Role, Step, StepDefinition, StepValidation},
        workflow::{DualValidation, Timer},
    };

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_second(1_700_000_000 + secs).unwrap()
    }

    fn user(id: u64, first: &str, last: &str, role: Role) -> User {
        User {
            id,
            username: format!("u{id}"),
            email: format!("u{id}@example.com"),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role,
            is_active: true,
            created_at: at(0),
        }
    }

    fn step(id: u64, order: u32, status: StepValidation, timer: Timer) -> Step {
        Step {
            id,
            record_id: 1,
            definition: StepDefinition {
                id,
                name: format!("Étape {order}"),
                description: String::new(),
                instructions: "Vérifier | contrôler".to_string(),
                order,
            },
            timer,
            status,
            observations: String::new(),
            sign_off: DualValidation::default(),
        }
    }

    fn record() -> Record {
        Record {
            id: 1,
            operator_id: 1,
            controller_id: 2,
            workshop_id: 1,
            created_at: at(0),
            steps: vec![
                step(2, 2, StepValidation::Pending, Timer::default()),
                step(
                    1,
                    1,
                    StepValidation::Conforming,
                    Timer {
                        started_at: Some(at(0)),
                        paused_at: None,
                        finished_at: Some(at(20)),
                    },
                ),
            ],
            incidents: vec![
                Incident {
                    id: Some(1),
                    description: "ancien".to_string(),
                    created_at: at(10),
                },
                Incident {
                    id: Some(2),
                    description: "récent".to_string(),
                    created_at: at(50),
                },
            ],
            retrospective: Some(Retrospective {
                id: Some(1),
                comment: "Bon déroulement".to_string(),
                created_at: at(60),
            }),
            measurement: None,
            mix: None,
            sign_off: DualValidation::default(),
        }
    }

    fn export() -> RecordExport {
        let workshop = Workshop {
            id: 1,
            name: "Atelier Nord".to_string(),
        };
        RecordExport::new(
            &record(),
            &workshop,
            &user(1, "Jean", "Dupont", Role::Operator),
            &user(2, "", "", Role::Controller),
        )
    }

    #[test]
    fn test_export_projection() {
        let export = export();
        assert_eq!(export.operator, "Jean Dupont");
        assert_eq!(export.controller, "u2");
        assert_eq!(export.steps[0].name, "Étape 1");
        assert_eq!(export.steps[0].duration.as_deref(), Some("0:00:20"));
        assert_eq!(export.steps[0].validation, "Conforme");
        assert_eq!(export.steps[1].validation, "En attente");
        assert_eq!(export.incidents[0].description, "récent");
    }

    #[test]
    fn test_export_markdown() {
        let output = export().to_string();
        assert!(output.contains("- Atelier: Atelier Nord"));
        assert!(output.contains("| Étape 1 | Vérifier \\| contrôler |"));
        assert!(output.contains("| 0:00:20 | Conforme |"));
        assert!(output.contains("Bon déroulement"));
        let recent = output.find("récent").unwrap();
        let old = output.find("ancien").unwrap();
        assert!(recent < old);
    }

    #[test]
    fn test_export_json() {
        let json = serde_json::to_value(export()).unwrap();
        assert_eq!(json["workshop"], "Atelier Nord");
        assert_eq!(json["steps"][1]["duration"], serde_json::Value::Null);
        assert_eq!(json["retrospective"]["comment"], "Bon déroulement");
    }
}
