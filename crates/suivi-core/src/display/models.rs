//! Display implementations for domain models.
//!
//! All output is markdown for rich terminal display. Records render as a
//! full inspection sheet; the smaller entities render as one list item or a
//! short section.

use std::fmt;

use super::datetime::{Elapsed, LocalDateTime, MaybeDateTime};
use crate::{
    models::{
        ComponentMeasurement, Incident, MortarMix, Record, RecordSummary, Role, Step,
        StepDefinition, StepValidation, User, Workshop,
    },
    workflow::{ActionOutcome, DualValidation, Timer, ValidationSlot},
};

impl fmt::Display for StepValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Slot<'a>(Option<&'a ValidationSlot>);

impl<'a> fmt::Display for Slot<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(slot) => write!(
                f,
                "✓ user {} at {}",
                slot.validator_id,
                LocalDateTime(&slot.validated_at)
            ),
            None => f.write_str("○ not signed"),
        }
    }
}

fn fmt_sign_off(f: &mut fmt::Formatter<'_>, sign_off: &DualValidation) -> fmt::Result {
    writeln!(f, "- Operator sign-off: {}", Slot(sign_off.slot(Role::Operator)))?;
    writeln!(
        f,
        "- Controller sign-off: {}",
        Slot(sign_off.slot(Role::Controller))
    )
}

fn fmt_timer(f: &mut fmt::Formatter<'_>, timer: &Timer) -> fmt::Result {
    write!(f, "- Timer: {}", timer.state().label())?;
    if let Some(duration) = timer.duration() {
        write!(f, " ({})", Elapsed(&duration))?;
    }
    writeln!(f)
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_active { "active" } else { "pending activation" };
        writeln!(
            f,
            "- {}. **{}** ({}) <{}>, {}, {state}",
            self.id,
            self.full_name(),
            self.username,
            self.email,
            self.role
        )
    }
}

impl fmt::Display for Workshop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {}. {}", self.id, self.name)
    }
}

impl fmt::Display for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}. {} (ID: {})", self.order, self.name, self.id)?;
        writeln!(f)?;
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }
        if !self.instructions.is_empty() {
            writeln!(f, "#### Instructions")?;
            writeln!(f)?;
            writeln!(f, "{}", self.instructions)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} (ID: {}, {})",
            self.order(),
            self.name(),
            self.id,
            self.status.with_icon()
        )?;
        writeln!(f)?;
        if !self.definition.instructions.is_empty() {
            writeln!(f, "> {}", self.definition.instructions)?;
            writeln!(f)?;
        }
        fmt_timer(f, &self.timer)?;
        fmt_sign_off(f, &self.sign_off)?;
        if !self.observations.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.observations)?;
        }
        writeln!(f)
    }
}

fn fmt_validation(f: &mut fmt::Formatter<'_>, validation: Option<&ValidationSlot>) -> fmt::Result {
    writeln!(f, "- Validation: {}", Slot(validation))
}

fn fmt_quantity(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl fmt::Display for ComponentMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_timer(f, &self.timer)?;
        fmt_validation(f, self.validation.as_ref())?;
        writeln!(f)?;
        writeln!(f, "| Component | Quantity |")?;
        writeln!(f, "|---|---|")?;
        for (name, value) in self.quantities() {
            writeln!(f, "| {name} | {} |", fmt_quantity(value))?;
        }
        if !self.comments.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.comments)?;
        }
        Ok(())
    }
}

impl fmt::Display for MortarMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_timer(f, &self.timer)?;
        fmt_validation(f, self.validation.as_ref())?;
        writeln!(f, "- Density: {}", fmt_quantity(self.density))?;
        writeln!(f)?;
        for (name, done) in self.checklist.items() {
            writeln!(f, "- [{}] {name}", if done { "x" } else { " " })?;
        }
        if !self.comments.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.comments)?;
        }
        Ok(())
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- {}: {}",
            LocalDateTime(&self.created_at),
            self.description
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Record {}", self.id)?;
        writeln!(f)?;
        writeln!(f, "- Workshop: {}", self.workshop_id)?;
        writeln!(f, "- Operator: user {}", self.operator_id)?;
        writeln!(f, "- Controller: user {}", self.controller_id)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        fmt_sign_off(f, &self.sign_off)?;

        writeln!(f, "\n## Component measurement\n")?;
        match &self.measurement {
            Some(measurement) => write!(f, "{measurement}")?,
            None => writeln!(f, "Not started.")?,
        }

        writeln!(f, "\n## Mortar mix\n")?;
        match &self.mix {
            Some(mix) => write!(f, "{mix}")?,
            None => writeln!(f, "Not started.")?,
        }

        writeln!(f, "\n## Steps\n")?;
        if self.steps.is_empty() {
            writeln!(f, "No steps in this record.")?;
        } else {
            match self.active_step() {
                Some(active) => writeln!(f, "Active step: {}. {}\n", active.order(), active.name())?,
                None => writeln!(f, "All steps conform.\n")?,
            }
            for step in &self.steps {
                write!(f, "{step}")?;
            }
        }

        if !self.incidents.is_empty() {
            writeln!(f, "\n## Incidents\n")?;
            for incident in &self.incidents {
                write!(f, "{incident}")?;
            }
        }

        if let Some(retrospective) = &self.retrospective {
            writeln!(f, "\n## Retrospective\n")?;
            writeln!(f, "{}", retrospective.comment)?;
        }

        Ok(())
    }
}

impl fmt::Display for RecordSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signed = if self.signed { ", signed" } else { "" };
        writeln!(
            f,
            "## Record {} ({}/{}{signed})",
            self.id, self.conforming_steps, self.total_steps
        )?;
        writeln!(f)?;
        writeln!(f, "- **Workshop**: {}", self.workshop)?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        if let Some(timer) = &self.timer {
            write!(f, "\n- Timer: {}", timer.label)?;
            if let Some(duration) = &timer.duration {
                write!(f, " ({duration})")?;
            }
            writeln!(f)?;
        }
        match self.active_step_id {
            Some(id) => writeln!(f, "- Active step: {id}"),
            None => writeln!(f, "- All steps conform"),
        }
    }
}

/// Start and finish instants of a timer, for one-line listings.
pub struct TimerSpan<'a>(pub &'a Timer);

impl<'a> fmt::Display for TimerSpan<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            MaybeDateTime(self.0.started_at.as_ref()),
            MaybeDateTime(self.0.finished_at.as_ref())
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::MixChecklist;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_second(1_700_000_000 + secs).unwrap()
    }

    fn step(status: StepValidation) -> Step {
        Step {
            id: 5,
            record_id: 1,
            definition: StepDefinition {
                id: 2,
                name: "Coulage".to_string(),
                description: String::new(),
                instructions: "Verser lentement".to_string(),
                order: 2,
            },
            timer: Timer {
                started_at: Some(at(0)),
                paused_at: None,
                finished_at: Some(at(75)),
            },
            status,
            observations: "RAS".to_string(),
            sign_off: DualValidation::default(),
        }
    }

    #[test]
    fn test_step_display() {
        let output = step(StepValidation::Conforming).to_string();
        assert!(output.contains("### 2. Coulage (ID: 5, ✓ Conforme)"));
        assert!(output.contains("> Verser lentement"));
        assert!(output.contains("Terminé (0:01:15)"));
        assert!(output.contains("Operator sign-off: ○ not signed"));
        assert!(output.contains("RAS"));
    }

    #[test]
    fn test_user_display_falls_back_to_username() {
        let user = User {
            id: 3,
            username: "jdupont".to_string(),
            email: "j@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Controller,
            is_active: false,
            created_at: at(0),
        };
        let output = user.to_string();
        assert!(output.contains("**jdupont**"));
        assert!(output.contains("controller"));
        assert!(output.contains("pending activation"));
    }

    #[test]
    fn test_record_display_sections() {
        let record = Record {
            id: 9,
            operator_id: 1,
            controller_id: 2,
            workshop_id: 3,
            created_at: at(0),
            steps: vec![step(StepValidation::Pending)],
            incidents: vec![Incident {
                id: Some(1),
                description: "Fuite de la bétonnière".to_string(),
                created_at: at(10),
            }],
            retrospective: None,
            measurement: None,
            mix: Some(MortarMix {
                density: Some(1.85),
                checklist: MixChecklist {
                    verser_eau: true,
                    ..Default::default()
                },
                ..Default::default()
            }),
            sign_off: DualValidation::default(),
        };
        let output = record.to_string();
        assert!(output.starts_with("# Record 9"));
        assert!(output.contains("## Component measurement\n\nNot started."));
        assert!(output.contains("- Density: 1.85"));
        assert!(output.contains("- [x] verser_eau"));
        assert!(output.contains("- [ ] ajouter_fibre"));
        assert!(output.contains("Active step: 2. Coulage"));
        assert!(output.contains("Fuite de la bétonnière"));
        assert!(!output.contains("## Retrospective"));
    }

    #[test]
    fn test_action_outcome_display() {
        let outcome = ActionOutcome {
            message: "Step 'Coulage' paused".to_string(),
            active_step_id: None,
            timer: Some(Timer::default().status()),
        };
        let output = outcome.to_string();
        assert!(output.starts_with("Step 'Coulage' paused\n"));
        assert!(output.contains("- Timer: Non démarré"));
        assert!(output.contains("- All steps conform"));
    }
}
