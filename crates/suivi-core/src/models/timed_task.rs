//! The two fixed timed tasks of a record: component measurement and mortar
//! mix.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WorkflowError},
    params::{MeasurementInput, MixInput},
    workflow::{timer::Timer, validation::ValidationSlot},
};

/// Weighed quantities of each mortar component (mesure des composants).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentMeasurement {
    pub ciment: Option<f64>,
    pub sable: Option<f64>,
    pub agent_moussant: Option<f64>,
    pub fibre_verre: Option<f64>,
    pub dsp_xl: Option<f64>,
    pub hdr: Option<f64>,
    pub eau: Option<f64>,

    /// Operator comments, required for validation
    pub comments: String,

    /// Last time data was entered
    pub entered_at: Option<Timestamp>,

    /// Who validated the task and when
    pub validation: Option<ValidationSlot>,

    pub timer: Timer,
}

/// The six checklist items of the mixing procedure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MixChecklist {
    pub verser_eau: bool,
    pub ajouter_fibre: bool,
    pub melanger_1min: bool,
    pub verser_ciment: bool,
    pub ajuster_eau: bool,
    pub mesurer_densite: bool,
}

impl MixChecklist {
    /// Every item with its field name, in procedure order.
    pub fn items(&self) -> [(&'static str, bool); 6] {
        [
            ("verser_eau", self.verser_eau),
            ("ajouter_fibre", self.ajouter_fibre),
            ("melanger_1min", self.melanger_1min),
            ("verser_ciment", self.verser_ciment),
            ("ajuster_eau", self.ajuster_eau),
            ("mesurer_densite", self.mesurer_densite),
        ]
    }

    /// A checklist with every item ticked.
    pub fn all_done() -> Self {
        Self {
            verser_eau: true,
            ajouter_fibre: true,
            melanger_1min: true,
            verser_ciment: true,
            ajuster_eau: true,
            mesurer_densite: true,
        }
    }
}

/// Mortar mixing run (mélange du mortier).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MortarMix {
    pub density: Option<f64>,
    pub comments: String,
    pub checklist: MixChecklist,
    pub entered_at: Option<Timestamp>,
    pub validation: Option<ValidationSlot>,
    pub timer: Timer,
}

/// Parse an optional numeric form value. Blank means "not provided".
pub(crate) fn parse_quantity(field: &str, raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let value: f64 = raw.parse().map_err(|_| {
        WorkflowError::invalid_value(field).with_reason(format!("'{raw}' is not a number"))
    })?;
    if !value.is_finite() {
        return Err(WorkflowError::invalid_value(field).with_reason("must be a finite number"));
    }
    Ok(Some(value))
}

impl ComponentMeasurement {
    /// Whether the task has been validated.
    pub fn is_validated(&self) -> bool {
        self.validation.is_some()
    }

    fn quantities_mut(&mut self) -> [(&'static str, &mut Option<f64>); 7] {
        [
            ("ciment", &mut self.ciment),
            ("sable", &mut self.sable),
            ("agent_moussant", &mut self.agent_moussant),
            ("fibre_verre", &mut self.fibre_verre),
            ("dsp_xl", &mut self.dsp_xl),
            ("hdr", &mut self.hdr),
            ("eau", &mut self.eau),
        ]
    }

    /// Every quantity with its field name.
    pub fn quantities(&self) -> [(&'static str, Option<f64>); 7] {
        [
            ("ciment", self.ciment),
            ("sable", self.sable),
            ("agent_moussant", self.agent_moussant),
            ("fibre_verre", self.fibre_verre),
            ("dsp_xl", self.dsp_xl),
            ("hdr", self.hdr),
            ("eau", self.eau),
        ]
    }

    /// Overwrite every field from a form submission; blank quantities become
    /// unset.
    pub fn replace_from(&mut self, input: &MeasurementInput, now: Timestamp) -> Result<()> {
        let parsed = parse_measurement(input)?;
        for ((_, slot), value) in self.quantities_mut().into_iter().zip(parsed) {
            *slot = value;
        }
        self.comments = input.comments.clone().unwrap_or_default();
        self.entered_at = Some(now);
        Ok(())
    }

    /// Apply only the quantities that were provided; comments are replaced
    /// when present.
    pub fn merge_from(&mut self, input: &MeasurementInput, now: Timestamp) -> Result<()> {
        let parsed = parse_measurement(input)?;
        for ((_, slot), value) in self.quantities_mut().into_iter().zip(parsed) {
            if value.is_some() {
                *slot = value;
            }
        }
        if let Some(comments) = &input.comments {
            self.comments = comments.clone();
        }
        self.entered_at = Some(now);
        Ok(())
    }
}

fn parse_measurement(input: &MeasurementInput) -> Result<[Option<f64>; 7]> {
    Ok([
        parse_quantity("ciment", input.ciment.as_deref())?,
        parse_quantity("sable", input.sable.as_deref())?,
        parse_quantity("agent_moussant", input.agent_moussant.as_deref())?,
        parse_quantity("fibre_verre", input.fibre_verre.as_deref())?,
        parse_quantity("dsp_xl", input.dsp_xl.as_deref())?,
        parse_quantity("hdr", input.hdr.as_deref())?,
        parse_quantity("eau", input.eau.as_deref())?,
    ])
}

impl MortarMix {
    /// Whether the task has been validated.
    pub fn is_validated(&self) -> bool {
        self.validation.is_some()
    }

    /// Record a saved form: comments and checklist are replaced, the density
    /// only when provided.
    pub fn replace_from(&mut self, input: &MixInput, now: Timestamp) -> Result<()> {
        let density = parse_quantity("density", input.density.as_deref())?;
        if density.is_some() {
            self.density = density;
        }
        self.comments = input.comments.clone().unwrap_or_default();
        self.checklist = input.checklist;
        self.entered_at = Some(now);
        Ok(())
    }

    /// Like [`MortarMix::replace_from`] but comments are kept when absent.
    pub fn merge_from(&mut self, input: &MixInput, now: Timestamp) -> Result<()> {
        let density = parse_quantity("density", input.density.as_deref())?;
        if density.is_some() {
            self.density = density;
        }
        if let Some(comments) = &input.comments {
            self.comments = comments.clone();
        }
        self.checklist = input.checklist;
        self.entered_at = Some(now);
        Ok(())
    }
}
