use jiff::Timestamp;

use crate::{
    models::{
        ComponentMeasurement, MortarMix, Record, Role, Step, StepDefinition, StepValidation,
    },
    workflow::{DualValidation, Timer, ValidationSlot},
};

fn at(secs: i64) -> Timestamp {
    Timestamp::from_second(1640995200 + secs).unwrap()
}

fn step(id: u64, order: u32, status: StepValidation) -> Step {
    Step {
        id,
        record_id: 789,
        definition: StepDefinition {
            id: 10 + id,
            name: format!("Étape {order}"),
            description: String::new(),
            instructions: "Contrôler visuellement".to_string(),
            order,
        },
        timer: Timer::default(),
        status,
        observations: String::new(),
        sign_off: DualValidation::default(),
    }
}

fn record() -> Record {
    Record {
        id: 789,
        operator_id: 1,
        controller_id: 2,
        workshop_id: 3,
        created_at: at(0),
        steps: vec![
            step(1, 1, StepValidation::Conforming),
            step(2, 2, StepValidation::NonConforming),
        ],
        incidents: vec![],
        retrospective: None,
        measurement: Some(ComponentMeasurement {
            ciment: Some(25.0),
            validation: Some(ValidationSlot {
                validator_id: 2,
                validated_at: at(30),
            }),
            ..Default::default()
        }),
        mix: Some(MortarMix::default()),
        sign_off: DualValidation::default(),
    }
}

#[test]
fn test_step_validation_parsing() {
    assert_eq!(
        "conforme".parse::<StepValidation>().unwrap(),
        StepValidation::Conforming
    );
    assert_eq!(
        "NON_CONFORMING".parse::<StepValidation>().unwrap(),
        StepValidation::NonConforming
    );
    assert!("done".parse::<StepValidation>().is_err());
    assert_eq!(StepValidation::NonConforming.with_icon(), "✗ Non conforme");
}

#[test]
fn test_role_parsing() {
    assert_eq!("Controleur".parse::<Role>().unwrap(), Role::Controller);
    assert_eq!("operator".parse::<Role>().unwrap(), Role::Operator);
    assert!("admin".parse::<Role>().is_err());
}

#[test]
fn test_record_stage_queries() {
    let record = record();
    assert!(record.measurement_validated());
    assert!(!record.mix_validated());
    assert!(!record.steps_complete());
    assert_eq!(record.active_step().map(|s| s.id), Some(2));
    assert_eq!(record.participants().role_of(2), Some(Role::Controller));
}

#[test]
fn test_record_json_round_trip() {
    let record = record();
    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains(r#""status":"non_conforming""#));
    let back: Record = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_record_json_defaults_collections() {
    let json = format!(
        r#"{{"id":1,"operator_id":1,"controller_id":2,"workshop_id":1,"created_at":"{}","retrospective":null,"measurement":null,"mix":null,"sign_off":{{"operator":null,"controller":null}}}}"#,
        at(0)
    );
    let record: Record = serde_json::from_str(&json).unwrap();
    assert!(record.steps.is_empty());
    assert!(record.incidents.is_empty());
    assert!(record.steps_complete());
}
