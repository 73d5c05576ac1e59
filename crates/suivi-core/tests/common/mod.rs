#![allow(dead_code)]

use suivi_core::{
    Database, Tracker, TrackerBuilder,
    models::Role,
    params::{CreateRecord, CreateStepDefinition, CreateWorkshop, MeasurementInput, SignupRequest},
};
use tempfile::{NamedTempFile, TempDir};

/// Ids of a freshly opened record and its two participants.
pub struct Fixture {
    pub operator: u64,
    pub controller: u64,
    pub record_id: u64,
}

pub fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

pub async fn create_test_tracker() -> (TempDir, Tracker) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let tracker = TrackerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create tracker");
    (temp_dir, tracker)
}

pub fn signup(username: &str, role: Role) -> SignupRequest {
    SignupRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: username.to_string(),
        last_name: "Test".to_string(),
        role,
    }
}

/// Two active users, one workshop, `steps` definitions and one record.
pub fn seed(db: &mut Database, steps: u32) -> Fixture {
    let operator = db.create_user(&signup("operateur", Role::Operator)).unwrap();
    let controller = db
        .create_user(&signup("controleur", Role::Controller))
        .unwrap();
    db.activate_user(operator.id).unwrap();
    db.activate_user(controller.id).unwrap();
    let workshop = db
        .create_workshop(&CreateWorkshop {
            name: "Atelier Nord".to_string(),
        })
        .unwrap();
    for order in 1..=steps {
        db.create_step_definition(&CreateStepDefinition {
            name: format!("Étape {order}"),
            description: None,
            instructions: Some(format!("Consigne {order}")),
            order,
        })
        .unwrap();
    }
    let record = db
        .create_record(&CreateRecord {
            operator_id: operator.id,
            workshop_id: workshop.id,
            controller_id: controller.id,
        })
        .unwrap();
    Fixture {
        operator: operator.id,
        controller: controller.id,
        record_id: record.id,
    }
}

pub fn full_measurement() -> MeasurementInput {
    MeasurementInput {
        ciment: Some("25".into()),
        sable: Some("75".into()),
        agent_moussant: Some("0.2".into()),
        fibre_verre: Some("0.5".into()),
        dsp_xl: Some("0.1".into()),
        hdr: Some("0.3".into()),
        eau: Some("11".into()),
        comments: Some("RAS".into()),
    }
}
