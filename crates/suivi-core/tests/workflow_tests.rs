mod common;

use suivi_core::{
    ApplyAction, Tracker, WorkflowError,
    models::{MixChecklist, Role, StepValidation},
    params::{CreateRecord, CreateStepDefinition, CreateWorkshop, Id, ListRecords, MixInput},
    workflow::{Command, StepAction, TaskCommand, TimerAction},
};

use common::{create_test_tracker, full_measurement, signup};

struct Opened {
    operator: u64,
    controller: u64,
    record_id: u64,
}

async fn open_record(tracker: &Tracker, steps: u32) -> Opened {
    let operator = tracker
        .signup(&signup("operateur", Role::Operator))
        .await
        .unwrap();
    let controller = tracker
        .signup(&signup("controleur", Role::Controller))
        .await
        .unwrap();
    tracker.activate_user(&Id { id: operator.id }).await.unwrap();
    tracker
        .activate_user(&Id { id: controller.id })
        .await
        .unwrap();
    let workshop = tracker
        .create_workshop(&CreateWorkshop {
            name: "Atelier Sud".to_string(),
        })
        .await
        .unwrap();
    for order in 1..=steps {
        tracker
            .add_step_definition(&CreateStepDefinition {
                name: format!("Étape {order}"),
                instructions: Some(format!("Consigne {order}")),
                order,
                ..Default::default()
            })
            .await
            .unwrap();
    }
    let record = tracker
        .create_record(&CreateRecord {
            operator_id: operator.id,
            workshop_id: workshop.id,
            controller_id: controller.id,
        })
        .await
        .unwrap();
    Opened {
        operator: operator.id,
        controller: controller.id,
        record_id: record.id,
    }
}

fn act(opened: &Opened, actor_id: u64, command: Command) -> ApplyAction {
    ApplyAction {
        record_id: opened.record_id,
        actor_id,
        command,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_signatures_keep_first_writer() {
    let (_temp_dir, tracker) = create_test_tracker().await;
    let opened = open_record(&tracker, 1).await;
    let sign = act(&opened, opened.controller, Command::SignRecord);

    let (first, second) = tokio::join!(tracker.apply_action(&sign), tracker.apply_action(&sign));
    let results = [first, second];

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let refused = results
        .iter()
        .filter(|r| matches!(r, Err(WorkflowError::AlreadyValidated { .. })))
        .count();
    assert_eq!(succeeded, 1);
    assert_eq!(refused, 1);

    let stored = tracker
        .load_record(&Id {
            id: opened.record_id,
        })
        .await
        .unwrap();
    let winner = results
        .iter()
        .find_map(|r| r.as_ref().ok())
        .map(|(record, _)| record.sign_off.controller)
        .unwrap();
    assert_eq!(stored.sign_off.controller, winner);
}

#[tokio::test]
async fn test_full_record_then_export() {
    let (_temp_dir, tracker) = create_test_tracker().await;
    let opened = open_record(&tracker, 2).await;
    let op = opened.operator;
    let ctl = opened.controller;
    let mix = MixInput {
        density: Some("1.9".into()),
        comments: Some("Consistance correcte".into()),
        checklist: MixChecklist::all_done(),
    };

    let commands = vec![
        act(&opened, op, Command::Measurement(TaskCommand::Timer(TimerAction::Start))),
        act(&opened, op, Command::Measurement(TaskCommand::Save(full_measurement()))),
        act(&opened, op, Command::Measurement(TaskCommand::Timer(TimerAction::Finish))),
        act(&opened, ctl, Command::Measurement(TaskCommand::Validate(Default::default()))),
        act(&opened, op, Command::Mix(TaskCommand::Timer(TimerAction::Start))),
        act(&opened, op, Command::Mix(TaskCommand::Save(mix.clone()))),
        // The checklist is a form field, so validation resubmits it.
        act(&opened, ctl, Command::Mix(TaskCommand::Validate(mix))),
    ];
    for params in &commands {
        tracker.apply_action(params).await.unwrap();
    }

    let record = tracker
        .load_record(&Id {
            id: opened.record_id,
        })
        .await
        .unwrap();
    assert!(record.measurement_validated());
    assert!(record.mix_validated());

    for step_id in record.steps.iter().map(|s| s.id) {
        tracker
            .apply_action(&act(
                &opened,
                op,
                Command::Step {
                    step_id,
                    action: StepAction::Observe("Conforme au plan".to_string()),
                },
            ))
            .await
            .unwrap();
        let (_, outcome) = tracker
            .apply_action(&act(
                &opened,
                ctl,
                Command::Step {
                    step_id,
                    action: StepAction::SetStatus(StepValidation::Conforming),
                },
            ))
            .await
            .unwrap();
        assert_ne!(outcome.active_step_id, Some(step_id));
    }

    tracker
        .apply_action(&act(
            &opened,
            ctl,
            Command::SetRetrospective {
                comment: "Bonne séance".to_string(),
            },
        ))
        .await
        .unwrap();
    let (record, outcome) = tracker
        .apply_action(&act(&opened, op, Command::SignRecord))
        .await
        .unwrap();
    assert_eq!(outcome.active_step_id, None);
    assert!(record.steps_complete());

    let summaries = tracker
        .list_records(&ListRecords {
            operator_id: Some(op),
        })
        .await
        .unwrap();
    assert_eq!(summaries[0].conforming_steps, 2);
    assert!(!summaries[0].signed);

    let export = tracker
        .export_record(&Id {
            id: opened.record_id,
        })
        .await
        .unwrap();
    assert_eq!(export.workshop, "Atelier Sud");
    assert_eq!(export.controller, "controleur Test");
    assert_eq!(export.steps.len(), 2);
    assert!(export.steps.iter().all(|row| row.observations == "Conforme au plan"));
    assert_eq!(
        export.retrospective.as_ref().map(|r| r.comment.as_str()),
        Some("Bonne séance")
    );
    let table = export.to_string();
    assert!(table.contains("Atelier Sud"));
}

#[tokio::test]
async fn test_foreign_user_cannot_act() {
    let (_temp_dir, tracker) = create_test_tracker().await;
    let opened = open_record(&tracker, 1).await;
    let outsider = tracker
        .signup(&signup("visiteur", Role::Operator))
        .await
        .unwrap();
    tracker.activate_user(&Id { id: outsider.id }).await.unwrap();

    let result = tracker
        .apply_action(&act(
            &opened,
            outsider.id,
            Command::AddIncident {
                description: "Intrusion".to_string(),
            },
        ))
        .await;
    assert!(matches!(result, Err(WorkflowError::Unauthorized { .. })));
}
