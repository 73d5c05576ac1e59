use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// `suivi --no-color --database-file <db>`
fn suivi(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("suivi").expect("Failed to find suivi binary");
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(db_path);
    cmd
}

fn run(db_path: &Path, args: &[&str]) {
    suivi(db_path).args(args).assert().success();
}

/// Operator 1, controller 2, workshop 1, two steps, record 1.
fn seed(db_path: &Path) {
    run(db_path, &["user", "signup", "alice", "-e", "alice@example.com", "-r", "operator"]);
    run(db_path, &["user", "signup", "bob", "-e", "bob@example.com", "-r", "controller"]);
    run(db_path, &["user", "activate", "1"]);
    run(db_path, &["user", "activate", "2"]);
    run(db_path, &["workshop", "add", "Atelier Nord"]);
    run(db_path, &["definition", "add", "1", "Coffrage", "-i", "Huiler le moule"]);
    run(db_path, &["definition", "add", "2", "Coulage"]);
    run(
        db_path,
        &["record", "create", "--operator", "1", "--workshop", "1", "--controller", "2"],
    );
}

fn validate_tasks(db_path: &Path) {
    run(db_path, &["act", "1", "--as", "1", "measurement", "timer", "start"]);
    run(
        db_path,
        &[
            "act", "1", "--as", "1", "measurement", "save", "--ciment", "25", "--sable", "75",
            "--agent-moussant", "0.2", "--fibre-verre", "0.5", "--dsp-xl", "0.1", "--hdr",
            "0.3", "--eau", "11", "-c", "RAS",
        ],
    );
    run(db_path, &["act", "1", "--as", "2", "measurement", "validate"]);
    run(db_path, &["act", "1", "--as", "1", "mix", "timer", "start"]);
    run(
        db_path,
        &[
            "act",
            "1",
            "--as",
            "2",
            "mix",
            "validate",
            "--density",
            "1.9",
            "-c",
            "Homogène",
            "--checked",
            "verser-eau,ajouter-fibre,melanger-1min,verser-ciment,ajuster-eau,mesurer-densite",
        ],
    );
}

#[test]
fn test_cli_empty_database_lists_no_records() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    suivi(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No records found."));
}

#[test]
fn test_cli_signup_creates_inactive_account() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    suivi(&db_path)
        .args(["user", "signup", "alice", "-e", "alice@example.com", "-r", "operator"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Account requested for 'alice' (ID: 1)"))
        .stdout(predicate::str::contains("pending activation"));

    suivi(&db_path)
        .args(["user", "list", "--active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No users found."));
}

#[test]
fn test_cli_signup_requires_valid_email() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    suivi(&db_path)
        .args(["user", "signup", "alice", "-e", "alice", "-r", "operator"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an email address"));
}

#[test]
fn test_cli_record_requires_active_operator() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    run(&db_path, &["user", "signup", "alice", "-e", "a@example.com", "-r", "operator"]);
    run(&db_path, &["user", "signup", "bob", "-e", "b@example.com", "-r", "controller"]);
    run(&db_path, &["user", "activate", "2"]);
    run(&db_path, &["workshop", "add", "Atelier Nord"]);

    suivi(&db_path)
        .args(["record", "create", "--operator", "1", "--workshop", "1", "--controller", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open record"))
        .stderr(predicate::str::contains("not allowed"));
}

#[test]
fn test_cli_record_create_and_show() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    seed(&db_path);

    suivi(&db_path)
        .args(["record", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Record 1"))
        .stdout(predicate::str::contains("### 1. Coffrage"))
        .stdout(predicate::str::contains("> Huiler le moule"))
        .stdout(predicate::str::contains("### 2. Coulage"));

    suivi(&db_path)
        .args(["record", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Record 1 (0/2)"))
        .stdout(predicate::str::contains("Atelier Nord"));
}

#[test]
fn test_cli_pause_before_start_is_rejected() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    seed(&db_path);

    suivi(&db_path)
        .args(["act", "1", "--as", "1", "measurement", "timer", "pause"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to apply measurement.pause to record 1"));
}

#[test]
fn test_cli_mix_waits_for_measurement() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    seed(&db_path);

    suivi(&db_path)
        .args(["act", "1", "--as", "1", "mix", "timer", "start"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Mortar mix requires Component measurement to be validated first",
        ));
}

#[test]
fn test_cli_mix_validation_waits_for_measurement() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    seed(&db_path);
    let mix_form = [
        "--density",
        "1.9",
        "-c",
        "Homogène",
        "--checked",
        "verser-eau,ajouter-fibre,melanger-1min,verser-ciment,ajuster-eau,mesurer-densite",
    ];
    suivi(&db_path)
        .args(["act", "1", "--as", "1", "mix", "save"])
        .args(mix_form)
        .assert()
        .success();

    suivi(&db_path)
        .args(["act", "1", "--as", "2", "mix", "validate"])
        .args(mix_form)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Mortar mix requires Component measurement to be validated first",
        ));

    suivi(&db_path)
        .args(["record", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Validation: ○ not signed"));
}

#[test]
fn test_cli_incomplete_measurement_lists_missing_fields() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    seed(&db_path);
    run(&db_path, &["act", "1", "--as", "1", "measurement", "timer", "start"]);
    run(&db_path, &["act", "1", "--as", "1", "measurement", "save", "--ciment", "25"]);

    suivi(&db_path)
        .args(["act", "1", "--as", "2", "measurement", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Component measurement is incomplete"))
        .stderr(predicate::str::contains("sable"));
}

#[test]
fn test_cli_step_sequence() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    seed(&db_path);
    validate_tasks(&db_path);

    suivi(&db_path)
        .args(["act", "1", "--as", "1", "step", "2", "observe", "trop tôt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step 2 is locked"));

    suivi(&db_path)
        .args(["act", "1", "--as", "1", "step", "1", "timer", "start"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 'Coffrage' started"));

    suivi(&db_path)
        .args(["act", "1", "--as", "1", "step", "1", "status", "conforming"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed"));

    suivi(&db_path)
        .args(["act", "1", "--as", "2", "step", "1", "status", "conforming"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Active step: 2"));

    suivi(&db_path)
        .args(["act", "1", "--as", "2", "step", "2", "sign"])
        .assert()
        .success()
        .stdout(predicate::str::contains("signed by the controller"));

    suivi(&db_path)
        .args(["act", "1", "--as", "2", "step", "2", "sign"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has already been validated"));
}

#[test]
fn test_cli_export_json() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    seed(&db_path);
    run(&db_path, &["act", "1", "--as", "1", "incident", "Malaxeur bloqué"]);
    run(&db_path, &["act", "1", "--as", "2", "retrospective", "Vérifier le malaxeur"]);

    let output = suivi(&db_path)
        .args(["record", "export", "1", "--json"])
        .output()
        .expect("Failed to run export");
    assert!(output.status.success());
    let export: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Export is not valid JSON");
    assert_eq!(export["workshop"], "Atelier Nord");
    assert_eq!(export["steps"].as_array().map(Vec::len), Some(2));
    assert_eq!(export["incidents"][0]["description"], "Malaxeur bloqué");
    assert_eq!(export["retrospective"]["comment"], "Vérifier le malaxeur");
}

#[test]
fn test_cli_export_table_to_file() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let out_path = temp_dir.path().join("record-1.md");
    seed(&db_path);

    suivi(&db_path)
        .args(["record", "export", "1", "-o"])
        .arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Record 1 exported"));

    let content = std::fs::read_to_string(&out_path).unwrap();
    assert!(content.contains("| Étape | Consignes |"));
    assert!(content.contains("| Coffrage | Huiler le moule |"));
}

#[test]
fn test_cli_workshop_remove_needs_confirmation() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    seed(&db_path);

    suivi(&db_path)
        .args(["workshop", "remove", "1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("pass --confirm"));

    suivi(&db_path)
        .args(["workshop", "rm", "1", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted workshop 'Atelier Nord' (ID: 1)"));

    suivi(&db_path)
        .args(["record", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records found."));
}

#[test]
fn test_cli_workshop_rename() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    run(&db_path, &["workshop", "add", "Atelier A"]);

    suivi(&db_path)
        .args(["workshop", "rename", "1", "Atelier B"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: 'Atelier A' → 'Atelier B'"));
}
