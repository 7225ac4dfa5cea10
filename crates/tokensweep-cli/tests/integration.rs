#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CHAT_ENV: [&str; 4] = [
    "GCLOUD_PROJECT",
    "GCLOUD_LOCATION",
    "VERTEX_AI_GEMINI_MODEL_ID",
    "GCLOUD_ACCESS_TOKEN",
];

const HEADER: &str = "\"VIP Comms: \nCustomer's email\",Prime status ,Brand,Notes\n";

fn tokensweep(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tokensweep").unwrap();
    cmd.current_dir(dir.path()).env("TOKENSWEEP_ROOT", dir.path());
    for key in CHAT_ENV {
        cmd.env_remove(key);
    }
    cmd
}

/// Point both services at a closed local port so every call fails fast.
fn write_unreachable_config(dir: &TempDir) {
    std::fs::create_dir_all(dir.path().join(".tokensweep")).unwrap();
    std::fs::write(
        dir.path().join(".tokensweep/config.yaml"),
        "gateway:\n  membership_base_url: http://127.0.0.1:1\n  collection_base_url: http://127.0.0.1:1\n  timeout_secs: 5\n",
    )
    .unwrap();
}

// ---------------------------------------------------------------------------
// tokensweep config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_defaults_only_warns() {
    let dir = TempDir::new().unwrap();
    tokensweep(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning]"))
        .stdout(predicate::str::contains("chat"));
}

#[test]
fn config_validate_fails_on_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".tokensweep")).unwrap();
    std::fs::write(
        dir.path().join(".tokensweep/config.yaml"),
        "gateway:\n  timeout_secs: 0\n",
    )
    .unwrap();

    tokensweep(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] gateway.timeout_secs"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn config_show_json_applies_env_and_redacts_token() {
    let dir = TempDir::new().unwrap();
    let output = tokensweep(&dir)
        .args(["config", "show", "--json"])
        .env("GCLOUD_PROJECT", "ops-project")
        .env("GCLOUD_ACCESS_TOKEN", "very-secret")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["chat"]["project"], "ops-project");
    assert_eq!(json["chat"]["access_token"], "<redacted>");
    assert_eq!(json["default_brand"], "ED");
}

// ---------------------------------------------------------------------------
// tokensweep process
// ---------------------------------------------------------------------------

#[test]
fn process_requires_email_or_file() {
    let dir = TempDir::new().unwrap();
    tokensweep(&dir).arg("process").assert().failure();
}

#[test]
fn process_rejects_non_csv_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("input.xlsx"), "binary").unwrap();
    tokensweep(&dir)
        .args(["process", "--file", "input.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid file type"));
}

#[test]
fn process_reports_missing_columns() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("input.csv"), "Email,Brand\na@b.com,ED\n").unwrap();
    tokensweep(&dir)
        .args(["process", "--file", "input.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required column(s)"))
        .stderr(predicate::str::contains("Found headers: Email, Brand"));
}

#[test]
fn process_single_entry_unreachable_gateway_is_processing_error() {
    let dir = TempDir::new().unwrap();
    write_unreachable_config(&dir);

    let output = tokensweep(&dir)
        .args(["process", "--email", "a@b.com", "--status", "ACTIVATED", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let item = &json["results"][0];
    assert_eq!(item["email"], "a@b.com");
    assert_eq!(item["brand"], "ED");
    assert_eq!(item["taskStatus"], "Processing Error");
    assert_eq!(json["log"].as_array().unwrap().last().unwrap(), "--- Processing Complete ---");
}

#[test]
fn process_file_writes_export_and_log() {
    let dir = TempDir::new().unwrap();
    write_unreachable_config(&dir);
    std::fs::write(
        dir.path().join("input.csv"),
        format!("{HEADER}a@b.com,ACTIVATED,GV,first\n,EXPIRED,ED,skipped\nc@d.com,,,second\n"),
    )
    .unwrap();

    tokensweep(&dir)
        .args([
            "process",
            "--file",
            "input.csv",
            "--out",
            "results.csv",
            "--log-out",
            "run.log",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Successfully parsed 2 entr(y/ies) from input.csv.",
        ))
        .stdout(predicate::str::contains("Showing 1 to 2 of 2 results"))
        .stdout(predicate::str::contains("Summary: 2 Processing Error"));

    let csv = std::fs::read_to_string(dir.path().join("results.csv")).unwrap();
    assert!(csv.starts_with("\"VIP Comms: \nCustomer's email\",Prime status ,Brand,Notes,Task Status,Task Message\r\n"));
    assert_eq!(csv.matches("Processing Error").count(), 2);

    let log = std::fs::read_to_string(dir.path().join("run.log")).unwrap();
    assert!(log.starts_with("Successfully parsed 2 entr(y/ies)"));
    assert!(log.ends_with("--- Processing Complete ---"));
}

// ---------------------------------------------------------------------------
// tokensweep chat
// ---------------------------------------------------------------------------

#[test]
fn chat_without_configuration_explains() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("run.log"), "Starting processing for 0 item(s)...").unwrap();

    tokensweep(&dir)
        .args(["chat", "--log", "run.log", "What", "failed?"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "AI Chat functionality is currently unavailable.",
        ));
}

#[test]
fn chat_requires_existing_log() {
    let dir = TempDir::new().unwrap();
    tokensweep(&dir)
        .args(["chat", "--log", "missing.log", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read log"));
}

#[test]
fn chat_and_serve_help_mention_access_token() {
    let dir = TempDir::new().unwrap();
    for cmd in ["chat", "serve"] {
        tokensweep(&dir)
            .args([cmd, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("GCLOUD_ACCESS_TOKEN"))
            .stdout(predicate::str::contains("gcloud auth print-access-token"));
    }
}
