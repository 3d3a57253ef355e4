//! CLI integration tests
//!
//! Drive the `portal` binary against a temporary database.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const SEED: &str = r#"
schema_version: 0
works:
  - { id: w1, userId: alice, title: First, tags: [ink], createdAt: "1600000001" }
  - { id: w2, userId: bob, title: Second, tags: [ink, paper], createdAt: "1600000002" }
  - { id: w3, userId: alice, title: Third, createdAt: "1600000003" }
"#;

fn portal(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_portal"))
        .arg("--db")
        .arg(db)
        .args(["--log-profile", "test"])
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn seeded() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("data").join("portal.db");
    let seed = tmp.path().join("works.yaml");
    fs::write(&seed, SEED).unwrap();

    let out = portal(&db, &["seed", seed.to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Imported 3 works"));
    (tmp, db)
}

fn json_stdout(out: &Output) -> serde_json::Value {
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn test_migrate_creates_database() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("nested").join("portal.db");
    let out = portal(&db, &["migrate"]);
    assert!(out.status.success());
    assert!(db.exists());
}

#[test]
fn test_list_pages_with_cursor() {
    let (_tmp, db) = seeded();

    let first = json_stdout(&portal(&db, &["list", "--limit", "2", "--json"]));
    assert_eq!(first["items"][0]["id"], "w3");
    assert_eq!(first["items"][1]["id"], "w2");
    let cursor = first["exclusiveStartKey"].as_str().unwrap().to_string();

    let second = json_stdout(&portal(
        &db,
        &["list", "--limit", "2", "--cursor", &cursor, "--json"],
    ));
    assert_eq!(second["items"].as_array().unwrap().len(), 1);
    assert_eq!(second["items"][0]["id"], "w1");
    assert!(second["exclusiveStartKey"].is_null());
}

#[test]
fn test_list_by_tag_and_by_user() {
    let (_tmp, db) = seeded();

    let tagged = json_stdout(&portal(
        &db,
        &["list", "--tag", "ink", "--tag", "paper", "--json"],
    ));
    assert_eq!(tagged["items"].as_array().unwrap().len(), 1);
    assert_eq!(tagged["items"][0]["id"], "w2");

    let alice = json_stdout(&portal(&db, &["by-user", "alice", "--json"]));
    let ids: Vec<_> = alice["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["w3", "w1"]);
}

#[test]
fn test_human_output_renders_dates() {
    let (_tmp, db) = seeded();
    let out = portal(&db, &["list", "--limit", "1"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("2020-09-13 12:26:43  w3  alice  Third"));
    assert!(stdout.contains("Next page: --cursor"));
}

#[test]
fn test_invoke_prints_envelope() {
    let (_tmp, db) = seeded();
    let out = portal(
        &db,
        &[
            "invoke",
            r#"{"field":"workConnection","arguments":{"userId":"bob"}}"#,
        ],
    );
    let envelope = json_stdout(&out);
    assert_eq!(envelope["statusCode"], 200);
    assert_eq!(envelope["headers"]["Access-Control-Allow-Origin"], "*");

    let body: serde_json::Value =
        serde_json::from_str(envelope["body"].as_str().unwrap()).unwrap();
    assert_eq!(body["items"][0]["id"], "w2");
    assert_eq!(body["items"][0]["createdAt"], 1_600_000_002i64);
}

#[test]
fn test_negative_limit_fails() {
    let (_tmp, db) = seeded();
    let out = portal(&db, &["list", "--limit", "-1"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("ERR_INVALID_INPUT"));
}

#[test]
fn test_config_file_changes_default_limit() {
    let (tmp, db) = seeded();
    let config = tmp.path().join("portal.toml");
    fs::write(&config, "default_limit = 1\n").unwrap();

    let page = json_stdout(&portal(
        &db,
        &["--config", config.to_str().unwrap(), "list", "--json"],
    ));
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert!(page["exclusiveStartKey"].is_string());
}
