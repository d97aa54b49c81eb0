//! Policy file loading tests

use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;

use fieldguard::config::{ConfigError, PolicyFile, ServerConfig};
use fieldguard::policy::compute_allowed_fields;
use fieldguard::Sensitivity;

const POLICY: &str = r#"{
    "tables": {
        "accounts": {"fields": [
            {"name": "account_id", "type": "int", "sensitivity": "public"},
            {"name": "iban", "type": "string", "sensitivity": "confidential"},
            {"name": "opened", "type": "date", "sensitivity": "public"}
        ]}
    },
    "roles": {"teller": ["public"], "auditor": ["public", "confidential"]}
}"#;

fn policy_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(POLICY.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_policy_file() {
    let file = policy_file();
    let (catalog, policy) = PolicyFile::load(file.path()).unwrap().build().unwrap();

    assert_eq!(catalog.list_tables(), vec!["accounts"]);
    let accounts = catalog.lookup("accounts").unwrap();
    assert_eq!(accounts.fields[1].sensitivity, Sensitivity::Confidential);
    assert_eq!(policy.allowed_sensitivities("teller").len(), 1);
    assert!(policy.allowed_sensitivities("basic").is_empty());
}

#[test]
fn test_config_uses_policy_file() {
    let file = policy_file();
    let path = file.path().to_str().unwrap();
    let config = ServerConfig::parse_from(["fieldguard", "--policy-file", path]);

    let (catalog, policy) = config.load_policy().unwrap();
    assert!(catalog.table_exists("accounts"));
    assert!(!catalog.table_exists("users"));
    assert!(policy.has_role("auditor"));
}

#[test]
fn test_missing_policy_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    let err = PolicyFile::load(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_custom_label_reaches_field() {
    let file = PolicyFile::parse(
        r#"{
            "tables": {"costs": {"fields": [
                {"name": "id", "type": "int", "sensitivity": "public"},
                {"name": "cost", "type": "float", "sensitivity": "internal"}
            ]}},
            "roles": {"ops": ["public", "Internal"], "viewer": ["public"]}
        }"#,
    )
    .unwrap();
    let (catalog, policy) = file.build().unwrap();
    let costs = catalog.lookup("costs").unwrap();

    let ops = compute_allowed_fields(costs, &policy.allowed_sensitivities("ops"));
    let names: Vec<&str> = ops.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["id", "cost"]);

    let viewer = compute_allowed_fields(costs, &policy.allowed_sensitivities("viewer"));
    assert_eq!(viewer.len(), 1);
}
