//! Integration tests for the `emfacts` CLI binary.
//!
//! Argument parsing, help, completions, and the module protocol, against a
//! mocked controller where one is needed.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `emfacts` binary with env isolation.
///
/// Clears every `EMFACTS_*` env var and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn emfacts_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("emfacts");
    cmd.env("HOME", "/tmp/emfacts-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/emfacts-cli-test-nonexistent")
        .env_remove("RUST_LOG");
    // Flag variables and the figment-layered EMFACTS_DEFAULTS__* /
    // EMFACTS_PROFILES__* ones alike.
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("EMFACTS_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

fn args_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

async fn mount_ticket(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/ticket"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "1.0",
            "response": { "serviceTicket": "ST-77" }
        })))
        .mount(server)
        .await;
}

fn module_args_for(server: &MockServer) -> NamedTempFile {
    args_file(
        &json!({"ANSIBLE_MODULE_ARGS": {
            "host": server.uri(),
            "username": "kingjoe",
            "password": "foobar"
        }})
        .to_string(),
    )
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = emfacts_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage':\n{stderr}");
}

#[test]
fn test_help_flag() {
    emfacts_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("APIC-EM")
            .and(predicate::str::contains("gather"))
            .and(predicate::str::contains("devices")),
    );
}

#[test]
fn test_version_flag() {
    emfacts_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("emfacts"));
}

#[test]
fn test_completions_zsh() {
    emfacts_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_revision_is_rejected() {
    emfacts_cmd()
        .args(["--revision", "ancient", "gather"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ancient"));
}

// ── Local commands ──────────────────────────────────────────────────

#[test]
fn test_config_path_prints_location() {
    emfacts_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_group_imdata_file() {
    let file = args_file(
        &json!({"imdata": [
            {"fvTenant": {"attributes": {"name": "common"}}},
            {"fvTenant": {"attributes": {"name": "infra"}}},
            {"fvBD": {"attributes": {"name": "default"}}}
        ]})
        .to_string(),
    );

    let output = emfacts_cmd()
        .args(["-o", "json", "group"])
        .arg(file.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({
            "ansible_facts": {
                "fvTenant": [{"name": "common"}, {"name": "infra"}],
                "fvBD": [{"name": "default"}]
            },
            "changed": false
        })
    );
}

#[test]
fn test_group_without_imdata_fails() {
    let file = args_file(r#"{"totalCount": "0"}"#);

    emfacts_cmd()
        .arg("group")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("imdata"));
}

// ── Module mode ─────────────────────────────────────────────────────

#[test]
fn test_gather_without_host_reports_failure() {
    let output = emfacts_cmd().arg("gather").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let reply = stdout_json(&output);
    assert_eq!(reply["failed"], json!(true));
    assert!(
        reply["msg"].as_str().unwrap().contains("host"),
        "got: {reply}"
    );
}

#[test]
fn test_gather_with_unreadable_args_file_reports_failure() {
    let output = emfacts_cmd()
        .args(["gather", "--args-file", "/tmp/emfacts-cli-test-nonexistent/args"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["failed"], json!(true));
}

#[test]
fn test_gather_with_missing_ca_cert_reports_tls_failure() {
    let args = args_file("host=127.0.0.1 username=admin password=x");

    let output = emfacts_cmd()
        .args(["--ca-cert", "/tmp/emfacts-cli-test-nonexistent/ca.pem", "gather"])
        .arg("--args-file")
        .arg(args.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let reply = stdout_json(&output);
    let msg = reply["msg"].as_str().unwrap();
    assert!(msg.starts_with("TLS setup failed:"), "got: {msg}");
    assert!(!msg.contains("controller at :"), "got: {msg}");
}

#[test]
fn test_profile_env_layer_reaches_the_binary() {
    // Nested config keys come from the environment too, which is why
    // `emfacts_cmd` strips every EMFACTS_* variable, not just the flag ones.
    let output = emfacts_cmd()
        .env("EMFACTS_PROFILES__DEFAULT__HOST", "10.0.0.9")
        .arg("gather")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let reply = stdout_json(&output);
    let msg = reply["msg"].as_str().unwrap();
    assert!(msg.contains("No credentials"), "got: {msg}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_gather_publishes_reachable_devices() {
    let server = MockServer::start().await;
    mount_ticket(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/network-device"))
        .and(header("X-Auth-Token", "ST-77"))
        .and(header("scope", "ALL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": [
            {"hostname": "edge-1", "reachabilityStatus": "Reachable"},
            {"hostname": "edge-2", "reachabilityStatus": "Unreachable"},
            {"hostname": "core-1", "reachabilityStatus": "Reachable"}
        ]})))
        .expect(1)
        .mount(&server)
        .await;

    let args = module_args_for(&server);
    let output = emfacts_cmd()
        .arg("gather")
        .arg("--args-file")
        .arg(args.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        stdout_json(&output),
        json!({
            "ansible_facts": {"network_device": [
                {"hostname": "edge-1", "reachabilityStatus": "Reachable"},
                {"hostname": "core-1", "reachabilityStatus": "Reachable"}
            ]},
            "changed": false
        })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_gather_reports_server_error_status() {
    let server = MockServer::start().await;
    mount_ticket(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/network-device"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let args = module_args_for(&server);
    let output = emfacts_cmd()
        .arg("gather")
        .arg("--args-file")
        .arg(args.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output),
        json!({"failed": true, "msg": "status_code= 500"})
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_legacy_gather_with_key_value_args() {
    let server = MockServer::start().await;
    mount_ticket(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reachability-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": [
            {"mgmtIp": "10.9.0.1", "reachabilityStatus": "Discovered"},
            {"mgmtIp": "10.9.0.2", "reachabilityStatus": "Unreachable"}
        ]})))
        .mount(&server)
        .await;

    let args = args_file(&format!(
        "host={} username=kingjoe password=foobar debug=yes",
        server.uri()
    ));
    let output = emfacts_cmd()
        .args(["--revision", "legacy", "gather", "--args-file"])
        .arg(args.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        stdout_json(&output),
        json!({"ansible_facts": {"mgmtIp": ["10.9.0.1"]}, "changed": false})
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rejected_login_reports_unable_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/ticket"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let args = module_args_for(&server);
    let output = emfacts_cmd()
        .arg("gather")
        .arg("--args-file")
        .arg(args.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output),
        json!({"failed": true, "msg": "Unable to login to controller"})
    );
}
