/// CLI binary integration tests using assert_cmd
///
/// Every test runs the binary against a sandboxed home directory.
mod common;

use assert_cmd::prelude::*;
use common::{EntryBuilder, TestEnv};
use histsearch::HistoryStore;
use predicates::prelude::*;

#[test]
fn test_cli_record_stores_command() {
    let env = TestEnv::new();

    env.command()
        .args(["record", "--command", "cargo test", "--exit-code", "0", "--directory", "/work"])
        .args(["--session", "abc", "--ts", "1700000000s", "--duration", "1500"])
        .assert()
        .success();

    let entries = env.store().fetch_candidates(0, false, false).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].command, "cargo test");
    assert_eq!(entries[0].directory, "/work");
    assert_eq!(entries[0].session_id, "abc");
    assert_eq!(entries[0].timestamp_ms, 1_700_000_000_000);
    assert_eq!(entries[0].duration_ms, 1500);
}

#[test]
fn test_cli_record_computes_missing_duration() {
    let env = TestEnv::new();

    env.command()
        .args(["record", "--command", "sleep 1", "--ts", "1700000000000"])
        .assert()
        .success();

    let entries = env.store().fetch_candidates(0, false, false).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].duration_ms > 0);
}

#[test]
fn test_cli_record_applies_filters() {
    let env = TestEnv::new().with_config(
        r#"
        [filters]
        command_glob = ["secret *"]
        "#,
    );

    for (command, code) in [(" leading space", "0"), ("interrupted", "130"), ("secret token", "0")] {
        env.command()
            .args(["record", "--command", command, "--exit-code", code])
            .assert()
            .success();
    }
    env.command().args(["record", "--command", "kept", "--exit-code", "1"]).assert().success();

    let entries = env.store().fetch_candidates(0, false, false).unwrap();
    let commands: Vec<&str> = entries.iter().map(|e| e.command.as_str()).collect();
    assert_eq!(commands, vec!["kept"]);
    assert_eq!(entries[0].exit_code, 1);
}

#[test]
fn test_cli_record_rejects_bad_timestamp() {
    let env = TestEnv::new();
    env.command()
        .args(["record", "--command", "ls", "--ts", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timestamp"));
}

#[test]
fn test_cli_stats_with_data() {
    let env = TestEnv::new().with_entries(&[
        EntryBuilder::new("git status").build(),
        EntryBuilder::new("git status").at(10).build(),
        EntryBuilder::new("make").at(20).exit(2).build(),
    ]);

    env.command()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shell History Statistics"))
        .stdout(predicate::str::contains("Total commands: 3"))
        .stdout(predicate::str::contains("Failed: 1"))
        .stdout(predicate::str::contains("Distinct: 2"))
        .stdout(predicate::str::contains("Newest entry:"));
}

#[test]
fn test_cli_stats_empty_database() {
    let env = TestEnv::new();
    env.command()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total commands: 0"))
        .stdout(predicate::str::contains("Oldest entry").not());
}

#[test]
fn test_cli_stats_json() {
    let env = TestEnv::new().with_entries(&[
        EntryBuilder::new("ls").build(),
        EntryBuilder::new("false").at(5).exit(1).build(),
    ]);

    let output = env.command().args(["stats", "--json"]).output().unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["failures"], 1);
    assert_eq!(stats["oldest_ms"], common::BASE_TS_MS);
    assert_eq!(stats["newest_ms"], common::BASE_TS_MS + 5000);
}

#[test]
fn test_cli_init_scripts() {
    let env = TestEnv::new();
    for shell in ["bash", "zsh", "fish"] {
        env.command()
            .args(["init", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains("histsearch record"))
            .stdout(predicate::str::contains("histsearch search"));
    }
}

#[test]
fn test_cli_init_exports_config_flag() {
    let env = TestEnv::new();
    env.command()
        .args(["--config", "/etc/hs.toml", "init", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("export HISTSEARCH_CONFIG='/etc/hs.toml'"));
}

#[test]
fn test_cli_init_unknown_shell() {
    let env = TestEnv::new();
    env.command().args(["init", "tcsh"]).assert().failure();
}

#[test]
fn test_cli_config_path_and_show() {
    let env = TestEnv::new();
    let expected = env.config_path();

    env.command()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));

    env.command()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[display]"))
        .stdout(predicate::str::contains("cwd_boost = 50"));

    // show writes the defaults on first use
    assert!(expected.exists());
}

#[test]
fn test_cli_config_env_override() {
    let env = TestEnv::new();
    let custom = env.home().join("custom.toml");

    env.command()
        .env("HISTSEARCH_CONFIG", &custom)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(custom.display().to_string()));
}

#[test]
fn test_cli_invalid_config_is_reported() {
    let env = TestEnv::new().with_config(
        r#"
        [display]
        enable_fuzzy = false
        enable_regex = false
        enable_glob = false
        "#,
    );

    env.command()
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one match mode"));
}

#[test]
fn test_cli_session_id_is_uuid() {
    let env = TestEnv::new();
    let output = env.command().arg("session-id").output().unwrap();
    assert!(output.status.success());

    let id = String::from_utf8(output.stdout).unwrap();
    assert!(uuid::Uuid::parse_str(id.trim()).is_ok());
}

#[test]
fn test_cli_no_command_shows_help_message() {
    let env = TestEnv::new();
    env.command()
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --help for usage information"));
}

#[test]
fn test_cli_help_hides_internal_commands() {
    let env = TestEnv::new();
    env.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("session-id").not());
}

#[test]
fn test_cli_version_flag() {
    let env = TestEnv::new();
    env.command().arg("--version").assert().success().stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let env = TestEnv::new();
    env.command().arg("invalid-command").assert().failure();
}
