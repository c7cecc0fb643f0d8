//! CLI end-to-end tests against the built `carve` binary.

use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn scratch_config(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("carve-cli-test-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    let _ = std::fs::remove_file(&path);
    path
}

/// Run the CLI and return (exit code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    finish(Command::new(env!("CARGO_BIN_EXE_carve")).args(args))
}

/// Same as `run_cli`, with `HOME` removed from the environment.
fn run_cli_without_home(args: &[&str]) -> (i32, String, String) {
    finish(
        Command::new(env!("CARGO_BIN_EXE_carve"))
            .args(args)
            .env_remove("HOME"),
    )
}

fn finish(cmd: &mut Command) -> (i32, String, String) {
    let output = cmd.output().expect("failed to run carve");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

#[test]
fn plan_prints_json_outcome() {
    let config = scratch_config("plan-json");
    let input = fixture("day.json");
    let (code, stdout, stderr) = run_cli(&[
        "plan",
        "--input",
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--json",
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let allocations = value["allocations"].as_array().unwrap();
    assert!(!allocations.is_empty());
    assert_eq!(
        value["explanations"].as_array().unwrap().len(),
        allocations.len()
    );
    assert_eq!(value["remaining"].as_array().unwrap().len(), 3);

    // exercise must stay out of work hours
    for a in allocations.iter().filter(|a| a["goalId"] == "exercise") {
        assert_eq!(a["sourceKind"], "free");
    }
}

#[test]
fn plan_prints_table_with_explanations() {
    let config = scratch_config("plan-table");
    let input = fixture("day.json");
    let (code, stdout, _) = run_cli(&[
        "plan",
        "--input",
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--explain",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("## Allocations"));
    assert!(stdout.contains("PreferenceMatch: raw="));
    assert!(stdout.contains("## Remaining"));
}

#[test]
fn invalid_interval_fails_with_context() {
    let config = scratch_config("bad");
    let input = fixture("bad_interval.json");
    let (code, _, stderr) = run_cli(&[
        "plan",
        "--input",
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("invalid interval"), "stderr: {stderr}");
}

#[test]
fn validate_reports_normalized_free_time() {
    let input = fixture("day.json");
    let config = scratch_config("validate");
    let (code, stdout, _) = run_cli(&[
        "validate",
        "--input",
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("work (480 min):"));
    assert!(stdout.contains("3 goals valid"));
}

#[test]
fn config_init_then_show() {
    let config = scratch_config("init");
    let path = config.to_str().unwrap();

    let (code, stdout, _) = run_cli(&["config", "init", "--config", path]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Wrote"));
    assert!(config.exists());

    let (code, stdout, _) = run_cli(&["config", "init", "--config", path]);
    assert_eq!(code, 0);
    assert!(stdout.contains("already exists"));

    let (code, stdout, _) = run_cli(&["config", "show", "--config", path]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[scoring]"));
    assert!(stdout.contains("priority = 10.0"));
}

#[test]
fn validate_and_explicit_config_work_without_home() {
    let input = fixture("day.json");
    let (code, stdout, stderr) =
        run_cli_without_home(&["validate", "--input", input.to_str().unwrap()]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("3 goals valid"));

    let config = scratch_config("no-home");
    let (code, _, stderr) = run_cli_without_home(&[
        "plan",
        "--input",
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");

    // without --config the default location needs HOME
    let (code, _, stderr) = run_cli_without_home(&["plan", "--input", input.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(stderr.contains("HOME is not set"), "stderr: {stderr}");
}
