use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn write_config(dir: &Path, file_name: &str, body: &str) -> PathBuf {
    let config_path = dir.join(file_name);
    fs::write(&config_path, body).expect("write config");
    config_path
}

fn write_valid_config(dir: &Path, file_name: &str) -> PathBuf {
    write_config(
        dir,
        file_name,
        r#"
name = "invgw-cli-test"
env = "dev"

[inventory]
endpoint = "http://127.0.0.1:50051"
client_uuid = "5f0c6b9e-1d55-4c38-a1f0-0d6f3b1c9a11"
timeout_seconds = 5
default_tenant = "tenant-default"

[observability]
filter_level = "info"

[observability.log]
output = "console"
"#,
    )
}

fn run_invgw(args: &[&str], current_dir: Option<&Path>) -> Output {
    let mut cmd = Command::new(PathBuf::from(env!("CARGO_BIN_EXE_invgw")));
    cmd.args(args);
    if let Some(dir) = current_dir {
        cmd.current_dir(dir);
    }
    cmd.output().expect("run invgw command")
}

#[test]
fn invgw_test_command_accepts_explicit_valid_config() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config_path = write_valid_config(temp.path(), "valid.toml");

    let output = run_invgw(&["test", config_path.to_str().expect("utf8 path")], None);

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    // stdout 只留给 call 的结果
    assert!(output.stdout.is_empty());
}

#[test]
fn invgw_test_command_prints_effective_config() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config_path = write_config(temp.path(), "minimal.toml", "name = \"invgw-minimal\"\n");

    let output = run_invgw(
        &["test", "--print", config_path.to_str().expect("utf8 path")],
        None,
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "unexpected failure: {stdout}");
    assert!(stdout.contains("name = \"invgw-minimal\""), "{stdout}");
    // 未写出的字段以缺省值出现
    assert!(stdout.contains("timeout_seconds = 10"), "{stdout}");
    assert!(stdout.contains("[observability.tracing]"), "{stdout}");
}

#[test]
fn invgw_test_command_finds_default_config_in_current_directory() {
    let temp = tempfile::tempdir().expect("temp dir");
    write_valid_config(temp.path(), "config.toml");

    let output = run_invgw(&["test"], Some(temp.path()));

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invgw_test_command_tolerates_warnings() {
    let temp = tempfile::tempdir().expect("temp dir");
    // prod + 明文 endpoint 只产生警告
    let config_path = write_config(
        temp.path(),
        "warning.toml",
        r#"
name = "invgw-cli-warning-test"
env = "prod"

[inventory]
endpoint = "http://inventory.internal:50051"
"#,
    );

    let output = run_invgw(&["test", config_path.to_str().expect("utf8 path")], None);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "unexpected failure: {stderr}");
    assert!(stderr.contains("Warning:"), "unexpected stderr: {stderr}");
}

#[test]
fn invgw_test_command_rejects_invalid_config() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config_path = write_config(
        temp.path(),
        "invalid.toml",
        r#"
name = "invgw-cli-invalid-test"
env = "staging"

[inventory]
endpoint = "grpc://inventory:50051"
"#,
    );

    let output = run_invgw(&["test", config_path.to_str().expect("utf8 path")], None);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "command should fail");
    assert!(stderr.contains("Invalid environment"), "unexpected stderr: {stderr}");
    assert!(
        stderr.contains("http:// or https://"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn invgw_test_command_fails_for_missing_custom_config_path() {
    let temp = tempfile::tempdir().expect("temp dir");
    let missing_path = temp.path().join("missing.toml");

    let output = run_invgw(&["test", missing_path.to_str().expect("utf8 path")], None);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "command should fail");
    assert!(
        stderr.contains("Config file not found"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn invgw_call_rejects_malformed_json_before_connecting() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config_path = write_valid_config(temp.path(), "valid.toml");

    let output = run_invgw(
        &[
            "--config",
            config_path.to_str().expect("utf8 path"),
            "call",
            "--resource",
            "region",
            "--operation",
            "post",
            "--data",
            "{name:",
        ],
        None,
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "command should fail");
    assert!(
        stderr.contains("--data is not valid JSON"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn invgw_call_rejects_unknown_resource() {
    let output = run_invgw(&["call", "--resource", "host", "--operation", "get"], None);
    assert!(!output.status.success(), "command should fail");
}
