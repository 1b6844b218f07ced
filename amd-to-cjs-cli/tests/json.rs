use assert_cmd::Command;
use serde_json::Value;
use std::time::Duration;

fn amd_to_cjs_cli() -> Command {
  assert_cmd::cargo::cargo_bin_cmd!("amd-to-cjs-cli")
}

#[test]
fn json_success_contains_schema_version_and_output() {
  let assert = amd_to_cjs_cli()
    .timeout(Duration::from_secs(5))
    .arg("--json")
    .arg("--mode")
    .arg("global")
    .write_stdin("define(function() { return 1; });")
    .assert()
    .success()
    .code(0);

  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );

  let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
  let value: Value = serde_json::from_str(&stdout).expect("stdout to be valid JSON");
  assert_eq!(value["schema_version"], 1);
  assert_eq!(value["mode"], "global");
  assert_eq!(value["output"], "module.exports = 1;");
  assert!(value.get("diagnostics").is_none());
}

#[test]
fn json_error_contains_diagnostics_array() {
  let assert = amd_to_cjs_cli()
    .timeout(Duration::from_secs(5))
    .arg("--json")
    .arg("--mode")
    .arg("module")
    .write_stdin("require(DEPS, function(a) {});")
    .assert()
    .failure()
    .code(1);

  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );

  let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
  let value: Value = serde_json::from_str(&stdout).expect("stdout to be valid JSON");
  assert_eq!(value["schema_version"], 1);
  assert_eq!(value["mode"], "module");
  assert!(value.get("output").is_none());

  let diagnostics = value
    .get("diagnostics")
    .and_then(|value| value.as_array())
    .expect("expected diagnostics array");
  assert_eq!(diagnostics.len(), 1);
  assert_eq!(diagnostics[0]["line"], 1);
  assert_eq!(diagnostics[0]["column"], 9);
  assert!(diagnostics[0]["message"]
    .as_str()
    .is_some_and(|message| message.contains("DEPS")));
}
