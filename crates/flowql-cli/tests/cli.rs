// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;

#[test]
fn dangling_value_option_exits_one_with_exact_message() {
    Command::cargo_bin("flow").unwrap().arg("--workspace").assert().failure().code(1).stderr("Option '--workspace' requires a value\n");
}

#[test]
fn value_option_immediately_followed_by_another_flag_exits_one() {
    Command::cargo_bin("flow")
        .unwrap()
        .args(["--dump-graph", "--max-depth", "3"])
        .assert()
        .failure()
        .code(1)
        .stderr("Option '--dump-graph' requires a value\n");
}

#[test]
fn empty_workspace_composes_and_prints_a_json_graph() {
    let dir = std::env::temp_dir().join("flowql-cli-empty-workspace-test");
    std::fs::create_dir_all(&dir).unwrap();

    let output = Command::cargo_bin("flow").unwrap().args(["--workspace", dir.to_str().unwrap()]).output().unwrap();

    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"nodes\""), "expected a JSON graph dump, got: {stdout}");
}
