//! E2E tests for `strata analyze`, `scc`, `topo` and `paths`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn strata_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("strata"));
    cmd.current_dir(dir);
    cmd.env("STRATA_LOG", "error");
    cmd.env_remove("STRATA_TIMING");
    cmd
}

fn write_graph(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write graph file");
    path
}

/// `{0,1}` cycle feeding the chain `2 -> 3`.
fn cycle_then_chain(dir: &Path) -> PathBuf {
    write_graph(
        dir,
        "chain.json",
        r#"{"directed":true,"n":4,"edges":[
            {"u":0,"v":1,"w":1.0},{"u":1,"v":0,"w":1.0},
            {"u":1,"v":2,"w":1.0},{"u":2,"v":3,"w":1.0}]}"#,
    )
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

#[test]
fn analyze_json_reports_components_order_and_distances() {
    let dir = TempDir::new().expect("tempdir");
    let file = cycle_then_chain(dir.path());

    let json = json_output(strata_cmd(dir.path()).args(["analyze", "--json"]).arg(&file));

    assert_eq!(json["stats"]["component_count"], 3);
    assert_eq!(json["stats"]["cyclic_component_count"], 1);
    assert_eq!(json["condensation"]["nodes"], 3);
    assert_eq!(json["condensation"]["edges"], 2);
    assert_eq!(
        json["condensation"]["expanded_order"],
        serde_json::json!([0, 1, 2, 3])
    );
    assert_eq!(json["paths"]["source"], 0);
    assert_eq!(json["paths"]["shortest"][3], 2.0);
    assert_eq!(json["paths"]["longest"][3], 2.0);
    assert_eq!(json["paths"]["critical_path"]["length"], 2.0);
    assert!(
        json["content_hash"]
            .as_str()
            .is_some_and(|hash| hash.starts_with("blake3:"))
    );
}

#[test]
fn analyze_human_output_has_sections() {
    let dir = TempDir::new().expect("tempdir");
    let file = cycle_then_chain(dir.path());

    strata_cmd(dir.path())
        .arg("analyze")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Components (3, 1 cyclic, largest 2)"))
        .stdout(predicate::str::contains("Condensation"))
        .stdout(predicate::str::contains("critical path"));
}

#[test]
fn isolated_node_is_its_own_component() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_graph(dir.path(), "one.json", r#"{"n":1,"edges":[]}"#);

    let json = json_output(strata_cmd(dir.path()).args(["analyze", "--json"]).arg(&file));
    assert_eq!(json["components"][0]["members"], serde_json::json!([0]));
    assert_eq!(json["condensation"]["order"], serde_json::json!([0]));
    assert_eq!(json["paths"]["shortest"], serde_json::json!([0.0]));
}

#[test]
fn scc_lists_cyclic_component() {
    let dir = TempDir::new().expect("tempdir");
    let file = cycle_then_chain(dir.path());

    strata_cmd(dir.path())
        .arg("scc")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("[0, 1]  cycle"));
}

#[test]
fn raw_topo_on_cycle_reports_no_order() {
    let dir = TempDir::new().expect("tempdir");
    let file = cycle_then_chain(dir.path());

    let json = json_output(strata_cmd(dir.path()).args(["topo", "--json"]).arg(&file));
    assert_eq!(json["acyclic"], false);
    assert_eq!(json["order"], Value::Null);

    strata_cmd(dir.path())
        .arg("topo")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycle detected"));
}

#[test]
fn condensed_topo_always_orders() {
    let dir = TempDir::new().expect("tempdir");
    let file = cycle_then_chain(dir.path());

    let json = json_output(
        strata_cmd(dir.path())
            .args(["topo", "--condensed", "--json"])
            .arg(&file),
    );
    assert_eq!(json["acyclic"], true);
    assert_eq!(json["order"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["expanded_order"], serde_json::json!([0, 1, 2, 3]));
}

#[test]
fn paths_relax_every_parallel_edge() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_graph(
        dir.path(),
        "parallel.json",
        r#"{"n":3,"edges":[{"u":0,"v":1,"w":5},{"u":0,"v":1,"w":2},{"u":1,"v":2,"w":1}]}"#,
    );

    let json = json_output(strata_cmd(dir.path()).args(["paths", "--json"]).arg(&file));
    assert_eq!(json["paths"]["shortest"][2], 3.0);
    assert_eq!(json["paths"]["longest"][2], 6.0);
}

#[test]
fn paths_source_flag_and_unreachable_null() {
    let dir = TempDir::new().expect("tempdir");
    let file = cycle_then_chain(dir.path());

    let json = json_output(
        strata_cmd(dir.path())
            .args(["paths", "--source", "2", "--json"])
            .arg(&file),
    );
    assert_eq!(json["paths"]["source"], 2);
    assert_eq!(json["paths"]["shortest"][0], Value::Null);
    assert_eq!(json["paths"]["shortest"][3], 1.0);
}

#[test]
fn file_source_hint_is_used_when_no_flag() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_graph(
        dir.path(),
        "hint.json",
        r#"{"n":3,"edges":[{"u":0,"v":1,"w":1},{"u":1,"v":2,"w":1}],"source":1}"#,
    );

    let json = json_output(strata_cmd(dir.path()).args(["paths", "--json"]).arg(&file));
    assert_eq!(json["paths"]["source"], 1);
    assert_eq!(json["paths"]["shortest"][0], Value::Null);
}

#[test]
fn project_config_sets_simplify() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("strata.toml"),
        "[analysis]\nsimplify = \"min\"\n",
    )
    .expect("write config");
    let file = write_graph(
        dir.path(),
        "parallel.json",
        r#"{"n":2,"edges":[{"u":0,"v":1,"w":5},{"u":0,"v":1,"w":2}]}"#,
    );

    let json = json_output(strata_cmd(dir.path()).args(["analyze", "--json"]).arg(&file));
    assert_eq!(json["condensation"]["edges"], 1);
    assert_eq!(json["paths"]["longest"][1], 2.0);

    let json = json_output(
        strata_cmd(dir.path())
            .args(["analyze", "--simplify", "none", "--json"])
            .arg(&file),
    );
    assert_eq!(json["condensation"]["edges"], 2);
    assert_eq!(json["paths"]["longest"][1], 5.0);
}

#[test]
fn timing_report_goes_to_stderr() {
    let dir = TempDir::new().expect("tempdir");
    let file = cycle_then_chain(dir.path());

    strata_cmd(dir.path())
        .args(["--timing", "analyze", "--json"])
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("timing report:"))
        .stderr(predicate::str::contains("cmd.analyze"))
        .stderr(predicate::str::contains("scc"));
}
