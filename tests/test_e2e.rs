use std::path::Path;
use std::process::Command;

fn mutsense_bin() -> std::path::PathBuf {
    let mut path = std::env::current_exe().unwrap();
    // test binary is in target/debug/deps/, mutsense binary is in target/debug/
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("mutsense");
    path
}

fn write_fixture(dir: &Path) {
    std::fs::write(
        dir.join("mutations.json"),
        r#"[
  {"source_file": "com/foo/Bar.java", "class_name": "com.foo.Bar", "status": "KILLED", "detected": true},
  {"source_file": "com/foo/Bar.java", "class_name": "com.foo.Bar", "status": "KILLED", "detected": true},
  {"source_file": "com/foo/Bar.java", "class_name": "com.foo.Bar", "status": "KILLED", "detected": true},
  {"source_file": "com/foo/Bar.java", "class_name": "com.foo.Bar", "line": 17, "status": "SURVIVED"},
  {"source_file": "com/foo/Bar.java", "class_name": "com.foo.Bar", "status": "NO_COVERAGE"},
  {"source_file": "Maze.kt", "status": "SURVIVED", "line": 4},
  {"source_file": "Maze.kt", "status": "KILLED", "detected": true},
  {"source_file": "Maze.kt", "status": "NO_COVERAGE"}
]"#,
    )
    .unwrap();
}

fn analyze(dir: &Path, extra: &[&str]) -> std::process::Output {
    Command::new(mutsense_bin())
        .args(["analyze", "--report", "mutations.json", "--json"])
        .args(extra)
        .current_dir(dir)
        .env_remove("MUTSENSE_SKIP")
        .output()
        .expect("failed to run mutsense")
}

fn parse_stdout(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| {
        panic!(
            "Invalid JSON: {e}\nstdout: {stdout}\nstderr: {}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

#[test]
fn e2e_default_rules_json_output() {
    let dir = tempfile::TempDir::new().unwrap();
    write_fixture(dir.path());

    let output = analyze(dir.path(), &[]);
    let result = parse_stdout(&output);

    assert_eq!(output.status.code(), Some(1), "issues should yield exit 1");
    assert_eq!(result["metrics"]["com/foo/Bar.java"]["generated"], 5);
    assert_eq!(result["metrics"]["Maze.kt"]["killed"], 1);
    // 2 survived mutants + Maze.kt below 50%
    assert_eq!(result["issues"].as_array().unwrap().len(), 3);
    assert_eq!(result["measures"].as_array().unwrap().len(), 14);
}

#[test]
fn e2e_profile_with_low_threshold() {
    let dir = tempfile::TempDir::new().unwrap();
    write_fixture(dir.path());
    std::fs::write(
        dir.path().join("rules.toml"),
        "[rules.insufficient-mutation-coverage]\ncoverageRatio = 10\n",
    )
    .unwrap();

    let output = analyze(dir.path(), &["--profile", "rules.toml"]);
    let result = parse_stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(result["issues"].as_array().unwrap().is_empty());
    assert_eq!(result["metrics"].as_object().unwrap().len(), 2);
}

#[test]
fn e2e_skip_yields_empty_analysis() {
    let dir = tempfile::TempDir::new().unwrap();
    write_fixture(dir.path());

    let output = analyze(dir.path(), &["--skip"]);
    let result = parse_stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(result["metrics"].as_object().unwrap().is_empty());
    assert!(result["issues"].as_array().unwrap().is_empty());
}

#[test]
fn e2e_missing_report_does_not_fail() {
    let dir = tempfile::TempDir::new().unwrap();

    let output = analyze(dir.path(), &[]);
    let result = parse_stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(result["metrics"].as_object().unwrap().is_empty());
}

#[test]
fn e2e_bad_profile_exits_2() {
    let dir = tempfile::TempDir::new().unwrap();
    write_fixture(dir.path());
    std::fs::write(dir.path().join("rules.toml"), "[rules\n").unwrap();

    let output = analyze(dir.path(), &["--profile", "rules.toml"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn e2e_skip_ignores_bad_profile() {
    let dir = tempfile::TempDir::new().unwrap();
    write_fixture(dir.path());
    std::fs::write(dir.path().join("rules.toml"), "[rules\n").unwrap();

    let output = analyze(dir.path(), &["--skip", "--profile", "rules.toml"]);
    let result = parse_stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(result["metrics"].as_object().unwrap().is_empty());
    assert!(result["issues"].as_array().unwrap().is_empty());
}

#[test]
fn e2e_source_root_filters_unknown_files() {
    let dir = tempfile::TempDir::new().unwrap();
    write_fixture(dir.path());
    std::fs::write(dir.path().join("Maze.kt"), "class Maze").unwrap();

    let root = dir.path().to_str().unwrap();
    let output = analyze(dir.path(), &["--source-root", root]);
    let result = parse_stdout(&output);

    let metrics = result["metrics"].as_object().unwrap();
    assert_eq!(metrics.len(), 1);
    assert!(metrics.contains_key("Maze.kt"));
}

#[test]
fn e2e_output_file_written() {
    let dir = tempfile::TempDir::new().unwrap();
    write_fixture(dir.path());

    let output = Command::new(mutsense_bin())
        .args(["analyze", "-r", "mutations.json", "-o", "analysis.json", "--quiet"])
        .current_dir(dir.path())
        .env_remove("MUTSENSE_SKIP")
        .output()
        .expect("failed to run mutsense");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("analysis.json")).unwrap()).unwrap();
    assert_eq!(saved["metrics"]["Maze.kt"]["generated"], 3);
}

#[test]
fn e2e_human_output_mentions_files() {
    let dir = tempfile::TempDir::new().unwrap();
    write_fixture(dir.path());

    let output = Command::new(mutsense_bin())
        .args(["analyze", "--report", "mutations.json"])
        .current_dir(dir.path())
        .env_remove("MUTSENSE_SKIP")
        .output()
        .expect("failed to run mutsense");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Maze.kt"));
    assert!(stdout.contains("com/foo/Bar.java"));
    assert!(stdout.contains("survived-mutant"));
}

#[test]
fn e2e_rules_json_lists_both_rules() {
    let output = Command::new(mutsense_bin())
        .args(["rules", "--json"])
        .output()
        .expect("failed to run mutsense");

    let result = parse_stdout(&output);
    let rules = result.as_array().unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0]["key"], "survived-mutant");
    assert_eq!(rules[1]["parameters"]["coverageRatio"], "50");
}
