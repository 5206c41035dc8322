//! CLI smoke tests for the orphanscan binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    fs::write(
        dir.path().join("go.mod"),
        "module example.com/demo\n\ngo 1.22\n",
    )
    .expect("write go.mod");
    for (path, contents) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(full, contents).expect("write fixture file");
    }
    dir
}

/// A command isolated from any real user config in $HOME.
fn orphanscan(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("orphanscan").expect("binary builds");
    cmd.env("HOME", home.path());
    cmd.env_remove("ORPHANSCAN_JSON");
    cmd.env_remove("ORPHANSCAN_VERBOSE");
    cmd.env_remove("ORPHANSCAN_EXCLUDE");
    cmd.env_remove("ORPHANSCAN_INCLUDE_TESTS");
    cmd
}

#[test]
fn reports_orphans_and_exits_zero() {
    let home = tempfile::tempdir().unwrap();
    let dir = project(&[
        ("a.go", "package main\n\nfunc main() {\n\tused()\n}\n"),
        (
            "b.go",
            "package main\n\nfunc used() {}\n\nfunc unused() {}\n",
        ),
    ]);

    orphanscan(&home)
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ORPHANED CODE ANALYSIS"))
        .stdout(predicate::str::contains("unused"))
        .stdout(predicate::str::contains("Orphan rate"));
}

#[test]
fn clean_project_prints_confirmation() {
    let home = tempfile::tempdir().unwrap();
    let dir = project(&[("main.go", "package main\n\nfunc main() {}\n")]);

    orphanscan(&home)
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No orphaned code found"));
}

#[test]
fn json_mode_emits_only_a_json_document() {
    let home = tempfile::tempdir().unwrap();
    let dir = project(&[
        ("a.go", "package main\n\nfunc main() {\n\tused()\n}\n"),
        (
            "b.go",
            "package main\n\nfunc used() {}\n\nfunc unused() {}\n",
        ),
    ]);

    let output = orphanscan(&home)
        .arg("--json")
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let document: serde_json::Value =
        serde_json::from_slice(&output).expect("stdout is a single JSON document");
    assert_eq!(document["total_symbols"], 3);
    assert_eq!(document["reachable_symbols"], 2);
    assert_eq!(document["orphaned_symbols"][0]["name"], "unused");
    assert_eq!(document["included_tests"], false);
}

#[test]
fn load_failure_exits_nonzero() {
    let home = tempfile::tempdir().unwrap();
    orphanscan(&home)
        .arg("/nonexistent/project/path")
        .assert()
        .failure();
}

#[test]
fn version_subcommand_prints_build_metadata() {
    let home = tempfile::tempdir().unwrap();
    orphanscan(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("Commit:"));
}

#[test]
fn config_init_creates_and_refuses_to_overwrite() {
    let home = tempfile::tempdir().unwrap();

    orphanscan(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));
    assert!(home.path().join(".orphanscan.yaml").is_file());

    orphanscan(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_show_reports_effective_values() {
    let home = tempfile::tempdir().unwrap();
    fs::write(
        home.path().join(".orphanscan.yaml"),
        "verbose: true\nexclude:\n  - \"vendor/*\"\n",
    )
    .unwrap();

    orphanscan(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Verbose: true"))
        .stdout(predicate::str::contains("vendor/*"));
}

#[test]
fn exclude_flag_accepts_comma_joined_patterns() {
    let home = tempfile::tempdir().unwrap();
    let dir = project(&[
        (
            "cmd/main.go",
            "package main\n\nfunc main() {}\n",
        ),
        (
            "gen/gen.go",
            "package gen\n\nfunc stale() {}\n",
        ),
        (
            "extra/extra.go",
            "package extra\n\nfunc leftover() {}\n",
        ),
    ]);

    let output = orphanscan(&home)
        .arg("--json")
        .args(["--exclude", "*gen*,*extra*"])
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let document: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(document["orphaned_symbols"], serde_json::json!([]));
    assert_eq!(
        document["excluded_packages"],
        serde_json::json!(["*gen*", "*extra*"])
    );
}

#[test]
fn environment_variables_override_file_defaults() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join(".orphanscan.yaml"), "json: false\n").unwrap();
    let dir = project(&[("main.go", "package main\n\nfunc main() {}\n")]);

    let output = orphanscan(&home)
        .env("ORPHANSCAN_JSON", "true")
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    // The env override switches the run into JSON mode.
    let document: serde_json::Value =
        serde_json::from_slice(&output).expect("stdout is a single JSON document");
    assert_eq!(document["main_packages"], 1);
}
