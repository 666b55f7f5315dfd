//! E2E tests for the filter command: selection flags, search, state
//! fragments, counts, and robot-mode output.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

mod util;
use util::write_catalog;

#[test]
fn no_constraints_lists_the_whole_catalog_in_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    cargo_bin_cmd!("cardex")
        .arg("filter")
        .arg("--db")
        .arg(&db)
        .assert()
        .success()
        .stdout("Oak\nPine\nMaple\n");
}

#[test]
fn concrete_selection_narrows_to_matching_items() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    cargo_bin_cmd!("cardex")
        .arg("filter")
        .arg("--db")
        .arg(&db)
        .args(["--select", "genus:family=Fagaceae"])
        .assert()
        .success()
        .stdout("Oak\n");
}

#[test]
fn unknown_selection_matches_items_lacking_the_descriptor() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    // Maple carries no genus class at all.
    cargo_bin_cmd!("cardex")
        .arg("filter")
        .arg("--db")
        .arg(&db)
        .args(["--unknown", "genus:family"])
        .assert()
        .success()
        .stdout("Maple\n");
}

#[test]
fn search_is_case_insensitive() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    cargo_bin_cmd!("cardex")
        .arg("filter")
        .arg("--db")
        .arg(&db)
        .args(["--search", "pIn"])
        .assert()
        .success()
        .stdout("Pine\n");
}

#[test]
fn zero_matches_report_on_stderr() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    cargo_bin_cmd!("cardex")
        .arg("filter")
        .arg("--db")
        .arg(&db)
        .args(["--search", "baobab"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("no items match"));
}

#[test]
fn state_fragment_restores_a_shared_view() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    let encode = cargo_bin_cmd!("cardex")
        .args(["state", "encode", "--select", "leaf:shape=lobed"])
        .output()
        .unwrap();
    assert!(encode.status.success());
    let fragment = String::from_utf8(encode.stdout).unwrap().trim().to_string();

    cargo_bin_cmd!("cardex")
        .arg("filter")
        .arg("--db")
        .arg(&db)
        .args(["--state", &fragment])
        .assert()
        .success()
        .stdout("Oak\nMaple\n");
}

#[test]
fn malformed_state_fragment_falls_back_to_defaults() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    cargo_bin_cmd!("cardex")
        .arg("filter")
        .arg("--db")
        .arg(&db)
        .args(["--state", "%7Bnot-json"])
        .assert()
        .success()
        .stdout("Oak\nPine\nMaple\n");
}

#[test]
fn selection_flags_layer_on_top_of_the_fragment() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    let encode = cargo_bin_cmd!("cardex")
        .args(["state", "encode", "--select", "leaf:shape=lobed"])
        .output()
        .unwrap();
    let fragment = String::from_utf8(encode.stdout).unwrap().trim().to_string();

    cargo_bin_cmd!("cardex")
        .arg("filter")
        .arg("--db")
        .arg(&db)
        .args(["--state", &fragment, "--search", "ma"])
        .assert()
        .success()
        .stdout("Maple\n");
}

#[test]
fn robot_mode_emits_items_and_counts() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    let output = cargo_bin_cmd!("cardex")
        .args(["--json", "filter", "--counts"])
        .arg("--db")
        .arg(&db)
        .args(["--select", "leaf:shape=lobed"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["total"], 2);
    assert_eq!(payload["items"][0]["name"], "Oak");
    assert_eq!(payload["items"][1]["name"], "Maple");
    // Counts preview what an additional genus constraint would leave.
    assert_eq!(payload["counts"]["genus"]["family"]["Fagaceae"], 1);
    assert_eq!(payload["counts"]["genus"]["family"]["__unknown__"], 1);
    assert_eq!(payload["state"]["filters"]["leaf"]["shape"], "lobed");
}

#[test]
fn human_counts_table_skips_the_internal_total() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    cargo_bin_cmd!("cardex")
        .arg("filter")
        .arg("--counts")
        .arg("--db")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("# genus:family"))
        .stdout(predicate::str::contains("Fagaceae=1"));
}

#[test]
fn malformed_selector_fails_with_context() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_specs, db) = write_catalog(tmp.path());

    cargo_bin_cmd!("cardex")
        .arg("filter")
        .arg("--db")
        .arg(&db)
        .args(["--select", "genus-family-Fagaceae"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("genus-family-Fagaceae"));
}

#[test]
fn missing_db_fails_with_the_path_in_the_error() {
    cargo_bin_cmd!("cardex")
        .arg("filter")
        .args(["--db", "/nonexistent/database.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/database.json"));
}
