use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TENANT: &str = "acme";

fn write_doc(root: &Path, dir: &str, key: &str, value: &Value) {
    let path = root.join(TENANT).join(dir);
    fs::create_dir_all(&path).unwrap();
    fs::write(
        path.join(format!("{}.json", key)),
        serde_json::to_string_pretty(value).unwrap(),
    )
    .unwrap();
}

/// A data dir with an `account` catalog, a stored layout and two record lists.
fn seeded() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_doc(
        root,
        "catalogs",
        "account",
        &json!({
            "items": [
                {"id": "f-name", "display_name": "Name", "kind": "field"},
                {"id": "f-phone", "display_name": "Phone", "kind": "field"},
                {"id": "rl-contacts", "display_name": "Contacts", "kind": "related_list",
                 "display_columns": ["name", "email"]},
                {"id": "b-print", "display_name": "Print", "kind": "button"}
            ],
            "filter_fields": [
                {"field_name": "name", "field_type": "text", "display_name": "Account Name"},
                {"field_name": "annual_revenue", "field_type": "number", "display_name": "Revenue"},
                {"field_name": "is_active", "field_type": "boolean", "display_name": "Active"}
            ]
        }),
    );

    write_doc(
        root,
        "layouts",
        "account",
        &json!([
            {"block_type": "field", "field_id": "f-name", "label": "Name",
             "section": "details", "display_order": 0, "width": "half", "is_visible": true},
            {"block_type": "related_list", "related_list_id": "rl-contacts", "label": "Contacts",
             "section": "related_lists", "display_order": 0, "width": "full", "is_visible": true}
        ]),
    );

    write_doc(
        root,
        "lists",
        "acme_accounts",
        &json!({
            "name": "Acme accounts",
            "object_id": "account",
            "filter_criteria": [
                {"id": "g1", "logic": "AND", "group_order": 0, "conditions": [
                    {"id": "c1", "field_name": "name", "field_type": "text",
                     "operator": "starts_with", "value": "Acme", "condition_order": 0}
                ]}
            ]
        }),
    );

    write_doc(
        root,
        "lists",
        "broken",
        &json!({
            "name": "Broken",
            "object_id": "account",
            "filter_criteria": [
                {"id": "g1", "logic": "AND", "group_order": 0, "conditions": [
                    {"id": "c1", "field_name": "annual_revenue", "field_type": "number",
                     "operator": ">", "value": "lots", "condition_order": 0}
                ]}
            ]
        }),
    );

    dir
}

fn objman(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("objman").unwrap();
    cmd.env_remove("OBJMAN_TENANT")
        .env_remove("OBJMAN_LOG")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--tenant")
        .arg(TENANT);
    cmd
}

#[test]
fn layout_show_lists_sections_and_blocks() {
    let dir = seeded();
    objman(&dir)
        .args(["layout", "show", "account"])
        .assert()
        .success()
        .stdout(predicate::str::contains("details (field, reserved)"))
        .stdout(predicate::str::contains("related_lists (related_list, reserved)"))
        .stdout(predicate::str::contains("Contacts"));
}

#[test]
fn layout_show_without_stored_layout_is_empty() {
    let dir = seeded();
    objman(&dir)
        .args(["layout", "show", "contact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(empty)"))
        .stdout(predicate::str::contains("No layout stored for contact"));
}

#[test]
fn layout_palette_lists_unplaced_items() {
    let dir = seeded();
    objman(&dir)
        .args(["layout", "palette", "account"])
        .assert()
        .success()
        .stdout(predicate::str::contains("f-phone"))
        .stdout(predicate::str::contains("b-print"))
        .stdout(predicate::str::contains("f-name").not());
}

#[test]
fn layout_apply_saves_the_result() {
    let dir = seeded();
    let batch = dir.path().join("batch.json");
    fs::write(
        &batch,
        serde_json::to_string(&json!([
            {"command": "create_section", "name": "Billing", "section_type": "field"},
            {"command": "add_block", "section": "billing",
             "draft": {"block_type": "field", "field_id": "f-phone", "label": "Phone"}}
        ]))
        .unwrap(),
    )
    .unwrap();

    objman(&dir)
        .args(["layout", "apply", "account"])
        .arg(&batch)
        .assert()
        .success();

    let stored = fs::read_to_string(dir.path().join("acme/layouts/account.json")).unwrap();
    assert!(stored.contains("billing"));
    assert!(stored.contains("f-phone"));

    objman(&dir)
        .args(["layout", "check", "account"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is consistent"));
}

#[test]
fn layout_apply_rejects_a_field_in_related_lists() {
    let dir = seeded();
    let before = fs::read_to_string(dir.path().join("acme/layouts/account.json")).unwrap();
    let batch = dir.path().join("batch.json");
    fs::write(
        &batch,
        serde_json::to_string(&json!([
            {"command": "add_block", "section": "related_lists",
             "draft": {"block_type": "field", "field_id": "f-phone", "label": "Phone"}}
        ]))
        .unwrap(),
    )
    .unwrap();

    objman(&dir)
        .args(["layout", "apply", "account"])
        .arg(&batch)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rejected"));

    let after = fs::read_to_string(dir.path().join("acme/layouts/account.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn filter_compile_prints_predicate_and_parameters() {
    let dir = seeded();
    objman(&dir)
        .args(["filter", "compile", "acme_accounts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(name LIKE $1)"))
        .stdout(predicate::str::contains("\"Acme%\""));
}

#[test]
fn filter_compile_json_with_alias() {
    let dir = seeded();
    let output = objman(&dir)
        .args(["filter", "compile", "acme_accounts", "--alias", "a", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let compiled: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(compiled["predicate"], "(a.name LIKE $1)");
    assert_eq!(compiled["parameters"], json!(["Acme%"]));
}

#[test]
fn filter_validate_failure_exits_nonzero() {
    let dir = seeded();
    objman(&dir)
        .args(["filter", "validate", "broken"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Group 1, Condition 1: Value must be a number for field type \"number\"",
        ));

    objman(&dir)
        .args(["filter", "validate", "acme_accounts"])
        .assert()
        .success();
}

#[test]
fn filter_describe_uses_display_names() {
    let dir = seeded();
    objman(&dir)
        .args(["filter", "describe", "acme_accounts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Account Name starts with Acme"));
}

#[test]
fn filter_edit_clear_leaves_no_filters() {
    let dir = seeded();
    let edits = dir.path().join("edits.json");
    fs::write(&edits, r#"[{"edit": "clear"}]"#).unwrap();

    objman(&dir)
        .args(["filter", "edit", "acme_accounts"])
        .arg(&edits)
        .assert()
        .success();

    objman(&dir)
        .args(["filter", "describe", "acme_accounts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No filters applied"));
}

#[test]
fn missing_record_list_is_an_error() {
    let dir = seeded();
    objman(&dir)
        .args(["filter", "compile", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Record list not found"));
}

#[test]
fn config_set_changes_compile_output() {
    let dir = seeded();
    objman(&dir)
        .args(["config", "placeholder_style", "question"])
        .assert()
        .success()
        .stdout(predicate::str::contains("placeholder_style set to question"));

    objman(&dir)
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("placeholder_style = question"));

    objman(&dir)
        .args(["filter", "compile", "acme_accounts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(name LIKE ?)"));
}

#[test]
fn config_rejects_unknown_values() {
    let dir = seeded();
    objman(&dir)
        .args(["config", "default_width", "wide"])
        .assert()
        .failure();
}

#[test]
fn config_json_output_is_a_single_document() {
    let dir = seeded();
    let output = objman(&dir)
        .args(["config", "placeholder_style", "question", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["placeholder_style"], "question");

    let output = objman(&dir).args(["config", "--json"]).output().unwrap();
    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["default_width"], "half");

    let output = objman(&dir)
        .args(["config", "placeholder_style", "--json"])
        .output()
        .unwrap();
    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown, json!({"placeholder_style": "question"}));
}

#[test]
fn filter_validate_reports_unrecognised_operator() {
    let dir = seeded();
    write_doc(
        dir.path(),
        "lists",
        "odd",
        &json!({
            "name": "Odd",
            "object_id": "account",
            "filter_criteria": [
                {"id": "g1", "logic": "AND", "conditions": [
                    {"id": "c1", "field_name": "annual_revenue", "field_type": "number",
                     "operator": "IN", "value": 5}
                ]}
            ]
        }),
    );

    objman(&dir)
        .args(["filter", "validate", "odd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Group 1, Condition 1: Operator \"IN\" is not valid for field type \"number\"",
        ));
}
