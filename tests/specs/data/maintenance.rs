//! Status, usage, diagnostics and clear specs

use crate::prelude::*;

#[test]
fn status_on_an_empty_store() {
    let temp = Project::empty();
    temp.novel()
        .args(&["status"])
        .passes()
        .stdout_has("No reader data stored");
}

#[test]
fn status_summarizes_reading() {
    let temp = Project::empty();
    temp.novel().args(&["nav", "goto", "2"]).passes();
    temp.novel().args(&["scroll", "120"]).passes();
    temp.novel().args(&["bookmark", "add"]).passes();

    temp.novel()
        .args(&["status"])
        .passes()
        .stdout_has("Schema: v4")
        .stdout_has("Position: chapter 2, scroll 120")
        .stdout_has("Visits: 3")
        .stdout_has("Bookmarks: 1");

    let status = temp.novel().args(&["--output", "json", "status"]).passes().json();
    assert_eq!(status["schemaVersion"], 4);
    assert_eq!(status["chaptersVisited"], 1);
}

#[test]
fn usage_reports_against_the_configured_quota() {
    let temp = Project::empty();
    temp.novel().args(&["nav", "goto", "1"]).passes();

    let usage = temp.novel().args(&["--output", "json", "usage"]).passes().json();
    assert_eq!(usage["quota"], 5_242_880);
    assert!(usage["used"].as_u64().unwrap() > 0);

    temp.novel()
        .args(&["usage"])
        .passes()
        .stdout_has("of 5.0 MiB used");
}

#[test]
fn quota_comes_from_the_config_file() {
    let temp = Project::empty();
    temp.file("data/novel.toml", "quota_bytes = 2048\n");
    let usage = temp.novel().args(&["--output", "json", "usage"]).passes().json();
    assert_eq!(usage["quota"], 2048);
}

#[test]
fn invalid_config_is_an_error() {
    let temp = Project::empty();
    let config = temp.file("custom.toml", "[retry]\nmax_tries = 3\n");
    temp.novel()
        .args(&["--config", config.to_str().unwrap(), "status"])
        .fails();
}

#[test]
fn corrupt_slices_are_recorded_and_replaced_with_defaults() {
    let temp = Project::empty();
    temp.stored_raw(DATA_VERSION_KEY, r#"{"version":4,"timestamp":0}"#);
    temp.stored_raw(PREFERENCES_KEY, "not json");

    temp.novel()
        .args(&["prefs", "show"])
        .passes()
        .stdout_has("theme:       system");
    temp.novel()
        .args(&["errors", "list"])
        .passes()
        .stdout_has("DATA_CORRUPTION")
        .stdout_has("[novel-preferences]");

    temp.novel().args(&["errors", "clear"]).passes();
    temp.novel()
        .args(&["errors", "list"])
        .passes()
        .stdout_eq("No recorded errors\n");
}

#[test]
fn clear_removes_everything() {
    let temp = Project::empty();
    temp.novel().args(&["nav", "goto", "1"]).passes();
    temp.novel()
        .args(&["clear", "--yes"])
        .passes()
        .stdout_has("Cleared all reader data");

    assert!(!temp.has_key(READING_STATE_KEY));
    assert!(!temp.has_key(DATA_VERSION_KEY));
    temp.novel()
        .args(&["status"])
        .passes()
        .stdout_has("No reader data stored");
}
