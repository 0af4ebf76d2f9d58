//! Error reporting specs
//!
//! Failures exit non-zero with a readable message and leave data alone.

use crate::prelude::*;

#[test]
fn unknown_subcommand_fails() {
    let temp = Project::empty();
    temp.novel().args(&["frobnicate"]).fails();
}

#[test]
fn unknown_preference_value_is_rejected_before_writing() {
    let temp = Project::empty();
    temp.novel()
        .args(&["prefs", "set", "theme", "neon"])
        .fails()
        .stderr_has("unknown Theme 'neon'");
    assert!(!temp.has_key(PREFERENCES_KEY));
}

#[test]
fn unknown_preference_field_lists_the_valid_ones() {
    let temp = Project::empty();
    temp.novel()
        .args(&["prefs", "set", "colour", "dark"])
        .fails()
        .stderr_has("unknown preference 'colour'");
}

#[test]
fn missing_backup_suggests_listing() {
    let temp = Project::empty();
    temp.novel()
        .args(&["backup", "show", "nope"])
        .fails()
        .stderr_has("backup 'nope' not found")
        .stderr_has("novel backup list");
}

#[test]
fn clear_requires_confirmation() {
    let temp = Project::empty();
    temp.novel().args(&["nav", "goto", "2"]).passes();
    temp.novel()
        .args(&["clear"])
        .fails()
        .stderr_has("novel clear --yes");
    assert!(temp.has_key(READING_STATE_KEY));
}

#[test]
fn toc_without_content_directory_fails() {
    let temp = Project::empty();
    temp.novel()
        .args(&["toc"])
        .fails()
        .stderr_has("no content directory");
}
