//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_top_level_commands() {
    let temp = Project::empty();
    temp.novel()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage")
        .stdout_has("bookmark")
        .stdout_has("migrate")
        .stdout_has("export");
}

#[test]
fn nav_help_lists_directions() {
    let temp = Project::empty();
    temp.novel()
        .args(&["nav", "--help"])
        .passes()
        .stdout_has("next")
        .stdout_has("prev")
        .stdout_has("goto");
}

#[test]
fn help_does_not_touch_storage() {
    let temp = Project::empty();
    temp.novel().args(&["--help"]).passes();
    assert!(!temp.data_dir().exists());
}
