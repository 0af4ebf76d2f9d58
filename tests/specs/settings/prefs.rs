//! Preference specs

use crate::prelude::*;

#[test]
fn defaults_are_shown_on_a_fresh_store() {
    let temp = Project::empty();
    temp.novel().args(&["prefs", "show"]).passes().stdout_eq(
        "theme:       system\n\
         font:        serif\n\
         font-size:   medium\n\
         line-height: normal\n\
         text-align:  left\n\
         page-width:  normal\n",
    );
}

#[test]
fn set_changes_one_field_and_persists() {
    let temp = Project::empty();
    temp.novel().args(&["prefs", "set", "theme", "dark"]).passes();
    temp.novel().args(&["prefs", "set", "font-size", "large"]).passes();

    let run = temp.novel().args(&["prefs", "show", "--output", "json"]).passes();
    let prefs = run.json();
    assert_eq!(prefs["theme"], "dark");
    assert_eq!(prefs["fontSize"], "large");
    assert_eq!(prefs["font"], "serif");

    let stored = temp.slice(PREFERENCES_KEY).unwrap();
    assert_eq!(stored["theme"], "dark");
    assert_eq!(stored["fontSize"], "large");
}

#[test]
fn camel_case_field_names_are_accepted() {
    let temp = Project::empty();
    temp.novel()
        .args(&["prefs", "set", "textAlign", "justify"])
        .passes()
        .stdout_has("text-align:  justify");
}

#[test]
fn reset_restores_defaults() {
    let temp = Project::empty();
    temp.novel().args(&["prefs", "set", "theme", "dark"]).passes();
    temp.novel().args(&["prefs", "reset"]).passes().stdout_has("Preferences reset");
    temp.novel()
        .args(&["prefs", "show"])
        .passes()
        .stdout_has("theme:       system");
}

#[test]
fn preference_change_keeps_reading_position() {
    let temp = Project::empty();
    temp.novel().args(&["nav", "goto", "7"]).passes();
    temp.novel().args(&["prefs", "set", "theme", "light"]).passes();

    let reading = temp.slice(READING_STATE_KEY).unwrap();
    assert_eq!(reading["currentChapterIndex"], 7);
}
