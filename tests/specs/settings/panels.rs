//! Panel and layout specs

use crate::prelude::*;

fn ui(temp: &Project) -> Value {
    temp.novel()
        .args(&["--output", "json", "panel", "show"])
        .passes()
        .json()
}

#[test]
fn toggle_opens_then_closes() {
    let temp = Project::empty();
    temp.novel()
        .args(&["panel", "toggle", "toc"])
        .passes()
        .stdout_has("toc:        open");
    temp.novel()
        .args(&["panel", "toggle", "toc"])
        .passes()
        .stdout_has("toc:        closed")
        .stdout_has("last panel: toc");
}

#[test]
fn width_and_panel_flags_are_owned_separately() {
    let temp = Project::empty();
    temp.novel().args(&["panel", "width", "900"]).passes();
    temp.novel().args(&["panel", "open", "settings"]).passes();
    temp.novel().args(&["panel", "mode", "keyboard"]).passes();

    let ui = ui(&temp);
    assert_eq!(ui["contentWidth"], 900);
    assert_eq!(ui["isSettingsOpen"], true);
    assert_eq!(ui["navigationMode"], "keyboard");
}

#[test]
fn close_all_keeps_last_active_panel() {
    let temp = Project::empty();
    temp.novel().args(&["panel", "open", "toc"]).passes();
    temp.novel().args(&["panel", "open", "settings"]).passes();
    temp.novel().args(&["panel", "close-all"]).passes();

    let ui = ui(&temp);
    assert_eq!(ui["isTocOpen"], false);
    assert_eq!(ui["isSettingsOpen"], false);
    assert_eq!(ui["lastActivePanel"], "settings");
}

#[test]
fn animation_duration_is_stored_in_milliseconds() {
    let temp = Project::empty();
    temp.novel().args(&["panel", "animation", "150ms"]).passes();
    assert_eq!(ui(&temp)["panelAnimationDuration"], 150);
}

#[test]
fn unknown_panel_is_rejected() {
    let temp = Project::empty();
    temp.novel()
        .args(&["panel", "toggle", "sidebar"])
        .fails()
        .stderr_has("unknown Panel 'sidebar'");
}
