//! Export and import specs

use crate::prelude::*;

#[test]
fn export_writes_every_slice_with_the_schema_version() {
    let temp = Project::empty();
    temp.novel().args(&["prefs", "set", "theme", "dark"]).passes();
    temp.novel().args(&["nav", "goto", "3"]).passes();

    let run = temp.novel().args(&["export"]).passes();
    let export = run.json();
    assert_eq!(export["version"], 4);
    assert!(export["exportedAt"].as_u64().unwrap() > 0);
    assert_eq!(export["preferences"]["theme"], "dark");
    assert_eq!(export["readingState"]["currentChapterIndex"], 3);
    assert_eq!(export["sessionData"]["chaptersVisited"], json!([3]));
}

#[test]
fn export_file_round_trips_into_another_store() {
    let source = Project::empty();
    source.novel().args(&["prefs", "set", "theme", "dark"]).passes();
    source.novel().args(&["nav", "goto", "6"]).passes();
    let file = source.path().join("export.json");
    source
        .novel()
        .args(&["export", "--file", file.to_str().unwrap()])
        .passes()
        .stdout_has("Exported to");

    let target = Project::empty();
    target.novel().args(&["prefs", "set", "font", "monospace"]).passes();
    target
        .novel()
        .args(&["import", file.to_str().unwrap()])
        .passes()
        .stdout_has("Imported");

    let prefs = target.slice(PREFERENCES_KEY).unwrap();
    assert_eq!(prefs["theme"], "dark");
    assert_eq!(prefs["font"], "serif");
    assert_eq!(target.slice(READING_STATE_KEY).unwrap()["currentChapterIndex"], 6);
}

#[test]
fn import_reads_stdin() {
    let temp = Project::empty();
    let export = json!({
        "version": 4,
        "exportedAt": 1,
        "preferences": {
            "theme": "light", "font": "serif", "fontSize": "small",
            "lineHeight": "relaxed", "textAlign": "left", "pageWidth": "wide"
        }
    });
    temp.novel()
        .args(&["import", "-"])
        .stdin(&export.to_string())
        .passes();
    assert_eq!(temp.slice(PREFERENCES_KEY).unwrap()["pageWidth"], "wide");
}

#[test]
fn invalid_import_leaves_data_unchanged() {
    let temp = Project::empty();
    temp.novel().args(&["prefs", "set", "theme", "dark"]).passes();
    let bad = temp.file(
        "bad.json",
        &json!({
            "version": 4,
            "exportedAt": 1,
            "preferences": {"theme": "neon", "font": "serif", "fontSize": "medium",
                            "lineHeight": "normal", "textAlign": "left", "pageWidth": "normal"}
        })
        .to_string(),
    );

    temp.novel()
        .args(&["import", bad.to_str().unwrap()])
        .fails()
        .stderr_has("import failed")
        .stderr_has("left unchanged");
    assert_eq!(temp.slice(PREFERENCES_KEY).unwrap()["theme"], "dark");
}

#[test]
fn older_exports_are_migrated_on_import() {
    let temp = Project::empty();
    let legacy = temp.file(
        "legacy.json",
        &json!({
            "version": 1,
            "exportedAt": 1,
            "preferences": {"theme": "sepia", "font": "serif", "fontSize": "medium", "lineHeight": "normal"}
        })
        .to_string(),
    );

    temp.novel().args(&["import", legacy.to_str().unwrap()]).passes();
    let prefs = temp.slice(PREFERENCES_KEY).unwrap();
    assert_eq!(prefs["theme"], "light");
    assert_eq!(prefs["textAlign"], "left");
}
