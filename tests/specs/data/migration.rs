//! Startup migration and backup specs
//!
//! Data left by an older version is upgraded before anything reads it,
//! with a backup that can be rolled back to.

use crate::prelude::*;

fn seed_legacy(temp: &Project) {
    temp.stored_slice(
        PREFERENCES_KEY,
        json!({
            "theme": "sepia", "font": "serif", "fontSize": "large",
            "lineHeight": "normal", "showToc": true
        }),
    );
}

fn backups(temp: &Project) -> Vec<Value> {
    temp.novel()
        .args(&["--output", "json", "backup", "list"])
        .passes()
        .json()
        .as_array()
        .unwrap()
        .clone()
}

#[test]
fn fresh_store_is_stamped_with_the_current_version() {
    let temp = Project::empty();
    temp.novel()
        .args(&["migrate"])
        .passes()
        .stdout_eq("Fresh install at version 4\n");
    temp.novel()
        .args(&["migrate"])
        .passes()
        .stdout_eq("Up to date at version 4\n");
    assert!(backups(&temp).is_empty());
}

#[test]
fn legacy_data_is_reported_as_pending() {
    let temp = Project::empty();
    seed_legacy(&temp);
    temp.novel()
        .args(&["status"])
        .passes()
        .stdout_has("Schema: v1 (migration to v4 pending)");
    assert!(!temp.has_key(DATA_VERSION_KEY));
}

#[test]
fn migrate_upgrades_legacy_data_with_a_backup() {
    let temp = Project::empty();
    seed_legacy(&temp);

    temp.novel()
        .args(&["migrate"])
        .passes()
        .stdout_has("Migrated 1 -> 4 (3 rules");
    temp.novel().args(&["status"]).passes().stdout_has("Schema: v4");

    let prefs = temp.slice(PREFERENCES_KEY).unwrap();
    assert_eq!(prefs["theme"], "light");
    assert_eq!(prefs["fontSize"], "large");
    assert_eq!(prefs["pageWidth"], "normal");
    assert!(prefs.get("showToc").is_none());
    assert_eq!(temp.slice(UI_STATE_KEY).unwrap()["isTocOpen"], true);

    let list = backups(&temp);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["version"], 1);
    assert_eq!(list[0]["slices"], 1);
}

#[test]
fn any_command_migrates_before_reading() {
    let temp = Project::empty();
    seed_legacy(&temp);
    temp.novel()
        .args(&["prefs", "show"])
        .passes()
        .stdout_has("theme:       light");
    assert!(temp.has_key(DATA_VERSION_KEY));
}

#[test]
fn rollback_restores_the_pre_migration_state() {
    let temp = Project::empty();
    seed_legacy(&temp);
    temp.novel().args(&["migrate"]).passes();
    let id = backups(&temp)[0]["id"].as_str().unwrap().to_string();

    temp.novel()
        .args(&["backup", "show", &id])
        .passes()
        .stdout_has("Schema version: 1")
        .stdout_has("ui state: -")
        .stdout_has("Version record: no");

    temp.novel()
        .args(&["backup", "rollback", &id])
        .passes()
        .stdout_has("Restored backup")
        .stdout_has("migrated again");

    assert!(!temp.has_key(DATA_VERSION_KEY));
    assert!(!temp.has_key(UI_STATE_KEY));
    assert_eq!(temp.slice(PREFERENCES_KEY).unwrap()["theme"], "sepia");
    temp.novel()
        .args(&["status"])
        .passes()
        .stdout_has("migration to v4 pending");
}

#[test]
fn prune_keeps_the_newest_backups() {
    let temp = Project::empty();
    seed_legacy(&temp);
    temp.novel().args(&["migrate"]).passes();
    let id = backups(&temp)[0]["id"].as_str().unwrap().to_string();
    temp.novel().args(&["backup", "rollback", &id]).passes();
    temp.novel().args(&["migrate"]).passes();
    assert_eq!(backups(&temp).len(), 2);

    temp.novel()
        .args(&["backup", "prune", "--keep", "1"])
        .passes()
        .stdout_has("Removed 1 backup(s)");
    assert_eq!(backups(&temp).len(), 1);
}
