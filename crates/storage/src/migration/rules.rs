// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Migration history shipped with this build
//!
//! - 1 → 2: text alignment and page width join the preferences; the old
//!   `sepia` theme becomes `light`
//! - 2 → 3: panel flags move out of preferences into their own UI slice
//! - 3 → 4: bookmarks get ids, visited chapters are deduplicated, and visit
//!   statistics are added to the session record

use super::{DataSet, MigrationRule};
use novel_core::{Panel, UiState};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

pub fn builtin_rules() -> Vec<MigrationRule> {
    vec![
        MigrationRule::new(
            1,
            2,
            "add text alignment and page width",
            add_layout_preferences,
        )
        .with_validator(layout_preferences_present),
        MigrationRule::new(
            2,
            3,
            "move panel flags into UI state",
            move_panel_flags,
        )
        .with_validator(no_panel_flags_in_preferences),
        MigrationRule::new(
            3,
            4,
            "assign bookmark ids and add visit statistics",
            normalize_session,
        )
        .with_validator(session_is_normalized),
    ]
}

const LEGACY_TOC_FLAG: &str = "showToc";
const LEGACY_SETTINGS_FLAG: &str = "showSettings";

fn object_mut<'a>(value: &'a mut Value, name: &str) -> Result<&'a mut Map<String, Value>, String> {
    value
        .as_object_mut()
        .ok_or_else(|| format!("{} is not an object", name))
}

fn add_layout_preferences(mut data: DataSet) -> Result<DataSet, String> {
    if let Some(prefs) = data.preferences.as_mut() {
        let prefs = object_mut(prefs, "preferences")?;
        prefs.entry("textAlign").or_insert_with(|| json!("left"));
        prefs.entry("pageWidth").or_insert_with(|| json!("normal"));
        if prefs.get("theme").and_then(Value::as_str) == Some("sepia") {
            prefs.insert("theme".to_string(), json!("light"));
        }
    }
    Ok(data)
}

fn layout_preferences_present(data: &DataSet) -> bool {
    let Some(prefs) = &data.preferences else {
        return true;
    };
    prefs.get("textAlign").is_some()
        && prefs.get("pageWidth").is_some()
        && prefs.get("theme").and_then(Value::as_str) != Some("sepia")
}

fn move_panel_flags(mut data: DataSet) -> Result<DataSet, String> {
    let Some(prefs) = data.preferences.as_mut() else {
        return Ok(data);
    };
    let prefs = object_mut(prefs, "preferences")?;
    let toc = prefs.remove(LEGACY_TOC_FLAG).and_then(|v| v.as_bool());
    let settings = prefs.remove(LEGACY_SETTINGS_FLAG).and_then(|v| v.as_bool());
    if data.ui_state.is_some() || (toc.is_none() && settings.is_none()) {
        return Ok(data);
    }

    let mut ui = UiState::default();
    if toc == Some(true) {
        ui = ui.open(Panel::Toc);
    }
    if settings == Some(true) {
        ui = ui.open(Panel::Settings);
    }
    data.ui_state = Some(serde_json::to_value(ui).map_err(|e| e.to_string())?);
    Ok(data)
}

fn no_panel_flags_in_preferences(data: &DataSet) -> bool {
    data.preferences.as_ref().map_or(true, |prefs| {
        prefs.get(LEGACY_TOC_FLAG).is_none() && prefs.get(LEGACY_SETTINGS_FLAG).is_none()
    })
}

fn normalize_session(mut data: DataSet) -> Result<DataSet, String> {
    let Some(session) = data.session_data.as_mut() else {
        return Ok(data);
    };
    let session = object_mut(session, "sessionData")?;

    if let Some(Value::Array(chapters)) = session.get_mut("chaptersVisited") {
        let mut seen = Vec::new();
        chapters.retain(|chapter| {
            if seen.contains(chapter) {
                false
            } else {
                seen.push(chapter.clone());
                true
            }
        });
    }

    if let Some(Value::Array(bookmarks)) = session.get_mut("bookmarks") {
        let mut used = HashSet::new();
        for bookmark in bookmarks.iter_mut() {
            let bookmark = object_mut(bookmark, "bookmark")?;
            let existing = bookmark
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty() && !used.contains(*id))
                .map(str::to_string);
            let id = match existing {
                Some(id) => id,
                None => {
                    let chapter = bookmark.get("chapterIndex").and_then(Value::as_u64).unwrap_or(0);
                    let timestamp = bookmark.get("timestamp").and_then(Value::as_u64).unwrap_or(0);
                    unique_id(format!("bm-{}-{}", chapter, timestamp), &used)
                }
            };
            used.insert(id.clone());
            bookmark.insert("id".to_string(), Value::String(id));
        }
    }

    session.entry("visitCount").or_insert_with(|| json!(1));
    session
        .entry("averageReadingSpeed")
        .or_insert_with(|| json!(0.0));
    Ok(data)
}

fn unique_id(base: String, used: &HashSet<String>) -> String {
    if !used.contains(&base) {
        return base;
    }
    let mut n = 2u64;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn session_is_normalized(data: &DataSet) -> bool {
    let Some(session) = &data.session_data else {
        return true;
    };
    let chapters_unique = match session.get("chaptersVisited").and_then(Value::as_array) {
        Some(chapters) => {
            let mut seen = Vec::new();
            chapters.iter().all(|c| {
                let fresh = !seen.contains(&c);
                seen.push(c);
                fresh
            })
        }
        None => true,
    };
    let ids_unique = match session.get("bookmarks").and_then(Value::as_array) {
        Some(bookmarks) => {
            let mut seen = HashSet::new();
            bookmarks.iter().all(|b| {
                b.get("id")
                    .and_then(Value::as_str)
                    .is_some_and(|id| !id.is_empty() && seen.insert(id))
            })
        }
        None => true,
    };
    chapters_unique && ids_unique && session.get("visitCount").is_some()
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
