// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Overview of what is stored

use crate::app::App;
use crate::output::{self, OutputFormat};
use novel_core::keys::{CURRENT_SCHEMA_VERSION, SESSION_DATA_KEY};
use novel_core::SessionData;
use serde::Serialize;
use std::fmt;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    data_dir: String,
    /// `None` when nothing is stored yet
    schema_version: Option<u32>,
    current_schema_version: u32,
    chapter: u64,
    scroll_position: u64,
    total_reading_time: u64,
    visit_count: u64,
    chapters_visited: usize,
    bookmarks: usize,
    last_visit: Option<u64>,
    backups: usize,
    critical_errors: usize,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data: {}", self.data_dir)?;
        match self.schema_version {
            None => return write!(f, "No reader data stored"),
            Some(v) if v < self.current_schema_version => writeln!(
                f,
                "Schema: v{} (migration to v{} pending)",
                v, self.current_schema_version
            )?,
            Some(v) => writeln!(f, "Schema: v{}", v)?,
        }
        writeln!(f, "Position: chapter {}, scroll {}", self.chapter, self.scroll_position)?;
        writeln!(f, "Reading time: {}", output::duration(self.total_reading_time))?;
        write!(f, "Visits: {}", self.visit_count)?;
        if let Some(last) = self.last_visit {
            write!(f, " (last {})", output::timestamp(last))?;
        }
        writeln!(f)?;
        writeln!(f, "Chapters visited: {}", self.chapters_visited)?;
        writeln!(f, "Bookmarks: {}", self.bookmarks)?;
        writeln!(f, "Backups: {}", self.backups)?;
        write!(f, "Critical errors: {}", self.critical_errors)
    }
}

/// Summarize storage without migrating or starting a session
pub fn status(app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let mut store = app.store()?;
    let engine = app.engine();
    let schema_version = engine.stored_version(&mut store);

    let reading = store.load_reading_state();
    let session = store
        .load_data(SESSION_DATA_KEY)
        .map(|_| store.load_session_data(SessionData::with_id("-", 0)));
    let status = Status {
        data_dir: app.data_dir().display().to_string(),
        schema_version,
        current_schema_version: CURRENT_SCHEMA_VERSION,
        chapter: reading.current_chapter_index,
        scroll_position: reading.last_scroll_position,
        total_reading_time: reading.total_reading_time,
        visit_count: session.as_ref().map_or(0, |s| s.visit_count),
        chapters_visited: session.as_ref().map_or(0, |s| s.chapters_visited.len()),
        bookmarks: session.as_ref().map_or(0, |s| s.bookmarks.len()),
        last_visit: session.as_ref().map(|s| s.last_visit),
        backups: engine.backups().list(&store)?.len(),
        critical_errors: store.critical_errors().len(),
    };
    output::print(&status, format)
}
