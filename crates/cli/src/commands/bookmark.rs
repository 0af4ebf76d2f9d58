// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bookmark commands

use crate::app::App;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use novel_core::keys::SESSION_DATA_KEY;
use novel_core::{Bookmark, SessionData};
use novel_engine::EngineError;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct BookmarkArgs {
    #[command(subcommand)]
    pub command: BookmarkCommand,
}

#[derive(Subcommand)]
pub enum BookmarkCommand {
    /// Bookmark the current chapter and scroll offset
    Add {
        #[arg(long)]
        note: Option<String>,
    },
    /// List bookmarks
    List {
        /// Only bookmarks in this chapter
        #[arg(long)]
        chapter: Option<u64>,
    },
    /// Remove a bookmark
    Remove { id: String },
}

#[derive(Serialize)]
#[serde(transparent)]
struct BookmarkLine(Bookmark);

impl fmt::Display for BookmarkLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:<38} ch {:<4} scroll {:<6} {}",
            b.id,
            b.chapter_index,
            b.scroll_position,
            output::timestamp(b.timestamp)
        )?;
        if let Some(note) = &b.note {
            write!(f, "  {}", note)?;
        }
        Ok(())
    }
}

pub fn handle(app: &App, command: BookmarkCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        BookmarkCommand::Add { note } => {
            let mut reader = app.reader()?;
            let (bookmark, saved) = reader.add_bookmark(note);
            reader.close();
            if !saved {
                return Err(CliError::not_saved("bookmark").into());
            }
            output::print(&BookmarkLine(bookmark), format)
        }
        BookmarkCommand::List { chapter } => {
            let mut store = app.migrated_store()?;
            let bookmarks = match store.load_data(SESSION_DATA_KEY) {
                Some(_) => {
                    let session = store.load_session_data(SessionData::with_id("-", 0));
                    match chapter {
                        Some(chapter) => session
                            .bookmarks_for_chapter(chapter)
                            .cloned()
                            .collect(),
                        None => session.bookmarks,
                    }
                }
                None => Vec::new(),
            };
            let lines: Vec<BookmarkLine> = bookmarks.into_iter().map(BookmarkLine).collect();
            output::print_list(&lines, "No bookmarks", format)
        }
        BookmarkCommand::Remove { id } => {
            let mut reader = app.reader()?;
            let result = reader.remove_bookmark(&id);
            reader.close();
            match result {
                Ok(true) => {
                    println!("Removed bookmark {}", id);
                    Ok(())
                }
                Ok(false) => Err(CliError::not_saved("bookmark removal").into()),
                Err(EngineError::BookmarkNotFound(id)) => Err(CliError::bookmark_not_found(&id).into()),
                Err(e) => Err(e.into()),
            }
        }
    }
}
