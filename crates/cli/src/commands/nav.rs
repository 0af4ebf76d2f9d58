// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Navigation, scroll and table-of-contents commands

use crate::app::{App, CliReader};
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use novel_core::{ChapterEntry, ContentSource, SystemClock, TableOfContents};
use novel_engine::{EngineError, Navigation};
use novel_storage::with_retry;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct NavArgs {
    #[command(subcommand)]
    pub command: NavCommand,
}

#[derive(Subcommand)]
pub enum NavCommand {
    /// Go to the next chapter
    Next,
    /// Go to the previous chapter
    Prev,
    /// Go to a chapter by zero-based index
    Goto { index: u64 },
    /// Go to the chapter and offset of a bookmark
    Bookmark { id: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NavView {
    chapter: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    restore_scroll: u64,
}

impl NavView {
    fn new(reader: &CliReader, navigation: &Navigation) -> Self {
        let title = reader
            .table_of_contents()
            .and_then(|toc| toc.get(navigation.chapter))
            .map(|entry| entry.title.clone());
        Self {
            chapter: navigation.chapter,
            title,
            restore_scroll: navigation.restore_scroll,
        }
    }
}

impl fmt::Display for NavView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chapter {}", self.chapter)?;
        if let Some(title) = &self.title {
            write!(f, ": {}", title)?;
        }
        write!(f, " (scroll {})", self.restore_scroll)
    }
}

pub fn handle(app: &App, command: NavCommand, format: OutputFormat) -> anyhow::Result<()> {
    let mut reader = app.reader()?;
    let result = match command {
        NavCommand::Next => reader.next_chapter(),
        NavCommand::Prev => reader.previous_chapter(),
        NavCommand::Goto { index } => reader.go_to_chapter(index),
        NavCommand::Bookmark { id } => reader.open_bookmark(&id),
    };
    let navigation = match result {
        Ok(navigation) => navigation,
        Err(EngineError::BookmarkNotFound(id)) => {
            reader.close();
            return Err(CliError::bookmark_not_found(&id).into());
        }
        Err(e) => {
            reader.close();
            return Err(e.into());
        }
    };
    let view = NavView::new(&reader, &navigation);
    reader.close();
    if !navigation.persisted {
        return Err(CliError::not_saved("chapter change").into());
    }
    output::print(&view, format)
}

/// Record a scroll offset in the current chapter
pub fn scroll(app: &App, offset: u64) -> anyhow::Result<()> {
    let mut reader = app.reader()?;
    reader.record_scroll(offset);
    let chapter = reader.reading().chapter();
    reader.close();
    println!("Chapter {} scroll {}", chapter, offset);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TocLine {
    index: u64,
    #[serde(flatten)]
    entry: ChapterEntry,
}

impl fmt::Display for TocLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}  {}", self.index, self.entry.title)?;
        if let Some(subtitle) = &self.entry.subtitle {
            write!(f, " - {}", subtitle)?;
        }
        Ok(())
    }
}

/// List the chapters of the content directory
pub fn toc(app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let Some(source) = app.content_source() else {
        return Err(CliError::new("no content directory")
            .with_context("the chapter list is read from chapters.json in the content directory")
            .with_suggestion("Pass one: novel --content <DIR> toc")
            .into());
    };
    let chapters = with_retry(&SystemClock, &app.config().retry, "fetch_chapters", || {
        source.chapters()
    })?;
    let toc = TableOfContents::new(chapters);
    let lines: Vec<TocLine> = toc
        .iter()
        .zip(0u64..)
        .map(|(entry, index)| TocLine {
            index,
            entry: entry.clone(),
        })
        .collect();
    output::print_list(&lines, "No chapters", format)
}
