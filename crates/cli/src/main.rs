// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! novel - reader state from the command line

mod app;
mod commands;
mod error;
mod output;

use anyhow::Result;
use app::App;
use clap::{Parser, Subcommand};
use commands::{backup, bookmark, data, errors, nav, panel, prefs, status};
use error::CliError;
use output::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "novel", version, about = "Novel reader - persisted reading state")]
struct Cli {
    /// Directory holding the stored reader data
    #[arg(long, global = true, env = "NOVEL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to novel.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory with chapters.json and chapter files
    #[arg(long, global = true, env = "NOVEL_CONTENT_DIR")]
    content: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize what is stored
    Status,
    /// Bring stored data up to the current schema
    Migrate,
    /// Show or change preferences
    Prefs(prefs::PrefsArgs),
    /// Move between chapters
    Nav(nav::NavArgs),
    /// Record a scroll offset in the current chapter
    Scroll { offset: u64 },
    /// Panels and layout
    Panel(panel::PanelArgs),
    /// Bookmarks
    Bookmark(bookmark::BookmarkArgs),
    /// Write all slices as one JSON document
    Export(data::ExportArgs),
    /// Replace all slices from an export
    Import(data::ImportArgs),
    /// Migration backups
    Backup(backup::BackupArgs),
    /// Storage used against the quota
    Usage,
    /// Recorded critical errors
    Errors(errors::ErrorsArgs),
    /// Delete all reader data
    Clear(data::ClearArgs),
    /// List chapters of the content directory
    Toc,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CliError>() {
                Some(cli_err) => eprint!("{}", cli_err),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("NOVEL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let app = App::resolve(cli.data_dir, cli.config, cli.content)?;
    let format = cli.output;

    match cli.command {
        Commands::Status => status::status(&app, format),
        Commands::Migrate => data::migrate(&app),
        Commands::Prefs(args) => prefs::handle(&app, args.command, format),
        Commands::Nav(args) => nav::handle(&app, args.command, format),
        Commands::Scroll { offset } => nav::scroll(&app, offset),
        Commands::Panel(args) => panel::handle(&app, args.command, format),
        Commands::Bookmark(args) => bookmark::handle(&app, args.command, format),
        Commands::Export(args) => data::export(&app, args),
        Commands::Import(args) => data::import(&app, args),
        Commands::Backup(args) => backup::handle(&app, args.command, format),
        Commands::Usage => data::usage(&app, format),
        Commands::Errors(args) => errors::handle(&app, args.command, format),
        Commands::Clear(args) => data::clear(&app, args),
        Commands::Toc => nav::toc(&app, format),
    }
}
