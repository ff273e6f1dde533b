//! # Kindle Clippings CLI (`clip`)
//!
//! The `clip` binary ingests a Kindle `My Clippings.txt` export into a
//! local SQLite database and answers simple queries over it.
//!
//! ## Usage
//!
//! ```bash
//! clip --config ./config/clip.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `clip init` | Create the SQLite database and run schema migrations |
//! | `clip import <file>` | Parse an export file and store its clippings |
//! | `clip list "<title>"` | Print all highlights for a title, in book order |
//! | `clip titles` | List indexed titles with per-title counts |
//! | `clip stats` | Show database totals and size |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! clip init --config ./config/clip.toml
//!
//! # Import an export copied off the device
//! clip import "My Clippings.txt"
//!
//! # Check what an import would do without writing anything
//! clip import "My Clippings.txt" --dry-run
//!
//! # Read back one book's highlights
//! clip list "Pro Git (Scott Chacon;Ben Straub)"
//! ```

mod config;
mod db;
mod ingest;
mod migrate;
mod models;
mod parser;
mod query;
mod splitter;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kindle Clippings CLI — ingest `My Clippings.txt` exports into a
/// queryable SQLite store.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/clip.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "clip",
    about = "Kindle Clippings — ingest 'My Clippings.txt' exports into a queryable SQLite store",
    version,
    long_about = "Parses the plain-text annotation export a Kindle writes to 'My Clippings.txt' \
    into discrete notes and highlights and stores them in SQLite with duplicate-safe keys, \
    so repeated imports of overlapping exports never create duplicate rows."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/clip.toml`. The database path is read from
    /// this file.
    #[arg(long, global = true, default_value = "./config/clip.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the notes and highlights
    /// tables with their uniqueness constraints. This command is
    /// idempotent — running it multiple times is safe.
    Init,

    /// Import clippings from an export file.
    ///
    /// Splits the file into blocks, parses each into a note or highlight,
    /// and inserts it into the matching table. Malformed blocks are
    /// reported on stderr and skipped; already-imported clippings are
    /// counted as duplicates and left alone.
    Import {
        /// Path to the `My Clippings.txt` export.
        file: PathBuf,

        /// Parse and report counts without writing to the database.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of blocks to process.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print all highlights for a title.
    ///
    /// Highlights are ordered by start location, then end location — the
    /// order they appear in the book, not the order they were made.
    List {
        /// The book title, exactly as it appears in the export.
        title: String,

        /// Emit JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// List indexed titles with per-title highlight and note counts.
    Titles,

    /// Show database totals and size.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import {
            file,
            dry_run,
            limit,
        } => {
            ingest::run_import(&cfg, &file, dry_run, limit).await?;
        }
        Commands::List { title, json } => {
            query::run_list(&cfg, &title, json).await?;
        }
        Commands::Titles => {
            query::run_titles(&cfg).await?;
        }
        Commands::Stats => {
            query::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
