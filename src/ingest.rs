//! Import pipeline orchestration.
//!
//! Coordinates the full import flow: read the export file → split into raw
//! blocks → parse each block → insert into the kind's table. A malformed
//! block is reported and skipped; it never aborts the run. Inserts go
//! through `ON CONFLICT DO NOTHING` on the natural key, so re-importing an
//! export (or a fixed-up copy of one) only adds what is new.

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::Config;
use crate::db;
use crate::models::{AnnotationKind, Clipping, Location};
use crate::parser::parse_clipping;
use crate::splitter::split_document;

/// Outcome of inserting one clipping.
enum InsertOutcome {
    Inserted,
    Duplicate,
}

pub async fn run_import(
    config: &Config,
    file: &Path,
    dry_run: bool,
    limit: Option<usize>,
) -> Result<()> {
    let document = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read clippings file: {}", file.display()))?;

    // Kindle exports lead with a UTF-8 BOM; it is not part of the first
    // title.
    let document = document.trim_start_matches('\u{feff}');

    let mut blocks = split_document(document);
    if let Some(lim) = limit {
        blocks.truncate(lim);
    }

    let mut notes = 0u64;
    let mut highlights = 0u64;
    let mut duplicates = 0u64;
    let mut failed = 0u64;

    let pool = if dry_run {
        None
    } else {
        Some(db::connect(config).await?)
    };

    for (index, block) in blocks.iter().enumerate() {
        let clipping = match parse_clipping(block) {
            Ok(c) => c,
            Err(e) => {
                failed += 1;
                if failed <= config.import.max_reported_failures as u64 {
                    // First line is the title — enough context to find the
                    // block in the source file.
                    let first_line = block.lines().next().unwrap_or("");
                    eprintln!("block {} ('{}') skipped: {}", index + 1, first_line, e);
                }
                continue;
            }
        };

        if let Some(ref pool) = pool {
            match insert_clipping(pool, &clipping).await? {
                InsertOutcome::Duplicate => {
                    duplicates += 1;
                    continue;
                }
                InsertOutcome::Inserted => {}
            }
        }

        match clipping.kind {
            AnnotationKind::Note => notes += 1,
            AnnotationKind::Highlight => highlights += 1,
        }
    }

    if dry_run {
        println!("import {} (dry-run)", file.display());
    } else {
        println!("import {}", file.display());
    }
    println!("  blocks: {}", blocks.len());
    println!("  notes imported: {}", notes);
    println!("  highlights imported: {}", highlights);
    println!("  duplicates skipped: {}", duplicates);
    println!("  failed blocks: {}", failed);
    println!("ok");

    if let Some(pool) = pool {
        pool.close().await;
    }
    Ok(())
}

/// Insert one clipping into its destination table. `rows_affected() == 0`
/// means the natural key already exists — the duplicate-ignored outcome.
async fn insert_clipping(pool: &SqlitePool, clipping: &Clipping) -> Result<InsertOutcome> {
    let id = Uuid::new_v4().to_string();
    let added_at = clipping.added_at.timestamp();

    let result = match (clipping.kind, clipping.location) {
        (AnnotationKind::Note, Location::Point { end }) => {
            sqlx::query(
                r#"
                INSERT INTO notes (id, title, location, added_at, content)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(title, location, added_at) DO NOTHING
                "#,
            )
            .bind(&id)
            .bind(&clipping.title)
            .bind(end)
            .bind(added_at)
            .bind(&clipping.content)
            .execute(pool)
            .await?
        }
        (AnnotationKind::Highlight, Location::Range { start, end }) => {
            sqlx::query(
                r#"
                INSERT INTO highlights (id, title, start_location, end_location, added_at, content)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(title, start_location, end_location, added_at) DO NOTHING
                "#,
            )
            .bind(&id)
            .bind(&clipping.title)
            .bind(start)
            .bind(end)
            .bind(added_at)
            .bind(&clipping.content)
            .execute(pool)
            .await?
        }
        (kind, location) => anyhow::bail!(
            "cannot store a {} with location {}",
            kind.as_str(),
            location.rendered()
        ),
    };

    if result.rows_affected() == 0 {
        Ok(InsertOutcome::Duplicate)
    } else {
        Ok(InsertOutcome::Inserted)
    }
}
