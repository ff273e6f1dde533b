//! Read-side commands over the clippings store.
//!
//! Fetches highlights for a title, lists indexed titles, and prints a
//! database summary. Used by the `clip list`, `clip titles`, and
//! `clip stats` CLI commands.

use anyhow::Result;
use serde::Serialize;
use sqlx::Row;

use crate::config::Config;
use crate::db;

/// One highlight row, ordered by its position within the book.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightResponse {
    pub start_location: i64,
    pub end_location: i64,
    pub added_at: String, // ISO8601
    pub content: String,
}

/// Fetch all highlights for a title, ordered by start then end location.
pub async fn get_highlights(config: &Config, title: &str) -> Result<Vec<HighlightResponse>> {
    let pool = db::connect(config).await?;

    let rows = sqlx::query(
        "SELECT start_location, end_location, added_at, content FROM highlights \
         WHERE title = ? ORDER BY start_location ASC, end_location ASC",
    )
    .bind(title)
    .fetch_all(&pool)
    .await?;

    let highlights = rows
        .iter()
        .map(|row| {
            let added_at: i64 = row.get("added_at");
            HighlightResponse {
                start_location: row.get("start_location"),
                end_location: row.get("end_location"),
                added_at: format_ts_iso(added_at),
                content: row.get("content"),
            }
        })
        .collect();

    pool.close().await;
    Ok(highlights)
}

/// CLI entry point for `clip list` — prints highlights for a title.
pub async fn run_list(config: &Config, title: &str, json: bool) -> Result<()> {
    let highlights = get_highlights(config, title).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&highlights)?);
        return Ok(());
    }

    if highlights.is_empty() {
        println!("no highlights found for '{}'", title);
        return Ok(());
    }

    println!("--- {} ({} highlights) ---", title, highlights.len());
    for h in &highlights {
        println!();
        println!(
            "[{}-{}] {}",
            h.start_location, h.end_location, h.added_at
        );
        println!("{}", h.content);
    }

    Ok(())
}

/// CLI entry point for `clip titles` — distinct titles with counts.
pub async fn run_titles(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    let rows = sqlx::query(
        r#"
        SELECT title, SUM(highlights) AS highlights, SUM(notes) AS notes FROM (
            SELECT title, COUNT(*) AS highlights, 0 AS notes FROM highlights GROUP BY title
            UNION ALL
            SELECT title, 0 AS highlights, COUNT(*) AS notes FROM notes GROUP BY title
        )
        GROUP BY title ORDER BY title ASC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    if rows.is_empty() {
        println!("no clippings indexed");
    }
    for row in &rows {
        let title: String = row.get("title");
        let highlights: i64 = row.get("highlights");
        let notes: i64 = row.get("notes");
        println!("{}  ({} highlights, {} notes)", title, highlights, notes);
    }

    pool.close().await;
    Ok(())
}

/// CLI entry point for `clip stats` — totals and database size.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    let total_highlights: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM highlights")
        .fetch_one(&pool)
        .await?;
    let total_notes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
        .fetch_one(&pool)
        .await?;
    let total_titles: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM (SELECT title FROM highlights UNION SELECT title FROM notes)",
    )
    .fetch_one(&pool)
    .await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Kindle Clippings — Database Stats");
    println!("=================================");
    println!();
    println!("  Database:   {}", config.db.path.display());
    println!("  Size:       {}", format_bytes(db_size));
    println!();
    println!("  Titles:     {}", total_titles);
    println!("  Highlights: {}", total_highlights);
    println!("  Notes:      {}", total_notes);

    pool.close().await;
    Ok(())
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
