//! Schema creation for the clippings store.
//!
//! Notes and highlights land in separate tables, each carrying a UNIQUE
//! constraint over its natural key — (title, location, added_at) for notes,
//! (title, start_location, end_location, added_at) for highlights. The
//! device re-exports every annotation on each sync, so inserts rely on
//! these constraints (`ON CONFLICT DO NOTHING`) to make imports idempotent.

use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            location INTEGER NOT NULL,
            added_at INTEGER NOT NULL,
            content TEXT NOT NULL,
            UNIQUE(title, location, added_at)
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS highlights (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            start_location INTEGER NOT NULL,
            end_location INTEGER NOT NULL,
            added_at INTEGER NOT NULL,
            content TEXT NOT NULL,
            UNIQUE(title, start_location, end_location, added_at)
        )
        "#,
    )
    .execute(&pool)
    .await?;

    // Lookups are by title, ordered by position within the book.
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_highlights_title ON highlights(title, start_location, end_location)",
    )
    .execute(&pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notes_title ON notes(title, location)")
        .execute(&pool)
        .await?;

    pool.close().await;
    Ok(())
}
