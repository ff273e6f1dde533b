//! # Kindle Clippings
//!
//! A small pipeline for getting annotations off a Kindle and into SQLite.
//! The device appends every note and highlight it records to a single
//! plain-text file, `My Clippings.txt`; this crate splits that file into
//! blocks, parses each block into a typed record, and stores the records
//! with duplicate-safe keys so repeated imports are idempotent.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   ┌──────────┐   ┌─────────┐   ┌──────────┐
//! │ My Clippings  │──▶│ Splitter │──▶│ Parser  │──▶│  SQLite   │
//! │    .txt       │   │          │   │         │   │ notes +   │
//! └───────────────┘   └──────────┘   └─────────┘   │ highlights│
//!                                                  └──────────┘
//! ```
//!
//! The splitter and parser are pure functions with no I/O; everything
//! stateful lives behind the database modules.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`splitter`] | Export-file splitting |
//! | [`parser`] | Clipping block parsing |
//! | [`ingest`] | Import pipeline |
//! | [`query`] | Lookups over the store |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |

pub mod config;
pub mod db;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod parser;
pub mod query;
pub mod splitter;
