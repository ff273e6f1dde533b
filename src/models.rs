//! Core data types for parsed clippings.
//!
//! A [`Clipping`] is the fully parsed form of one annotation block from a
//! `My Clippings.txt` export. Its identity for de-duplication purposes is
//! the triple (title, rendered location, added_at) — the device re-exports
//! the same annotation verbatim on every sync, and re-imports must not
//! create new rows.

use chrono::{DateTime, Utc};

/// The kind of annotation a clipping carries.
///
/// Determines the location shape (notes point at one position, highlights
/// span a range) and which destination table the record lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Note,
    Highlight,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Note => "note",
            AnnotationKind::Highlight => "highlight",
        }
    }
}

/// A position within the source book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// A single point, used by notes.
    Point { end: i64 },
    /// A start–end span, used by highlights. The parser does not enforce
    /// `start <= end`; an out-of-order range is a data-quality issue that
    /// propagates downstream as-is.
    Range { start: i64, end: i64 },
}

impl Location {
    /// The location as it appears in the metadata line: `"548"` for a
    /// point, `"666-668"` for a range. This rendered form is part of the
    /// uniqueness key.
    pub fn rendered(&self) -> String {
        match self {
            Location::Point { end } => end.to_string(),
            Location::Range { start, end } => format!("{}-{}", start, end),
        }
    }
}

/// One fully parsed clipping, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipping {
    pub title: String,
    pub kind: AnnotationKind,
    pub location: Location,
    pub added_at: DateTime<Utc>,
    pub content: String,
}
