//! Clipping block parser.
//!
//! Turns one raw block from the splitter into a [`Clipping`]. A block looks
//! like:
//!
//! ```text
//! Pro Git (Scott Chacon;Ben Straub)
//! - Your Highlight Location 2868-2871 | Added on Saturday, April 18, 2020 11:21:19 AM
//!
//! comparing the content of the newly-fetched featureA branch
//! ```
//!
//! Line 1 is the title, line 2 the metadata line, line 3 must be blank, and
//! everything after it is the annotation content. The metadata line is a
//! pipe-delimited micro-format: the left segment carries the kind and
//! location, the right segment the timestamp in the device's fixed English
//! 12-hour format.
//!
//! Parsing is a pure function of the block text — no I/O, no state. Each
//! sub-step fails fast with a [`ParseError`]; a block either parses fully
//! or is rejected as a whole, and the import driver decides what to do
//! with the rejects.

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::models::{AnnotationKind, Clipping, Location};

/// Errors produced while parsing a single clipping block. All are fatal to
/// that block only; the surrounding import continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The block or its metadata line does not have the expected structure.
    #[error("unexpected clipping format: {0}")]
    Format(String),
    /// The kind designator is not "note" or "highlight".
    #[error("unknown clipping kind: '{0}'")]
    UnknownKind(String),
    /// The month name is not one of the twelve English month names.
    #[error("unknown month name: '{0}'")]
    UnknownMonth(String),
    /// The date/time components do not form a valid calendar instant.
    #[error("invalid date or time: {0}")]
    DateArithmetic(String),
}

/// Parse one raw clipping block into a [`Clipping`].
pub fn parse_clipping(raw: &str) -> Result<Clipping, ParseError> {
    let (title, metadata, content) = split_block(raw)?;
    let kind = resolve_kind(metadata)?;
    let location = resolve_location(kind, resolve_location_token(metadata)?)?;
    let added_at = parse_datetime(&resolve_date(metadata)?)?;

    Ok(Clipping {
        title: title.to_string(),
        kind,
        location,
        added_at,
        content,
    })
}

/// Structural split: title line, metadata line, content.
///
/// The third line of a block must be blank (it separates the metadata from
/// the content); anything else means the block is not a clipping. Content
/// may span multiple lines — readers type multi-line notes.
pub fn split_block(raw: &str) -> Result<(&str, &str, String), ParseError> {
    let mut lines = raw.split('\n');

    let title = lines
        .next()
        .ok_or_else(|| ParseError::Format("empty block".to_string()))?;
    let metadata = lines
        .next()
        .ok_or_else(|| ParseError::Format("block has no metadata line".to_string()))?;
    let blank = lines
        .next()
        .ok_or_else(|| ParseError::Format("block has no content".to_string()))?;
    if !blank.trim().is_empty() {
        return Err(ParseError::Format(format!(
            "expected blank line after metadata, found '{}'",
            blank
        )));
    }

    let content = lines.collect::<Vec<_>>().join("\n");
    Ok((title, metadata, content))
}

/// Split the metadata line into its left (kind + location) and right
/// (timestamp) segments.
fn metadata_segments(metadata: &str) -> Result<(&str, &str), ParseError> {
    let segments: Vec<&str> = metadata.split('|').collect();
    match segments[..] {
        [left, right] => Ok((left, right)),
        _ => Err(ParseError::Format(format!(
            "metadata line is not pipe-delimited into two segments: '{}'",
            metadata
        ))),
    }
}

/// Scan the left metadata segment for the tokens around the literal
/// "Location" marker. Returns (kind tokens, location token).
///
/// The kind designator is every token strictly between "Your" and
/// "Location". "Highlight" and "Note" are one word; some export variants
/// write two-word designators, so the left segment is 5 or 6 tokens long.
fn scan_left_segment(metadata: &str) -> Result<(Vec<&str>, &str), ParseError> {
    let (left, _) = metadata_segments(metadata)?;
    let tokens: Vec<&str> = left.split_whitespace().collect();

    let your = tokens
        .iter()
        .position(|t| *t == "Your")
        .ok_or_else(|| ParseError::Format(format!("no 'Your' marker in '{}'", left)))?;
    let location = tokens
        .iter()
        .position(|t| *t == "Location")
        .ok_or_else(|| ParseError::Format(format!("no 'Location' marker in '{}'", left)))?;

    if location <= your + 1 {
        return Err(ParseError::Format(format!(
            "no kind designator between 'Your' and 'Location' in '{}'",
            left
        )));
    }
    let kind_tokens = tokens[your + 1..location].to_vec();

    let loc_token = tokens
        .get(location + 1)
        .copied()
        .ok_or_else(|| ParseError::Format(format!("no location token in '{}'", left)))?;

    Ok((kind_tokens, loc_token))
}

/// Resolve the annotation kind from the metadata line.
pub fn resolve_kind(metadata: &str) -> Result<AnnotationKind, ParseError> {
    let (kind_tokens, _) = scan_left_segment(metadata)?;
    let kind = kind_tokens.join(" ").to_lowercase();
    match kind.as_str() {
        "note" => Ok(AnnotationKind::Note),
        "highlight" => Ok(AnnotationKind::Highlight),
        other => Err(ParseError::UnknownKind(other.to_string())),
    }
}

/// Extract the raw location token (e.g. `"548"` or `"666-668"`) from the
/// metadata line.
pub fn resolve_location_token(metadata: &str) -> Result<&str, ParseError> {
    let (_, loc_token) = scan_left_segment(metadata)?;
    Ok(loc_token)
}

/// Interpret a location token for the given kind: a bare integer for
/// notes, a `start-end` pair for highlights.
pub fn resolve_location(kind: AnnotationKind, token: &str) -> Result<Location, ParseError> {
    let parse_int = |s: &str| {
        s.parse::<i64>()
            .map_err(|_| ParseError::Format(format!("non-numeric location '{}'", s)))
    };

    match kind {
        AnnotationKind::Note => Ok(Location::Point {
            end: parse_int(token)?,
        }),
        AnnotationKind::Highlight => {
            let parts: Vec<&str> = token.split('-').collect();
            match parts[..] {
                [start, end] => Ok(Location::Range {
                    start: parse_int(start)?,
                    end: parse_int(end)?,
                }),
                _ => Err(ParseError::Format(format!(
                    "highlight location is not a start-end range: '{}'",
                    token
                ))),
            }
        }
    }
}

/// Extract the raw date text from the metadata line: the right pipe
/// segment with its fixed "Added on" prefix dropped.
pub fn resolve_date(metadata: &str) -> Result<String, ParseError> {
    let (_, right) = metadata_segments(metadata)?;
    let tokens: Vec<&str> = right.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(ParseError::Format(format!(
            "no date text after 'Added on' in '{}'",
            right
        )));
    }
    Ok(tokens[2..].join(" "))
}

/// Parse the device's date text into a UTC instant.
///
/// Expected shape: `Saturday, April 18, 2020 11:21:19 AM`. The device
/// records no timezone, so the instant is taken as UTC by convention —
/// guessing a local zone would make the uniqueness key depend on where
/// the import runs.
pub fn parse_datetime(text: &str) -> Result<DateTime<Utc>, ParseError> {
    let cleaned = text.replace(',', "");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    // weekday, month, day, year, time, AM/PM — the weekday is redundant
    // and ignored.
    let [_weekday, month, day, year, time, meridiem] = tokens[..] else {
        return Err(ParseError::Format(format!("malformed date text: '{}'", text)));
    };

    let month = month_number(month)?;
    let day: u32 = parse_component(day, "day")?;
    let year: i32 = parse_component(year, "year")?;

    let clock: Vec<&str> = time.split(':').collect();
    let [hour, minute, second] = clock[..] else {
        return Err(ParseError::Format(format!("malformed time: '{}'", time)));
    };
    let hour: u32 = parse_component(hour, "hour")?;
    let minute: u32 = parse_component(minute, "minute")?;
    let second: u32 = parse_component(second, "second")?;

    if !(1..=12).contains(&hour) {
        return Err(ParseError::DateArithmetic(format!(
            "hour {} is outside the 12-hour clock",
            hour
        )));
    }

    // Standard 12-hour clock: 12 AM is midnight, 12 PM is noon.
    let hour = match meridiem.to_ascii_uppercase().as_str() {
        "AM" => {
            if hour == 12 {
                0
            } else {
                hour
            }
        }
        "PM" => {
            if hour == 12 {
                12
            } else {
                hour + 12
            }
        }
        other => {
            return Err(ParseError::Format(format!(
                "expected AM or PM, found '{}'",
                other
            )))
        }
    };

    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .ok_or_else(|| {
            ParseError::DateArithmetic(format!(
                "{}-{:02}-{:02} {:02}:{:02}:{:02} is not a valid instant",
                year, month, day, hour, minute, second
            ))
        })
}

/// English full month name to month number. The device always writes full
/// English names regardless of the reader's locale.
pub fn month_number(name: &str) -> Result<u32, ParseError> {
    match name {
        "January" => Ok(1),
        "February" => Ok(2),
        "March" => Ok(3),
        "April" => Ok(4),
        "May" => Ok(5),
        "June" => Ok(6),
        "July" => Ok(7),
        "August" => Ok(8),
        "September" => Ok(9),
        "October" => Ok(10),
        "November" => Ok(11),
        "December" => Ok(12),
        other => Err(ParseError::UnknownMonth(other.to_string())),
    }
}

fn parse_component<T: std::str::FromStr>(s: &str, what: &str) -> Result<T, ParseError> {
    s.parse::<T>()
        .map_err(|_| ParseError::Format(format!("non-numeric {} '{}'", what, s)))
}
