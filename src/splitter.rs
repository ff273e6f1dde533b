//! Clipping-boundary document splitter.
//!
//! Breaks a full `My Clippings.txt` export into the raw per-clipping text
//! blocks that the parser consumes. The device writes each clipping
//! followed by a line of ten `=` characters, including after the very last
//! one, so the final fragment of the split is always empty and dropped.

/// The delimiter line the device writes between clippings.
pub const SEPARATOR: &str = "==========\n";

/// Split an export document into raw clipping blocks, in document order.
///
/// Each block has the line terminator that preceded its separator stripped
/// (`\r\n` exports are tolerated). The fragment after the trailing
/// separator is discarded unconditionally, so a document that is empty or
/// consists only of separators yields no blocks. Block contents are not
/// validated here; malformed blocks are rejected later by the parser.
pub fn split_document(document: &str) -> Vec<&str> {
    let mut blocks: Vec<&str> = document
        .split(SEPARATOR)
        .map(|segment| {
            segment
                .strip_suffix('\n')
                .map(|s| s.strip_suffix('\r').unwrap_or(s))
                .unwrap_or(segment)
        })
        .collect();

    // The export always ends with a separator; whatever follows it is not
    // a clipping.
    blocks.pop();

    // Whitespace-only segments (doubled separators, stray trailing blank
    // lines) carry no clipping either.
    blocks.retain(|block| !block.trim().is_empty());
    blocks
}
