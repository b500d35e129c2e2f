/*!
# Source position types (Position, Span)

Zero-based locations shared by the output translator, the diagnostics
collection and the LSP providers. TChecker reports 1-based positions; the
conversion happens once, in the translator.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in a document (0-based line and column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub fn zero() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for Position {
    /// Human-facing form is 1-based, matching the toolchain's own messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Span in a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn zero() -> Self {
        Self::new(Position::zero(), Position::zero())
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// Returns the text of line `line` without its terminator.
pub fn line_at(text: &str, line: u32) -> Option<&str> {
    text.lines().nth(line as usize)
}

/// Returns the part of `line` before `character`.
///
/// `character` is an LSP offset in UTF-16 code units. A character split by
/// the offset is left out; values past the end clamp to the whole line.
pub fn prefix_at(line: &str, character: u32) -> &str {
    let mut units = 0u32;
    for (byte, ch) in line.char_indices() {
        units += ch.len_utf16() as u32;
        if units > character {
            return &line[..byte];
        }
    }
    line
}

/// Length of `line` in UTF-16 code units, the unit of LSP `character`.
pub fn utf16_len(line: &str) -> u32 {
    line.encode_utf16().count() as u32
}
