/*!
# TChecker input format helpers

The keyword table and the line scanner. Nothing here parses a model; the
external toolchain owns that.
*/

pub mod keywords;
pub mod scanner;

pub use keywords::{Keyword, Parameter, KEYWORDS};
pub use scanner::{process_constraint, scan_above, ScanResult, SkippedLine};

/// Number of occurrences of `c` in `s`.
pub fn count_char(s: &str, c: char) -> usize {
    s.chars().filter(|&ch| ch == c).count()
}
