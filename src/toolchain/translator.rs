//! Output translator: TChecker stderr to positioned diagnostics.
//!
//! Toolchain messages carry a location token `<line>[-<line>].<col>[-<col>]`
//! (1-based). Lines without a token are still reported, anchored at the
//! start of the file.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::core::{Position, Severity, Span, ToolDiagnostic};

static POSITION_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)(?:-(\d+))?\.(\d+)(?:-(\d+))?").expect("position token regex is valid")
});

/// Converts every stderr line into a diagnostic stamped with `severity`.
pub fn translate(stderr: &str, severity: Severity) -> Vec<ToolDiagnostic> {
    let mut lines: Vec<&str> = stderr.split('\n').collect();
    if lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }

    lines
        .into_iter()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        // whitespace-only lines are dropped, not reported at the origin
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let span = POSITION_TOKEN
                .captures(line)
                .and_then(|caps| span_from(&caps))
                .unwrap_or_else(Span::zero);
            ToolDiagnostic::new(span, line, severity)
        })
        .collect()
}

fn span_from(caps: &Captures<'_>) -> Option<Span> {
    let number = |idx: usize| -> Option<Option<u32>> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse::<u32>().ok().map(Some),
            None => Some(None),
        }
    };

    let line_begin = number(1)??;
    let line_end = number(2)?;
    let col_begin = number(3)??;
    let col_end = number(4)?;

    let start = Position::new(line_begin.saturating_sub(1), col_begin.saturating_sub(1));
    let end = Position::new(
        line_end.unwrap_or(line_begin).saturating_sub(1),
        // explicit end column is exclusive and stays as reported
        col_end.unwrap_or(start.column),
    );
    Some(Span::new(start, end))
}
