/*!
# Document Scanner

Collects identifiers declared above the cursor, e.g. every process name
declared before the `location:` line being edited.

Declarations are colon-separated records; segment 0 is the keyword and the
requested segment is cut at the first `{` so a trailing attributes block is
never part of the value.
*/

use regex::Regex;

/// A candidate line that did not have the requested field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 0-based line number
    pub line: u32,
    pub field_index: usize,
    pub segments: usize,
}

/// Distinct values in first-seen order, plus the malformed lines passed over
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub values: Vec<String>,
    pub skipped: Vec<SkippedLine>,
}

impl ScanResult {
    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

/// Scans lines `0..cursor_line` of `text`.
///
/// A line is considered when it starts with `keyword` and `constraint` (if
/// any) matches it; its colon segment `field_index` is then kept. Only
/// considered lines that are too short end up in `skipped`.
pub fn scan_above(
    text: &str,
    cursor_line: u32,
    keyword: &str,
    field_index: usize,
    constraint: Option<&Regex>,
) -> ScanResult {
    let mut result = ScanResult::default();

    for (line_no, line) in text.lines().take(cursor_line as usize).enumerate() {
        if !line.starts_with(keyword) {
            continue;
        }

        if constraint.is_some_and(|re| !re.is_match(line)) {
            continue;
        }

        let segments: Vec<&str> = line.split(':').collect();
        let Some(segment) = segments.get(field_index) else {
            result.skipped.push(SkippedLine {
                line: line_no as u32,
                field_index,
                segments: segments.len(),
            });
            continue;
        };

        let value = segment.split('{').next().unwrap_or_default().trim();
        if value.is_empty() || result.values.iter().any(|v| v == value) {
            continue;
        }
        result.values.push(value.to_string());
    }

    if !result.skipped.is_empty() {
        tracing::warn!(
            keyword,
            field_index,
            count = result.skipped.len(),
            "declarations without the requested field were skipped"
        );
    }

    result
}

/// Constraint matching declarations of `keyword` whose first field is `process`.
pub fn process_constraint(keyword: &str, process: &str) -> Option<Regex> {
    Regex::new(&format!("^{}:{}:", regex::escape(keyword), regex::escape(process.trim()))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let text = "process:A{}\nprocess:B{}\nprocess:A{}\n";
        let result = scan_above(text, 3, "process", 1, None);
        assert_eq!(result.values, vec!["A", "B"]);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_only_lines_above_cursor() {
        let text = "process:A\nprocess:B\nprocess:C\n";
        assert_eq!(scan_above(text, 2, "process", 1, None).values, vec!["A", "B"]);
        assert!(scan_above(text, 0, "process", 1, None).values.is_empty());
    }

    #[test]
    fn test_constraint_filters_whole_line() {
        let text = "\
edge:A:l0:l1:a{provided: x>1}
edge:B:m0:m1:b
edge:A:l1:l0:c
edge:AB:n0:n1:d
";
        let re = process_constraint("edge", "A").unwrap();
        let result = scan_above(text, 4, "edge", 4, Some(&re));
        assert_eq!(result.values, vec!["a", "c"]);

        let anchored = Regex::new("^edge:A").unwrap();
        let loose = scan_above(text, 4, "edge", 4, Some(&anchored));
        assert_eq!(loose.values, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_attributes_block_is_stripped() {
        let text = "location:P:l0{initial: : labels: green}\nlocation:P:l1 {}\n";
        let result = scan_above(text, 2, "location", 2, None);
        assert_eq!(result.values, vec!["l0", "l1"]);
    }

    #[test]
    fn test_out_of_range_field_is_skipped_and_reported() {
        let text = "process\nprocess:A\nlocation:A\n";
        let result = scan_above(text, 3, "process", 1, None);
        assert_eq!(result.values, vec!["A"]);
        assert_eq!(
            result.skipped,
            vec![SkippedLine { line: 0, field_index: 1, segments: 1 }]
        );

        let locations = scan_above(text, 3, "location", 2, None);
        assert!(locations.values.is_empty());
        assert_eq!(locations.skipped.len(), 1);
    }

    #[test]
    fn test_short_line_failing_constraint_is_not_reported() {
        let text = "edge:B\nedge:A:l0\nedge:A:l0:l1:go\n";
        let re = process_constraint("edge", "A").unwrap();
        let result = scan_above(text, 3, "edge", 4, Some(&re));
        assert_eq!(result.values, vec!["go"]);
        assert_eq!(
            result.skipped,
            vec![SkippedLine { line: 1, field_index: 4, segments: 3 }]
        );
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let text = "event:{}\nevent:go\n";
        assert_eq!(scan_above(text, 2, "event", 1, None).values, vec!["go"]);
    }
}
