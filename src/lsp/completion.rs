//! Completion for TChecker declarations.
//!
//! Keywords are offered before the first `:`; afterwards the field being
//! typed decides which identifiers declared above the cursor are suggested.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Position};

use crate::core::position::{line_at, prefix_at};
use crate::language::keywords::{self, KEYWORDS};
use crate::language::{count_char, process_constraint, scan_above};

/// Characters that re-trigger completion inside a declaration
pub const TRIGGER_CHARACTERS: &[&str] = &[":", "@"];

pub fn provide_completion(text: &str, position: Position) -> Option<Vec<CompletionItem>> {
    let line = line_at(text, position.line).unwrap_or("");
    let prefix = prefix_at(line, position.character);

    let colons = count_char(prefix, ':');
    if count_char(prefix, '{') > 0 {
        return None;
    }
    if colons == 0 {
        return Some(keyword_items());
    }

    let keyword = keywords::declared_on(prefix)?;
    let scan = |kw: &str, field: usize, process: Option<&str>| -> Option<Vec<String>> {
        let constraint = match process {
            Some(p) => Some(process_constraint(kw, p)?),
            None => None,
        };
        Some(scan_above(text, position.line, kw, field, constraint.as_ref()).into_values())
    };

    let (values, detail) = match (keyword.name, colons) {
        ("location" | "edge", 1) => (scan("process", 1, None)?, "process"),
        ("edge", 2 | 3) => {
            let process = prefix.split(':').nth(1)?;
            (scan("location", 2, Some(process))?, "location")
        }
        ("edge", 4) => (scan("event", 1, None)?, "event"),
        ("sync", _) => {
            let ats = count_char(prefix, '@');
            if colons == ats + 1 {
                (scan("process", 1, None)?, "process")
            } else if colons == ats {
                let constraint = prefix.split(':').nth(colons)?;
                let process = constraint.split('@').next()?;
                (scan("edge", 4, Some(process))?, "event")
            } else {
                return None;
            }
        }
        _ => return None,
    };

    Some(values.into_iter().map(|value| identifier_item(value, detail)).collect())
}

fn keyword_items() -> Vec<CompletionItem> {
    KEYWORDS
        .iter()
        .map(|kw| CompletionItem {
            label: kw.name.to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            detail: Some(kw.signature.to_string()),
            ..Default::default()
        })
        .collect()
}

fn identifier_item(label: String, detail: &str) -> CompletionItem {
    CompletionItem {
        label,
        kind: Some(CompletionItemKind::VARIABLE),
        detail: Some(detail.to_string()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MODEL: &str = "\
system:s
event:a
event:b
process:P
process:Q{}
location:P:l0{initial:}
location:P:l1
location:Q:m0{initial:}
edge:P:l0:l1:a
edge:Q:m0:m0:b
";

    fn labels_at(text: &str, line: u32, character: u32) -> Option<Vec<String>> {
        provide_completion(text, Position { line, character })
            .map(|items| items.into_iter().map(|i| i.label).collect())
    }

    fn with_line(line: &str) -> (String, u32, u32) {
        let text = format!("{MODEL}{line}\n");
        (text, MODEL.lines().count() as u32, crate::core::position::utf16_len(line))
    }

    #[test]
    fn test_keywords_on_empty_line() {
        let (text, line, col) = with_line("lo");
        let labels = labels_at(&text, line, col).unwrap();
        assert_eq!(labels.len(), 8);
        assert!(labels.contains(&"location".to_string()));
    }

    #[test]
    fn test_nothing_inside_attributes() {
        let (text, line, col) = with_line("location:P:l2{");
        assert_eq!(labels_at(&text, line, col), None);
    }

    #[test]
    fn test_location_process() {
        let (text, line, col) = with_line("location:");
        assert_eq!(labels_at(&text, line, col).unwrap(), vec!["P", "Q"]);
    }

    #[test]
    fn test_location_second_field_has_no_suggestions() {
        let (text, line, col) = with_line("location:P:");
        assert_eq!(labels_at(&text, line, col), None);
    }

    #[test]
    fn test_edge_fields() {
        let (text, line, col) = with_line("edge:");
        assert_eq!(labels_at(&text, line, col).unwrap(), vec!["P", "Q"]);

        let (text, line, col) = with_line("edge:P:");
        assert_eq!(labels_at(&text, line, col).unwrap(), vec!["l0", "l1"]);

        let (text, line, col) = with_line("edge:Q:m0:");
        assert_eq!(labels_at(&text, line, col).unwrap(), vec!["m0"]);

        let (text, line, col) = with_line("edge:P:l0:l1:");
        assert_eq!(labels_at(&text, line, col).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_sync_processes_and_events() {
        let (text, line, col) = with_line("sync:");
        assert_eq!(labels_at(&text, line, col).unwrap(), vec!["P", "Q"]);

        let (text, line, col) = with_line("sync:P@");
        assert_eq!(labels_at(&text, line, col).unwrap(), vec!["a"]);

        let (text, line, col) = with_line("sync:P@a:");
        assert_eq!(labels_at(&text, line, col).unwrap(), vec!["P", "Q"]);

        let (text, line, col) = with_line("sync:P@a:Q@");
        assert_eq!(labels_at(&text, line, col).unwrap(), vec!["b"]);
    }

    #[test]
    fn test_only_declarations_above_cursor_count() {
        let text = "process:P\nlocation:\nprocess:Q\n";
        assert_eq!(labels_at(text, 1, 9).unwrap(), vec!["P"]);
    }

    #[test]
    fn test_cursor_in_middle_of_line_uses_prefix() {
        let text = "process:P\nevent:e\nedge:P:x:y:e{}\n";
        // cursor right after "edge:"
        assert_eq!(labels_at(text, 2, 5).unwrap(), vec!["P"]);
    }
}
