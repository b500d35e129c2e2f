//! Hover: keyword documentation for declaration lines.

use tower_lsp::lsp_types::{Hover, HoverContents, LanguageString, MarkedString, Position};

use crate::core::position::line_at;
use crate::language::keywords;

/// Language id of `.tck` documents
pub const LANGUAGE_ID: &str = "tchecker";

pub fn provide_hover(text: &str, position: Position) -> Option<Hover> {
    let line = line_at(text, position.line)?;
    let keyword = keywords::declared_on(line)?;

    Some(Hover {
        contents: HoverContents::Array(vec![
            MarkedString::String(keyword.title()),
            MarkedString::LanguageString(LanguageString {
                language: LANGUAGE_ID.to_string(),
                value: keyword.signature.to_string(),
            }),
            MarkedString::String(keyword.documentation.to_string()),
        ]),
        range: None,
    })
}
