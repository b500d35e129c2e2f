//! Signature help for declarations being typed.
//!
//! Each colon moves to the next parameter. An open brace pins the active
//! parameter to the attributes block; a second one (or too many colons)
//! means the declaration is past its signature.

use tower_lsp::lsp_types::{
    Documentation, ParameterInformation, ParameterLabel, Position, SignatureHelp,
    SignatureInformation,
};

use crate::core::position::{line_at, prefix_at};
use crate::language::{count_char, keywords};

pub const TRIGGER_CHARACTERS: &[&str] = &[":", "{"];

pub fn provide_signature_help(text: &str, position: Position) -> Option<SignatureHelp> {
    let line = line_at(text, position.line)?;
    let prefix = prefix_at(line, position.character);
    let keyword = keywords::declared_on(prefix)?;

    let colons = count_char(prefix, ':');
    let braces = count_char(prefix, '{');
    if colons > keyword.attribute_pos
        || braces > 1
        || (braces == 1 && colons < keyword.attribute_pos)
    {
        return None;
    }

    let active_parameter = if braces == 1 { keyword.attribute_pos } else { colons - 1 };

    let parameters = keyword
        .parameters
        .iter()
        .map(|p| ParameterInformation {
            label: ParameterLabel::Simple(p.label.to_string()),
            documentation: Some(Documentation::String(p.documentation.to_string())),
        })
        .collect();

    Some(SignatureHelp {
        signatures: vec![SignatureInformation {
            label: keyword.signature.to_string(),
            documentation: Some(Documentation::String(keyword.documentation.to_string())),
            parameters: Some(parameters),
            active_parameter: None,
        }],
        active_signature: Some(0),
        active_parameter: Some(active_parameter as u32),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(line: &str) -> Option<u32> {
        let help = provide_signature_help(line, Position { line: 0, character: crate::core::position::utf16_len(line) })?;
        assert_eq!(help.signatures.len(), 1);
        help.active_parameter
    }

    #[test]
    fn test_each_colon_advances() {
        assert_eq!(active("int:"), Some(0));
        assert_eq!(active("int:1:"), Some(1));
        assert_eq!(active("int:1:0:5:"), Some(3));
        assert_eq!(active("int:1:0:5:0:"), Some(4));
    }

    #[test]
    fn test_brace_pins_attributes() {
        assert_eq!(active("int:1:0:5:0:i{"), Some(5));
        assert_eq!(active("process:P{"), Some(1));
        assert_eq!(active("process:P{initial: true"), None);
    }

    #[test]
    fn test_suppressed_cases() {
        // brace before the attributes field
        assert_eq!(active("clock:{"), None);
        // second brace
        assert_eq!(active("event:a{}{"), None);
        // past the attribute position without a brace
        assert_eq!(active("event:a:b"), None);
        // not a declaration
        assert_eq!(active("events:"), None);
        assert_eq!(active("event"), None);
    }

    #[test]
    fn test_signature_contents() {
        let help = provide_signature_help("edge:", Position { line: 0, character: 5 }).unwrap();
        let sig = &help.signatures[0];
        assert_eq!(sig.label, "edge:p:source:target:e{attributes}");
        assert_eq!(sig.parameters.as_ref().map(Vec::len), Some(5));
    }
}
