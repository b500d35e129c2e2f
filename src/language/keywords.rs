//! TChecker declaration keywords
//!
//! Every declaration in a `.tck` file is one colon-separated record that
//! starts with one of these keywords, optionally followed by an `{attributes}`
//! block. The table drives completion, hover and signature help.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Documentation shared by every `{attributes}` parameter.
const ATTRIBUTES_DOC: &str = "The {attributes} part of the declaration can be ommitted if no attribute is associated to the system (or it can be left empty: {}).";

/// Declaration parameter (label + documentation)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub label: &'static str,
    pub documentation: &'static str,
}

/// Declaration keyword definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub name: &'static str,
    pub signature: &'static str,
    pub documentation: &'static str,
    pub parameters: &'static [Parameter],
    /// Index of the colon segment that introduces the attributes block.
    pub attribute_pos: usize,
}

impl Keyword {
    /// Hover title, e.g. "Process declaration".
    pub fn title(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => format!("{}{} declaration", first.to_uppercase(), chars.as_str()),
            None => String::new(),
        }
    }

    /// `"<name>:"`, the prefix every declaration line of this keyword carries.
    pub fn declaration_prefix(&self) -> String {
        format!("{}:", self.name)
    }
}

const fn param(label: &'static str, documentation: &'static str) -> Parameter {
    Parameter { label, documentation }
}

pub static KEYWORDS: &[Keyword] = &[
    Keyword {
        name: "system",
        signature: "system:id{attributes}",
        documentation: "Declares a system with identifier id and given attributes. There shall be only one system declaration in a TChecker file. And it shall appear as the first declaration in the file.",
        parameters: &[param("id", "System's identifier."), param("attributes", ATTRIBUTES_DOC)],
        attribute_pos: 1,
    },
    Keyword {
        name: "process",
        signature: "process:id{attributes}",
        documentation: "Declares a process with identifier id and given attributes. No other process shall have the same identifier.\n\nA process declaration declares a process name. It does not declare a new scope. Hence all declarations following the process declaration are in the global scope.\n\nThere is no way to declare a type of process, and instantiate it in TChecker. In order to specify several instances of the same process type, the process declaration and all the related declarations (locations, edges, etc) shall be duplicated. This can be solved by writing a script that generates the TChecker model and that handles process instantiation smoothly.",
        parameters: &[param("id", "Process's identifier."), param("attributes", ATTRIBUTES_DOC)],
        attribute_pos: 1,
    },
    Keyword {
        name: "event",
        signature: "event:id{attributes}",
        documentation: "Declares an event with identifier id and given attributes. No other event shall have the same identifier.",
        parameters: &[param("id", "Event's identifier."), param("attributes", ATTRIBUTES_DOC)],
        attribute_pos: 1,
    },
    Keyword {
        name: "clock",
        signature: "clock:size:id{attributes}",
        documentation: "Declares an array of size clocks with identifier id and given attributes. No other clock shall have the same identifier.",
        parameters: &[
            param("size", "Size of the array."),
            param("id", "Clock's identifier."),
            param("attributes", ATTRIBUTES_DOC),
        ],
        attribute_pos: 2,
    },
    Keyword {
        name: "int",
        signature: "int:size:min:max:init:id{attributes}",
        documentation: "Declares the array of size bounded integer variables with identifier id and given attributes. Each variable in the array takes values between min and max (both included) and initial value init. No other integer variable shall have the same identifier.",
        parameters: &[
            param("size", "Size of the array."),
            param("min", "Minimum value of the array."),
            param("max", "Maximum value of the array."),
            param("init", "Initial value of the array."),
            param("id", "Array's identifier."),
            param("attributes", ATTRIBUTES_DOC),
        ],
        attribute_pos: 5,
    },
    Keyword {
        name: "location",
        signature: "location:p:id{attributes}",
        documentation: "Declares location with identifier id in process with identifier p, and given attributes. The process identifier p shall have been declared previously. No other location within process p shall have the same identifier id. It is perfectly valid that two locations in different processes have the same identifier.",
        parameters: &[
            param("p", "Process' identifier."),
            param("id", "Location's identifier."),
            param("attributes", ATTRIBUTES_DOC),
        ],
        attribute_pos: 2,
    },
    Keyword {
        name: "edge",
        signature: "edge:p:source:target:e{attributes}",
        documentation: "Declares an edge in process p from location source to location target and labelled with event e. The process p shall have been declared previously. The two locations source and target shall have been declared as well, and they shall both belong to process p. The event e shall have been declared before the edge is declared.",
        parameters: &[
            param("p", "Process's identifier."),
            param("source", "Source location."),
            param("target", "Target location."),
            param("e", "Labelled event."),
            param("attributes", ATTRIBUTES_DOC),
        ],
        attribute_pos: 4,
    },
    Keyword {
        name: "sync",
        signature: "sync:sync_constraints{attributes}",
        documentation: "Declares a synchronisation constraint with given attributes. sync_constraints is a colon-separated list of synchronisation constraints of the form p@e or p@e? where p is a process name, e is an event name, and the option question mark ? denotes a weak synchronisation. Process p and event e shall have been declared before the synchronisation is declared.",
        parameters: &[
            param("sync_constraints", "Synchronisation constraints."),
            param("attributes", ATTRIBUTES_DOC),
        ],
        attribute_pos: 1,
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static Keyword>> =
    Lazy::new(|| KEYWORDS.iter().map(|k| (k.name, k)).collect());

/// Looks a keyword up by name.
pub fn find(name: &str) -> Option<&'static Keyword> {
    BY_NAME.get(name).copied()
}

/// Keyword whose declaration prefix (`<name>:`) starts `line`.
pub fn declared_on(line: &str) -> Option<&'static Keyword> {
    let (head, _) = line.split_once(':')?;
    find(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_consistent() {
        assert_eq!(KEYWORDS.len(), 8);
        for kw in KEYWORDS {
            assert!(kw.signature.starts_with(&kw.declaration_prefix()), "{}", kw.name);
            assert!(kw.signature.ends_with("{attributes}"), "{}", kw.name);
            assert_eq!(kw.parameters[kw.attribute_pos].label, "attributes", "{}", kw.name);
            assert_eq!(kw.parameters.len(), kw.attribute_pos + 1, "{}", kw.name);
        }
    }

    #[test]
    fn test_find_and_declared_on() {
        assert_eq!(find("clock").map(|k| k.attribute_pos), Some(2));
        assert!(find("clocks").is_none());
        assert_eq!(declared_on("edge:P:a:b:e{}").map(|k| k.name), Some("edge"));
        assert!(declared_on("edges:P").is_none());
        assert!(declared_on("edge").is_none());
    }

    #[test]
    fn test_title() {
        assert_eq!(find("int").unwrap().title(), "Int declaration");
    }
}
