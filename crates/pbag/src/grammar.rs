//! per-line grammar
//!
//! Classifies one normalized line of a document. The recognized shape is
//!
//! ```text
//! ["::"] name ( "=" value? | ("::" baseName?)* )
//! ```
//!
//! where every part is optional except that assignment and inheritance
//! cannot be mixed on one line.

/// A classified line, before any tree context is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Declared with a leading `::`: inheritable only, kept out of the
    /// output tree.
    pub is_abstract: bool,
    /// Explicit name, if one was written; the builder numbers nameless
    /// entries positionally.
    pub name: Option<String>,
    pub kind: LineKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `name = value`: a complete leaf. Nested lines are ignored.
    Value(String),
    /// `name =` with nothing after it: the value is assembled from the
    /// line's directly nested lines.
    TextBlock,
    /// A collection entry, with zero or more base references.
    Collection { inherits: Vec<BaseRef> },
}

/// One `::` inheritance segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseRef {
    Named(String),
    /// A bare `::`: inherit a property carrying the same name as this one.
    SameName,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed property line: {0:?}")]
pub struct MalformedLine(pub String);

/// Classify one line.
///
/// A leading `::` attached to a name (`::weapon`) is the abstract marker; a
/// leading `::` followed by whitespace (`:: weapon`) is an inheritance
/// segment on a nameless line. An `=` that appears before any `::` starts an
/// assignment and swallows the rest of the line; an `=` inside an
/// inheritance segment is malformed and fails the parse.
pub fn parse_line(text: &str) -> Result<ParsedLine, MalformedLine> {
    let line = text.trim();

    let (is_abstract, rest) = match line.strip_prefix("::") {
        Some(rest) if rest.chars().next().is_some_and(|c| !c.is_whitespace()) => (true, rest),
        _ => (false, line),
    };

    match (rest.find('='), rest.find("::")) {
        (Some(equals), inherit) if inherit.is_none_or(|inherit| equals < inherit) => {
            let value = &rest[equals + 1..];
            let kind = if value.is_empty() {
                LineKind::TextBlock
            } else {
                LineKind::Value(value.trim().to_string())
            };
            Ok(ParsedLine {
                is_abstract,
                name: explicit_name(&rest[..equals]),
                kind,
            })
        }
        (_, Some(inherit)) => {
            let mut inherits = Vec::new();
            for segment in rest[inherit..].split("::").skip(1) {
                if segment.contains('=') {
                    return Err(MalformedLine(line.to_string()));
                }
                inherits.push(match segment.trim() {
                    "" => BaseRef::SameName,
                    base => BaseRef::Named(base.to_string()),
                });
            }
            Ok(ParsedLine {
                is_abstract,
                name: explicit_name(&rest[..inherit]),
                kind: LineKind::Collection { inherits },
            })
        }
        (_, None) => Ok(ParsedLine {
            is_abstract,
            name: explicit_name(rest),
            kind: LineKind::Collection {
                inherits: Vec::new(),
            },
        }),
    }
}

fn explicit_name(text: &str) -> Option<String> {
    let name = text.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collection(name: Option<&str>, inherits: Vec<BaseRef>) -> ParsedLine {
        ParsedLine {
            is_abstract: false,
            name: name.map(str::to_string),
            kind: LineKind::Collection { inherits },
        }
    }

    #[test]
    fn plain_name_is_a_collection() {
        assert_eq!(parse_line("sword").unwrap(), collection(Some("sword"), vec![]));
    }

    #[test]
    fn assignment_with_value_is_a_leaf() {
        let line = parse_line("damage = 5").unwrap();
        assert_eq!(line.name.as_deref(), Some("damage"));
        assert_eq!(line.kind, LineKind::Value("5".to_string()));
    }

    #[test]
    fn assignment_value_may_contain_inheritance_markers() {
        let line = parse_line("note = a :: b").unwrap();
        assert_eq!(line.kind, LineKind::Value("a :: b".to_string()));
    }

    #[test]
    fn bare_assignment_marks_a_text_block() {
        let line = parse_line("description =").unwrap();
        assert_eq!(line.name.as_deref(), Some("description"));
        assert_eq!(line.kind, LineKind::TextBlock);
    }

    #[test]
    fn nameless_assignment_has_no_name() {
        let line = parse_line("= bites").unwrap();
        assert_eq!(line.name, None);
        assert_eq!(line.kind, LineKind::Value("bites".to_string()));
    }

    #[test]
    fn inheritance_segments_in_order() {
        assert_eq!(
            parse_line("sword :: weapon :: loot").unwrap(),
            collection(
                Some("sword"),
                vec![
                    BaseRef::Named("weapon".to_string()),
                    BaseRef::Named("loot".to_string()),
                ],
            )
        );
    }

    #[test]
    fn trailing_marker_inherits_the_own_name() {
        assert_eq!(
            parse_line("rat ::").unwrap(),
            collection(Some("rat"), vec![BaseRef::SameName])
        );
    }

    #[test]
    fn detached_marker_is_a_nameless_inheriting_entry() {
        assert_eq!(
            parse_line(":: weapon").unwrap(),
            collection(None, vec![BaseRef::Named("weapon".to_string())])
        );
    }

    #[test]
    fn attached_marker_is_abstract() {
        let line = parse_line("::weapon").unwrap();
        assert!(line.is_abstract);
        assert_eq!(line.name.as_deref(), Some("weapon"));
        assert_eq!(line.kind, LineKind::Collection { inherits: vec![] });
    }

    #[test]
    fn abstract_entries_may_inherit() {
        let line = parse_line("::dire_rat :: rat").unwrap();
        assert!(line.is_abstract);
        assert_eq!(line.name.as_deref(), Some("dire_rat"));
        assert_eq!(
            line.kind,
            LineKind::Collection {
                inherits: vec![BaseRef::Named("rat".to_string())]
            }
        );
    }

    #[test]
    fn lone_marker_inherits_the_positional_name() {
        assert_eq!(
            parse_line("::").unwrap(),
            collection(None, vec![BaseRef::SameName])
        );
    }

    #[test]
    fn single_colons_belong_to_the_name() {
        assert_eq!(
            parse_line("key: odd").unwrap(),
            collection(Some("key: odd"), vec![])
        );
    }

    #[test]
    fn assignment_inside_inheritance_is_malformed() {
        let error = parse_line("a :: b = c").unwrap_err();
        assert_eq!(error, MalformedLine("a :: b = c".to_string()));
    }
}
