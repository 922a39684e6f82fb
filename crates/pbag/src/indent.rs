//! indentation tree
//!
//! Turns a flat, already normalized line sequence into a tree where each
//! line's children are the lines that follow it with deeper indentation.
use std::iter::Peekable;

/// One logical line and the lines nested beneath it.
///
/// `text` is the line with its indentation (and surrounding whitespace)
/// removed. The root node returned by [build_tree] has empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentNode {
    pub text: String,
    pub children: Vec<IndentNode>,
}

/// Nest `lines` by indentation depth.
///
/// A line's children are the following lines indented strictly deeper than
/// it, up to the next line at or above its own column. Siblings do not have
/// to share a column; every space or tab counts as one column. Blank lines
/// are skipped.
pub fn build_tree(lines: impl IntoIterator<Item = String>) -> IndentNode {
    let mut lines = lines
        .into_iter()
        .filter_map(|line| {
            let text = line.trim().to_string();
            if text.is_empty() {
                None
            } else {
                Some((indent_width(&line), text))
            }
        })
        .peekable();

    IndentNode {
        text: String::new(),
        children: collect_block(&mut lines, None),
    }
}

fn collect_block(
    lines: &mut Peekable<impl Iterator<Item = (usize, String)>>,
    parent_indent: Option<usize>,
) -> Vec<IndentNode> {
    let mut nodes = Vec::new();

    while let Some(&(indent, _)) = lines.peek() {
        if parent_indent.is_some_and(|parent| indent <= parent) {
            break;
        }
        let (indent, text) = lines.next().expect("peeked line is present");
        let children = collect_block(lines, Some(indent));
        nodes.push(IndentNode { text, children });
    }

    nodes
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree(text: &str) -> IndentNode {
        build_tree(text.lines().map(str::to_string))
    }

    fn texts(nodes: &[IndentNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.text.as_str()).collect()
    }

    #[test]
    fn flat_lines_become_root_children() {
        let root = tree("a\nb\nc");
        assert_eq!(texts(&root.children), ["a", "b", "c"]);
    }

    #[test]
    fn deeper_lines_nest_under_the_previous_line() {
        let root = tree("a\n    b\n        c\n    d\ne");
        assert_eq!(texts(&root.children), ["a", "e"]);
        let a = &root.children[0];
        assert_eq!(texts(&a.children), ["b", "d"]);
        assert_eq!(texts(&a.children[0].children), ["c"]);
    }

    #[test]
    fn siblings_do_not_need_to_share_a_column() {
        // the second child dedents relative to the first but stays deeper
        // than the parent
        let root = tree("a\n        b\n    c");
        let a = &root.children[0];
        assert_eq!(texts(&a.children), ["b", "c"]);
    }

    #[test]
    fn node_text_is_trimmed() {
        let root = tree("    padded   ");
        assert_eq!(root.children[0].text, "padded");
    }
}
