//! document compilation
//!
//! Runs the whole pipeline (include expansion, normalization, indentation
//! nesting, line classification) and builds the output [PropertyTree],
//! resolving inheritance while it walks the indentation tree.
//!
//! The walk keeps two stacks. The concrete parent stack holds the bag each
//! nesting level adds its entries to; base names are resolved against it
//! innermost first, so an entry can inherit from a prior sibling or from
//! anything visible on an enclosing level. The scope stack holds one scratch
//! bag per nesting level collecting that level's abstract templates; it is
//! searched after the concrete ancestors and popped when the level's
//! sibling block closes.
use crate::bag::{BagId, PropertyTree};
use crate::grammar::{self, BaseRef, LineKind};
use crate::indent::{self, IndentNode};
use crate::source::{self, FileSystem, MemoryFs};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    MalformedLine(#[from] grammar::MalformedLine),
    #[error("failed to read document")]
    Io(#[from] std::io::Error),
}

/// Compile the document at `path`.
///
/// The file's own directory is the base for its include directives. Failing
/// to read `path` itself is an error; failing includes merely warn.
pub fn parse_file(fs: &dyn FileSystem, path: &Path) -> Result<PropertyTree, ParseError> {
    tracing::info!(path = %path.display(), "loading document");
    let lines = fs.read_lines(path)?;
    let base_dir = path.parent().unwrap_or(Path::new(""));
    parse_lines(fs, base_dir, lines)
}

/// Compile an in-memory line sequence, resolving includes against
/// `base_dir`.
pub fn parse_lines<'a, I>(
    fs: &'a dyn FileSystem,
    base_dir: &Path,
    lines: I,
) -> Result<PropertyTree, ParseError>
where
    I: IntoIterator<Item = String>,
    I::IntoIter: 'a,
{
    let expanded = source::expand_includes(fs, base_dir, lines);
    let normalized = source::strip_empty_lines(source::strip_comments(expanded));
    build(&indent::build_tree(normalized))
}

/// Compile a document from a string.
///
/// There is no file system behind it, so include directives warn and expand
/// to nothing.
///
/// ```
/// let tree = pbag::document::parse_str("sword\n    damage = 5\n").unwrap();
/// let sword = tree.root().get("sword").unwrap();
/// assert_eq!(sword.get("damage").unwrap().value(), Some("5"));
/// ```
pub fn parse_str(text: &str) -> Result<PropertyTree, ParseError> {
    parse_lines(
        &MemoryFs::new(),
        Path::new(""),
        text.lines().map(str::to_string),
    )
}

fn build(root: &IndentNode) -> Result<PropertyTree, ParseError> {
    let mut builder = Builder {
        tree: PropertyTree::new(),
        parents: Vec::new(),
        scopes: Vec::new(),
    };
    let root_id = builder.tree.root_id();
    builder.parents.push(root_id);
    builder.parse_level(&root.children)?;
    Ok(builder.tree)
}

struct Builder {
    tree: PropertyTree,
    /// Concrete ancestors, innermost last. Never empty; the document root
    /// sits at the bottom.
    parents: Vec<BagId>,
    /// One scratch bag per nesting level holding its abstract templates.
    scopes: Vec<BagId>,
}

impl Builder {
    fn parse_level(&mut self, nodes: &[IndentNode]) -> Result<(), ParseError> {
        let scope = self.tree.alloc("abstract".to_string(), None, Vec::new());
        self.scopes.push(scope);
        for node in nodes {
            self.parse_node(node)?;
        }
        self.scopes.pop();
        Ok(())
    }

    fn parse_node(&mut self, node: &IndentNode) -> Result<(), ParseError> {
        let line = grammar::parse_line(&node.text)?;
        let parent = self.parent();
        // nameless entries take the next free position number
        let name = line
            .name
            .unwrap_or_else(|| self.tree.child_count(parent).to_string());

        match line.kind {
            LineKind::Value(value) => {
                let leaf = self.tree.alloc(name, Some(value), Vec::new());
                self.tree.add_child(parent, leaf);
                // a complete assignment takes no children
            }
            LineKind::TextBlock => {
                let value = node
                    .children
                    .iter()
                    .map(|child| child.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let leaf = self.tree.alloc(name, Some(value), Vec::new());
                self.tree.add_child(parent, leaf);
            }
            LineKind::Collection { inherits } => {
                let mut bases = Vec::new();
                for base_ref in &inherits {
                    let base_name = match base_ref {
                        BaseRef::Named(base_name) => base_name.as_str(),
                        BaseRef::SameName => name.as_str(),
                    };
                    match self.resolve_base(base_name) {
                        Some(base) => bases.push(base),
                        // lenient merge: an unknown base is simply skipped
                        None => tracing::debug!(name = base_name, "dropping unknown base"),
                    }
                }

                let bag = self.tree.alloc(name, None, bases);
                if line.is_abstract {
                    let scope = self.scope();
                    self.tree.add_child(scope, bag);
                } else {
                    self.tree.add_child(parent, bag);
                }

                // abstract or not, the entry parents its own children
                self.parents.push(bag);
                self.parse_level(&node.children)?;
                self.parents.pop();
            }
        }

        Ok(())
    }

    /// Concrete ancestors first, innermost to outermost, then the abstract
    /// scopes the same way.
    fn resolve_base(&self, name: &str) -> Option<BagId> {
        for parent in self.parents.iter().rev() {
            if let Some(found) = self.tree.lookup(*parent, name) {
                return Some(found);
            }
        }
        for scope in self.scopes.iter().rev() {
            if let Some(found) = self.tree.lookup(*scope, name) {
                return Some(found);
            }
        }
        None
    }

    fn parent(&self) -> BagId {
        *self.parents.last().expect("parent stack is never empty")
    }

    fn scope(&self) -> BagId {
        *self.scopes.last().expect("scope stack is never empty")
    }
}
