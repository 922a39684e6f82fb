//! # pbag - property bag documents
//!
//! A loader for a small, indentation-structured data-description format used
//! to author structured records (game content definitions and the like)
//! without a scripting language. A document compiles into a tree of named
//! properties; entries can include other files and inherit from sibling
//! entries prototype-style.
//!
//! ## The format
//!
//! Documents are line oriented. Nesting comes from indentation alone; there
//! are no braces. Everything from `//` to the end of a line is a comment,
//! and blank lines are insignificant.
//!
//! ```text
//! // a complete document
//! #include "shared/materials"
//!
//! ::weapon                    // abstract template, inheritable only
//!     damage = 5
//!     speed = 10
//!
//! sword :: weapon             // inherits damage and speed
//!     speed = 7               // shadows the inherited value
//!     description =           // multi-line text, children joined by spaces
//!         A simple blade,
//!         reliable and cheap.
//!
//! loot
//!     :: weapon               // anonymous entry, named "0"
//!     :: weapon               // anonymous entry, named "1"
//! ```
//!
//! A line is one of:
//!
//! - `name = value` - a leaf property holding the (opaque) text `value`.
//!   Indented lines beneath it are ignored.
//! - `name =` - a leaf property whose value is the text of its directly
//!   indented lines, joined with single spaces.
//! - `name :: base :: other` - a collection property that falls back to
//!   `base`, then `other`, for child names it does not define itself. A bare
//!   `::` with no base name inherits a property with the same name from an
//!   enclosing scope.
//! - `name` - a plain collection property.
//!
//! The name may be omitted; nameless entries are numbered `0`, `1`, `2`, ...
//! within their parent, in declaration order. A leading `::` attached to the
//! name (`::weapon`) marks the entry *abstract*: it can be inherited from by
//! its siblings and their descendants but never appears in the output tree.
//!
//! `#include "path"` splices in another file's lines (or every file of a
//! directory), resolved relative to the including file's location, before
//! any structural parsing happens.
//!
//! ## Pipeline
//!
//! Compilation is a fixed sequence of small passes:
//!
//! 1. [source::expand_includes] - recursively inline `#include` directives
//!    (lazy, line by line, against a [source::FileSystem]).
//! 2. [source::strip_comments] then [source::strip_empty_lines].
//! 3. [indent::build_tree] - nest the surviving lines by indentation depth.
//! 4. [grammar::parse_line] - classify each line's text.
//! 5. [document] - walk the indentation tree and build the output
//!    [bag::PropertyTree], resolving inheritance as it goes.
//!
//! [document::parse_file] and [document::parse_str] run the whole pipeline.
//!
//! ## Inheritance
//!
//! Bases are live references, not copies: a bag consults its bases at lookup
//! time, so everything a base defines (including what *it* inherits) is
//! visible through every bag that references it. A base name is resolved
//! against the concrete ancestors of the declaring entry (innermost first,
//! prior siblings included), then against the abstract templates in scope.
//! Abstract templates are lexically scoped: a template is visible to its own
//! siblings and their descendants and shadows same-named templates of
//! enclosing levels, but goes out of scope when its sibling block closes.
//! A base name that resolves to nothing is dropped without complaint.
pub mod bag;
pub mod document;
pub mod grammar;
pub mod indent;
pub mod source;
