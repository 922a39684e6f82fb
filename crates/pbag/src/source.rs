//! source line loading and preprocessing
//!
//! Everything that happens to a document before it has structure: reading
//! lines through the read-only [FileSystem] capability, splicing `#include`
//! directives with [expand_includes], and normalizing the result with
//! [strip_comments] and [strip_empty_lines].
//!
//! The preprocessor is deliberately lenient: an include target that is
//! missing or unreadable contributes zero lines and a `tracing` warning, and
//! parsing carries on without it.
use indexmap::IndexMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only file access as the preprocessor sees it.
pub trait FileSystem {
    fn read_lines(&self, path: &Path) -> io::Result<Vec<String>>;
    fn entry(&self, path: &Path) -> Entry;
    /// Files directly inside `dir`, in no particular order.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// What a path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    File,
    Directory,
    Missing,
}

/// [FileSystem] over the real file system.
///
/// Note that [DiskFs::list_files] returns entries in `read_dir` order, which
/// is platform dependent. Directory includes therefore splice their files in
/// an unspecified order.
#[derive(Debug, Default)]
pub struct DiskFs;

impl FileSystem for DiskFs {
    fn read_lines(&self, path: &Path) -> io::Result<Vec<String>> {
        let contents = std::fs::read_to_string(path)?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    fn entry(&self, path: &Path) -> Entry {
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => Entry::Directory,
            Ok(metadata) if metadata.is_file() => Entry::File,
            _ => Entry::Missing,
        }
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for dir_entry in std::fs::read_dir(dir)? {
            let dir_entry = dir_entry?;
            if dir_entry.file_type()?.is_file() {
                files.push(dir_entry.path());
            }
        }
        Ok(files)
    }
}

/// In-memory [FileSystem].
///
/// Backs [crate::document::parse_str] and keeps preprocessor tests free of
/// real file access. A directory exists as soon as any file beneath it does,
/// and [MemoryFs::list_files] follows insertion order, so directory includes
/// are deterministic here.
#[derive(derive_new::new, Debug, Default)]
pub struct MemoryFs {
    #[new(default)]
    files: IndexMap<PathBuf, Vec<String>>,
}

impl MemoryFs {
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: &str) {
        self.files
            .insert(path.into(), text.lines().map(str::to_string).collect());
    }
}

impl FileSystem for MemoryFs {
    fn read_lines(&self, path: &Path) -> io::Result<Vec<String>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn entry(&self, path: &Path) -> Entry {
        if self.files.contains_key(path) {
            Entry::File
        } else if self.files.keys().any(|file| file.starts_with(path)) {
            Entry::Directory
        } else {
            Entry::Missing
        }
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .files
            .keys()
            .filter(|file| file.parent() == Some(dir))
            .cloned()
            .collect())
    }
}

/// Splice `#include "path"` directives into the line stream, recursively.
///
/// Paths resolve against `base_dir`; lines spliced in from a file resolve
/// their own includes against that file's directory, and a directory include
/// expands every file in it with the directory as the new base. Non-include
/// lines pass through verbatim. The returned iterator is lazy and pulls from
/// `fs` only as lines are consumed.
///
/// There is no cycle guard: a file that includes itself expands forever.
pub fn expand_includes<'a, I>(
    fs: &'a dyn FileSystem,
    base_dir: &Path,
    lines: I,
) -> impl Iterator<Item = String> + 'a
where
    I: IntoIterator<Item = String>,
    I::IntoIter: 'a,
{
    Expand {
        fs,
        frames: vec![Frame {
            base: base_dir.to_path_buf(),
            lines: Box::new(lines.into_iter()),
        }],
    }
}

/// Cut everything from the first `//` to the end of each line.
pub fn strip_comments(lines: impl Iterator<Item = String>) -> impl Iterator<Item = String> {
    lines.map(|line| match line.find("//") {
        Some(comment) => line[..comment].to_string(),
        None => line,
    })
}

/// Drop lines that are blank once trimmed.
///
/// Runs after [strip_comments] so that lines holding nothing but a comment
/// disappear as well.
pub fn strip_empty_lines(lines: impl Iterator<Item = String>) -> impl Iterator<Item = String> {
    lines.filter(|line| !line.trim().is_empty())
}

/// The path of an include directive, if the line is one.
///
/// A directive is optional whitespace, `#include`, optional whitespace and a
/// double-quoted path ending the line. Anything else, including a directive
/// with trailing text, is an ordinary line.
fn include_path(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("#include")?;
    let rest = rest.trim_start().strip_prefix('"')?;
    rest.strip_suffix('"')
}

struct Expand<'a> {
    fs: &'a dyn FileSystem,
    frames: Vec<Frame<'a>>,
}

/// One level of include nesting: the lines still to emit and the directory
/// their own includes resolve against.
struct Frame<'a> {
    base: PathBuf,
    lines: Box<dyn Iterator<Item = String> + 'a>,
}

impl Iterator for Expand<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let frame = self.frames.last_mut()?;
            let Some(line) = frame.lines.next() else {
                self.frames.pop();
                continue;
            };

            let Some(include) = include_path(&line) else {
                return Some(line);
            };
            let path = frame.base.join(include);

            match self.fs.entry(&path) {
                Entry::Directory => match self.fs.list_files(&path) {
                    Ok(files) => {
                        // reversed so the first file is popped first
                        for file in files.into_iter().rev() {
                            self.push_file(&file, path.clone());
                        }
                    }
                    Err(error) => {
                        tracing::warn!(path = %path.display(), %error, "couldn't list include directory");
                    }
                },
                Entry::File => {
                    let base = path.parent().unwrap_or(Path::new("")).to_path_buf();
                    self.push_file(&path, base);
                }
                Entry::Missing => {
                    tracing::warn!(path = %path.display(), "couldn't find include target");
                }
            }
        }
    }
}

impl Expand<'_> {
    fn push_file(&mut self, path: &Path, base: PathBuf) {
        match self.fs.read_lines(path) {
            Ok(lines) => self.frames.push(Frame {
                base,
                lines: Box::new(lines.into_iter()),
            }),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "couldn't read include target");
            }
        }
    }
}
