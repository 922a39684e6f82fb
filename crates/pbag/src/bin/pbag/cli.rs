//! pbag cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory before doing anything else
    ///
    /// Equivalent to running { cd <directory>; pbag ... }. May be given
    /// multiple times; every path along the way must exist.
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up a property by dotted path
    ///
    /// Reads the document from stdin unless a file is given (via --input-file).
    /// Lookups fall back through inherited bases.
    #[command(alias = "g")]
    Get(GetCommand),

    /// Print the whole property tree
    Dump(DumpCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct GetCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Property path, segments separated by dots (e.g. "monsters.rat.hp")
    pub path: String,
}

#[derive(Parser, Debug)]
pub struct DumpCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Load a file
    ///
    /// Includes resolve relative to the file; for stdin they resolve
    /// relative to the work directory.
    #[clap(short = 'f', long = "input-file")]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// The line stream after include expansion and normalization
    Lines,
    /// The parsed property tree, debug-printed
    Tree,
}
