mod cli;

use pbag::bag::{PropertyBag, PropertyTree};
use pbag::source::{DiskFs, FileSystem};
use std::path::{Path, PathBuf};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("PBAG_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Can't resolve -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Can't change work directory to {}\n{}", cwd.display(), err);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Get(get_cli) => get(get_cli),
        cli::Command::Dump(dump_cli) => dump(dump_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
    }
}

pub fn get(cli: cli::GetCommand) -> anyhow::Result<()> {
    let tree = load(&cli.input)?;

    let mut bag = tree.root();
    for segment in cli.path.split('.') {
        bag = bag.get(segment).ok_or_else(|| {
            anyhow::anyhow!("no property {:?} while walking {:?}", segment, cli.path)
        })?;
    }

    output(&cli.output, bag)?;
    Ok(())
}

pub fn dump(cli: cli::DumpCommand) -> anyhow::Result<()> {
    let tree = load(&cli.input)?;
    output(&cli.output, tree.root())?;
    Ok(())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<PropertyTree> {
    let tree = match &input.file {
        Some(path) => pbag::document::parse_file(&DiskFs, path)?,
        None => {
            let stdin = std::io::read_to_string(std::io::stdin())?;
            pbag::document::parse_lines(
                &DiskFs,
                Path::new("."),
                stdin.lines().map(str::to_string),
            )?
        }
    };

    Ok(tree)
}

fn output(output: &cli::OutputArgs, bag: PropertyBag<'_>) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), &bag)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), &bag)?,
    };

    Ok(())
}

/// (pbag-)developer utilities
///
/// A quick way to expose pipeline stages for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    match cli.command {
        Lines => {
            let fs = DiskFs;
            let (base_dir, lines) = read_input(&cli.input)?;
            let expanded = pbag::source::expand_includes(&fs, &base_dir, lines);
            let normalized =
                pbag::source::strip_empty_lines(pbag::source::strip_comments(expanded));
            for line in normalized {
                println!("{line}");
            }
        }
        Tree => {
            let tree = load(&cli.input)?;
            println!("{tree:#?}");
        }
    }

    Ok(())
}

fn read_input(input: &cli::InputArgs) -> anyhow::Result<(PathBuf, Vec<String>)> {
    match &input.file {
        Some(path) => {
            let lines = DiskFs.read_lines(path)?;
            let base_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
            Ok((base_dir, lines))
        }
        None => {
            let stdin = std::io::read_to_string(std::io::stdin())?;
            Ok((
                PathBuf::from("."),
                stdin.lines().map(str::to_string).collect(),
            ))
        }
    }
}
