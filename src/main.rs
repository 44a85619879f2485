use clap::{Parser, ValueEnum};
use dirstitch::fs_utils::ensure_directory;
use dirstitch::{ConcatConfig, concatenate, split};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;

const LONG_HELP: &str = r#"
Document format:
  Each included file becomes a section

      // File: <relative/path>
      <file content>

  preceded and followed by a newline. Split mode cuts the document on the
  "\n// File: " token and strips trailing whitespace from each file.

Filtering (concat mode):
  - names starting with '.' are skipped, including whole directories
  - <input>/.gitignore is honoured; without one (or if it only has comments)
    .git/, node_modules/, __pycache__/, *.pyc, venv/ and similar are skipped
  - only .py .js .ts .jsx .tsx .css .scss .html files are included unless
    --extensions says otherwise; a bare --extensions includes every extension

Examples:
  # Concatenate a project into one file
  dirstitch --mode concat --input my_project --output context.txt
  # Only Rust and TOML files
  dirstitch --mode concat -i my_project -o context.txt --extensions .rs toml
  # Every visible, non-ignored file
  dirstitch --mode concat -i my_project -o context.txt --extensions
  # Skip generated code
  dirstitch --mode concat -i my_project -o context.txt -x 'generated' -x '*.min.js'
  # Split a concatenated file back into a directory tree
  dirstitch --mode split --input context.txt --output restored/
"#;

/// Concatenate a directory into one annotated file for LLM context, or split it back.
#[derive(Parser, Debug)]
#[command(
    name = "dirstitch",
    version,
    about = "Concatenate or split directory files for LLM context.",
    after_long_help = LONG_HELP
)]
struct Cli {
    /// Operation mode
    #[arg(long, value_enum, value_name = "MODE")]
    mode: Mode,

    /// Input directory for concat mode, input file for split mode
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Output file for concat mode, output directory for split mode
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// Allowed file extensions (concat mode). Without values, disables the extension filter
    #[arg(short, long, value_name = "EXT", num_args = 0..)]
    extensions: Option<Vec<String>>,

    /// Exclude glob patterns (repeatable, concat mode). Patterns are relative to the input directory
    #[arg(short = 'x', long = "exclude", value_name = "GLOB", action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Ignore the input directory's .gitignore and use the built-in rules
    #[arg(long)]
    no_gitignore: bool,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum Mode {
    /// Concatenate a directory into a single file
    Concat,
    /// Split a concatenated file into a directory
    Split,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    init_logging(log_level);

    match cli.mode {
        Mode::Concat => {
            let config = match build_concat_config(&cli) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("{e}");
                    std::process::exit(2);
                }
            };
            run_concat(&cli, &config);
        }
        Mode::Split => run_split(&cli),
    }
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn build_concat_config(cli: &Cli) -> dirstitch::Result<ConcatConfig> {
    let mut config = ConcatConfig::default();
    if let Some(extensions) = &cli.extensions {
        config = config.with_extensions(extensions);
    }
    config.use_gitignore = !cli.no_gitignore;
    config.exclude = build_exclude_set(&cli.exclude)?;
    Ok(config)
}

fn build_exclude_set(patterns: &[String]) -> dirstitch::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(Some(builder.build()?))
}

fn run_concat(cli: &Cli, config: &ConcatConfig) {
    if let Err(e) = ensure_directory(&cli.input) {
        log::error!("Error reading input directory: {e}");
        return;
    }

    log::debug!(
        "Concatenating {} into {}",
        cli.input.display(),
        cli.output.display()
    );
    let _ = concatenate(&cli.input, Some(&cli.output), config);
}

fn run_split(cli: &Cli) {
    if cli.extensions.is_some() || !cli.exclude.is_empty() || cli.no_gitignore {
        log::warn!("--extensions, --exclude and --no-gitignore only apply to concat mode");
    }

    match split(&cli.input, &cli.output) {
        Ok(report) => {
            log::debug!(
                "Split complete: {} written, {} failed",
                report.written.len(),
                report.failed.len()
            );
        }
        Err(e) => log::error!("Error reading input file: {e}"),
    }
}
