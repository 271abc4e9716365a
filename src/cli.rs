//! Command-line interface implementation for dirtemplate.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::io::Read;
use std::path::PathBuf;

use crate::{
    archive::create_archive,
    config::{load_config, merge_data, Config},
    dirtemplate::DirTemplate,
    error::{Error, Result},
    functions::FunctionTable,
};

/// Command-line arguments structure for dirtemplate.
#[derive(Parser, Debug)]
#[command(author, version, about = "dirtemplate: render a directory tree as a project template", long_about = None)]
pub struct Args {
    /// Path to the template directory or file
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Where the generated tree is written. Must not exist yet.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Configuration file (JSON or YAML) with data, skip paths and rename rules
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Template data as a JSON object. Overrides data from the config file.
    #[arg(long, value_name = "JSON")]
    pub context: Option<String>,

    /// Read template data as JSON from stdin
    #[arg(short, long, conflicts_with = "context")]
    pub stdin: bool,

    /// Left placeholder delimiter
    #[arg(long, value_name = "DELIM")]
    pub left_delim: Option<String>,

    /// Right placeholder delimiter
    #[arg(long, value_name = "DELIM")]
    pub right_delim: Option<String>,

    /// Path relative to the template root that is copied but not rendered.
    /// May be repeated. Files that are not valid UTF-8 (images, fonts,
    /// archives) must be skipped, otherwise rendering fails on them.
    #[arg(long = "skip", value_name = "PATH")]
    pub skip_paths: Vec<String>,

    /// Render undefined variables as empty strings instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Write a tar.gz archive of the generated output to this path
    #[arg(long, value_name = "FILE")]
    pub archive: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                if let Err(err) = print_usage() {
                    eprintln!("{e}");
                    eprintln!("Cannot print help: {err}");
                }
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}

/// Prints the short help shown when required arguments are missing.
pub fn print_usage() -> std::io::Result<()> {
    Args::command()
        .help_template(
            r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
        )
        .print_help()
}

/// Parses the `--context` argument.
pub fn parse_context(context: &str) -> Result<serde_json::Value> {
    serde_json::from_str(context)
        .map_err(|e| Error::ConfigError(format!("Failed to parse context as JSON: {e}")))
}

fn read_stdin_context() -> Result<serde_json::Value> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    parse_context(buffer.trim())
}

/// Builds the run configuration from the arguments and the optional config file.
/// Command-line values take precedence over the file.
pub fn build_config(args: &Args) -> Result<Config> {
    let data = match (&args.context, args.stdin) {
        (Some(context), _) => parse_context(context)?,
        (None, true) => read_stdin_context()?,
        (None, false) => serde_json::Value::Null,
    };

    let mut config = Config::new(&args.template, &args.output_dir)
        .with_functions(FunctionTable::with_case_helpers())
        .with_delimiters(
            args.left_delim.clone().unwrap_or_default(),
            args.right_delim.clone().unwrap_or_default(),
        )
        .lenient(args.lenient);
    config.skip_paths.extend(args.skip_paths.iter().cloned());
    config.data = merge_data(config.data, data);

    if let Some(config_path) = &args.config {
        config = config.merge_file(load_config(config_path)?);
    }
    Ok(config)
}

/// Runs generation and the optional archiving step.
pub fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    let output_dir = config.destination.clone();

    DirTemplate::new(config).execute()?;

    if let Some(archive) = &args.archive {
        create_archive(&output_dir, archive)?;
        println!("Archive written to {}.", archive.display());
    }

    println!("Template generation completed successfully in {}.", output_dir.display());
    Ok(())
}
