//! Command-line interface implementation for git-ignore.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for git-ignore.
#[derive(Parser, Debug)]
#[command(author, version, about = "git-ignore: .gitignore generator", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a configuration file (JSON or YAML)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Subcommands supported by git-ignore.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Gets a list of all possible gitignore options
    List,

    /// Generates a .gitignore file from the given options
    Generate {
        /// Options to include, exactly as returned by `list`
        #[arg(value_name = "OPTION")]
        options: Vec<String>,

        /// Write the result to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Updates the local mirror and cache
    Update,

    /// Prints the current version of git-ignore
    Version,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if no subcommand is given
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::MissingSubcommand
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
