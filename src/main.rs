//! git-ignore's main application entry point.
//! Handles command-line argument parsing and dispatches each subcommand
//! to the client.

use std::path::Path;

use git_ignore::{
    cli::{get_args, Args, Command},
    client::Client,
    config::Settings,
    error::{default_error_handler, Result},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Off
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn write_file<P: AsRef<Path>>(content: &str, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest_path, content)?;
    Ok(())
}

fn build_client(config_path: Option<&Path>) -> Result<Client> {
    Settings::load(config_path)?.build_client()
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves settings from the configuration file and defaults
/// 2. Assembles the client from the configured providers
/// 3. Runs the requested subcommand
fn run(args: Args) -> Result<()> {
    let config_path = args.config.as_deref();

    match args.command {
        Command::Version => println!("{}", env!("CARGO_PKG_VERSION")),
        Command::List => {
            let options = build_client(config_path)?.list()?;
            println!("Options:");
            println!("{}", options.join(", "));
        }
        Command::Generate { options, output } => {
            let content = build_client(config_path)?.generate(&options)?;
            match output {
                Some(path) => {
                    write_file(&content, &path)?;
                    println!("Wrote '{}'.", path.display());
                }
                None => println!("{content}"),
            }
        }
        Command::Update => {
            build_client(config_path)?.update()?;
            println!("Update complete!");
        }
    }

    Ok(())
}
