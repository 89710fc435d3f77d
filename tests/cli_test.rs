use clap::Parser;
use git_ignore::cli::{Args, Command};
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("git-ignore")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_list_command() {
    let parsed = Args::try_parse_from(make_args(&["list"])).unwrap();

    assert_eq!(parsed.command, Command::List);
    assert!(!parsed.verbose);
    assert!(parsed.config.is_none());
}

#[test]
fn test_generate_options() {
    let parsed = Args::try_parse_from(make_args(&["generate", "C", "c++", "Python"])).unwrap();

    assert_eq!(
        parsed.command,
        Command::Generate {
            options: vec!["C".to_string(), "c++".to_string(), "Python".to_string()],
            output: None,
        }
    );
}

#[test]
fn test_generate_output_file() {
    let parsed =
        Args::try_parse_from(make_args(&["generate", "-o", ".gitignore", "Rust"])).unwrap();

    assert_eq!(
        parsed.command,
        Command::Generate {
            options: vec!["Rust".to_string()],
            output: Some(PathBuf::from(".gitignore")),
        }
    );
}

#[test]
fn test_generate_without_options_parses() {
    let parsed = Args::try_parse_from(make_args(&["generate"])).unwrap();

    assert_eq!(parsed.command, Command::Generate { options: vec![], output: None });
}

#[test]
fn test_global_flags() {
    let parsed =
        Args::try_parse_from(make_args(&["update", "--verbose", "--config", "git-ignore.yml"]))
            .unwrap();

    assert_eq!(parsed.command, Command::Update);
    assert!(parsed.verbose);
    assert_eq!(parsed.config, Some(PathBuf::from("git-ignore.yml")));
}

#[test]
fn test_short_flags() {
    let parsed = Args::try_parse_from(make_args(&["-v", "-c", "config.json", "version"])).unwrap();

    assert_eq!(parsed.command, Command::Version);
    assert!(parsed.verbose);
    assert_eq!(parsed.config, Some(PathBuf::from("config.json")));
}

#[test]
fn test_missing_subcommand() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_unknown_subcommand() {
    assert!(Args::try_parse_from(make_args(&["remove", "C"])).is_err());
}
