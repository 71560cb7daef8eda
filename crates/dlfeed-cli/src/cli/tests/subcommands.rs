use super::parse;
use crate::cli::CliCommand;

#[test]
fn cli_parse_watch() {
    match parse(&["dlfeed", "watch"]) {
        CliCommand::Watch { no_recent } => assert!(!no_recent),
        _ => panic!("expected Watch"),
    }
    match parse(&["dlfeed", "watch", "--no-recent"]) {
        CliCommand::Watch { no_recent } => assert!(no_recent),
        _ => panic!("expected Watch --no-recent"),
    }
}

#[test]
fn cli_parse_submit_defaults() {
    match parse(&["dlfeed", "submit", "https://example.com/v?id=1"]) {
        CliCommand::Submit {
            url,
            force_opus,
            yt_downloader,
        } => {
            assert_eq!(url, "https://example.com/v?id=1");
            assert!(!force_opus);
            assert!(!yt_downloader);
        }
        _ => panic!("expected Submit"),
    }
}

#[test]
fn cli_parse_submit_flags() {
    match parse(&[
        "dlfeed",
        "submit",
        "https://example.com/v",
        "--force-opus",
        "--yt-downloader",
    ]) {
        CliCommand::Submit {
            force_opus,
            yt_downloader,
            ..
        } => {
            assert!(force_opus);
            assert!(yt_downloader);
        }
        _ => panic!("expected Submit with flags"),
    }
}

#[test]
fn cli_parse_positions() {
    assert!(matches!(
        parse(&["dlfeed", "positions"]),
        CliCommand::Positions
    ));
}

#[test]
fn cli_parse_sweep() {
    match parse(&["dlfeed", "sweep"]) {
        CliCommand::Sweep { days } => assert!(days.is_none()),
        _ => panic!("expected Sweep"),
    }
    match parse(&["dlfeed", "sweep", "--days", "3"]) {
        CliCommand::Sweep { days } => assert_eq!(days, Some(3)),
        _ => panic!("expected Sweep --days"),
    }
}

#[test]
fn cli_parse_forget() {
    match parse(&["dlfeed", "forget", "Some Song", "The Band"]) {
        CliCommand::Forget { title, artist } => {
            assert_eq!(title, "Some Song");
            assert_eq!(artist, "The Band");
        }
        _ => panic!("expected Forget"),
    }
}

#[test]
fn cli_rejects_missing_arguments() {
    use clap::Parser;
    assert!(crate::cli::Cli::try_parse_from(["dlfeed", "submit"]).is_err());
    assert!(crate::cli::Cli::try_parse_from(["dlfeed", "forget", "only-title"]).is_err());
    assert!(crate::cli::Cli::try_parse_from(["dlfeed", "sweep", "--days", "x"]).is_err());
}
