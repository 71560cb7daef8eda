//! CLI parse tests.

use super::{Cli, CliCommand, TransportArg};
use clap::Parser;
use dlfeed_core::config::{DlfeedConfig, TransportKind};

pub(super) fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

mod subcommands;
