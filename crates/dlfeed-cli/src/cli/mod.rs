//! CLI for the dlfeed live-update client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dlfeed_core::config::{self, DlfeedConfig, TransportKind};

use commands::{run_forget, run_positions, run_submit, run_sweep, run_watch};

/// Top-level CLI for dlfeed.
#[derive(Debug, Parser)]
#[command(name = "dlfeed")]
#[command(about = "dlfeed: follow a media-download service from the terminal", long_about = None)]
pub struct Cli {
    /// Override the configured server URL.
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Override the configured live channel.
    #[arg(long, global = true, value_enum)]
    pub transport: Option<TransportArg>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    Sse,
    Websocket,
}

impl From<TransportArg> for TransportKind {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Sse => TransportKind::Sse,
            TransportArg::Websocket => TransportKind::Websocket,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Follow the live channel and print job updates until Ctrl-C.
    Watch {
        /// Do not ask the server for the recent list on startup.
        #[arg(long)]
        no_recent: bool,
    },

    /// Submit a download request.
    Submit {
        /// Media page or direct URL.
        url: String,
        /// Re-encode the audio to Opus.
        #[arg(long)]
        force_opus: bool,
        /// Use the external downloader on the server.
        #[arg(long)]
        yt_downloader: bool,
    },

    /// List stored playback positions.
    Positions,

    /// Evict stored positions older than the retention window.
    Sweep {
        /// Retention in days (defaults to the configured value).
        #[arg(long, value_name = "N")]
        days: Option<u64>,
    },

    /// Forget the stored position of one track.
    Forget {
        title: String,
        artist: String,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, cfg: &mut DlfeedConfig) {
        if let Some(server) = &self.server {
            cfg.server_url = server.clone();
        }
        if let Some(transport) = self.transport {
            cfg.transport = transport.into();
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cli.apply_overrides(&mut cfg);
        tracing::debug!("effective config: {:?}", cfg);

        match cli.command {
            CliCommand::Watch { no_recent } => run_watch(&cfg, !no_recent).await?,
            CliCommand::Submit {
                url,
                force_opus,
                yt_downloader,
            } => run_submit(&cfg, url, force_opus, yt_downloader).await?,
            CliCommand::Positions => run_positions().await?,
            CliCommand::Sweep { days } => run_sweep(&cfg, days).await?,
            CliCommand::Forget { title, artist } => run_forget(&title, &artist).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
