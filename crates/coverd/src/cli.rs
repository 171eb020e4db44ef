//! Clap derive structures for the `coverd` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// coverd -- drive a motorized cover from button events
#[derive(Debug, Parser)]
#[command(
    name = "coverd",
    version,
    about = "Drive a motorized cover from button events",
    long_about = "Turns virtual button and BTHome remote presses into guarded\n\
        open/close/stop/slat commands for one cover on a Shelly Gen2 device.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file path (defaults to the platform config dir)
    #[arg(long, env = "COVERD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Device URL or host (overrides config)
    #[arg(long, short = 'd', env = "COVERD_DEVICE", global = true)]
    pub device: Option<String>,

    /// Cover component id (overrides config)
    #[arg(long, global = true)]
    pub cover_id: Option<u32>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Provision, then route button events until interrupted
    Run(RunArgs),

    /// Reconcile virtual components once and print the result
    Reconcile,

    /// Show the current cover status
    Status,

    /// Fire a button event on a peer device
    Trigger(TriggerArgs),

    /// Inspect and initialize the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Log every inbound event
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Args)]
pub struct TriggerArgs {
    /// Peer device host or URL
    pub peer: String,

    /// Input id on the peer
    pub input: String,

    /// Event type to emit
    #[arg(default_value = "single_push")]
    pub event: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file location
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }
}
