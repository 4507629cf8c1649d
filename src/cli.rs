use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the provisioning engine.
#[derive(Parser, Debug)]
#[command(
    name = "provision",
    about = "Declarative Linux workstation provisioning engine",
    after_help = "Supports Debian and RHEL based systems alike, \
                  given an appropriate packages file.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// JSON file specifying which packages to install (default: assets/packages.json)
    #[arg(short, long, global = true)]
    pub packages: Option<PathBuf>,

    /// JSON file listing the dotfile packages to stow (default: assets/stow.json)
    #[arg(short, long, global = true)]
    pub stow: Option<PathBuf>,

    /// JSON file listing the IDEs to install (default: assets/ides.json)
    #[arg(short, long, global = true)]
    pub ides: Option<PathBuf>,

    /// Keyfile of dconf settings to load (default: assets/gsettings.conf)
    #[arg(short = 'c', long, global = true)]
    pub gsettings: Option<PathBuf>,

    /// Override the repository root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Remote URL to set as the repository origin
    #[arg(long, global = true)]
    pub origin: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full provisioning sequence
    Install,
    /// Print version information
    Version,
}
