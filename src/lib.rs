//! Declarative Linux workstation provisioning engine.
//!
//! Given a JSON manifest of packages (system repositories, pip,
//! desktop-environment extensions) and a list of dotfile packages to stow
//! into the home directory, the engine installs everything idempotently on
//! Debian- and RHEL-family systems alike.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]** — parse the JSON input files
//! - **[`units`]** — self-contained, idempotent install units (packages,
//!   extensions, symlink farms)
//! - **[`tasks`]** — named provisioning steps wired to units
//! - **[`commands`]** — top-level subcommand orchestration

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod fsutil;
pub mod logging;
pub mod net;
pub mod pathscope;
pub mod platform;
pub mod tasks;
pub mod units;
