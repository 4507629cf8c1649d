//! Credential-vault sync: export vault attachments and secure SSH keys.
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context as _, Result};

use super::{Task, TaskResult};
use crate::context::Context;
use crate::error::ProvisionError;
use crate::fsutil;

/// Policy switch for the whole credential step. Off until the vault export
/// flow is trusted enough to run unattended.
const VAULT_SYNC_ENABLED: bool = false;

/// Export configured attachments from the KeePassXC database into the
/// filesystem, then lock down and agent-load the private SSH keys.
pub struct SyncCredentials;

impl Task for SyncCredentials {
    fn name(&self) -> &str {
        "Sync credentials"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        VAULT_SYNC_ENABLED
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if !ctx.executor.which("keepassxc-cli") {
            return Err(ProvisionError::ToolNotFound("keepassxc-cli".to_string()).into());
        }

        let database = ctx.home.join("pw.kdbx");
        let database_str = database.display().to_string();
        let password = read_password(&database_str)?;

        // Verify the password once up front instead of failing mid-export.
        ctx.executor
            .run_with_input("keepassxc-cli", &["ls", &database_str], &password)
            .context("unlocking the credential database")?;

        for attachment in &ctx.config.credentials {
            let mut dest = fsutil::expand_tilde(&attachment.dest, &ctx.home);
            if dest.is_dir() {
                dest = dest.join(&attachment.name);
            }
            ctx.log.info(&format!(
                "exporting {}/{} to {}",
                attachment.entry,
                attachment.name,
                dest.display()
            ));
            fsutil::ensure_parent_dir(&dest)?;
            let dest_str = dest.display().to_string();
            ctx.executor
                .run_with_input(
                    "keepassxc-cli",
                    &[
                        "attachment-export",
                        &database_str,
                        &attachment.entry,
                        &attachment.name,
                        &dest_str,
                    ],
                    &password,
                )
                .with_context(|| format!("exporting attachment {}", attachment.name))?;
        }

        secure_ssh_keys(ctx)?;
        Ok(TaskResult::Ok)
    }
}

/// Prompt for the database password on the controlling terminal.
fn read_password(database: &str) -> Result<String> {
    eprint!("Password for {database}: ");
    std::io::stderr().flush().ok();
    let mut password = String::new();
    std::io::stdin()
        .read_line(&mut password)
        .context("reading password from stdin")?;
    Ok(password.trim_end_matches('\n').to_string())
}

/// `chmod 600` every private key in `~/.ssh` and add them to the agent.
///
/// Private keys are the `id_*` files without a `.pub` suffix.
fn secure_ssh_keys(ctx: &Context) -> Result<()> {
    let ssh_dir = ctx.home.join(".ssh");
    let keys = private_key_paths(&ssh_dir)?;
    if keys.is_empty() {
        ctx.log.debug("no private keys found in ~/.ssh");
        return Ok(());
    }

    ctx.log
        .info(&format!("securing {} SSH keys", keys.len()));
    for key in &keys {
        ctx.executor
            .run("chmod", &["600", key])
            .with_context(|| format!("locking down {key}"))?;
    }

    let mut args = Vec::with_capacity(keys.len());
    args.extend(keys.iter().map(String::as_str));
    ctx.executor
        .run("ssh-add", &args)
        .context("adding keys to the SSH agent")?;
    Ok(())
}

/// List `id_*` files in `dir` that are not `.pub` public halves.
fn private_key_paths(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut keys = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_file()
            && name.starts_with("id_")
            && path.extension().and_then(std::ffi::OsStr::to_str) != Some("pub")
        {
            keys.push(path.display().to_string());
        }
    }
    keys.sort();
    Ok(keys)
}
