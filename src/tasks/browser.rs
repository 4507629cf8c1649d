//! Browser configuration: Thunderbird policies and the Firefox profile.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use super::{Task, TaskResult};
use crate::config::ini::{self, KvSection};
use crate::context::Context;
use crate::fsutil;
use crate::units::StowTarget;

/// Install Thunderbird policy files and Firefox autoconfig/profile assets.
pub struct ConfigureBrowsers;

impl Task for ConfigureBrowsers {
    fn name(&self) -> &str {
        "Configure browsers"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.assets_dir.join("thunderbird").is_dir()
            || ctx.config.assets_dir.join("firefox").is_dir()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.config.assets_dir.join("thunderbird").is_dir() {
            install_thunderbird(ctx).context("installing Thunderbird config")?;
        }
        if ctx.config.assets_dir.join("firefox").is_dir() {
            install_firefox(ctx).context("installing Firefox config")?;
        }
        Ok(TaskResult::Ok)
    }
}

/// Copy `policies.json` into the system-wide Thunderbird policy directory.
fn install_thunderbird(ctx: &Context) -> Result<()> {
    ctx.log.info("installing Thunderbird policies");
    let policies = ctx.config.assets_dir.join("thunderbird/policies.json");
    let policies_str = policies.display().to_string();

    // System directories: delegate to sudo instead of running the whole
    // engine as root.
    ctx.executor
        .run("sudo", &["mkdir", "-p", "/etc/thunderbird/policies"])?;
    ctx.executor.run(
        "sudo",
        &["cp", &policies_str, "/etc/thunderbird/policies/policies.json"],
    )?;
    Ok(())
}

fn install_firefox(ctx: &Context) -> Result<()> {
    ctx.log.info("installing Firefox config");

    install_autoconfig(ctx)?;

    let (profile_name, profile_path) = default_release_profile(&ctx.home)?;
    install_profile_assets(ctx, &profile_path)?;
    reset_startup_cache(ctx, &profile_name)?;
    Ok(())
}

/// Copy the `userChrome.js` loader files into the Firefox program directory.
fn install_autoconfig(ctx: &Context) -> Result<()> {
    let program_dir = firefox_program_dir()?;
    let program_dir_str = program_dir.display().to_string();
    let autoconfig = ctx.config.assets_dir.join("firefox/autoconfig");
    let defaults = autoconfig.join("defaults").display().to_string();
    let config_js = autoconfig.join("config.js").display().to_string();

    ctx.executor
        .run("sudo", &["cp", "-r", &defaults, &program_dir_str])?;
    ctx.executor
        .run("sudo", &["cp", &config_js, &program_dir_str])?;
    Ok(())
}

/// Locate the Firefox program directory by looking for the binary.
fn firefox_program_dir() -> Result<PathBuf> {
    for lib in ["lib", "lib64"] {
        let program_dir = PathBuf::from(format!("/usr/{lib}/firefox"));
        if program_dir.join("firefox").is_file() {
            return Ok(program_dir);
        }
    }
    bail!("Firefox program directory not found under /usr/lib or /usr/lib64");
}

/// Resolve the `default-release` profile from `profiles.ini`.
///
/// Returns the profile's directory name and its absolute path.
fn default_release_profile(home: &Path) -> Result<(String, PathBuf)> {
    let profiles_ini = home.join(".mozilla/firefox/profiles.ini");
    let sections = ini::parse_kv_sections(&profiles_ini)
        .with_context(|| format!("parsing {}", profiles_ini.display()))?;
    let name = find_profile_path(&sections)
        .context("no default-release profile in profiles.ini")?;
    let path = home.join(".mozilla/firefox").join(&name);
    Ok((name, path))
}

/// Pick the `Path` of the section whose `Name` is `default-release`.
fn find_profile_path(sections: &[KvSection]) -> Option<String> {
    sections
        .iter()
        .find(|section| section.get("Name") == Some("default-release"))
        .and_then(|section| section.get("Path"))
        .map(String::from)
}

/// Symlink `user.js` and stow the `chrome/` assets into the profile.
fn install_profile_assets(ctx: &Context, profile_path: &Path) -> Result<()> {
    let user_js_src = ctx.config.assets_dir.join("firefox/profile/user.js");
    let user_js_dest = profile_path.join("user.js");
    fsutil::remove_existing(&user_js_dest)?;
    std::os::unix::fs::symlink(&user_js_src, &user_js_dest).with_context(|| {
        format!(
            "linking {} -> {}",
            user_js_dest.display(),
            user_js_src.display()
        )
    })?;

    let chrome_src = ctx.config.assets_dir.join("firefox/profile/chrome");
    let chrome_dest = profile_path.join("chrome");
    std::fs::create_dir_all(&chrome_dest).context("creating chrome directory")?;
    StowTarget::new(chrome_src, chrome_dest).install(ctx)?;
    Ok(())
}

/// Clear and recreate the profile's startup cache so chrome changes load.
fn reset_startup_cache(ctx: &Context, profile_name: &str) -> Result<()> {
    let cache = ctx
        .home
        .join(".cache/mozilla/firefox")
        .join(profile_name)
        .join("startupCache");
    let _ = std::fs::remove_dir_all(&cache);
    std::fs::create_dir_all(&cache)
        .with_context(|| format!("recreating {}", cache.display()))?;
    Ok(())
}
