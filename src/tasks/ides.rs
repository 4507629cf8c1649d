//! JetBrains-style IDE installation from tar archives.
use std::path::Path;

use anyhow::{Context as _, Result};

use super::{Task, TaskResult};
use crate::config::ides::IdeSpec;
use crate::context::Context;
use crate::error::ProvisionError;
use crate::fsutil;
use crate::net;

/// Install every IDE from the descriptor list.
pub struct InstallIdes;

impl Task for InstallIdes {
    fn name(&self) -> &str {
        "Install IDEs"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.ides.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        for spec in &ctx.config.ides {
            install_ide(ctx, spec)
                .with_context(|| format!("installing IDE {}", spec.display_name()))?;
        }
        Ok(TaskResult::Ok)
    }
}

/// What to do about the IDE's archive, given the descriptor and the install root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchivePlan {
    /// Fetch the archive and (re)populate the install root.
    Download,
    /// The root exists and overwrite is off: keep it, warn about the URL.
    SkipExisting,
    /// No URL; the pre-existing root is the installation.
    UseExisting,
}

/// Decide the archive action. Download-or-reuse semantics are keyed by the
/// overwrite flag; a spec with neither URL nor existing root is an error.
fn plan_archive(
    url: Option<&str>,
    root: &Path,
    overwrite: bool,
) -> Result<ArchivePlan, ProvisionError> {
    let root_exists = root.exists();
    match (url, root_exists, overwrite) {
        (Some(_), false, _) | (Some(_), true, true) => Ok(ArchivePlan::Download),
        (Some(_), true, false) => Ok(ArchivePlan::SkipExisting),
        (None, true, _) => Ok(ArchivePlan::UseExisting),
        (None, false, _) => Err(ProvisionError::MissingInstallRoot(root.to_path_buf())),
    }
}

fn install_ide(ctx: &Context, spec: &IdeSpec) -> Result<()> {
    let root = spec.install_root(&ctx.home);
    ctx.log.info(&format!(
        "installing IDE {} into {}",
        spec.display_name(),
        root.display()
    ));

    match plan_archive(spec.url.as_deref(), &root, spec.overwrite)? {
        ArchivePlan::Download => {
            let url = spec
                .url
                .as_deref()
                .context("archive download planned without a URL")?;
            fetch_and_unpack(ctx, url, &root)?;
        }
        ArchivePlan::SkipExisting => {
            ctx.log.warn(&format!(
                "{} exists and overwrite is off; skipping download",
                root.display()
            ));
        }
        ArchivePlan::UseExisting => {}
    }

    link_ide_files(ctx, spec, &root)?;
    write_desktop_entry(ctx, spec)?;
    Ok(())
}

/// Download the tar archive into a scratch directory, unpack it, and copy
/// the archive's top-level directory into a freshly cleaned install root.
fn fetch_and_unpack(ctx: &Context, url: &str, root: &Path) -> Result<()> {
    if root.exists() {
        std::fs::remove_dir_all(root)
            .with_context(|| format!("clearing {}", root.display()))?;
    }
    std::fs::create_dir_all(root)
        .with_context(|| format!("creating {}", root.display()))?;

    let scratch = tempfile::tempdir().context("creating scratch directory")?;
    let archive = scratch.path().join("ide.tar.gz");
    net::download(url, &archive)?;

    ctx.log.debug(&format!("unpacking {url}"));
    let unpacked = scratch.path().join("unpacked");
    std::fs::create_dir(&unpacked).context("creating unpack directory")?;
    let file = std::fs::File::open(&archive)
        .with_context(|| format!("opening {}", archive.display()))?;
    tar::Archive::new(flate2::read::GzDecoder::new(file))
        .unpack(&unpacked)
        .with_context(|| format!("extracting {url}"))?;

    // The archive wraps everything in one top-level folder.
    let top_level = std::fs::read_dir(&unpacked)
        .context("reading unpacked archive")?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .find(|path| path.is_dir())
        .with_context(|| format!("no top-level directory in archive from {url}"))?;
    fsutil::copy_dir_recursive(&top_level, root)
}

/// Force-link the IDE launcher and icon into the user's local prefix.
fn link_ide_files(ctx: &Context, spec: &IdeSpec, root: &Path) -> Result<()> {
    let bin_dir = ctx.home.join(".local/bin");
    let icon_dir = ctx.home.join(".local/share/icons");
    std::fs::create_dir_all(&bin_dir).context("creating ~/.local/bin")?;
    std::fs::create_dir_all(&icon_dir).context("creating ~/.local/share/icons")?;

    let launcher = root.join("bin").join(&spec.name);
    let icon = root.join("bin").join(format!("{}.svg", spec.name));
    force_symlink(&launcher, &bin_dir.join(&spec.name))?;
    force_symlink(&icon, &icon_dir.join(format!("{}.svg", spec.name)))?;
    Ok(())
}

/// Replace whatever is at `link` with a symlink to `source`.
fn force_symlink(source: &Path, link: &Path) -> Result<()> {
    fsutil::remove_existing(link)?;
    std::os::unix::fs::symlink(source, link).with_context(|| {
        format!("linking {} -> {}", link.display(), source.display())
    })?;
    Ok(())
}

/// Render the freedesktop `.desktop` entry for an IDE.
fn render_desktop_entry(spec: &IdeSpec, home: &Path) -> String {
    let home = home.display();
    let name = &spec.name;
    let long_name = spec.display_name();
    let mime_types = spec.mime_types.join(";");
    let categories = spec.categories.join(";");
    format!(
        "#!/usr/bin/env xdg-open\n\n\
         [Desktop Entry]\n\
         Version=1.0\n\n\
         Type=Application\n\n\
         Name={long_name}\n\
         MimeType={mime_types}\n\
         Categories=TextEditor;Development;IDE;Debugger;{categories}\n\
         Comment=Start {long_name}\n\
         Keywords=Programming;JetBrains\n\n\
         Exec={home}/.local/bin/{name}\n\
         Icon={home}/.local/share/icons/{name}.svg\n\
         Terminal=false\n\n\
         StartupWMClass={name}\n\
         StartupNotify=true\n"
    )
}

fn write_desktop_entry(ctx: &Context, spec: &IdeSpec) -> Result<()> {
    let applications = ctx.home.join(".local/share/applications");
    std::fs::create_dir_all(&applications).context("creating applications directory")?;
    let path = applications.join(format!("{}.desktop", spec.name));
    std::fs::write(&path, render_desktop_entry(spec, &ctx.home))
        .with_context(|| format!("writing {}", path.display()))?;
    ctx.log.debug(&format!("wrote {}", path.display()));
    Ok(())
}
