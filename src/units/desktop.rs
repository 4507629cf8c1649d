//! Desktop-environment packages and downloaded extensions.
use std::path::Path;

use anyhow::{Context as _, Result, bail};

use crate::config::manifest::DesktopSection;
use crate::context::Context;
use crate::error::ProvisionError;
use crate::fsutil;
use crate::net;
use crate::platform::{DesktopEnvironment, DesktopSet, PackageManagerKind};
use crate::units::system::SystemPackages;

/// A remote extension archive plus the metadata needed to install it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    /// Extension type passed to the installer tool (`plasmoid`, `effect`, …).
    pub kind: String,
    /// Archive URL.
    pub url: String,
}

/// GNOME sub-unit: system packages plus shell-extension archives.
#[derive(Debug)]
pub struct GnomeUnit {
    packages: SystemPackages,
    extensions: Vec<String>,
}

impl GnomeUnit {
    fn install(&self, ctx: &Context) -> Result<()> {
        self.packages.install(ctx)?;

        if self.extensions.is_empty() {
            return Ok(());
        }
        if !ctx.executor.which("gnome-extensions") {
            return Err(ProvisionError::ToolNotFound("gnome-extensions".to_string()).into());
        }

        for url in &self.extensions {
            ctx.log.info(&format!("installing GNOME extension {url}"));
            // TempDir guarantees scratch cleanup on every exit path.
            let scratch = tempfile::tempdir().context("creating scratch directory")?;
            let archive = scratch.path().join("extension.zip");
            net::download(url, &archive)?;
            let archive_str = archive.display().to_string();
            ctx.executor
                .run("gnome-extensions", &["install", "--force", &archive_str])
                .with_context(|| format!("installing GNOME extension from {url}"))?;
        }
        Ok(())
    }
}

/// KDE sub-unit: system packages plus typed extension archives.
#[derive(Debug)]
pub struct KdeUnit {
    packages: SystemPackages,
    extensions: Vec<ExtensionDescriptor>,
}

impl KdeUnit {
    fn install(&self, ctx: &Context) -> Result<()> {
        self.packages.install(ctx)?;

        if self.extensions.is_empty() {
            return Ok(());
        }
        if !ctx.executor.which("kpackagetool5") {
            return Err(ProvisionError::ToolNotFound("kpackagetool5".to_string()).into());
        }

        for descriptor in &self.extensions {
            ctx.log.info(&format!(
                "installing KDE {} extension {}",
                descriptor.kind, descriptor.url
            ));
            let scratch = tempfile::tempdir().context("creating scratch directory")?;
            let archive = scratch.path().join("extension.tar.gz");
            net::download(&descriptor.url, &archive)?;

            let unpack_dir = scratch.path().join("extension");
            std::fs::create_dir(&unpack_dir).context("creating unpack directory")?;
            unpack_tar_gz(&archive, &unpack_dir)
                .with_context(|| format!("unpacking {}", descriptor.url))?;

            // kpackagetool expects the directory holding metadata.desktop.
            let Some(metadata) = fsutil::find_file(&unpack_dir, "metadata.desktop") else {
                bail!("no metadata.desktop found in {}", descriptor.url);
            };
            let package_dir = metadata.parent().unwrap_or(&unpack_dir);
            let package_dir_str = package_dir.display().to_string();
            ctx.executor
                .run(
                    "kpackagetool5",
                    &["--type", &descriptor.kind, "--install", &package_dir_str],
                )
                .with_context(|| format!("installing KDE extension from {}", descriptor.url))?;
        }
        Ok(())
    }
}

/// Per-environment packages and extensions, present only for the desktop
/// environments detected at construction time.
///
/// GNOME and KDE are independent optional sub-units, not a flag pair: a
/// session may be both at once, and each sub-unit installs on its own.
#[derive(Debug, Default)]
pub struct DesktopUnit {
    gnome: Option<GnomeUnit>,
    kde: Option<KdeUnit>,
}

impl DesktopUnit {
    /// Build the unit from the manifest's desktop section, keeping only the
    /// sub-units for detected environments.
    #[must_use]
    pub fn from_manifest(
        section: &DesktopSection,
        desktops: DesktopSet,
        manager: PackageManagerKind,
    ) -> Self {
        let gnome = desktops
            .contains(DesktopEnvironment::Gnome)
            .then(|| GnomeUnit {
                packages: SystemPackages::from_lists(&section.gnome.packages, manager),
                extensions: section.gnome.extensions.clone(),
            });

        let kde = desktops.contains(DesktopEnvironment::Kde).then(|| KdeUnit {
            packages: SystemPackages::from_lists(&section.kde.packages, manager),
            extensions: section
                .kde
                .extensions
                .iter()
                .flat_map(|(kind, urls)| {
                    urls.iter().map(|url| ExtensionDescriptor {
                        kind: kind.clone(),
                        url: url.clone(),
                    })
                })
                .collect(),
        });

        Self { gnome, kde }
    }

    #[must_use]
    pub const fn has_gnome(&self) -> bool {
        self.gnome.is_some()
    }

    #[must_use]
    pub const fn has_kde(&self) -> bool {
        self.kde.is_some()
    }

    /// Install the sub-units, GNOME before KDE. A failure in GNOME stops the
    /// unit before KDE starts; a completed GNOME install is never undone by
    /// a later KDE failure.
    ///
    /// # Errors
    ///
    /// Propagates the first sub-unit failure.
    pub fn install(&self, ctx: &Context) -> Result<()> {
        if let Some(gnome) = &self.gnome {
            gnome.install(ctx)?;
        }
        if let Some(kde) = &self.kde {
            kde.install(ctx)?;
        }
        Ok(())
    }
}

/// Unpack a gzip-compressed tarball into `dest`.
fn unpack_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(archive)
        .with_context(|| format!("opening {}", archive.display()))?;
    let decoder = flate2::read::GzDecoder::new(file);
    tar::Archive::new(decoder)
        .unpack(dest)
        .with_context(|| format!("extracting into {}", dest.display()))?;
    Ok(())
}
