//! Configuration loading: the JSON input files and the asset directory.
pub mod credentials;
pub mod ides;
pub mod ini;
pub mod manifest;
pub mod stow;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::GlobalOpts;

/// All loaded configuration for one provisioning run.
#[derive(Debug)]
pub struct Config {
    /// Repository root; stow packages live directly beneath it.
    pub root: PathBuf,
    /// Directory holding the default input files and static assets.
    pub assets_dir: PathBuf,
    pub manifest: manifest::Manifest,
    pub stow_packages: Vec<String>,
    pub ides: Vec<ides::IdeSpec>,
    pub credentials: Vec<credentials::CredentialAttachment>,
    /// Keyfile of dconf settings to load.
    pub gsettings_path: PathBuf,
    /// Remote URL to set as the repository origin, if configured.
    pub origin_url: Option<String>,
}

impl Config {
    /// Load all configuration for a run rooted at `root`, honoring any file
    /// overrides from the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is missing or any input file fails
    /// to parse.
    pub fn load(root: &Path, opts: &GlobalOpts) -> Result<Self> {
        let assets_dir = root.join("assets");

        let packages_path = opts
            .packages
            .clone()
            .unwrap_or_else(|| assets_dir.join("packages.json"));
        let stow_path = opts
            .stow
            .clone()
            .unwrap_or_else(|| assets_dir.join("stow.json"));
        let ides_path = opts
            .ides
            .clone()
            .unwrap_or_else(|| assets_dir.join("ides.json"));
        let gsettings_path = opts
            .gsettings
            .clone()
            .unwrap_or_else(|| assets_dir.join("gsettings.conf"));

        let manifest = manifest::load(&packages_path).context("loading package manifest")?;
        let stow_packages = stow::load(&stow_path).context("loading stow list")?;
        let ides = ides::load(&ides_path).context("loading IDE list")?;
        let credentials = credentials::load(&assets_dir.join("credentials.json"))
            .context("loading credential list")?;

        Ok(Self {
            root: root.to_path_buf(),
            assets_dir,
            manifest,
            stow_packages,
            ides,
            credentials,
            gsettings_path,
            origin_url: opts.origin.clone(),
        })
    }

    /// Source directory for the given stow package.
    #[must_use]
    pub fn stow_package_dir(&self, package: &str) -> PathBuf {
        self.root.join(package)
    }
}
