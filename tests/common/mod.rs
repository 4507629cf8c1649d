// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed test repository, a fluent builder,
// and a recording executor so each integration test can set up an isolated
// environment without repeating boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use provision_cli::config::Config;
use provision_cli::context::Context;
use provision_cli::exec::{ExecResult, Executor};
use provision_cli::logging::Logger;
use provision_cli::platform::{DesktopSet, PackageManagerKind};

/// Write the minimal set of input files required by the engine into `root`.
///
/// Creates:
/// - `assets/packages.json` — empty manifest
/// - `assets/stow.json`     — empty stow list
/// - `assets/ides.json`     — empty IDE list
pub fn setup_minimal_repo(root: &Path) {
    let assets = root.join("assets");
    std::fs::create_dir_all(&assets).expect("create assets dir");
    std::fs::write(assets.join("packages.json"), "{}").expect("write packages.json");
    std::fs::write(assets.join("stow.json"), "[]").expect("write stow.json");
    std::fs::write(assets.join("ides.json"), "[]").expect("write ides.json");
}

/// An isolated test repository backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory containing the test repository.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with a minimal but valid repository structure.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        setup_minimal_repo(root.path());
        Self { root }
    }

    /// Canonicalized path to the repository root.
    pub fn root_path(&self) -> PathBuf {
        self.root.path().canonicalize().expect("canonicalize root")
    }

    /// Load configuration with default file locations.
    pub fn load_config(&self) -> Config {
        Config::load(&self.root_path(), &provision_cli::cli::GlobalOpts::default())
            .expect("load config")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by a minimal repository.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `assets/<filename>` in the test repository,
    /// overwriting any file written by [`setup_minimal_repo`].
    pub fn with_asset(self, filename: &str, content: &str) -> Self {
        let path = self.ctx.root.path().join("assets").join(filename);
        std::fs::write(path, content).expect("write asset file");
        self
    }

    /// Create a file inside the named stow package directory.
    pub fn with_stow_file(self, package: &str, relative: &str, content: &str) -> Self {
        let path = self.ctx.root.path().join(package).join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create stow package parent");
        }
        std::fs::write(&path, content).expect("write stow package file");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// A test executor that records every invocation as `(program, args)` pairs.
/// All calls succeed; `which` answers from a configured set.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    available: HashSet<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `program` as present on `$PATH`.
    pub fn with_which(mut self, program: &str) -> Self {
        self.available.insert(program.to_string());
        self
    }

    pub fn recorded_calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("calls mutex").clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.calls.lock().expect("calls mutex").push((
            program.to_string(),
            args.iter().map(|s| (*s).to_string()).collect(),
        ));
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.record(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.record(program, args)
    }

    fn run_with_input(&self, program: &str, args: &[&str], _: &str) -> anyhow::Result<ExecResult> {
        self.record(program, args)
    }

    fn which(&self, program: &str) -> bool {
        self.available.contains(program)
    }
}

/// Build a run [`Context`] over the given config and executor.
///
/// Defaults: dnf manager, no desktop environments, non-superuser, home in a
/// throwaway location under the repository root.
pub fn make_run_context(
    config: Config,
    executor: Arc<dyn Executor>,
    home: PathBuf,
) -> Context {
    Context {
        config,
        manager: PackageManagerKind::Dnf,
        desktops: DesktopSet::default(),
        log: Arc::new(Logger::new()),
        home,
        executor,
        is_superuser: false,
    }
}
