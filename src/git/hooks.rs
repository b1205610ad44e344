//! Pre-commit hook installation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::Repository;
use tracing::debug;

/// Command line the installed hook runs.
pub const HOOK_COMMAND: &str = "huskygpt review";

/// Name of the hook file.
const HOOK_NAME: &str = "pre-commit";

/// What installing the hook did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookInstall {
    /// A new hook script was written.
    Created(PathBuf),
    /// The command was appended to an existing hook.
    Appended(PathBuf),
    /// The hook already runs the command; nothing changed.
    AlreadyInstalled(PathBuf),
}

impl HookInstall {
    /// Returns the hook file path.
    pub fn path(&self) -> &Path {
        match self {
            HookInstall::Created(path)
            | HookInstall::Appended(path)
            | HookInstall::AlreadyInstalled(path) => path,
        }
    }
}

/// Returns the hooks directory, honouring `core.hooksPath`.
fn hooks_dir(repo: &Repository) -> Result<PathBuf> {
    let config = repo.config().context("Failed to read git config")?;
    if let Ok(custom) = config.get_path("core.hooksPath") {
        if custom.is_absolute() {
            return Ok(custom);
        }
        let base = repo.workdir().unwrap_or_else(|| repo.path());
        return Ok(base.join(custom));
    }
    Ok(repo.path().join("hooks"))
}

/// Installs (or extends) the `pre-commit` hook so it runs [`HOOK_COMMAND`].
pub fn install_pre_commit_hook(repo: &Repository) -> Result<HookInstall> {
    let dir = hooks_dir(repo)?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create hooks directory: {}", dir.display()))?;
    let hook_path = dir.join(HOOK_NAME);

    let outcome = if hook_path.exists() {
        let existing = fs::read_to_string(&hook_path)
            .with_context(|| format!("Failed to read hook: {}", hook_path.display()))?;
        if existing.lines().any(|line| line.trim() == HOOK_COMMAND) {
            return Ok(HookInstall::AlreadyInstalled(hook_path));
        }
        let mut updated = existing;
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(HOOK_COMMAND);
        updated.push('\n');
        fs::write(&hook_path, updated)
            .with_context(|| format!("Failed to update hook: {}", hook_path.display()))?;
        HookInstall::Appended(hook_path)
    } else {
        fs::write(&hook_path, format!("#!/bin/sh\n{HOOK_COMMAND}\n"))
            .with_context(|| format!("Failed to write hook: {}", hook_path.display()))?;
        HookInstall::Created(hook_path)
    };

    make_executable(outcome.path())?;
    debug!(hook = %outcome.path().display(), "Installed pre-commit hook");
    Ok(outcome)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .with_context(|| format!("Failed to stat hook: {}", path.display()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to mark hook executable: {}", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
