//! Git operations: staged file reading and hook installation.

use std::path::Path;

use anyhow::{Context, Result};
use git2::Repository;

pub mod hooks;
pub mod staged;

pub use hooks::{install_pre_commit_hook, HookInstall};
pub use staged::read_staged_files;

/// Opens the repository containing `path`.
pub fn open_repository<P: AsRef<Path>>(path: P) -> Result<Repository> {
    Repository::discover(path).context("Not in a git repository")
}
