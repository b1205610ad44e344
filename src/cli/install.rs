//! Hook installation command.

use anyhow::Result;
use clap::Parser;

use crate::git::{install_pre_commit_hook, open_repository, HookInstall};

/// Installs the pre-commit hook into the current repository.
#[derive(Parser)]
pub struct InstallCommand {}

impl InstallCommand {
    /// Executes the install command.
    pub fn execute(self) -> Result<()> {
        let repo = open_repository(".")?;
        match install_pre_commit_hook(&repo)? {
            HookInstall::Created(path) => println!("✅ Created {}", path.display()),
            HookInstall::Appended(path) => println!("✅ Added huskygpt to {}", path.display()),
            HookInstall::AlreadyInstalled(path) => {
                println!("ℹ️  huskygpt is already installed in {}", path.display())
            }
        }
        Ok(())
    }
}
