//! Review command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::cli::args::CommonArgs;
use crate::cli::collect_files;
use crate::config::{Mode, UserOptions};
use crate::runner::Orchestrator;
use crate::utils::Settings;

/// Reviews staged changes, or the given files and directories.
#[derive(Parser)]
pub struct ReviewCommand {
    /// Files or directories to review instead of the staged changes.
    pub paths: Vec<PathBuf>,

    /// API and sampling options.
    #[command(flatten)]
    pub options: CommonArgs,
}

impl ReviewCommand {
    /// Executes the review command.
    ///
    /// API failures are reported but never fail the command, so a flaky
    /// network cannot block a commit.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load()?;
        let options = UserOptions::resolve(Mode::Review, self.options.into_overrides(), &settings)?;

        let files = collect_files(&self.paths, &options)?;
        if files.is_empty() {
            eprintln!("[huskygpt] No matching files to review");
            return Ok(());
        }

        let orchestrator = Orchestrator::from_options(&options)?;
        for file in &files {
            eprintln!("📄 {}", file.path.display());
            let output = orchestrator.run(file).await;
            // With typing enabled the renderer has already shown the responses.
            if !options.review_typing {
                println!("{output}\n");
            }
        }

        Ok(())
    }
}
