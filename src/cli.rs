//! CLI interface for huskygpt.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::UserOptions;
use crate::files::{read_paths, ExtensionFilter, FileReadResult};

pub mod args;
pub mod install;
pub mod review;

/// huskygpt: AI code review and unit test generation for git hooks.
#[derive(Parser)]
#[command(name = "huskygpt")]
#[command(about = "AI code review and unit test generation for git hooks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Reviews staged changes (or the given paths).
    Review(review::ReviewCommand),
    /// Generates unit tests for staged files (or the given paths).
    Test(test::TestCommand),
    /// Installs the pre-commit hook into the current repository.
    Install(install::InstallCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Review(cmd) => cmd.execute().await,
            Commands::Test(cmd) => cmd.execute().await,
            Commands::Install(cmd) => cmd.execute(),
        }
    }
}

/// Reads `paths`, or the staged files of the current repository when empty.
pub(crate) fn collect_files(
    paths: &[PathBuf],
    options: &UserOptions,
) -> Result<Vec<FileReadResult>> {
    let filter = ExtensionFilter::new(&options.extensions)?;
    if paths.is_empty() {
        let repo = crate::git::open_repository(".")?;
        crate::git::read_staged_files(&repo, &filter)
    } else {
        read_paths(paths, &filter)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_review_flags() {
        let cli = Cli::try_parse_from([
            "huskygpt",
            "review",
            "src",
            "--model",
            "gpt-4o",
            "--stop",
            "###",
            "--stop",
            "END",
            "--review-typing",
            "false",
            "--extensions",
            "rs,ts",
            "--max-prompt-chars",
            "3000",
        ])
        .unwrap();

        let Commands::Review(cmd) = cli.command else {
            panic!("expected review command");
        };
        assert_eq!(cmd.paths, vec![PathBuf::from("src")]);
        let overrides = cmd.options.into_overrides();
        assert_eq!(overrides.completion.model.as_deref(), Some("gpt-4o"));
        assert_eq!(
            overrides.completion.stop,
            Some(vec!["###".to_string(), "END".to_string()])
        );
        assert_eq!(overrides.review_typing.as_deref(), Some("false"));
        assert_eq!(
            overrides.extensions,
            Some(vec!["rs".to_string(), "ts".to_string()])
        );
        assert_eq!(overrides.max_prompt_chars, Some(3000));
    }

    #[test]
    fn parses_test_layout_flags() {
        let cli = Cli::try_parse_from([
            "huskygpt",
            "test",
            "src/math.ts",
            "--test-dir-name",
            "tests",
            "--test-name-marker",
            ".spec",
        ])
        .unwrap();

        let Commands::Test(cmd) = cli.command else {
            panic!("expected test command");
        };
        let layout = cmd.layout();
        assert_eq!(layout.dir_name, "tests");
        assert_eq!(layout.name_marker, ".spec");
    }

    #[test]
    fn unset_flags_stay_unset() {
        let cli = Cli::try_parse_from(["huskygpt", "review"]).unwrap();
        let Commands::Review(cmd) = cli.command else {
            panic!("expected review command");
        };
        let overrides = cmd.options.into_overrides();
        assert!(overrides.api_key.is_none());
        assert!(overrides.completion.stop.is_none());
        assert!(overrides.extensions.is_none());
    }
}
