//! # huskygpt
//!
//! A git hook that sends staged changes to an OpenAI model for review, or
//! asks it to write unit tests for source files.
//!
//! ## Quick Start
//!
//! ```no_run
//! use huskygpt::config::{CliOverrides, Mode, UserOptions};
//! use huskygpt::files::FileReadResult;
//! use huskygpt::runner::Orchestrator;
//! use huskygpt::utils::Settings;
//!
//! # async fn review() -> anyhow::Result<()> {
//! let options = UserOptions::resolve(Mode::Review, CliOverrides::default(), &Settings::load()?)?;
//! let orchestrator = Orchestrator::from_options(&options)?;
//! let file = FileReadResult::from_content("src/lib.rs", "pub fn answer() -> u32 { 42 }");
//! println!("{}", orchestrator.run(&file).await);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod files;
pub mod git;
pub mod openai;
pub mod runner;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of huskygpt.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
