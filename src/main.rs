use std::process;

use clap::Parser;
use huskygpt::config::debug_enabled;
use huskygpt::Cli;

#[tokio::main]
async fn main() {
    // RUST_LOG wins; otherwise DEBUG turns on this crate's debug output.
    // Logs go to stderr so they don't interfere with review output on stdout.
    let default_filter = if debug_enabled(std::env::var("DEBUG").ok().as_deref()) {
        "warn,huskygpt=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        eprintln!("Error: {e}");

        // Print the full error chain if available
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {err}");
            source = err.source();
        }

        process::exit(1);
    }
}
