use clap::Parser;
use importsweep::cli;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Skipped files and a missing baseline are worth seeing without RUST_LOG.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = cli::Cli::parse();
    cli::dispatch(cli)?;
    Ok(())
}
