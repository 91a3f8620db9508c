//! VaultML chunked uploader entry point.

mod app;
mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    let mut config = config::Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    if cli.save_config {
        let path = config.save(cli.config.as_deref())?;
        tracing::info!(path = %path.display(), "configuration saved");
    }

    let rt = tokio::runtime::Runtime::new()?;
    let payload = rt.block_on(app::run(&cli, &config))?;

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
