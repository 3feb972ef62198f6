use clap::Parser;
use tracing_subscriber::EnvFilter;

use objtree::cli;
use objtree::error::Result;
use objtree::storage::StorageClient;

use objtree::cli::Args;
use objtree::config::load_storage_config;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr so command output on stdout stays clean.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = run_app(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_app(args: Args) -> Result<()> {
    let config = load_storage_config()?;
    let client = StorageClient::new(config).await?;
    cli::run(args, client).await?;
    Ok(())
}
