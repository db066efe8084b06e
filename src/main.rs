use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// The main entry point for the finprofile API application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from the .env file (DATABASE_URL, etc.).
    dotenvy::dotenv().ok();

    // Initialize structured logging; RUST_LOG overrides the default filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => {
            let config = configuration::load_config()?;
            tracing::info!("Configuration loaded; starting server.");
            web_server::run_server(config).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A CRUD web API managing user financial profiles and their transactions.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP/WebSocket API server.
    Serve,
}
