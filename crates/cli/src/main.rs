//! MoodMate CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize config directory
//! - `serve`   — Start the HTTP chat gateway
//! - `chat`    — Run a single turn locally, without HTTP
//! - `doctor`  — Diagnose configuration health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "moodmate",
    about = "MoodMate — affect-aware chat companion service",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one message through the turn pipeline and print the reply
    Chat {
        /// Session to speak as
        #[arg(short, long)]
        user: String,

        /// The message to send
        #[arg(short, long)]
        message: String,

        /// Region for helpline guidance
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Diagnose configuration health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Chat {
            user,
            message,
            region,
        } => commands::chat::run(&user, &message, region.as_deref()).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
