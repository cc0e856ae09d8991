//! Portfolio CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! portfolio-cli migrate
//!
//! # Generate a value for JWT_SECRET
//! portfolio-cli generate-secret
//!
//! # Print dashboard counts from the database
//! portfolio-cli stats
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `generate-secret` - Print a random signing secret
//! - `stats` - Print the analytics snapshot as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "portfolio-cli")]
#[command(author, version, about = "Portfolio backend CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Generate a random secret suitable for `JWT_SECRET`
    GenerateSecret {
        /// Number of random bytes before encoding
        #[arg(short, long, default_value_t = commands::secret::DEFAULT_BYTES)]
        bytes: usize,
    },
    /// Print page view and message counts
    Stats,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::GenerateSecret { bytes } => {
            let secret = commands::secret::generate(bytes)?;
            println!("{secret}");
        }
        Commands::Stats => commands::stats::run().await?,
    }
    Ok(())
}
