//! Assigner CLI - reviewer assignment for pull requests
//!
//! Runs the HTTP server or drives the assignment engine directly against
//! the configured database.

mod commands;
mod http;

use std::path::PathBuf;

use assigner_core::{CliOverrides, Config};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{open_service, print_json, PrArgs, ServeArgs, TeamArgs, UserArgs};

/// Assigner: automatic reviewer assignment for pull requests
#[derive(Parser, Debug)]
#[command(name = "assigner")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file
    #[arg(long, global = true, env = "ASSIGNER_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the SQLite database (overrides config and env)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Run the HTTP server
    Serve(ServeArgs),

    /// Manage teams
    Team(TeamArgs),

    /// Manage users
    User(UserArgs),

    /// Manage pull requests
    Pr(PrArgs),

    /// List pull requests a user reviews
    Reviews {
        /// User ID
        user_id: String,
    },

    /// Show review assignment statistics
    Stats,

    /// Show current configuration
    Config,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let address = match &cli.command {
        Some(Commands::Serve(args)) => args.address.clone(),
        _ => None,
    };
    let overrides = CliOverrides {
        address,
        db_path: cli.db_path.clone(),
        log_level: cli.verbose.then(|| "debug".to_string()),
    };

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.config.as_deref(), overrides)?;

    init_tracing(&config.log.level);

    if cli.verbose {
        tracing::debug!(
            address = %config.server.address,
            db_path = %config.database.path.display(),
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("assigner {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Team(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::User(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Pr(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Reviews { user_id }) => {
            let service = open_service(&config).await?;
            print_json(&service.get_reviews_for_user(&user_id).await?)?;
        }
        Some(Commands::Stats) => {
            let service = open_service(&config).await?;
            print_json(&service.get_stats().await?)?;
        }
        Some(Commands::Config) => {
            println!("{}", toml::to_string_pretty(&config)?);
            match cli.config.or_else(Config::default_config_path) {
                Some(path) if path.exists() => println!("# Config file: {}", path.display()),
                Some(path) => println!("# Config file: {} (not found - using defaults)", path.display()),
                None => {}
            }
        }
        None => {
            println!("Assigner - automatic reviewer assignment for pull requests");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
