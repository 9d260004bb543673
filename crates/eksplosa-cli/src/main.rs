use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod source;

use source::Source;

#[derive(Parser)]
#[command(name = "eksplosa", version, about = "Eksplosa CLI")]
struct Cli {
    /// Read content from a JSON file instead of the content API
    #[arg(long, global = true, value_name = "FILE")]
    data: Option<PathBuf>,
    /// Use the bundled starter course instead of the content API
    #[arg(long, global = true, conflicts_with = "data")]
    builtin: bool,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse provinces and their languages
    Provinces {
        #[command(subcommand)]
        action: commands::provinces::ProvincesAction,
    },
    /// Play and inspect quizzes
    Quiz {
        #[command(subcommand)]
        action: commands::quiz::QuizAction,
    },
    /// Saved quiz progress
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Simulate carousel gestures
    Carousel {
        #[command(subcommand)]
        action: commands::carousel::CarouselAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let source = Source {
        data: cli.data,
        builtin: cli.builtin,
    };
    let result = match cli.command {
        Commands::Provinces { action } => commands::provinces::run(action, &source).await,
        Commands::Quiz { action } => commands::quiz::run(action, &source).await,
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Carousel { action } => commands::carousel::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
