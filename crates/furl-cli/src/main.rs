//! Furl CLI - Replay collapse controls against a graph document
//!
//! Loads a graph from JSON, runs a script of collapse/expand actions
//! through a session and prints what ends up on screen.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "furl")]
#[command(author = "Furl Contributors")]
#[command(version)]
#[command(about = "Collapse and proxy-edge engine for node-link diagrams", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script of actions and print the resulting view
    Replay {
        /// Graph document (JSON)
        graph: PathBuf,

        /// Actions to run, as a JSON array
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Engine configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// List nodes that can be collapsed
    Check {
        /// Graph document (JSON)
        graph: PathBuf,
    },

    /// Show how many edges use each port of a node
    Ports {
        /// Graph document (JSON)
        graph: PathBuf,

        /// Node id
        node: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Replay {
            graph,
            script,
            config,
            json,
        } => commands::replay(&graph, script.as_deref(), config.as_deref(), json).await,
        Commands::Check { graph } => commands::check(&graph).await,
        Commands::Ports { graph, node } => commands::ports(&graph, &node).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
