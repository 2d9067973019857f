//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agentdock")]
#[command(author, version, about = "Drive agent-bound containers and their MCP message bus", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// JSON file describing the container roster and boot delay
    #[arg(long, global = true, env = "AGENTDOCK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum SubCommand {
    /// List the configured containers
    Containers,

    /// Run a session script (.dock)
    Run {
        /// Path to the .dock script file
        file: PathBuf,
    },

    /// Show which terminal rule would handle a command
    Explain {
        /// Command line as it would be typed into a container terminal
        command: String,
    },

    /// Start interactive REPL mode
    Repl {
        /// Container to attach to first
        #[arg(long)]
        container: Option<String>,
    },
}
