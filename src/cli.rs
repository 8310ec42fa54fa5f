use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "loyalty",
    version,
    about = "Loyalty points service",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Configuration file (JSON or TOML)
        #[arg(short, long, env = "LOYALTY_CONFIG")]
        config: Option<PathBuf>,

        /// Override the bind address
        #[arg(long)]
        host: Option<String>,

        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a token signing key
    Keygen {
        /// Write the PEM private key here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
