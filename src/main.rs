mod cli;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use loyalty::{
    generate_keypair_pem, load_config, public_key_to_string, run_server, LoyaltyConfig,
    LoyaltyError,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, host, port } => serve(config, host, port).await?,
        Commands::Keygen { out, force } => keygen(out, force)?,
    }
    Ok(())
}

async fn serve(
    path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), LoyaltyError> {
    let config = load_config(path.as_deref())?;
    let config = apply_overrides(config, host, port)?;

    init_tracing(&config.log_level);
    tracing::info!(?config, "Starting loyalty service");

    run_server(config, shutdown_signal()).await?;
    Ok(())
}

fn apply_overrides(
    config: LoyaltyConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<LoyaltyConfig, LoyaltyError> {
    if host.is_none() && port.is_none() {
        return Ok(config);
    }
    let mut builder = config.to_builder();
    if let Some(host) = host {
        builder = builder.host(host);
    }
    if let Some(port) = port {
        builder = builder.port(port);
    }
    Ok(builder.build()?)
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn keygen(out: Option<PathBuf>, force: bool) -> Result<(), LoyaltyError> {
    let (pem, public_key) = generate_keypair_pem()?;

    match out {
        Some(path) => {
            if path.exists() && !force {
                println!(
                    "{} {} already exists. Use --force to overwrite.",
                    "!".yellow(),
                    path.display()
                );
                return Ok(());
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &pem)?;
            println!("{} Signing key written to {}", "✓".green(), path.display());
        }
        None => print!("{pem}"),
    }

    println!("Public key: {}", public_key_to_string(&public_key).cyan());
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
