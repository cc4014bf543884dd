use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use ferry::config::Config;
use ferry::digest::{self, Algorithm};
use ferry::server;

#[derive(Parser)]
#[command(name = "ferry", about = "Minimal HTTP request/response server")]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Print the hex digest of a file.
    Digest {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = Algorithm::Sha1)]
        algorithm: Algorithm,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let cfg = match &cli.config {
                Some(path) => Config::from_file(path)?,
                None => Config::load(),
            };
            serve(cfg).await
        }
        Command::Digest { file, algorithm } => {
            let input = tokio::fs::File::open(&file)
                .await
                .with_context(|| format!("cannot open {}", file.display()))?;
            println!("{}", digest::digest_reader(algorithm, input).await?);
            Ok(())
        }
    }
}

async fn serve(cfg: Config) -> anyhow::Result<()> {
    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
