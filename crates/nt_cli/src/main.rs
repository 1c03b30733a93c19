use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nt_core::{AnalysisRequest, Config, HumanDuration};
use nt_inference::Analyzer;
use nt_providers::HeadlineFeed;
use nt_verify::Verifier;
use nt_web::AppState;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "News verification service", long_about = None)]
pub struct Cli {
    /// Per-provider timeout, e.g. `5s` (overrides NT_PROVIDER_TIMEOUT)
    #[arg(long)]
    timeout: Option<HumanDuration>,

    /// Directory holding the analysis model artifacts (overrides NT_MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Verify a claim against the web and print the result
    Verify {
        /// Article text or claim
        text: String,
    },
    /// Run fake-news and impersonation analysis on an article
    Analyze {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "")]
        claimed_source: String,
    },
    /// Print the current headline per category
    Headlines,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(timeout) = cli.timeout {
        config.provider_timeout = timeout.0;
    }
    if let Some(model_dir) = cli.model_dir {
        config.model_dir = model_dir;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let state = AppState::from_config(&config)?;
            info!(
                timeout = ?config.provider_timeout,
                analyzer = state.analyzer.is_some(),
                "starting server"
            );
            nt_web::serve(state, &config.host, config.port).await?;
        }
        Commands::Verify { text } => {
            let verifier = Verifier::from_config(&config)?;
            print_json(&verifier.verify(&text).await?)?;
        }
        Commands::Analyze {
            title,
            content,
            claimed_source,
        } => {
            let analyzer = Analyzer::load(&config.model_dir)
                .with_context(|| format!("loading models from {}", config.model_dir.display()))?;
            let request = AnalysisRequest {
                title,
                content,
                claimed_source,
            };
            print_json(&analyzer.analyze(&request)?)?;
        }
        Commands::Headlines => {
            let feed = HeadlineFeed::from_config(&config)?;
            print_json(&serde_json::json!({ "headlines": feed.headlines().await }))?;
        }
    }

    Ok(())
}
