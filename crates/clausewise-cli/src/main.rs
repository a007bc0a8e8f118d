mod display;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use clausewise_backend::{AnalysisClient, AnalysisSession, ConnectivityStatus};
use clausewise_core::config::{
    DEFAULT_FALLBACK_DELAY, DEFAULT_PRIMARY_URL, DEFAULT_PROBE_TIMEOUT, DEFAULT_SECONDARY_URL,
};
use clausewise_core::{BackendConfig, DocumentFile, DocumentType};
use tracing_subscriber::EnvFilter;

use crate::display::Card;

#[derive(Parser)]
#[command(name = "clausewise", version)]
#[command(about = "Contract analysis with backend fallback")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct BackendArgs {
    /// Primary analysis service (native or canonical responses)
    #[arg(long, global = true, env = "CLAUSEWISE_PRIMARY_URL", default_value = DEFAULT_PRIMARY_URL)]
    primary_url: String,
    /// Secondary analysis service (canonical responses)
    #[arg(long, global = true, env = "CLAUSEWISE_SECONDARY_URL", default_value = DEFAULT_SECONDARY_URL)]
    secondary_url: String,
    #[arg(long, global = true, env = "CLAUSEWISE_PROBE_TIMEOUT_MS",
          default_value_t = DEFAULT_PROBE_TIMEOUT.as_millis() as u64)]
    probe_timeout_ms: u64,
    /// Simulated processing time of the offline fallback
    #[arg(long, global = true, env = "CLAUSEWISE_FALLBACK_DELAY_MS",
          default_value_t = DEFAULT_FALLBACK_DELAY.as_millis() as u64)]
    fallback_delay_ms: u64,
}

impl BackendArgs {
    fn config(&self) -> BackendConfig {
        BackendConfig::new(&self.primary_url, &self.secondary_url)
            .with_probe_timeout(Duration::from_millis(self.probe_timeout_ms))
            .with_fallback_delay(Duration::from_millis(self.fallback_delay_ms))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a contract (.txt, .pdf, .doc, .docx up to 5MB)
    Analyze {
        file: PathBuf,
        /// Declared media type; inferred from the extension when omitted
        #[arg(long)]
        media_type: Option<String>,
        /// Contract category hint, e.g. NDA (see `clausewise types`)
        #[arg(long)]
        document_type: Option<String>,
        /// Print the result as JSON instead of a card
        #[arg(long)]
        json: bool,
    },
    /// Probe both analysis services
    Status,
    /// List the recognised contract categories
    Types,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("clausewise v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = cli.backend.config();

    match cli.command {
        Command::Analyze {
            file,
            media_type,
            document_type,
            json,
        } => analyze(&config, &file, media_type, document_type.as_deref(), json).await,
        Command::Status => status(&config).await,
        Command::Types => types(&config).await,
    }
}

async fn analyze(
    config: &BackendConfig,
    path: &Path,
    media_type: Option<String>,
    document_type: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut file = DocumentFile::from_path(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    if let Some(media_type) = media_type {
        file = file.with_media_type(media_type);
    }

    let session = AnalysisSession::connect(config).await;
    eprintln!("  {}", session.status().label());

    let result = session.analyze(&file, document_type).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&*result)?);
    } else {
        print!("{}", Card(&result));
    }
    Ok(())
}

async fn status(config: &BackendConfig) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let status = ConnectivityStatus::detect(&client, config).await;

    println!("{}", status.label());
    println!("  {:<10} {:<30} {}", "primary", config.primary_url, up(status.primary));
    println!("  {:<10} {:<30} {}", "secondary", config.secondary_url, up(status.secondary));

    if status.primary {
        match AnalysisClient::new(client, &config.primary_url).service_info().await {
            Ok(info) => println!(
                "  {} {} ({}, validator {})",
                info.service,
                info.version,
                info.status,
                if info.validator_loaded { "loaded" } else { "not loaded" }
            ),
            Err(e) => tracing::warn!(error = %e, "service info unavailable"),
        }
    }
    Ok(())
}

async fn types(config: &BackendConfig) -> anyhow::Result<()> {
    let client = AnalysisClient::new(reqwest::Client::new(), &config.primary_url);
    let types = match client.document_types().await {
        Ok(types) => types,
        Err(e) => {
            tracing::warn!(error = %e, "using built-in document types");
            DocumentType::builtin()
        }
    };
    for t in &types {
        println!("  {:<22} {}", t.value, t.label);
    }
    Ok(())
}

fn up(reachable: bool) -> &'static str {
    if reachable { "up" } else { "down" }
}
