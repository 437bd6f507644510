//! validatesigpdfa - signature + PDF/A validation service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use validatesigpdfa::config::{LoggingConfig, ServiceConfig};
use validatesigpdfa::server::{self, AppState};
use validatesigpdfa::{ContextTrust, PdfSignatureValidator, PdfaValidator, ValidationOrchestrator};

/// Validate signed documents and merge PDF/A conformance into the report.
#[derive(Parser, Debug)]
#[command(name = "validatesigpdfa")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration file (defaults apply when omitted)
    #[arg(short, long, env = "VALIDATESIGPDFA_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides `server.bind`
    #[arg(long, env = "VALIDATESIGPDFA_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
        config.validate().context("invalid --bind")?;
    }

    init_tracing(&config.logging);

    let trust = Arc::new(
        ContextTrust::from_config(config.trust.as_ref()).context("failed to load trust anchors")?,
    );
    match config.trust.as_ref() {
        Some(t) => info!(
            certificates = t.trusted_certificates.len(),
            "context trust configured"
        ),
        None => info!("no [trust] section, requests use a default verifier"),
    }

    let orchestrator = ValidationOrchestrator::new(
        Arc::new(PdfSignatureValidator::new(trust.clone())),
        Arc::new(PdfaValidator::new()),
        trust,
    );
    let app = server::router(AppState::new(orchestrator), config.server.max_body_bytes);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "validation server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("validation server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
