use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use babycare_api::auth::TokenVerifier;
use babycare_api::database::DatabaseManager;
use babycare_api::services::pdf::CommandPdfRenderer;
use babycare_api::state::{AppState, Repositories};

#[derive(Parser)]
#[command(name = "babycare-api")]
#[command(about = "Baby-care tracking API server")]
#[command(version)]
struct Args {
    #[arg(long, env = "HOST", help = "Address to bind")]
    host: Option<String>,

    #[arg(long, env = "PORT", help = "Port to listen on")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and JWT_SECRET are picked up locally
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,babycare_api=debug")),
        )
        .init();

    let args = Args::parse();
    let config = babycare_api::config::config();
    tracing::info!("Starting babycare-api in {:?} mode", config.environment);

    let db = DatabaseManager::connect_lazy(&config.database).context("failed to configure database pools")?;
    let verifier = TokenVerifier::new(&config.security.jwt_secret, config.security.jwt_issuer.as_deref())
        .context("JWT_SECRET must be set")?;
    let pdf = Arc::new(CommandPdfRenderer::new(&config.export.pdf_command).context("invalid EXPORT_PDF_COMMAND")?);

    let state = AppState::new(Repositories::postgres(&db), Arc::new(db.clone()), verifier, pdf)
        .context("failed to build application state")?;
    let app = babycare_api::routes::app(state, config);

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("babycare-api listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close_all().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
