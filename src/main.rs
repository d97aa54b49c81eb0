//! fieldguard server binary

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fieldguard::config::ServerConfig;
use fieldguard::generator::OpenAiGenerator;
use fieldguard::server::GuardServer;
use fieldguard::{AuditLog, QueryGuard};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();

    let (catalog, policy) = config.load_policy()?;
    if config.api_key.is_none() {
        tracing::warn!("no API key configured, every generator call will fail");
    }

    tracing::info!(
        bind = %config.bind,
        tables = catalog.len(),
        roles = policy.list_roles().len(),
        model = %config.model,
        policy_file = ?config.policy_file,
        "Starting fieldguard"
    );

    let generator = OpenAiGenerator::new(config.openai_config())?;
    let guard = QueryGuard::new(
        Arc::new(catalog),
        Arc::new(policy),
        Arc::new(AuditLog::with_capacity(config.audit_capacity)),
        Arc::new(generator),
    );

    let server = GuardServer::new(config.bind, Arc::new(guard));
    server.run().await?;

    Ok(())
}
