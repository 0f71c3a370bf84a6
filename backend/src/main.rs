//! Backend entry-point: loads settings, wires adapters, and serves the API.

mod server;

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::web;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use darasa::inbound::http::health::HealthState;
use darasa::inbound::http::webhooks::WebhookVerifier;
use darasa::outbound::generation::{GeminiConfig, GeminiTextGenerator};
use darasa::outbound::identity::SessionTokenVerifier;
use darasa::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use darasa::settings::AppSettings;
use ortho_config::OrthoConfig;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = build_server_config(&settings).await?;
    info!(bind_addr = %config.bind_addr(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

async fn build_server_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let mut config = ServerConfig::new(bind_addr).with_cache(settings.cache_config());

    match settings.database_url() {
        Some(url) => {
            run_pending_migrations(&url)
                .await
                .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("DARASA_DATABASE_URL not set; data is not persisted"),
    }

    if let Some(path) = settings.session_public_key_path.as_deref() {
        let verifier = SessionTokenVerifier::from_pem_file(path, settings.session_issuer())
            .map_err(|e| std::io::Error::other(format!("session key {}: {e}", path.display())))?;
        config = config.with_identity(Arc::new(verifier));
    }

    if let Some(api_key) = settings.gemini_api_key() {
        let generator = GeminiTextGenerator::new(
            GeminiConfig::new(api_key)
                .with_model(settings.gemini_model())
                .with_timeout(settings.gemini_timeout()),
        )
        .map_err(|e| std::io::Error::other(format!("generation client: {e}")))?;
        config = config.with_generator(Arc::new(generator));
    }

    if let Some(secret) = settings.webhook_signing_secret() {
        let verifier = WebhookVerifier::new(secret)
            .map_err(|e| std::io::Error::other(format!("webhook signing secret: {e}")))?;
        config = config.with_webhook_verifier(verifier);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics());

    Ok(config)
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Option<PrometheusMetrics> {
    match PrometheusMetricsBuilder::new("darasa")
        .endpoint("/metrics")
        .build()
    {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "failed to initialise Prometheus metrics; continuing without metrics");
            None
        }
    }
}
