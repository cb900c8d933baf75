mod assistant;
mod cache;
mod catalog;
mod config;
mod error;
mod localize;
mod matcher;
mod model;
mod server;
mod tips;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use assistant::CareAssistant;
use cache::TranslationCache;
use carebot_common::embedding::{Embedder, TextEmbedder};
use carebot_common::redis::RedisCache;
use carebot_common::translate::{GoogleTranslateClient, TranslateClientConfig};
use config::Config;
use localize::Localizer;
use matcher::SymptomMatcher;
use server::CareBotServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting carebot MCP server");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        catalog_path = %config.catalog_path,
        max_tips = config.max_tips,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    // 2. Load the reference catalog (fails fast on malformed rows)
    let catalog = catalog::load_catalog(&config.catalog_path())?;
    info!(records = catalog.len(), "catalog loaded");

    // 3. Initialize embedding model and embed the catalog once
    info!("initializing embedding model (may download on first run)");
    let embedder = Embedder::new(Embedder::timeout_from_env()).await?;
    info!(dimensions = embedder.dimensions(), "embedding model ready");
    let embedder: Arc<dyn TextEmbedder> = Arc::new(embedder);
    let matcher = Arc::new(SymptomMatcher::build(catalog, embedder).await?);
    info!("catalog embeddings cached");

    // 4. Translation client, with Redis cache when available
    let translate_config = TranslateClientConfig::from_env();
    let translator = GoogleTranslateClient::new(translate_config)?;
    info!(
        base_url = %translator.config().base_url,
        timeout_ms = translator.config().timeout.as_millis(),
        max_retries = translator.config().max_retries,
        "translation client configured"
    );

    let redis_cache = RedisCache::new(config.redis_url.as_deref());
    if redis_cache.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without translation cache");
    }
    let localizer = Arc::new(Localizer::new(
        Arc::new(translator),
        Arc::new(TranslationCache::new(redis_cache)),
    ));

    // 5. Build MCP server and serve on TCP or stdio
    let assistant = Arc::new(CareAssistant::new(matcher, localizer, config.max_tips));
    let server = CareBotServer::new(assistant);

    if let Ok(addr) = std::env::var("MCP_TCP_LISTEN_ADDR") {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
