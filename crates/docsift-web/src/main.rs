use std::sync::Arc;

use docsift_core::{ExtractionPipeline, format};
use docsift_web::config::{Config, size_label};
use docsift_web::router::create_router;
use docsift_web::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let registry = Arc::new(docsift_extractors::build_registry(&config.tool_config())?);
    let pipeline = ExtractionPipeline::new(registry, &config.scratch_dir, config.extract_timeout)?;
    let state = Arc::new(AppState::new(pipeline, config.max_upload_bytes));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        formats = format::supported_format_count(),
        max_upload = %size_label(config.max_upload_bytes),
        timeout_secs = config.extract_timeout.as_secs(),
        "docsift listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("docsift_web=info,docsift_core=info,docsift_extractors=info,tower_http=info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
