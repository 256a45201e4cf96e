pub mod annotator;
pub mod api;
pub mod assessment;
pub mod classifier;
pub mod config;
pub mod models;
pub mod presenter;

use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::config::{AppConfig, ConfigError};

/// Fatal startup or runtime failure. The binary exits non-zero on any of these.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Model unavailable: {0}")]
    Classifier(#[from] classifier::ClassifierError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Runtime error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn run() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = AppConfig::from_env()?;

    // Fail closed: no model, no server.
    let classifier = classifier::load_classifier(&settings.model_path).map_err(|e| {
        tracing::error!(path = %settings.model_path.display(), error = %e, "Model failed to load");
        e
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(serve(ApiContext::new(classifier), settings))
}

async fn serve(ctx: ApiContext, settings: AppConfig) -> Result<(), AppError> {
    let server = api::start_api_server_on(ctx, settings.bind_addr).await?;
    tracing::info!("Open http://{} in a browser", server.addr);

    let signal = tokio::signal::ctrl_c().await;
    server.stop().await;
    signal?;

    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
