mod config;
mod error;
mod handlers;
mod llm;
mod llm_factory;
mod prompt;
mod routes;
mod state;
#[cfg(test)]
mod test_utils;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenv::dotenv().ok();

    let settings = Settings::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Loaded configuration: backend={}, static_dir={}, debug={}",
        settings.llm_backend, settings.static_dir, settings.debug
    );

    let addr = settings.listen_addr();
    let app_state = AppState::new(settings)?;
    let app = routes::app(app_state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
