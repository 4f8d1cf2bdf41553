use anyhow::Context;
use tracing_subscriber::EnvFilter;

use invoice_manager::config::AppConfig;
use invoice_manager::db::InvoiceStore;
use invoice_manager::handlers::{AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    let store = InvoiceStore::new(&config.database_url)
        .with_context(|| format!("opening invoice database at {}", config.database_url))?;
    let state = AppState::new(store, config.pdf_font.clone())?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, db = %config.database_url, "invoice manager listening");
    axum::serve(listener, app).await?;
    Ok(())
}
