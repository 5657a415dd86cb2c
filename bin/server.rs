// RSVP Confirmation - Web Server

use anyhow::{Context, Result};
use rsvp_confirm::{router, AppState, Config, SqliteGuestStore, VERSION};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    println!("🌐 RSVP Confirmation v{} - Web Server", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::load()?;

    let store = SqliteGuestStore::open(&config.db_path)?;
    println!("✓ Database opened: {:?}", config.db_path);

    let state = AppState::new(store, config.base_url.clone());
    let app = router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;

    info!("Server running on {address}");
    println!("\n🚀 Server running on http://localhost:{}", config.port);
    println!("   RSVP: {}/rsvp?guestId=<id>&status=attending", config.base_url);
    println!("   API:  http://localhost:{}/api/guests", config.port);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
