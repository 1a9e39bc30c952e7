//! contact-messages server: resolves credentials, connects the message store
//! once and serves the REST API until SIGINT/SIGTERM.
//!
//! Run from repo root: `cargo run -p contact-messages-server`

use contact_messages::{app, shutdown, store, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("contact_messages=info,contact_messages_server=info")
            }),
        )
        .init();

    let settings = Settings::from_env()?;
    let store = store::open(&settings).await.map_err(|e| {
        tracing::error!(error = %e, "message store unavailable");
        e
    })?;

    let (trigger, signal) = shutdown::channel();
    let state = AppState::new(store, signal);
    let router = app(state, settings.body_limit);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown::terminate_signal().await;
            tracing::info!("shutdown requested, interrupting pending store calls");
            trigger.trigger();
        })
        .await?;
    Ok(())
}
