//! Debate Timer - timing engine and HTTP server for debate sessions
//!
//! This is the main entry point for the debate-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use debate_timer::{
    api::create_router,
    audio::{default_backend, AudioEmitter},
    config::Config,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("debate_timer={},tower_http=info", config.log_level()))
        .init();

    config.validate()?;

    info!("Starting debate-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, standard={}min, chess={}min/side, mute={}",
        config.host, config.port, config.standard_minutes, config.chess_minutes, config.mute
    );

    let audio = if config.mute {
        AudioEmitter::muted()
    } else {
        AudioEmitter::spawn(default_backend())
    };

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.timer_defaults(),
        audio,
    ));

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /standard/toggle|reset|duration - Standard countdown");
    info!("  POST /chess/tap/:side, /chess/pause, /chess/reset - Chess clock");
    info!("  GET|POST|PUT /rounds, POST /rounds/template - Round list");
    info!("  POST /flow/start|next|prev - Round session");
    info!("  GET  /events - Snapshot and alert stream");
    info!("  GET  /status - Current timer state");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
