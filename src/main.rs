//! Space Duel Server - two-player arena rendered and streamed over HTTP
//!
//! The simulation thread advances the match, renders each player's chase
//! view and publishes it as a JPEG. The HTTP side serves those frames and
//! accepts control updates from browser clients.

mod app;
mod capture;
mod config;
mod game;
mod http;
mod render;
mod store;
mod util;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{AppState, GameLoop, HeadlessInput};
use crate::capture::FrameCapture;
use crate::config::Config;
use crate::game::World;
use crate::http::build_router;
use crate::render::{SceneRenderer, SoftwareRasterizer, FRAME_HEIGHT, FRAME_WIDTH};
use crate::store::SharedStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    info!("Starting Space Duel Server");
    info!(
        addr = %config.server_addr,
        tick_rate = config.tick_rate,
        jpeg_quality = config.jpeg_quality,
        "Configuration loaded"
    );

    let store = Arc::new(SharedStore::new());

    // Renderer setup failures are fatal
    let scene = SceneRenderer::new()?;
    let raster = SoftwareRasterizer::new(FRAME_WIDTH, FRAME_HEIGHT)?;

    let stop = Arc::new(AtomicBool::new(false));
    let simulation = GameLoop::new(
        World::default(),
        scene,
        raster,
        HeadlessInput,
        FrameCapture::new(config.jpeg_quality),
        store.clone(),
    )
    .spawn(config.tick_rate, stop.clone())?;

    let state = AppState::new(&config, store);
    let router = build_router(state);

    let addr: SocketAddr = config.server_addr;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("Player 1: http://{}/?player=1", addr);
    info!("Player 2: http://{}/?player=2", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Listener is down; stop the tick loop and wait for it to release the renderer
    stop.store(true, Ordering::Release);
    match tokio::task::spawn_blocking(move || simulation.join()).await? {
        Ok(()) => info!("Simulation thread joined"),
        Err(_) => error!("Simulation thread panicked"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
