//! Slot Board - time-slot vacancy board for the kids park booking pages
//!
//! Fetches availability for each configured booking page, groups it by
//! date and hour, and serves the rendered tables with a cool-down gated
//! refresh.

pub mod config;
pub mod dashboard;
pub mod dates;
pub mod error;
pub mod fetcher;
pub mod grouper;
pub mod io;
pub mod refresh;
pub mod render;
pub mod slot;
pub mod state;
pub mod widget;

pub use config::{load_config, Config};
pub use error::{Result, SlotBoardError};

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;
use crate::widget::AvailabilityWidget;

/// Run the slot board service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;

    let http: Arc<dyn io::HttpClient> =
        Arc::new(ReqwestHttpClient::new(config.fetch.request_timeout)?);
    let cancel = CancellationToken::new();

    let state = state::new_state_handle(config.booking_pages.clone(), config.refresh.cooldown);
    let widget = Arc::new(AvailabilityWidget::new(&config, http, state));

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
        cancel_for_signal.cancel();
    });

    // First cycle runs on startup, outside the cool-down gate
    let widget_for_load = Arc::clone(&widget);
    tokio::spawn(async move {
        widget_for_load.run_cycle(Utc::now()).await;
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Slot board listening on http://{}", addr);

    let router = dashboard::build_router(widget);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("Slot board stopped");
    Ok(())
}
