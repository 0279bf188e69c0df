pub(crate) mod api;
pub(crate) mod clients;
pub(crate) mod core;
pub(crate) mod models;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use crate::clients::BackendClient;
use crate::core::{config::Settings, state::AppState, telemetry};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let backend = BackendClient::from_settings(&settings)?;
    match backend.probe().await {
        Ok(status) => tracing::info!(
            backend = %backend.base_url(),
            status = status.as_u16(),
            "Upstream backend reachable"
        ),
        Err(err) => tracing::warn!(
            backend = %backend.base_url(),
            error = %err,
            "Upstream backend unreachable at startup; serving anyway"
        ),
    }

    let state = AppState::new(settings, backend);
    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        feedback_concurrency = state.feedback_concurrency(),
        "Advising gateway listening"
    );

    axum::serve(listener, app).with_graceful_shutdown(core::shutdown::shutdown_signal()).await?;

    tracing::info!("Advising gateway stopped");
    Ok(())
}
