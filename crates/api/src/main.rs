use std::net::SocketAddr;
use std::sync::Arc;

use premortem_gemini::api::GeminiApi;
use premortem_gemini::credentials::{CredentialGate, StaticCredentialGate};
use premortem_pipeline::events::SimulationEvent;
use premortem_pipeline::orchestrator::SimulationOrchestrator;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use premortem_api::config::ServerConfig;
use premortem_api::router::build_app_router;
use premortem_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "premortem_api=debug,premortem_pipeline=debug,premortem_gemini=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        text_model = %config.gemini.generation.text_model,
        image_model = %config.gemini.generation.image_model,
        "Loaded server configuration",
    );

    // --- Key gate ---
    let credentials: Arc<dyn CredentialGate> =
        Arc::new(StaticCredentialGate::new(config.gemini.api_key.clone()));
    if !credentials.has_selected_api_key().await {
        tracing::warn!("No GEMINI_API_KEY set; simulations are gated until a key is selected");
    }

    // --- Gemini client ---
    let gemini = Arc::new(
        GeminiApi::new(
            Arc::clone(&credentials),
            config.gemini.base_url.clone(),
            config.gemini.http_timeout,
        )
        .expect("Failed to build Gemini HTTP client"),
    );

    // --- Orchestrator ---
    let orchestrator = Arc::new(SimulationOrchestrator::from_settings(
        gemini.clone(),
        gemini,
        &config.gemini.generation,
    ));
    let events_handle = tokio::spawn(log_simulation_events(orchestrator.subscribe()));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        orchestrator,
        credentials,
    };

    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    events_handle.abort();
    tracing::info!("Graceful shutdown complete");
}

/// Log lifecycle events until the orchestrator is dropped.
async fn log_simulation_events(mut rx: broadcast::Receiver<SimulationEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => tracing::debug!(?event, "Simulation event"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Simulation event logger lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
