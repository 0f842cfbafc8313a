use std::net::SocketAddr;

use smart_tutor_backend::config::Config;
use smart_tutor_backend::db::operations::backfill_child_progress;
use smart_tutor_backend::db::ProgressStore;
use smart_tutor_backend::logging::init_tracing;
use smart_tutor_backend::services::Services;
use smart_tutor_backend::state::AppState;
use smart_tutor_backend::{auth, create_app_with};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    let store = match ProgressStore::connect(&config.database_url).await {
        Ok(store) => {
            match backfill_child_progress(&store).await {
                Ok(0) => {}
                Ok(created) => tracing::info!(created, "created missing child progress rows"),
                Err(err) => tracing::warn!(error = %err, "child progress backfill failed"),
            }
            Some(store)
        }
        Err(err) => {
            tracing::warn!(error = %err, url = %config.database_url, "progress store not initialized");
            None
        }
    };

    let services = Services::from_env();
    tracing::info!(
        llm = services.llm.is_available(),
        speech_to_text = services.stt.is_available(),
        text_to_speech = services.tts.is_available(),
        "external services"
    );

    let state = AppState::new(store, config.curriculum.clone(), services, auth::cost_from_env());
    let app = create_app_with(state);

    let addr = config.bind_addr();
    tracing::info!(%addr, "smart-tutor-backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("Graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
