//! HTTP API over the generator and the chat model
//!
//! Every generation route answers with the same JSON envelope:
//! `{ status: "success", data, message }` or
//! `{ status: "error", message, code }`.

mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::claude::TextModel;
use crate::config::ChatConfig;
use crate::generate::Generator;

/// Shared by all handlers
pub struct ServerState<M> {
    pub generator: Generator<M>,
    pub chat: ChatConfig,
}

pub fn router<M: TextModel>(state: ServerState<M>) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::chat::<M>))
        .route("/api/generate-textbook", post(handlers::generate_textbook::<M>))
        .route("/api/generate-toc", post(handlers::generate_toc::<M>))
        .route("/api/generate-content", post(handlers::generate_content::<M>))
        .route("/api/generate-content-html", post(handlers::generate_content_html::<M>))
        .route("/healthz", get(|| async { "ok" }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve until Ctrl-C or SIGTERM
pub async fn serve<M: TextModel>(addr: &str, state: ServerState<M>) -> Result<()> {
    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
