//! HTTP server facade for the hadith API: Axum router assembly, uniform JSON
//! errors, query-string extraction and response shaping.

use std::sync::Arc;

use anyhow::Context;
use axum::{response::Html, routing::get, Router};

use hadith_authz::SecretGuard;
use hadith_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod guard;
pub mod params;
pub mod response;
pub mod router;

pub use error::AppError;
pub use params::QueryParams;
pub use response::{paginate, single, Page, PageParams};

use router::RouterBuilder;

/// Start the HTTP server and serve until Ctrl-C or SIGTERM
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let app = build_router(registry, settings)
        .await
        .context("failed to build HTTP router")?;

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub async fn build_router(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<Router> {
    let secret_guard = SecretGuard::from_settings(settings).context("invalid auth settings")?;
    let prefix = settings.api.prefix.as_str();

    let mut builder = RouterBuilder::new()
        .route("/", get(home))
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        builder = builder.mount_module(prefix, module.as_ref());
    }

    Ok(builder
        .with_openapi(registry, prefix)?
        .with_fallback()
        .with_secret_guard(Arc::new(secret_guard))
        .with_timeout(settings.server.request_timeout_ms)
        .with_error_envelope()
        .with_cors()
        .with_tracing()
        .with_request_id()
        .build())
}

async fn home() -> Html<&'static str> {
    Html("<h1>Welcome to sunnah.com API.</h1>")
}

async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
