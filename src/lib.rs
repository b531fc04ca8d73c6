//! Hadith API application library
//!
//! Wires the `collections` and `hadiths` modules to a store and serves them
//! through the shared HTTP stack.

use anyhow::Context;
use axum::Router;
use hadith_db::SharedStore;
use hadith_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;
pub mod utils;

/// Registry holding every API module bound to `store`.
pub fn registry(store: SharedStore, settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, settings)?;
    Ok(registry)
}

/// Complete router over `store`, without binding a socket.
pub async fn app(store: SharedStore, settings: &Settings) -> anyhow::Result<Router> {
    let registry = registry(store, settings)?;
    hadith_http::build_router(&registry, settings).await
}

/// Connect the configured store, start every module and serve until shutdown.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = hadith_db::connect(&settings.database)
        .await
        .context("failed to open the hadith store")?;

    let registry = registry(store, &settings)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;
    tracing::info!(modules = registry.len(), "hadith-api bootstrap complete");

    let served = hadith_http::start_server(&registry, &settings).await;
    registry.stop_all().await?;
    served
}
