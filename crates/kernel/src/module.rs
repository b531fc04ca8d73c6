//! The contract between the server and the API modules it mounts.

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;

use crate::settings::Settings;

/// What a module sees while it is brought up.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// One group of API routes with its own lifecycle.
///
/// A module owns its handles (store, configuration values) from construction,
/// so `routes` hands out a router whose state is already attached.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name, used as the last segment of the mount path.
    fn name(&self) -> &'static str;

    /// Path the routes are nested under, below the API prefix.
    fn mount_path(&self, prefix: &str) -> String {
        format!("{}/{}", prefix.trim_end_matches('/'), self.name())
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment (`paths` relative to the mount path, plus
    /// `components.schemas`) merged into the served document.
    fn openapi(&self) -> Option<Value> {
        None
    }

    /// Called after every module has been initialized, before serving.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called after the server has stopped.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named;

    #[async_trait]
    impl Module for Named {
        fn name(&self) -> &'static str {
            "hadiths"
        }
    }

    #[test]
    fn mount_path_joins_prefix_and_name() {
        assert_eq!(Named.mount_path("/v1"), "/v1/hadiths");
        assert_eq!(Named.mount_path("/v1/"), "/v1/hadiths");
        assert_eq!(Named.mount_path(""), "/hadiths");
    }

    #[test]
    fn defaults_are_empty() {
        assert!(Named.openapi().is_none());
    }
}
