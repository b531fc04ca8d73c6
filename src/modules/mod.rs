pub mod collections;
pub mod hadiths;
mod openapi;

use hadith_db::SharedStore;
use hadith_kernel::{settings::Settings, ModuleRegistry};

/// Register every API module, sharing one store handle between them.
pub fn register_all(
    registry: &mut ModuleRegistry,
    store: SharedStore,
    settings: &Settings,
) -> anyhow::Result<()> {
    registry.register(collections::create_module(store.clone()))?;
    registry.register(hadiths::create_module(store, &settings.api.random_collection))?;
    Ok(())
}
