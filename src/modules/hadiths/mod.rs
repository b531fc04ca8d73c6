//! Hadith lookups that cut across collections: filtered listing, lookup by
//! either URN, bulk URN resolution and a random pick.

mod filters;
mod resolver;
mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use hadith_db::SharedStore;
use hadith_kernel::{InitCtx, Module};
use serde_json::{json, Value};

use super::openapi;
use routes::HadithsState;

pub use filters::HadithFilters;
pub use resolver::{UrnLookup, MAX_URNS};

pub struct HadithsModule {
    state: HadithsState,
}

impl HadithsModule {
    pub fn new(store: SharedStore, random_collection: &str) -> Self {
        Self {
            state: HadithsState {
                store,
                random_collection: Arc::from(random_collection),
            },
        }
    }
}

#[async_trait]
impl Module for HadithsModule {
    fn name(&self) -> &'static str {
        "hadiths"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            random_collection = %self.state.random_collection,
            "hadiths module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<Value> {
        let text = json!({"type": "string"});

        Some(json!({
            "paths": {
                "/": {
                    "get": openapi::operation(
                        "List hadiths, optionally filtered",
                        "Hadiths",
                        json!([
                            openapi::query_param("collection", "Collection name", text.clone()),
                            openapi::query_param("bookNumber", "Display book number", text.clone()),
                            openapi::query_param(
                                "chapterId",
                                "Chapter number, may be fractional",
                                json!({"type": "number"})
                            ),
                            openapi::query_param(
                                "hadithNumber",
                                "Collection-scoped hadith number",
                                text.clone()
                            ),
                            openapi::page_param(),
                            openapi::limit_param()
                        ]),
                        openapi::page_of("Hadith"),
                    )
                },
                "/{urn}": {
                    "get": openapi::operation(
                        "Get a hadith by English or Arabic URN",
                        "Hadiths",
                        json!([{
                            "name": "urn",
                            "in": "path",
                            "required": true,
                            "schema": {"type": "integer"}
                        }]),
                        openapi::one_of("Hadith"),
                    )
                },
                "/urns": {
                    "get": openapi::operation(
                        "Resolve up to 100 URNs at once",
                        "Hadiths",
                        json!([{
                            "name": "urns",
                            "in": "query",
                            "required": true,
                            "description": "Comma-separated URNs, e.g. `305,306`",
                            "schema": {"type": "string"}
                        }]),
                        json!({
                            "description": "Resolved hadiths in request order and the URNs that matched nothing",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/UrnLookup"}
                                }
                            }
                        }),
                    )
                },
                "/random": {
                    "get": openapi::operation(
                        "Get a random hadith",
                        "Hadiths",
                        json!([]),
                        openapi::one_of("Hadith"),
                    )
                }
            },
            "components": {
                "schemas": {
                    "Hadith": {
                        "type": "object",
                        "properties": {
                            "collection": {"type": "string"},
                            "bookNumber": {"type": "string"},
                            "chapterId": {"type": "number"},
                            "hadithNumber": {"type": "string"},
                            "hadith": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "lang": {"type": "string", "enum": ["en", "ar"]},
                                        "chapterNumber": {"type": ["string", "null"]},
                                        "chapterTitle": {"type": ["string", "null"]},
                                        "urn": {"type": "integer"},
                                        "body": {"type": "string"},
                                        "grades": {
                                            "type": "array",
                                            "items": {
                                                "type": "object",
                                                "properties": {"grade": {"type": "string"}}
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "UrnLookup": {
                        "type": "object",
                        "properties": {
                            "count": {"type": "integer"},
                            "missing": {"type": "array", "items": {"type": "integer"}},
                            "data": {
                                "type": "array",
                                "items": {"$ref": "#/components/schemas/Hadith"}
                            }
                        }
                    }
                }
            }
        }))
    }
}

pub fn create_module(store: SharedStore, random_collection: &str) -> Arc<dyn Module> {
    Arc::new(HadithsModule::new(store, random_collection))
}
