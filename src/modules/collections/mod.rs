//! Browsing the corpus hierarchy: collections, their published books, the
//! chapters of a book and the hadiths of a book or collection.

mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use hadith_db::SharedStore;
use hadith_kernel::{InitCtx, Module};
use serde_json::{json, Value};

use super::openapi;

pub struct CollectionsModule {
    store: SharedStore,
}

impl CollectionsModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for CollectionsModule {
    fn name(&self) -> &'static str {
        "collections"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "collections module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<Value> {
        let name = || openapi::path_param("name", "Collection name, e.g. `bukhari`");
        let book = || {
            openapi::path_param(
                "bookNumber",
                "Display book number: `introduction`, `N` or `Nb`",
            )
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": openapi::operation(
                        "List collections",
                        "Collections",
                        json!([openapi::page_param(), openapi::limit_param()]),
                        openapi::page_of("Collection"),
                    )
                },
                "/{name}": {
                    "get": openapi::operation(
                        "Get a collection",
                        "Collections",
                        json!([name()]),
                        openapi::one_of("Collection"),
                    )
                },
                "/{name}/books": {
                    "get": openapi::operation(
                        "List the published books of a collection",
                        "Books",
                        json!([name(), openapi::page_param(), openapi::limit_param()]),
                        openapi::page_of("Book"),
                    )
                },
                "/{name}/books/{bookNumber}": {
                    "get": openapi::operation(
                        "Get a published book",
                        "Books",
                        json!([name(), book()]),
                        openapi::one_of("Book"),
                    )
                },
                "/{name}/books/{bookNumber}/hadiths": {
                    "get": openapi::operation(
                        "List the hadiths of a book",
                        "Hadiths",
                        json!([name(), book(), openapi::page_param(), openapi::limit_param()]),
                        openapi::page_of("Hadith"),
                    )
                },
                "/{name}/books/{bookNumber}/chapters": {
                    "get": openapi::operation(
                        "List the chapters of a book",
                        "Chapters",
                        json!([name(), book(), openapi::page_param(), openapi::limit_param()]),
                        openapi::page_of("Chapter"),
                    )
                },
                "/{name}/books/{bookNumber}/chapters/{chapterId}": {
                    "get": openapi::operation(
                        "Get a chapter",
                        "Chapters",
                        json!([
                            name(),
                            book(),
                            openapi::path_param(
                                "chapterId",
                                "Chapter number as a dotted decimal, e.g. `1.0` or `2.5`"
                            )
                        ]),
                        openapi::one_of("Chapter"),
                    )
                },
                "/{name}/hadiths/{hadithNumber}": {
                    "get": openapi::operation(
                        "Get a hadith by its number within the collection",
                        "Hadiths",
                        json!([
                            name(),
                            openapi::path_param("hadithNumber", "Collection-scoped hadith number")
                        ]),
                        openapi::one_of("Hadith"),
                    )
                }
            },
            "components": {
                "schemas": {
                    "Collection": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "hasBooks": {"type": "boolean"},
                            "hasChapters": {"type": "boolean"},
                            "collection": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "lang": {"type": "string", "enum": ["en", "ar"]},
                                        "title": {"type": "string"},
                                        "shortIntro": {"type": ["string", "null"]}
                                    }
                                }
                            },
                            "totalHadith": {"type": "integer"},
                            "totalAvailableHadith": {"type": "integer"}
                        }
                    },
                    "Book": {
                        "type": "object",
                        "properties": {
                            "bookNumber": {"type": "string"},
                            "book": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "lang": {"type": "string", "enum": ["en", "ar"]},
                                        "name": {"type": "string"}
                                    }
                                }
                            },
                            "hadithStartNumber": {"type": "integer"},
                            "hadithEndNumber": {"type": "integer"},
                            "numberOfHadith": {"type": "integer"}
                        }
                    },
                    "Chapter": {
                        "type": "object",
                        "properties": {
                            "bookNumber": {"type": "string"},
                            "chapterId": {"type": "number"},
                            "chapter": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "lang": {"type": "string", "enum": ["en", "ar"]},
                                        "chapterNumber": {"type": ["string", "null"]},
                                        "chapterTitle": {"type": ["string", "null"]},
                                        "intro": {"type": ["string", "null"]},
                                        "ending": {"type": ["string", "null"]}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }))
    }
}

pub fn create_module(store: SharedStore) -> Arc<dyn Module> {
    Arc::new(CollectionsModule::new(store))
}
