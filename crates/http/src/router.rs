//! Router builder for the hadith HTTP server
//!
//! Axum layers only wrap the routes registered before them, so mount every
//! route and the fallback first and add middleware afterwards.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    http::{
        header::{HeaderName, ALLOW, CONTENT_TYPE},
        HeaderValue, Method, Request, StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{Timestamp, Uuid};

use hadith_authz::SecretGuard;
use hadith_kernel::{Module, ModuleRegistry};

use crate::error::AppError;
use crate::guard;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builder for constructing the main HTTP router
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Nest a module's router at its mount path below `prefix`
    pub fn mount_module(mut self, prefix: &str, module: &dyn Module) -> Self {
        let path = module.mount_path(prefix);
        tracing::info!(module = module.name(), path = %path, "mounting module routes");
        self.router = self.router.nest(&path, module.routes());
        self
    }

    /// Answer unmatched paths with the JSON not-found body
    pub fn with_fallback(mut self) -> Self {
        self.router = self.router.fallback(not_found);
        self
    }

    /// Serve the merged OpenAPI document at `/docs/openapi.json` and Swagger UI
    /// at `/swagger-ui`. Fails when the merged document is not valid OpenAPI 3.1.
    pub fn with_openapi(
        mut self,
        registry: &ModuleRegistry,
        prefix: &str,
    ) -> anyhow::Result<Self> {
        let document = merged_openapi(registry, prefix);
        let openapi: utoipa::openapi::OpenApi = serde_json::from_value(document.clone())
            .context("merged OpenAPI document is invalid")?;

        self.router = self
            .router
            .merge(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                    .url("/api-docs/openapi.json", openapi),
            )
            .route(
                "/docs/openapi.json",
                get(move || async move { axum::Json(document.clone()) }),
            );
        Ok(self)
    }

    /// Require the shared secret on every route except the exempt ones
    pub fn with_secret_guard(mut self, secret_guard: Arc<SecretGuard>) -> Self {
        self.router = self.router.layer(middleware::from_fn_with_state(
            secret_guard,
            guard::require_secret,
        ));
        self
    }

    /// Answer requests running longer than `timeout_ms` with 408
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self.router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_millis(timeout_ms),
        ));
        self
    }

    /// Give the bodiless 405 and 408 responses produced by routing and the
    /// timeout layer the JSON error body. Add after `with_timeout`.
    pub fn with_error_envelope(mut self) -> Self {
        self.router = self.router.layer(middleware::map_response(envelope_bare_errors));
        self
    }

    /// Allow read-only cross-origin access
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers(Any),
        );
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Tag requests and responses with a UUIDv7 `x-request-id`. Add after
    /// tracing so the request span sees the id.
    pub fn with_request_id(mut self) -> Self {
        let header = HeaderName::from_static(REQUEST_ID_HEADER);
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::new(header.clone()))
            .layer(SetRequestIdLayer::new(header, MakeRequestUuidV7));
        self
    }

    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn not_found() -> AppError {
    AppError::not_found()
}

async fn envelope_bare_errors(response: Response) -> Response {
    if response.headers().contains_key(CONTENT_TYPE) {
        return response;
    }

    let error = match response.status() {
        StatusCode::METHOD_NOT_ALLOWED => AppError::method_not_allowed(),
        StatusCode::REQUEST_TIMEOUT => AppError::timeout(),
        _ => return response,
    };

    let mut enveloped = error.into_response();
    if let Some(allow) = response.headers().get(ALLOW) {
        enveloped.headers_mut().insert(ALLOW, allow.clone());
    }
    enveloped
}

/// Request ID generator for tracing
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}

/// Base document plus every module fragment, with module paths rebased onto
/// their mount point.
fn merged_openapi(registry: &ModuleRegistry, prefix: &str) -> Value {
    let mut document = json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Hadith API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Read-only access to hadith collections, books, chapters and hadiths"
        },
        "paths": {
            "/healthz": {
                "get": {
                    "summary": "Health check",
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {"text/plain": {"schema": {"type": "string"}}}
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Error": {
                    "type": "object",
                    "properties": {
                        "error": {
                            "type": "object",
                            "properties": {
                                "details": {"type": "string"},
                                "code": {"type": "integer"}
                            },
                            "required": ["details", "code"]
                        }
                    },
                    "required": ["error"]
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(fragment) = module.openapi() else {
            continue;
        };
        let base = module.mount_path(prefix);

        if let Some(paths) = fragment.get("paths").and_then(Value::as_object) {
            for (path, item) in paths {
                let full = if path == "/" {
                    base.clone()
                } else {
                    format!("{base}{path}")
                };
                document["paths"][full] = item.clone();
            }
        }

        if let Some(schemas) = fragment
            .pointer("/components/schemas")
            .and_then(Value::as_object)
        {
            for (name, schema) in schemas {
                document["components"]["schemas"][name] = schema.clone();
            }
        }
    }

    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use tower::ServiceExt;

    struct Echo;

    #[async_trait]
    impl Module for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn routes(&self) -> Router {
            Router::new()
                .route("/", get(|| async { "root" }))
                .route("/{word}", get(|| async { "word" }))
        }

        fn openapi(&self) -> Option<Value> {
            let ok = json!({"responses": {"200": {"description": "OK"}}});
            Some(json!({
                "paths": {"/": {"get": ok.clone()}, "/{word}": {"get": ok}},
                "components": {"schemas": {"Word": {"type": ["string", "null"]}}}
            }))
        }
    }

    /// Declares an operation without responses.
    struct Broken;

    #[async_trait]
    impl Module for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn openapi(&self) -> Option<Value> {
            Some(json!({"paths": {"/": {"get": {"summary": "no responses"}}}}))
        }
    }

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(Echo)).unwrap();
        registry
    }

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn get_status(router: Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn openapi_fragments_are_rebased() {
        let document = merged_openapi(&registry(), "/v1");
        let paths = document["paths"].as_object().unwrap();
        assert!(paths.contains_key("/v1/echo"));
        assert!(paths.contains_key("/v1/echo/{word}"));
        assert!(paths.contains_key("/healthz"));
        assert_eq!(document["openapi"], "3.1.0");
        assert_eq!(
            document["components"]["schemas"]["Word"]["type"],
            json!(["string", "null"])
        );
    }

    #[tokio::test]
    async fn swagger_ui_serves_the_merged_document() {
        let router = RouterBuilder::new()
            .mount_module("/v1", &Echo)
            .with_openapi(&registry(), "/v1")
            .unwrap()
            .build();

        let response = router
            .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let document = body_json(response).await;
        let paths = document["paths"].as_object().unwrap();
        assert!(paths.contains_key("/v1/echo"));
        assert!(paths.contains_key("/v1/echo/{word}"));
        assert!(paths.contains_key("/healthz"));
    }

    #[test]
    fn invalid_openapi_fragment_is_an_error() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(Broken)).unwrap();

        assert!(RouterBuilder::new().with_openapi(&registry, "/v1").is_err());
    }

    #[tokio::test]
    async fn wrong_method_gets_json_error() {
        let router = RouterBuilder::new()
            .mount_module("/v1", &Echo)
            .with_fallback()
            .with_error_envelope()
            .build();

        let response = router
            .oneshot(Request::post("/v1/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(ALLOW));

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], 405);
        assert_eq!(
            body["error"]["details"],
            crate::error::METHOD_NOT_ALLOWED_DETAILS
        );
    }

    #[tokio::test]
    async fn slow_request_gets_json_timeout() {
        let router = RouterBuilder::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    "late"
                }),
            )
            .with_timeout(10)
            .with_error_envelope()
            .build();

        let response = router
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], 408);
        assert!(body["error"]["details"].is_string());
    }

    #[tokio::test]
    async fn mounted_module_and_fallback() {
        let router = RouterBuilder::new()
            .mount_module("/v1", &Echo)
            .with_fallback()
            .build();

        assert_eq!(get_status(router.clone(), "/v1/echo").await, StatusCode::OK);
        assert_eq!(get_status(router.clone(), "/v1/echo/hi").await, StatusCode::OK);

        let response = router
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], 404);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let router = RouterBuilder::new()
            .route("/ping", get(|| async { "pong" }))
            .with_tracing()
            .with_request_id()
            .build();

        let response = router
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn secret_guard_spares_health_check() {
        let router = RouterBuilder::new()
            .route("/healthz", get(|| async { "ok" }))
            .route("/private", get(|| async { "secret" }))
            .with_fallback()
            .with_secret_guard(Arc::new(SecretGuard::require("x-aws-secret", "s3cret")))
            .build();

        assert_eq!(get_status(router.clone(), "/healthz").await, StatusCode::OK);
        assert_eq!(
            get_status(router.clone(), "/private").await,
            StatusCode::UNAUTHORIZED
        );

        let response = router
            .oneshot(
                Request::get("/private")
                    .header("x-aws-secret", "s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
