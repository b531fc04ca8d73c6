//! Builders for the OpenAPI fragments the modules contribute.

use serde_json::{json, Value};

pub fn path_param(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "path",
        "required": true,
        "description": description,
        "schema": {"type": "string"}
    })
}

pub fn query_param(name: &str, description: &str, schema: Value) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "description": description,
        "schema": schema
    })
}

pub fn page_param() -> Value {
    query_param(
        "page",
        "1-indexed page number",
        json!({"type": "integer", "minimum": 1, "default": 1}),
    )
}

pub fn limit_param() -> Value {
    query_param(
        "limit",
        "Items per page, clamped to 100",
        json!({"type": "integer", "minimum": 1, "default": 50}),
    )
}

/// A GET operation with the error responses every route can produce.
pub fn operation(summary: &str, tag: &str, parameters: Value, ok: Value) -> Value {
    json!({
        "summary": summary,
        "tags": [tag],
        "parameters": parameters,
        "responses": {
            "200": ok,
            "400": error("Malformed query parameters"),
            "401": error("Missing or incorrect shared secret"),
            "404": error("Not found"),
            "500": error("Internal server error")
        }
    })
}

fn error(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {"schema": {"$ref": "#/components/schemas/Error"}}
        }
    })
}

pub fn one_of(schema: &str) -> Value {
    json!({
        "description": schema,
        "content": {
            "application/json": {"schema": {"$ref": format!("#/components/schemas/{schema}")}}
        }
    })
}

pub fn page_of(schema: &str) -> Value {
    json!({
        "description": format!("Page of {schema} records"),
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "data": {
                            "type": "array",
                            "items": {"$ref": format!("#/components/schemas/{schema}")}
                        },
                        "total": {"type": "integer"},
                        "limit": {"type": "integer"},
                        "previous": {"type": ["integer", "null"]},
                        "next": {"type": ["integer", "null"]}
                    }
                }
            }
        }
    })
}
