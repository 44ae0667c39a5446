//! Endpoint processing: composing paths, bodies, and headers into templates

use indexmap::IndexMap;
use openapi_ingest::{ApiDocument, Endpoint, EndpointExtractor};
use serde::Serialize;
use tracing::{debug, warn};

use crate::base_url::BaseUrlResolver;
use crate::path::PathComposer;
use crate::security::{SecurityContext, SecurityResolver};
use crate::walker::SchemaWalker;

/// A finished synthetic call template for one endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedTemplate {
    pub method: String,
    pub full_path: String,
    pub summary: String,
    /// JSON-encoded synthetic body, when the endpoint declares a body schema
    pub request_body: Option<String>,
    /// JSON-encoded field descriptor tree mirroring the body
    pub request_field_info: Option<String>,
    /// JSON-encoded header map, always at least Content-Type
    pub request_headers: String,
}

/// Minimal endpoint listing used to pick `selected_ids`
#[derive(Debug, Clone, Serialize)]
pub struct EndpointPath {
    pub id: u32,
    pub method: String,
    pub path: String,
}

/// Builds call templates for a document's endpoints
pub struct EndpointProcessor;

impl EndpointProcessor {
    /// Build templates for every selected endpoint, preserving document order.
    ///
    /// An empty `selected_ids` selects every endpoint. Ids are assigned per
    /// invocation and are never a cross-run identity. Security is resolved
    /// once and reused for every endpoint; each body walk starts with a
    /// fresh visited-reference set.
    pub fn process(
        document: &ApiDocument,
        document_url: &str,
        selected_ids: &[u32],
        token: Option<&str>,
    ) -> Vec<ProcessedTemplate> {
        let base_url = BaseUrlResolver::resolve(document_url);
        let security = SecurityResolver::resolve(
            &document.security_requirements(),
            document.security_schemes(),
            token,
        );
        let walker = SchemaWalker::new(document.schema_definitions());

        EndpointExtractor::extract(document)
            .iter()
            .filter(|endpoint| selected_ids.is_empty() || selected_ids.contains(&endpoint.id))
            .map(|endpoint| Self::build_template(endpoint, &base_url, &security, &walker))
            .collect()
    }

    /// List `{id, method, path}` for every endpoint in the document
    pub fn endpoint_paths(document: &ApiDocument) -> Vec<EndpointPath> {
        EndpointExtractor::extract(document)
            .into_iter()
            .map(|endpoint| EndpointPath {
                id: endpoint.id,
                method: endpoint.method.to_string(),
                path: endpoint.path,
            })
            .collect()
    }

    fn build_template(
        endpoint: &Endpoint,
        base_url: &str,
        security: &SecurityContext,
        walker: &SchemaWalker,
    ) -> ProcessedTemplate {
        let path = PathComposer::compose(&endpoint.path, &endpoint.parameters);
        let full_path = format!("{}{}", base_url, path);

        // Body synthesis degrades to null rather than failing the endpoint.
        let (request_body, request_field_info) = match Self::build_body(endpoint, walker) {
            Ok(body) => body,
            Err(error) => {
                warn!(
                    "Failed to synthesize body for {} {}: {}",
                    endpoint.method, endpoint.path, error
                );
                (None, None)
            }
        };

        debug!(
            "Processed endpoint {} {} {}",
            endpoint.id, endpoint.method, endpoint.path
        );

        ProcessedTemplate {
            method: endpoint.method.to_string(),
            full_path,
            summary: endpoint.summary.clone(),
            request_body,
            request_field_info,
            request_headers: Self::build_headers(security),
        }
    }

    fn build_body(
        endpoint: &Endpoint,
        walker: &SchemaWalker,
    ) -> crate::Result<(Option<String>, Option<String>)> {
        let schema = endpoint
            .request_body
            .as_ref()
            .and_then(|body| body.primary_schema());
        let schema = match schema {
            Some(schema) => schema,
            None => return Ok((None, None)),
        };

        let (value, descriptor) = walker.walk_root(schema);
        Ok((
            Some(serde_json::to_string(&value)?),
            Some(serde_json::to_string(&descriptor)?),
        ))
    }

    fn build_headers(security: &SecurityContext) -> String {
        let mut headers = IndexMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if !security.is_empty() {
            headers.insert(security.header_name.clone(), security.header_value.clone());
        }

        serde_json::to_string(&headers)
            .unwrap_or_else(|_| r#"{"Content-Type":"application/json"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const DOCUMENT_URL: &str = "https://api.test.com/v3/api-docs";

    fn sample_document() -> ApiDocument {
        serde_json::from_value(json!({
            "openapi": "3.0.0",
            "paths": {
                "/users": {
                    "get": {
                        "summary": "List users",
                        "parameters": [
                            {"name": "page", "in": "query"}
                        ]
                    },
                    "post": {
                        "summary": "Create a user",
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/User"}
                                }
                            }
                        }
                    }
                },
                "/users/{id}": {
                    "get": {
                        "summary": "Get a user",
                        "parameters": [
                            {"name": "id", "in": "path", "required": true}
                        ]
                    }
                }
            },
            "components": {
                "schemas": {
                    "User": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "email": {"type": "string", "format": "email"}
                        },
                        "required": ["name"]
                    }
                },
                "securitySchemes": {
                    "bearerAuth": {"type": "http", "scheme": "bearer"}
                }
            },
            "security": [{"bearerAuth": []}]
        }))
        .unwrap()
    }

    #[test]
    fn test_process_all_endpoints_in_order() {
        let templates =
            EndpointProcessor::process(&sample_document(), DOCUMENT_URL, &[], None);

        assert_eq!(templates.len(), 3);
        assert_eq!(templates[0].method, "GET");
        assert_eq!(
            templates[0].full_path,
            "https://api.test.com/users?page=dummy_value"
        );
        assert_eq!(templates[1].method, "POST");
        assert_eq!(templates[2].full_path, "https://api.test.com/users/dummy_id");
    }

    #[test]
    fn test_selected_ids_filter() {
        let templates =
            EndpointProcessor::process(&sample_document(), DOCUMENT_URL, &[2], None);

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].method, "POST");
        assert_eq!(templates[0].summary, "Create a user");
    }

    #[test]
    fn test_body_synthesized_from_reference() {
        let templates =
            EndpointProcessor::process(&sample_document(), DOCUMENT_URL, &[2], None);

        let body: Value =
            serde_json::from_str(templates[0].request_body.as_ref().unwrap()).unwrap();
        assert_eq!(body["name"], json!("dummy_value"));
        assert_eq!(body["email"], json!("user@example.com"));

        let info: Value =
            serde_json::from_str(templates[0].request_field_info.as_ref().unwrap()).unwrap();
        assert_eq!(info["referenceName"], json!("User"));
        assert_eq!(info["properties"]["name"]["required"], json!(true));
        assert_eq!(info["properties"]["email"]["path"], json!("email"));
    }

    #[test]
    fn test_bodyless_endpoint_degrades_to_null() {
        let templates =
            EndpointProcessor::process(&sample_document(), DOCUMENT_URL, &[1], None);

        assert!(templates[0].request_body.is_none());
        assert!(templates[0].request_field_info.is_none());
    }

    #[test]
    fn test_headers_without_token() {
        let templates =
            EndpointProcessor::process(&sample_document(), DOCUMENT_URL, &[1], None);

        let headers: Value = serde_json::from_str(&templates[0].request_headers).unwrap();
        assert_eq!(headers["Content-Type"], json!("application/json"));
        assert!(headers.get("Authorization").is_none());
    }

    #[test]
    fn test_headers_with_token() {
        let templates =
            EndpointProcessor::process(&sample_document(), DOCUMENT_URL, &[1], Some("abc"));

        let headers: Value = serde_json::from_str(&templates[0].request_headers).unwrap();
        assert_eq!(headers["Authorization"], json!("Bearer abc"));
    }

    #[test]
    fn test_endpoint_paths_listing() {
        let paths = EndpointProcessor::endpoint_paths(&sample_document());

        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].id, 1);
        assert_eq!(paths[0].method, "GET");
        assert_eq!(paths[0].path, "/users");
        assert_eq!(paths[2].id, 3);
        assert_eq!(paths[2].path, "/users/{id}");
    }
}
