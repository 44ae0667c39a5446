//! Endpoint enumeration from a parsed document

use serde::Serialize;
use tracing::debug;

use crate::document::{ApiDocument, HttpMethod, Parameter, RequestBodySpec};

/// A normalized view of one (path, HTTP method) pair
#[derive(Debug, Clone, Serialize)]
pub struct Endpoint {
    /// 1-based sequence number in document traversal order; stable only
    /// within a single extraction run, never a cross-run identity
    pub id: u32,
    pub method: HttpMethod,
    pub path: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBodySpec>,
}

/// Enumerates a document's endpoints in declaration order
pub struct EndpointExtractor;

impl EndpointExtractor {
    pub fn extract(document: &ApiDocument) -> Vec<Endpoint> {
        let mut endpoints = Vec::new();
        let mut next_id = 1u32;

        for (path, path_item) in &document.paths {
            for (method, operation) in path_item.operations() {
                // Path-level parameters apply to every operation under the
                // path; an operation-level parameter with the same name wins.
                let mut parameters = path_item.parameters.clone();
                for param in &operation.parameters {
                    parameters.retain(|existing| existing.name != param.name);
                    parameters.push(param.clone());
                }

                endpoints.push(Endpoint {
                    id: next_id,
                    method,
                    path: path.clone(),
                    summary: operation.summary.clone().unwrap_or_default(),
                    tags: operation.tags.clone(),
                    parameters,
                    request_body: operation.request_body.clone(),
                });
                next_id += 1;
            }
        }

        debug!("Enumerated {} endpoints", endpoints.len());
        endpoints
    }
}
