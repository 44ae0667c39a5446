//! High-level entry points: fetch a document, process it, persist templates

use std::sync::Arc;

use openapi_ingest::{ApiDocument, DocumentParser};
use tracing::info;

use crate::error::Result;
use crate::processor::{EndpointPath, EndpointProcessor, ProcessedTemplate};
use crate::store::{StoredTemplate, TemplateStore};

/// Options for the preview entry points
#[derive(Debug, Clone, Default)]
pub struct PreviewOptions {
    pub document_url: String,
    /// Empty selects every endpoint
    pub selected_ids: Vec<u32>,
    pub token: Option<String>,
}

/// Options for a persisted load-test preparation run
#[derive(Debug, Clone)]
pub struct LoadTestOptions {
    pub document_url: String,
    pub user_id: String,
    pub total_requests: u32,
    pub threads: u32,
    /// Empty selects every endpoint
    pub selected_ids: Vec<u32>,
    pub token: Option<String>,
}

/// Fetches documents and drives endpoint processing against a store
pub struct TemplateService {
    store: Arc<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Process every selected endpoint and persist one record per template.
    ///
    /// Templates are saved in document order, one awaited save per endpoint;
    /// a persistence failure fails the whole call.
    pub async fn prepare_load_test(&self, options: &LoadTestOptions) -> Result<Vec<StoredTemplate>> {
        let document = DocumentParser::fetch_and_parse(&options.document_url).await?;
        self.persist_templates(&document, options).await
    }

    /// Process an already-parsed document and persist the results
    pub async fn persist_templates(
        &self,
        document: &ApiDocument,
        options: &LoadTestOptions,
    ) -> Result<Vec<StoredTemplate>> {
        let templates = EndpointProcessor::process(
            document,
            &options.document_url,
            &options.selected_ids,
            options.token.as_deref(),
        );

        let mut stored = Vec::with_capacity(templates.len());
        for template in &templates {
            let record = self
                .store
                .save(
                    template,
                    &options.user_id,
                    options.total_requests,
                    options.threads,
                )
                .await?;
            stored.push(record);
        }

        info!(
            "Processed and persisted {} endpoints from {}",
            stored.len(),
            options.document_url
        );
        Ok(stored)
    }

    /// Build templates without persisting them, for preview/selection
    pub async fn extract_request_body_templates(
        &self,
        options: &PreviewOptions,
    ) -> Result<Vec<ProcessedTemplate>> {
        let document = DocumentParser::fetch_and_parse(&options.document_url).await?;
        Ok(EndpointProcessor::process(
            &document,
            &options.document_url,
            &options.selected_ids,
            options.token.as_deref(),
        ))
    }

    /// List endpoint ids, methods, and paths for selection
    pub async fn endpoint_paths(&self, document_url: &str) -> Result<Vec<EndpointPath>> {
        let document = DocumentParser::fetch_and_parse(document_url).await?;
        Ok(EndpointProcessor::endpoint_paths(&document))
    }
}
