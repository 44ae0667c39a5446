//! Persistence collaborator for processed templates

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::processor::ProcessedTemplate;

/// A processed template persisted with its load-test settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub id: Uuid,
    pub user_id: String,
    pub method: String,
    pub full_path: String,
    pub summary: String,
    pub request_body: Option<String>,
    pub request_field_info: Option<String>,
    pub request_headers: String,
    pub total_requests: u32,
    pub threads: u32,
    pub created_at: DateTime<Utc>,
}

/// Trait for template persistence backends
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Persist one processed template for a user's load-test run
    async fn save(
        &self,
        template: &ProcessedTemplate,
        user_id: &str,
        total_requests: u32,
        threads: u32,
    ) -> Result<StoredTemplate>;
}

/// In-memory store, for embedding and tests
#[derive(Default)]
pub struct MemoryTemplateStore {
    records: RwLock<Vec<StoredTemplate>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records saved so far, in insertion order
    pub async fn records(&self) -> Vec<StoredTemplate> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn save(
        &self,
        template: &ProcessedTemplate,
        user_id: &str,
        total_requests: u32,
        threads: u32,
    ) -> Result<StoredTemplate> {
        let record = StoredTemplate {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            method: template.method.clone(),
            full_path: template.full_path.clone(),
            summary: template.summary.clone(),
            request_body: template.request_body.clone(),
            request_field_info: template.request_field_info.clone(),
            request_headers: template.request_headers.clone(),
            total_requests,
            threads,
            created_at: Utc::now(),
        };

        self.records.write().await.push(record.clone());
        Ok(record)
    }
}
