//! Document parsing and fetching

use regex::Regex;
use tracing::{debug, info, warn};

use crate::document::ApiDocument;
use crate::error::{IngestError, IngestResult};

/// Parses OpenAPI 3.x and Swagger 2.0 documents from JSON or YAML
pub struct DocumentParser;

impl DocumentParser {
    /// Parse a document from a string (auto-detects JSON/YAML)
    pub fn parse(content: &str) -> IngestResult<ApiDocument> {
        let content = Self::sanitize_large_numbers(content);

        let document: ApiDocument = if content.trim_start().starts_with('{') {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        Ok(Self::checked(document))
    }

    /// Parse a document from JSON
    pub fn parse_json(content: &str) -> IngestResult<ApiDocument> {
        let content = Self::sanitize_large_numbers(content);
        let document: ApiDocument = serde_json::from_str(&content)?;
        Ok(Self::checked(document))
    }

    /// Parse a document from YAML
    pub fn parse_yaml(content: &str) -> IngestResult<ApiDocument> {
        let content = Self::sanitize_large_numbers(content);
        let document: ApiDocument = serde_yaml::from_str(&content)?;
        Ok(Self::checked(document))
    }

    fn checked(document: ApiDocument) -> ApiDocument {
        if document.openapi.is_none() && document.swagger.is_none() {
            warn!("Document declares neither an openapi nor a swagger version");
        }
        if let Some(info) = &document.info {
            debug!("Parsed document: {} {}", info.title, info.version);
        }
        document
    }

    /// Clamp numeric constraint values too large for safe JSON parsing.
    /// Some real-world documents carry 64-bit-overflowing min/max bounds
    /// that serde otherwise rejects; the exact value never matters here.
    fn sanitize_large_numbers(content: &str) -> String {
        let re_large = Regex::new(
            r#"("?(?:minimum|maximum|exclusiveMinimum|exclusiveMaximum)"?\s*:\s*)(-?\d{16,})"#,
        )
        .unwrap();

        re_large
            .replace_all(content, |caps: &regex::Captures| {
                let prefix = &caps[1];
                if caps[2].starts_with('-') {
                    format!("{}-2147483648", prefix)
                } else {
                    format!("{}2147483647", prefix)
                }
            })
            .into_owned()
    }

    /// Fetch and parse a document from a URL
    pub async fn fetch_and_parse(url: &str) -> IngestResult<ApiDocument> {
        info!("Fetching API document from: {}", url);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| IngestError::Http(e.to_string()))?;

        let response = client
            .get(url)
            .header("Accept", "application/json, application/yaml, text/yaml")
            .send()
            .await
            .map_err(|e| IngestError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IngestError::Fetch(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let content = response
            .text()
            .await
            .map_err(|e| IngestError::Fetch(e.to_string()))?;

        if content_type.contains("yaml") || url.ends_with(".yaml") || url.ends_with(".yml") {
            Self::parse_yaml(&content)
        } else {
            Self::parse(&content)
        }
    }
}
