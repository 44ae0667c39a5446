//! Data model for ingested OpenAPI/Swagger documents
//!
//! Every field is decoded defensively (optional or defaulted, unknown
//! fields ignored) so a sloppy document still yields a usable model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP methods an operation can be declared under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a declared parameter is carried in the request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    /// Anything else a document declares (Swagger 2.0 `body`, missing `in`)
    #[default]
    #[serde(other)]
    Other,
}

/// A JSON-Schema-like node as it appears in the document
///
/// Immutable input to the schema walker; never mutated after decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Pointer to a named schema, e.g. `#/components/schemas/User`
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,
    /// Names of required properties, meaningful on `object` nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl SchemaNode {
    /// Reference name: the last `/` segment of the `$ref` pointer
    pub fn reference_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|pointer| pointer.rsplit('/').next())
    }
}

/// A declared operation parameter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
}

/// One media-type entry under a request body's `content`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
}

/// Declared request body for an operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBodySpec {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RequestBodySpec {
    /// Schema of the JSON media type, falling back to the first declared entry
    pub fn primary_schema(&self) -> Option<&SchemaNode> {
        self.content
            .iter()
            .find(|(content_type, _)| content_type.contains("json"))
            .or_else(|| self.content.first())
            .and_then(|(_, media)| media.schema.as_ref())
    }
}

/// One operation under a path template
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBodySpec>,
}

/// All operations declared under one path template
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub patch: Option<Operation>,
    pub delete: Option<Operation>,
    pub head: Option<Operation>,
    pub options: Option<Operation>,
    pub trace: Option<Operation>,
    /// Parameters shared by every operation under this path
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// Declared operations, in the fixed method order used for enumeration
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> + '_ {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, operation)| operation.as_ref().map(|op| (method, op)))
    }
}

/// A security scheme as declared in the document, decoded loosely
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySchemeDef {
    #[serde(rename = "type", default)]
    pub scheme_type: String,
    /// Header/query parameter name, for `apiKey` schemes
    pub name: Option<String>,
    #[serde(rename = "in")]
    pub location: Option<String>,
    /// HTTP auth scheme (`basic`, `bearer`), for `http` schemes
    pub scheme: Option<String>,
    pub bearer_format: Option<String>,
}

/// A single named entry flattened from the document's `security` list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityRequirement {
    pub scheme_name: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaNode>,
    #[serde(default)]
    pub security_schemes: IndexMap<String, SecuritySchemeDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
}

/// A parsed OpenAPI 3.x or Swagger 2.0 document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDocument {
    pub openapi: Option<String>,
    pub swagger: Option<String>,
    pub info: Option<Info>,
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    pub components: Option<Components>,
    /// Swagger 2.0 schema definitions
    #[serde(default)]
    pub definitions: IndexMap<String, SchemaNode>,
    #[serde(default)]
    pub security: Vec<IndexMap<String, Vec<String>>>,
    /// Swagger 2.0 security schemes
    #[serde(default, rename = "securityDefinitions")]
    pub security_definitions: IndexMap<String, SecuritySchemeDef>,
}

impl ApiDocument {
    /// Named schema definitions, wherever the document declares them
    pub fn schema_definitions(&self) -> &IndexMap<String, SchemaNode> {
        match &self.components {
            Some(components) if !components.schemas.is_empty() => &components.schemas,
            _ => &self.definitions,
        }
    }

    /// Named security schemes, wherever the document declares them
    pub fn security_schemes(&self) -> &IndexMap<String, SecuritySchemeDef> {
        match &self.components {
            Some(components) if !components.security_schemes.is_empty() => {
                &components.security_schemes
            }
            _ => &self.security_definitions,
        }
    }

    /// Top-level security requirements, flattened in declaration order
    pub fn security_requirements(&self) -> Vec<SecurityRequirement> {
        self.security
            .iter()
            .flat_map(|requirement| {
                requirement.iter().map(|(name, scopes)| SecurityRequirement {
                    scheme_name: name.clone(),
                    scopes: scopes.clone(),
                })
            })
            .collect()
    }
}
