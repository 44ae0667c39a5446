//! Cycle-safe schema walking
//!
//! Converts a schema node into a synthetic JSON value and a structural
//! field descriptor in one pass. A visited-reference set threaded through
//! the recursion breaks `$ref` cycles; each top-level walk starts fresh, so
//! references reused across separate walks are never falsely flagged.

use std::collections::HashSet;

use chrono::Utc;
use indexmap::IndexMap;
use openapi_ingest::SchemaNode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

/// Placeholder for values with no better synthesis rule
pub const PLACEHOLDER: &str = "dummy_value";

/// Fixed example address for `format: email` strings
const EXAMPLE_EMAIL: &str = "user@example.com";

/// Structural metadata for one synthesized field
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    /// Dotted/bracketed address within the body, e.g. `user.addresses[].city`
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "referenceName", skip_serializing_if = "Option::is_none")]
    pub reference_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, FieldDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldDescriptor>>,
}

impl FieldDescriptor {
    fn new(field_type: impl Into<String>, path: &str) -> Self {
        Self {
            field_type: field_type.into(),
            required: false,
            path: path.to_string(),
            format: None,
            enum_values: None,
            minimum: None,
            maximum: None,
            reference_name: None,
            properties: None,
            items: None,
        }
    }
}

/// Closed dispatch over the schema shapes the walker understands
enum SchemaKind<'a> {
    Reference(&'a str),
    Object,
    Array,
    Text,
    Integer,
    Number,
    Boolean,
    Unknown(Option<&'a str>),
}

impl<'a> SchemaKind<'a> {
    fn of(schema: &'a SchemaNode) -> Self {
        // $ref wins over any declared type
        if let Some(name) = schema.reference_name() {
            return SchemaKind::Reference(name);
        }
        match schema.schema_type.as_deref() {
            Some("object") => SchemaKind::Object,
            Some("array") => SchemaKind::Array,
            Some("string") => SchemaKind::Text,
            Some("integer") => SchemaKind::Integer,
            Some("number") => SchemaKind::Number,
            Some("boolean") => SchemaKind::Boolean,
            Some(other) => SchemaKind::Unknown(Some(other)),
            None => SchemaKind::Unknown(None),
        }
    }
}

/// Walks schema nodes into synthetic values and field descriptors
pub struct SchemaWalker<'a> {
    definitions: &'a IndexMap<String, SchemaNode>,
}

impl<'a> SchemaWalker<'a> {
    pub fn new(definitions: &'a IndexMap<String, SchemaNode>) -> Self {
        Self { definitions }
    }

    /// Walk a top-level schema with a fresh visited-reference set
    pub fn walk_root(&self, schema: &SchemaNode) -> (Value, FieldDescriptor) {
        let mut visited = HashSet::new();
        self.walk(schema, &mut visited, "")
    }

    fn walk(
        &self,
        schema: &SchemaNode,
        visited: &mut HashSet<String>,
        path: &str,
    ) -> (Value, FieldDescriptor) {
        match SchemaKind::of(schema) {
            SchemaKind::Reference(name) => self.walk_reference(name, visited, path),
            SchemaKind::Object => self.walk_object(schema, visited, path),
            SchemaKind::Array => self.walk_array(schema, visited, path),
            SchemaKind::Text => Self::text_leaf(schema, path),
            SchemaKind::Integer => Self::numeric_leaf("integer", schema, path),
            SchemaKind::Number => Self::numeric_leaf("number", schema, path),
            SchemaKind::Boolean => (json!(false), FieldDescriptor::new("boolean", path)),
            SchemaKind::Unknown(declared) => (
                json!(PLACEHOLDER),
                FieldDescriptor::new(declared.unwrap_or("unknown"), path),
            ),
        }
    }

    fn walk_reference(
        &self,
        name: &str,
        visited: &mut HashSet<String>,
        path: &str,
    ) -> (Value, FieldDescriptor) {
        if visited.contains(name) {
            // Revisiting a name on this walk means a cycle; cut it here.
            return (
                Self::reference_sentinel(name),
                FieldDescriptor::new("reference", path),
            );
        }
        visited.insert(name.to_string());

        match self.definitions.get(name) {
            Some(definition) => {
                let (value, mut descriptor) = self.walk(definition, visited, path);
                descriptor.reference_name = Some(name.to_string());
                (value, descriptor)
            }
            None => {
                warn!("Schema reference {} has no definition", name);
                let mut descriptor = FieldDescriptor::new("reference", path);
                descriptor.reference_name = Some(name.to_string());
                (Self::reference_sentinel(name), descriptor)
            }
        }
    }

    fn reference_sentinel(name: &str) -> Value {
        json!({ "dummy_reference": name })
    }

    fn walk_object(
        &self,
        schema: &SchemaNode,
        visited: &mut HashSet<String>,
        path: &str,
    ) -> (Value, FieldDescriptor) {
        let mut value = serde_json::Map::new();
        let mut children = IndexMap::new();

        for (key, child_schema) in &schema.properties {
            let child_path = if path.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", path, key)
            };
            let (child_value, mut child_descriptor) =
                self.walk(child_schema, visited, &child_path);
            // Required-ness belongs to the enclosing object, not the child.
            child_descriptor.required = schema.required.iter().any(|name| name == key);
            value.insert(key.clone(), child_value);
            children.insert(key.clone(), child_descriptor);
        }

        let mut descriptor = FieldDescriptor::new("object", path);
        descriptor.properties = Some(children);
        (Value::Object(value), descriptor)
    }

    fn walk_array(
        &self,
        schema: &SchemaNode,
        visited: &mut HashSet<String>,
        path: &str,
    ) -> (Value, FieldDescriptor) {
        let mut descriptor = FieldDescriptor::new("array", path);

        match &schema.items {
            Some(items) => {
                let item_path = format!("{}[]", path);
                let (item_value, item_descriptor) = self.walk(items, visited, &item_path);
                descriptor.items = Some(Box::new(item_descriptor));
                (json!([item_value]), descriptor)
            }
            None => (json!([PLACEHOLDER]), descriptor),
        }
    }

    fn text_leaf(schema: &SchemaNode, path: &str) -> (Value, FieldDescriptor) {
        let value = match schema.format.as_deref() {
            Some("date-time") => json!(Utc::now().to_rfc3339()),
            Some("date") => json!(Utc::now().date_naive().to_string()),
            Some("email") => json!(EXAMPLE_EMAIL),
            Some("uuid") => json!(Uuid::nil().to_string()),
            _ => match schema.enum_values.as_ref().and_then(|values| values.first()) {
                Some(first) => first.clone(),
                None => json!(PLACEHOLDER),
            },
        };

        let mut descriptor = FieldDescriptor::new("string", path);
        descriptor.format = Some(schema.format.clone().unwrap_or_else(|| "text".to_string()));
        descriptor.enum_values = schema.enum_values.clone();
        (value, descriptor)
    }

    fn numeric_leaf(type_name: &str, schema: &SchemaNode, path: &str) -> (Value, FieldDescriptor) {
        let mut descriptor = FieldDescriptor::new(type_name, path);
        descriptor.format = schema.format.clone();
        descriptor.minimum = schema.minimum;
        descriptor.maximum = schema.maximum;
        (json!(0), descriptor)
    }
}
