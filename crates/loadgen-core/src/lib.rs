//! # loadgen-core
//!
//! Core template synthesis for loadgen:
//! - cycle-safe schema walking into synthetic values and field metadata
//! - path composition and base-URL derivation
//! - security header resolution
//! - endpoint processing against a pluggable persistence collaborator

mod base_url;
mod error;
mod path;
mod processor;
mod security;
mod service;
mod store;
mod walker;

pub use base_url::BaseUrlResolver;
pub use error::{CoreError, Result};
pub use path::PathComposer;
pub use processor::{EndpointPath, EndpointProcessor, ProcessedTemplate};
pub use security::{SecurityContext, SecurityResolver};
pub use service::{LoadTestOptions, PreviewOptions, TemplateService};
pub use store::{MemoryTemplateStore, StoredTemplate, TemplateStore};
pub use walker::{FieldDescriptor, SchemaWalker, PLACEHOLDER};
