//! Security header resolution

use indexmap::IndexMap;
use openapi_ingest::{SecurityRequirement, SecuritySchemeDef};
use tracing::warn;

/// Resolved auth header, shared by every endpoint of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    pub header_name: String,
    pub header_value: String,
}

impl SecurityContext {
    fn unauthenticated() -> Self {
        Self {
            header_name: "Authorization".to_string(),
            header_value: String::new(),
        }
    }

    fn authorization(value: String) -> Self {
        Self {
            header_name: "Authorization".to_string(),
            header_value: value,
        }
    }

    /// Whether this context carries no header worth sending
    pub fn is_empty(&self) -> bool {
        self.header_value.is_empty()
    }
}

/// Chooses an auth header from the document's declared security scheme
pub struct SecurityResolver;

impl SecurityResolver {
    /// Resolve the first declared requirement against the schemes table.
    ///
    /// Only one scheme is ever resolved per document; AND/OR combinations
    /// in `security` reduce to their first entry.
    pub fn resolve(
        requirements: &[SecurityRequirement],
        schemes: &IndexMap<String, SecuritySchemeDef>,
        token: Option<&str>,
    ) -> SecurityContext {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return SecurityContext::unauthenticated(),
        };

        let requirement = match requirements.first() {
            Some(requirement) => requirement,
            None => return SecurityContext::unauthenticated(),
        };

        let scheme = match schemes.get(&requirement.scheme_name) {
            Some(scheme) => scheme,
            None => {
                warn!(
                    "Security scheme {} is not defined in the document",
                    requirement.scheme_name
                );
                return SecurityContext::unauthenticated();
            }
        };

        match (scheme.scheme_type.as_str(), scheme.scheme.as_deref()) {
            ("http", Some("basic")) => SecurityContext::authorization(format!("Basic {}", token)),
            ("http", Some("bearer")) => SecurityContext::authorization(format!("Bearer {}", token)),
            ("apiKey", _) if scheme.location.as_deref() == Some("header") => SecurityContext {
                header_name: scheme
                    .name
                    .clone()
                    .unwrap_or_else(|| "Authorization".to_string()),
                header_value: token.to_string(),
            },
            (other, _) => {
                warn!(
                    "Unrecognized security scheme type {}; falling back to bearer",
                    other
                );
                SecurityContext::authorization(format!("Bearer {}", token))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(name: &str) -> SecurityRequirement {
        SecurityRequirement {
            scheme_name: name.to_string(),
            scopes: vec![],
        }
    }

    fn scheme(value: serde_json::Value) -> SecuritySchemeDef {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_no_token_disables_auth() {
        let schemes = IndexMap::new();
        let context = SecurityResolver::resolve(&[requirement("bearerAuth")], &schemes, None);
        assert_eq!(context.header_name, "Authorization");
        assert!(context.is_empty());
    }

    #[test]
    fn test_no_requirements_disables_auth() {
        let mut schemes = IndexMap::new();
        schemes.insert(
            "bearerAuth".to_string(),
            scheme(serde_json::json!({"type": "http", "scheme": "bearer"})),
        );

        let context = SecurityResolver::resolve(&[], &schemes, Some("abc"));
        assert!(context.is_empty());
    }

    #[test]
    fn test_bearer_scheme() {
        let mut schemes = IndexMap::new();
        schemes.insert(
            "bearerAuth".to_string(),
            scheme(serde_json::json!({"type": "http", "scheme": "bearer"})),
        );

        let context =
            SecurityResolver::resolve(&[requirement("bearerAuth")], &schemes, Some("abc"));
        assert_eq!(context.header_name, "Authorization");
        assert_eq!(context.header_value, "Bearer abc");
    }

    #[test]
    fn test_basic_scheme() {
        let mut schemes = IndexMap::new();
        schemes.insert(
            "basicAuth".to_string(),
            scheme(serde_json::json!({"type": "http", "scheme": "basic"})),
        );

        let context =
            SecurityResolver::resolve(&[requirement("basicAuth")], &schemes, Some("dXNlcg=="));
        assert_eq!(context.header_value, "Basic dXNlcg==");
    }

    #[test]
    fn test_api_key_in_header() {
        let mut schemes = IndexMap::new();
        schemes.insert(
            "apiKey".to_string(),
            scheme(serde_json::json!({"type": "apiKey", "name": "X-Api-Key", "in": "header"})),
        );

        let context = SecurityResolver::resolve(&[requirement("apiKey")], &schemes, Some("abc"));
        assert_eq!(context.header_name, "X-Api-Key");
        assert_eq!(context.header_value, "abc");
    }

    #[test]
    fn test_unknown_scheme_type_falls_back_to_bearer() {
        let mut schemes = IndexMap::new();
        schemes.insert(
            "oauth".to_string(),
            scheme(serde_json::json!({"type": "oauth2"})),
        );

        let context = SecurityResolver::resolve(&[requirement("oauth")], &schemes, Some("abc"));
        assert_eq!(context.header_value, "Bearer abc");
    }

    #[test]
    fn test_missing_scheme_definition_applies_no_header() {
        let schemes = IndexMap::new();
        let context = SecurityResolver::resolve(&[requirement("ghost")], &schemes, Some("abc"));
        assert!(context.is_empty());
    }

    #[test]
    fn test_only_first_requirement_considered() {
        let mut schemes = IndexMap::new();
        schemes.insert(
            "first".to_string(),
            scheme(serde_json::json!({"type": "http", "scheme": "basic"})),
        );
        schemes.insert(
            "second".to_string(),
            scheme(serde_json::json!({"type": "http", "scheme": "bearer"})),
        );

        let context = SecurityResolver::resolve(
            &[requirement("first"), requirement("second")],
            &schemes,
            Some("abc"),
        );
        assert_eq!(context.header_value, "Basic abc");
    }
}
