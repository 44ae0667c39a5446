//! Path template composition

use openapi_ingest::{Parameter, ParameterLocation};
use regex::Regex;

use crate::walker::PLACEHOLDER;

/// Rewrites an OpenAPI path template into a concrete, callable path
pub struct PathComposer;

impl PathComposer {
    /// Substitute `{name}` placeholders and append dummy query parameters.
    ///
    /// Substitution is template-driven: every `{name}` becomes `dummy_<name>`
    /// whether or not the parameter list declares it. Only query-kind
    /// parameters join the query string, in declaration order.
    pub fn compose(path_template: &str, parameters: &[Parameter]) -> String {
        let placeholder = Regex::new(r"\{([^{}]+)\}").unwrap();
        let mut path = placeholder
            .replace_all(path_template, "dummy_${1}")
            .into_owned();

        let query: Vec<String> = parameters
            .iter()
            .filter(|param| param.location == ParameterLocation::Query)
            .map(|param| format!("{}={}", param.name, PLACEHOLDER))
            .collect();

        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }

        path
    }
}
