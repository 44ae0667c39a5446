//! Base-URL derivation from a documentation URL

use tracing::debug;
use url::Url;

/// Path segments that mark the documentation portion of a URL
const DOC_MARKERS: [&str; 3] = ["api-docs", "swagger", "v3"];

/// Derives an API base URL from its documentation URL
pub struct BaseUrlResolver;

impl BaseUrlResolver {
    /// Strip the documentation path from a URL, leaving the API root.
    ///
    /// Total: returns an empty string when the URL does not parse. Assumes
    /// the API root is a path prefix of the documentation URL; documents
    /// hosted under an unrecognized path resolve to the bare origin.
    pub fn resolve(document_url: &str) -> String {
        let parsed = match Url::parse(document_url) {
            Ok(parsed) => parsed,
            Err(_) => return String::new(),
        };
        let host = match parsed.host_str() {
            Some(host) => host,
            None => return String::new(),
        };

        let origin = match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        };

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|segments| segments.filter(|segment| !segment.is_empty()).collect())
            .unwrap_or_default();

        let marker = segments
            .iter()
            .position(|segment| DOC_MARKERS.iter().any(|m| segment.contains(m)));

        let base = match marker {
            Some(0) | None => origin,
            Some(index) => format!("{}/{}", origin, segments[..index].join("/")),
        };

        debug!("Resolved base URL {} from {}", base, document_url);
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_api_docs_path() {
        assert_eq!(
            BaseUrlResolver::resolve("https://api.example.com/v3/api-docs"),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_keeps_prefix_before_marker() {
        assert_eq!(
            BaseUrlResolver::resolve("https://example.com/service/v3/api-docs"),
            "https://example.com/service"
        );
    }

    #[test]
    fn test_swagger_marker() {
        assert_eq!(
            BaseUrlResolver::resolve("https://example.com/swagger/index.html"),
            "https://example.com"
        );
    }

    #[test]
    fn test_no_marker_drops_path() {
        assert_eq!(
            BaseUrlResolver::resolve("https://example.com/docs/openapi.json"),
            "https://example.com"
        );
    }

    #[test]
    fn test_port_preserved() {
        assert_eq!(
            BaseUrlResolver::resolve("http://localhost:8080/v3/api-docs"),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_unparseable_url_yields_empty() {
        assert_eq!(BaseUrlResolver::resolve("not a url"), "");
    }
}
