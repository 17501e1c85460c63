// src/error.rs
// =============================================================================
// Typed errors for the two fetches that can fail as a whole.
//
// - SitemapFetchError: the sitemap could not be retrieved or parsed. This is
//   the only error allowed to stop a crawl.
// - PageFetchError: one page could not be retrieved. The crawl records it in
//   that page's report and moves on.
//
// Probe failures never show up here: they become a status code on the
// ProbeResult (see checker/http.rs).
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to retrieve or parse the sitemap document
#[derive(Debug, Error)]
pub enum SitemapFetchError {
    #[error("failed to fetch sitemap {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("sitemap {url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("malformed sitemap XML at {url}: {source}")]
    Xml {
        url: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("sitemap {url} contains no XML root element")]
    NoRootElement { url: String },

    #[error("sitemap {url} ends before its root element is closed")]
    Truncated { url: String },

    #[error("sitemap {url} has more than one root element")]
    MultipleRoots { url: String },
}

/// Failure to retrieve one page's HTML
#[derive(Debug, Error)]
pub enum PageFetchError {
    #[error("failed to fetch {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message_names_url_and_code() {
        let err = PageFetchError::Status {
            url: "https://example.com/gone".to_string(),
            status: StatusCode::GONE,
        };
        assert_eq!(
            err.to_string(),
            "https://example.com/gone returned HTTP 410 Gone"
        );
    }

    #[test]
    fn test_missing_root_message() {
        let err = SitemapFetchError::NoRootElement {
            url: "https://example.com/sitemap.xml".to_string(),
        };
        assert!(err.to_string().contains("no XML root element"));
    }
}
