// src/sitemap/fetch.rs
// =============================================================================
// This module downloads a sitemap and lists the page URLs it declares.
//
// Strategy:
// - GET the sitemap (any failure or non-2xx status aborts the crawl)
// - Stream the XML with quick-xml's namespace-aware reader
// - Collect <url><loc> text in the sitemaps.org namespace
// - If that finds nothing, fall back to <url><loc> in any namespace (or none),
//   which covers sitemaps that forget or misspell the xmlns declaration
//
// Document order is preserved: the crawl takes the first N entries.
// =============================================================================

use crate::error::SitemapFetchError;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use reqwest::Client;
use std::time::Duration;

/// The standard sitemap namespace
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// One open element while walking the document
struct OpenElement {
    local_name: Vec<u8>,
    in_sitemap_ns: bool,
}

// Fetches the sitemap at `sitemap_url` and returns its page URLs in order
pub async fn fetch_sitemap_urls(
    client: &Client,
    sitemap_url: &str,
    timeout: Duration,
) -> Result<Vec<String>, SitemapFetchError> {
    let request_error = |source| SitemapFetchError::Request {
        url: sitemap_url.to_string(),
        source,
    };

    let response = client
        .get(sitemap_url)
        .timeout(timeout)
        .send()
        .await
        .map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(SitemapFetchError::Status {
            url: sitemap_url.to_string(),
            status,
        });
    }

    let xml = response.text().await.map_err(request_error)?;
    let urls = parse_sitemap(sitemap_url, &xml)?;

    tracing::debug!("sitemap {} declares {} url(s)", sitemap_url, urls.len());
    Ok(urls)
}

// Parses sitemap XML into its list of page URLs
//
// `sitemap_url` is only used to label errors.
pub fn parse_sitemap(sitemap_url: &str, xml: &str) -> Result<Vec<String>, SitemapFetchError> {
    let xml_error = |source| SitemapFetchError::Xml {
        url: sitemap_url.to_string(),
        source,
    };

    let mut reader = NsReader::from_str(xml);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut saw_root = false;

    // Text of the <loc> we are currently inside, if any
    let mut current_loc: Option<(String, bool)> = None;

    let mut namespaced = Vec::new();
    let mut any_namespace = Vec::new();

    loop {
        let (resolved, event) = reader.read_resolved_event().map_err(xml_error)?;

        match event {
            Event::Start(e) => {
                // A second top-level element after the root closed
                if stack.is_empty() && saw_root {
                    return Err(SitemapFetchError::MultipleRoots {
                        url: sitemap_url.to_string(),
                    });
                }
                saw_root = true;
                let element = OpenElement {
                    local_name: e.local_name().as_ref().to_vec(),
                    in_sitemap_ns: is_sitemap_ns(&resolved),
                };

                if element.local_name == b"loc" {
                    if let Some(parent) = stack.last() {
                        if parent.local_name == b"url" {
                            let strict = parent.in_sitemap_ns && element.in_sitemap_ns;
                            current_loc = Some((String::new(), strict));
                        }
                    }
                }

                stack.push(element);
            }
            Event::Empty(_) => {
                if stack.is_empty() && saw_root {
                    return Err(SitemapFetchError::MultipleRoots {
                        url: sitemap_url.to_string(),
                    });
                }
                saw_root = true;
            }
            Event::Text(t) => {
                // Unescape every text node so bad entities fail anywhere in
                // the document, not only inside <loc>
                let unescaped = t.unescape().map_err(xml_error)?;
                if let Some((text, _)) = current_loc.as_mut() {
                    text.push_str(&unescaped);
                }
            }
            Event::CData(c) => {
                if let Some((text, _)) = current_loc.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                if let Some(closed) = stack.pop() {
                    if closed.local_name == b"loc" {
                        if let Some((text, strict)) = current_loc.take() {
                            let loc = text.trim();
                            if !loc.is_empty() {
                                if strict {
                                    namespaced.push(loc.to_string());
                                }
                                any_namespace.push(loc.to_string());
                            }
                        }
                    }
                }
            }
            Event::Eof => {
                // quick-xml does not complain about elements left open at
                // end of input, so a cut-off download is caught here
                if !stack.is_empty() {
                    return Err(SitemapFetchError::Truncated {
                        url: sitemap_url.to_string(),
                    });
                }
                break;
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(SitemapFetchError::NoRootElement {
            url: sitemap_url.to_string(),
        });
    }

    if namespaced.is_empty() {
        if !any_namespace.is_empty() {
            tracing::debug!(
                "no <loc> in {} namespace, using {} namespace-agnostic match(es)",
                SITEMAP_NS,
                any_namespace.len()
            );
        }
        Ok(any_namespace)
    } else {
        Ok(namespaced)
    }
}

fn is_sitemap_ns(resolved: &ResolveResult) -> bool {
    matches!(resolved, ResolveResult::Bound(Namespace(ns)) if *ns == SITEMAP_NS.as_bytes())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a streaming reader instead of a DOM?
//    - A sitemap is flat: <urlset><url><loc>...</loc></url>...</urlset>
//    - We only need to know the parent of each <loc>
//    - A small stack of open elements gives us exactly that
//
// 2. What does read_resolved_event return?
//    - The event (start tag, text, end tag, ...)
//    - Plus which namespace the element's prefix resolves to
//    - <loc> with xmlns="http://www.sitemaps.org/..." on <urlset> resolves to
//      that namespace even though <loc> itself has no attribute
//
// 3. Why collect both lists in one pass?
//    - The fallback only matters when the strict list is empty
//    - Walking the document once is enough for both answers
// -----------------------------------------------------------------------------
