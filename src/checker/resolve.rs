// src/checker/resolve.rs
// =============================================================================
// Turns an href/src value into an absolute URL we can probe.
//
// The order of the checks matters:
// 1. empty reference          -> the page itself
// 2. already absolute         -> untouched (no double prefixing)
// 3. protocol-relative "//h"  -> borrow the page's scheme
// 4. anything else            -> relative to the page, which is treated as a
//                                directory (a trailing '/' is added)
//
// Step 2 runs before the others so absolute URLs are never prefixed twice.
// Step 3 runs before step 4 so "//host" is never read as a path segment.
// =============================================================================

use url::Url;

// Resolves `reference` against the page it was found on
//
// Examples (base = "https://example.com"):
//   ""                    -> "https://example.com"
//   "https://other.com/x" -> "https://other.com/x"
//   "//cdn.example.com/a" -> "https://cdn.example.com/a"
//   "page"                -> "https://example.com/page"
//
// When the base itself is not a valid URL there is nothing to resolve
// against; the reference is returned as-is and the probe will flag it.
pub fn resolve_url(base_url: &str, reference: &str) -> String {
    if reference.is_empty() {
        return base_url.to_string();
    }

    if Url::parse(reference).is_ok() {
        return reference.to_string();
    }

    if reference.starts_with("//") {
        return match Url::parse(base_url) {
            Ok(base) => format!("{}:{}", base.scheme(), reference),
            Err(_) => reference.to_string(),
        };
    }

    let directory = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    match Url::parse(&directory).and_then(|base| base.join(reference)) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::debug!("could not resolve {:?} against {}: {}", reference, base_url, e);
            reference.to_string()
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does Url::parse tell us if a reference is absolute?
//    - Url::parse only accepts strings that carry their own scheme
//    - "page" or "/docs" fail with RelativeUrlWithoutBase
//    - So Ok(_) means "already absolute"
//
// 2. What does and_then do on a Result?
//    - Runs the closure only if the previous step was Ok
//    - Chains "parse the base" and "join the reference" without nesting match
//
// 3. Why return the untouched input string instead of url.to_string()?
//    - Url normalizes ("https://other.com" becomes "https://other.com/")
//    - Reports should show the link exactly as the page wrote it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reference_returns_base() {
        assert_eq!(resolve_url("https://example.com", ""), "https://example.com");
    }

    #[test]
    fn test_absolute_reference_is_unchanged() {
        assert_eq!(
            resolve_url("https://example.com", "https://other.com/x"),
            "https://other.com/x"
        );
        assert_eq!(
            resolve_url("https://example.com", "https://anotherexample.com"),
            "https://anotherexample.com"
        );
    }

    #[test]
    fn test_relative_reference_with_and_without_trailing_slash() {
        assert_eq!(resolve_url("https://example.com", "page"), "https://example.com/page");
        assert_eq!(resolve_url("https://example.com/", "page"), "https://example.com/page");
    }

    #[test]
    fn test_page_is_treated_as_directory() {
        assert_eq!(
            resolve_url("https://example.com/blog/post", "image.png"),
            "https://example.com/blog/post/image.png"
        );
    }

    #[test]
    fn test_root_relative_and_dot_segments() {
        let base = "https://example.com/blog/post/";
        assert_eq!(resolve_url(base, "/about"), "https://example.com/about");
        assert_eq!(resolve_url(base, "../other"), "https://example.com/blog/other");
        assert_eq!(resolve_url(base, "./same"), "https://example.com/blog/post/same");
    }

    #[test]
    fn test_protocol_relative_takes_base_scheme() {
        assert_eq!(
            resolve_url("https://example.com/page", "//cdn.example.com/lib.js"),
            "https://cdn.example.com/lib.js"
        );
        assert_eq!(
            resolve_url("http://example.com", "//cdn.example.com/a.png"),
            "http://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_invalid_base_leaves_reference_alone() {
        assert_eq!(resolve_url("not a url", "page"), "page");
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let first = resolve_url("https://example.com/a", "../b");
        let second = resolve_url("https://example.com/a", "../b");
        assert_eq!(first, second);
    }
}
