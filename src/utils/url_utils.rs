//! URL and host helpers shared by the search, cache and extraction layers.

use url::Url;

/// Lower-cased host of `url`, or an empty string when it has none or fails to parse
#[must_use]
pub fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .unwrap_or_default()
}

/// Lower-cased path of `url`, or an empty string when it fails to parse
#[must_use]
pub fn path_of(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Origin (`scheme://host[:port]`) of `url`, if it has a tuple origin
#[must_use]
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Check if a URL is valid for crawling (http or https only)
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// True when a cookie domain belongs to `allowed`
///
/// A leading `.` on the cookie domain is ignored. The domain matches when it
/// equals `allowed` or is a subdomain of it.
#[must_use]
pub fn cookie_domain_matches(cookie_domain: &str, allowed: &str) -> bool {
    let domain = cookie_domain.trim_start_matches('.').to_ascii_lowercase();
    let allowed = allowed.to_ascii_lowercase();
    domain == allowed || domain.ends_with(&format!(".{allowed}"))
}

/// True when `origin` is exactly the http or https origin of `domain`
#[must_use]
pub fn origin_matches(origin: &str, domain: &str) -> bool {
    origin == format!("https://{domain}") || origin == format!("http://{domain}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_and_path_are_lowercased() {
        assert_eq!(host_of("https://GitHub.com/Rust-Lang/Rust/Issues/1"), "github.com");
        assert_eq!(path_of("https://github.com/Rust-Lang/Rust/Issues/1"), "/rust-lang/rust/issues/1");
        assert_eq!(host_of("not a url"), "");
    }

    #[test]
    fn origin_excludes_path() {
        assert_eq!(
            origin_of("https://www.bing.com/search?q=rust").as_deref(),
            Some("https://www.bing.com")
        );
        assert_eq!(origin_of("about:blank"), None);
    }

    #[test]
    fn cookie_domains_match_subdomains_only() {
        assert!(cookie_domain_matches(".bing.com", "bing.com"));
        assert!(cookie_domain_matches("www.bing.com", "bing.com"));
        assert!(!cookie_domain_matches("notbing.com", "bing.com"));
        assert!(!cookie_domain_matches(".baidu.com", "bing.com"));
    }

    #[test]
    fn origins_match_exact_scheme_and_host() {
        assert!(origin_matches("https://www.bing.com", "www.bing.com"));
        assert!(origin_matches("http://bing.com", "bing.com"));
        assert!(!origin_matches("https://cn.bing.com", "bing.com"));
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(is_valid_url("https://example.com"));
        assert!(!is_valid_url("javascript:void(0)"));
        assert!(!is_valid_url(""));
    }
}
