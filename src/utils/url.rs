//! Lightweight URL splitting for host-page URLs
//! Works on absolute (`https://m.youtube.com/watch?v=x`) and path-only
//! (`/feed/subscriptions`) forms without pulling in a full URL parser.

/// Borrowed pieces of a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    /// `scheme://host[:port]`, empty for path-only URLs.
    pub origin: &'a str,
    pub host: &'a str,
    /// Always starts with `/` unless empty.
    pub path: &'a str,
    /// Query string without the leading `?`.
    pub query: &'a str,
}

/// Hosts whose unmatched paths still count as the host site.
static HOST_DOMAINS: &[&str] = &["youtube.com", "youtu.be"];

pub fn split_url(url: &str) -> UrlParts<'_> {
    let url = url.trim();
    let without_fragment = url.split('#').next().unwrap_or(url);

    let (origin, rest) = match without_fragment.find("://") {
        Some(scheme_end) => {
            let after_scheme = scheme_end + 3;
            let host_end = without_fragment[after_scheme..]
                .find(|c| c == '/' || c == '?')
                .map(|i| after_scheme + i)
                .unwrap_or(without_fragment.len());
            (&without_fragment[..host_end], &without_fragment[host_end..])
        }
        None => ("", without_fragment),
    };

    let host = origin
        .split("://")
        .nth(1)
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("");

    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, query),
        None => (rest, ""),
    };

    UrlParts { origin, host, path, query }
}

/// True for the host site's own domains and their subdomains.
pub fn is_host_domain(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    HOST_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// Look up a query parameter value.
pub fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_absolute_url() {
        let parts = split_url("https://m.youtube.com/watch?v=abc&t=10#top");
        assert_eq!(parts.origin, "https://m.youtube.com");
        assert_eq!(parts.host, "m.youtube.com");
        assert_eq!(parts.path, "/watch");
        assert_eq!(parts.query, "v=abc&t=10");
    }

    #[test]
    fn test_split_origin_only() {
        let parts = split_url("https://m.youtube.com");
        assert_eq!(parts.path, "");
        assert_eq!(parts.query, "");

        let parts = split_url("https://m.youtube.com?app=m");
        assert_eq!(parts.path, "");
        assert_eq!(parts.query, "app=m");
    }

    #[test]
    fn test_split_path_only() {
        let parts = split_url("/shorts/xyz?feature=share");
        assert_eq!(parts.origin, "");
        assert_eq!(parts.path, "/shorts/xyz");
        assert_eq!(parts.query, "feature=share");
    }

    #[test]
    fn test_host_domain() {
        assert!(is_host_domain("m.youtube.com"));
        assert!(is_host_domain("YouTube.com"));
        assert!(!is_host_domain("notyoutube.com"));
        assert!(!is_host_domain("example.org"));
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("search_query=cats&sp=x", "search_query"), Some("cats"));
        assert_eq!(query_param("v=1", "t"), None);
    }
}
