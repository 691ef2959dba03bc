//! Page classification from the host page's URL
//!
//! Classification is a pure function of the URL string: the same URL always
//! yields the same page type.

use crate::models::PageType;
use crate::utils::{is_host_domain, query_param, split_url};

const SUBSCRIPTIONS_PATH: &str = "/feed/subscriptions";
const WATCH_PREFIX: &str = "/watch";
const SHORTS_MARKER: &str = "/shorts/";
const CHANNEL_PREFIXES: &[&str] = &["/channel/", "/c/", "/user/", "/@"];
const SEARCH_PREFIX: &str = "/results";
const SEARCH_PARAM: &str = "search_query";

/// Classify a host-page URL. Rules are ordered; the first match wins.
pub fn classify(url: &str) -> PageType {
    let parts = split_url(url);
    let path = parts.path;

    let page = if path == SUBSCRIPTIONS_PATH || url.contains(SUBSCRIPTIONS_PATH) {
        PageType::Subscriptions
    } else if path.starts_with(WATCH_PREFIX) || is_short_link(parts.host, path) {
        PageType::Watch
    } else if path.contains(SHORTS_MARKER) {
        PageType::Shorts
    } else if CHANNEL_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        PageType::Channel
    } else if path.starts_with(SEARCH_PREFIX) || query_param(parts.query, SEARCH_PARAM).is_some() {
        PageType::Search
    } else if is_root(path) && (parts.host.is_empty() || is_host_domain(parts.host)) {
        PageType::Home
    } else if is_host_domain(parts.host) {
        PageType::Home
    } else {
        PageType::Unknown
    };

    if page == PageType::Unknown {
        log::debug!("No page pattern matched {}, treating as unknown", url);
    }
    page
}

/// `youtu.be/<id>` links open the watch page directly.
fn is_short_link(host: &str, path: &str) -> bool {
    host.eq_ignore_ascii_case("youtu.be") && path.len() > 1
}

fn is_root(path: &str) -> bool {
    path.is_empty() || path == "/"
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://m.youtube.com/feed/subscriptions", PageType::Subscriptions ; "subscriptions feed")]
    #[test_case("https://m.youtube.com/feed/subscriptions?app=m", PageType::Subscriptions ; "subscriptions with query")]
    #[test_case("https://m.youtube.com/watch?v=dQw4w9WgXcQ", PageType::Watch ; "watch page")]
    #[test_case("https://youtu.be/dQw4w9WgXcQ", PageType::Watch ; "short link")]
    #[test_case("https://m.youtube.com/shorts/abc123", PageType::Shorts ; "shorts page")]
    #[test_case("https://m.youtube.com/channel/UC123", PageType::Channel ; "channel id")]
    #[test_case("https://m.youtube.com/@creator", PageType::Channel ; "channel handle")]
    #[test_case("https://m.youtube.com/c/legacy", PageType::Channel ; "legacy channel")]
    #[test_case("https://m.youtube.com/results?search_query=rust", PageType::Search ; "search results")]
    #[test_case("https://m.youtube.com/", PageType::Home ; "root")]
    #[test_case("https://m.youtube.com", PageType::Home ; "bare origin")]
    #[test_case("/", PageType::Home ; "relative root")]
    #[test_case("https://m.youtube.com/feed/library", PageType::Home ; "unmatched host path")]
    #[test_case("https://accounts.google.com/signin", PageType::Unknown ; "foreign host")]
    #[test_case("", PageType::Home ; "empty url")]
    fn test_classify(url: &str, expected: PageType) {
        assert_eq!(classify(url), expected);
    }

    #[test]
    fn test_subscriptions_wins_over_later_rules() {
        // A subscriptions URL carrying a search parameter is still the feed.
        assert_eq!(
            classify("https://m.youtube.com/feed/subscriptions?search_query=x"),
            PageType::Subscriptions
        );
    }

    #[test]
    fn test_watch_wins_over_shorts() {
        assert_eq!(classify("https://m.youtube.com/watch?v=x&list=/shorts/y"), PageType::Watch);
    }

    #[test]
    fn test_classification_is_stable() {
        let url = "https://m.youtube.com/results?search_query=cats";
        assert_eq!(classify(url), classify(url));
    }
}
