//! Page types of the host site

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Logical view of the host page, derived from its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Home,
    Watch,
    Subscriptions,
    Shorts,
    Channel,
    Search,
    Unknown,
}

impl PageType {
    pub const ALL: [PageType; 7] = [
        PageType::Home,
        PageType::Watch,
        PageType::Subscriptions,
        PageType::Shorts,
        PageType::Channel,
        PageType::Search,
        PageType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Home => "home",
            PageType::Watch => "watch",
            PageType::Subscriptions => "subscriptions",
            PageType::Shorts => "shorts",
            PageType::Channel => "channel",
            PageType::Search => "search",
            PageType::Unknown => "unknown",
        }
    }

    /// Page type used when deciding which rules apply.
    ///
    /// `Unknown` styles exactly like `Home` so a page that has not been
    /// classified yet never flashes unfiltered content.
    pub fn rule_alias(&self) -> PageType {
        match self {
            PageType::Unknown => PageType::Home,
            other => *other,
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PageType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageType::ALL
            .iter()
            .copied()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown page type: {}", s))
    }
}
