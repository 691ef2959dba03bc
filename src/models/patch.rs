//! Generated patches and navigation events

use super::{PageType, SettingsSnapshot};

/// Attribute carried by every element a patch installs.
pub const PATCH_MARKER: &str = "data-yt-controller-patch";

/// Attribute on the document root the scoped rules key off.
pub const PAGE_TYPE_ATTRIBUTE: &str = "data-page-type";

pub const SIGNED_IN_ATTRIBUTE: &str = "data-signed-in";

/// A style/behavior patch for one page type and one settings snapshot.
///
/// Patches are replaced, never merged: installing one removes every trace of
/// the previous one first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Serialized stylesheet, custom CSS last.
    pub rule_text: String,
    /// Self-contained behavior script for the embedded browser.
    pub script: String,
    pub page_type: PageType,
    pub settings: SettingsSnapshot,
    pub authenticated: bool,
    /// Milliseconds on the browser clock; set when the patch is installed.
    pub applied_at: Option<u64>,
}

impl Patch {
    /// True when both patches would install identical artifacts.
    pub fn same_content(&self, other: &Patch) -> bool {
        self.rule_text == other.rule_text
            && self.script == other.script
            && self.page_type == other.page_type
    }
}

/// Raised whenever the observed URL of the host page changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub from_url: String,
    pub to_url: String,
}

impl NavigationEvent {
    pub fn new(from_url: impl Into<String>, to_url: impl Into<String>) -> Self {
        Self {
            from_url: from_url.into(),
            to_url: to_url.into(),
        }
    }
}
