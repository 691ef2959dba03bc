//! Shorts redirect policy
//!
//! With Shorts hidden, Shorts-shaped URLs are rewritten to the equivalent
//! standard watch URL. The proactive path replaces the current history entry;
//! the reactive path turns a link activation into a normal navigation.

use crate::models::SettingsModel;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Path segment after `/shorts/`; ids are URL-safe base64 characters.
    static ref SHORTS_PATH: Regex = Regex::new(r"^(?P<prefix>.*?)/shorts/(?P<id>[A-Za-z0-9_-]+)")
        .expect("valid shorts path pattern");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Policy inactive or URL is not Shorts-shaped.
    NotApplicable,
    Redirect { from: String, to: String },
    /// Shorts-shaped but no video id; CSS hiding alone applies.
    Unresolvable { url: String },
}

/// What to do with an in-page link activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkActivation {
    Proceed,
    /// Cancel the default activation and navigate here instead.
    Redirect(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortsRedirectPolicy {
    active: bool,
}

impl ShortsRedirectPolicy {
    pub fn new(active: bool) -> Self {
        Self { active }
    }

    pub fn from_settings(settings: &SettingsModel) -> Self {
        Self::new(!settings.show_shorts)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Proactive check for the URL currently loaded.
    pub fn evaluate(&self, url: &str) -> RedirectDecision {
        if !self.active || !is_shorts_url(url) {
            return RedirectDecision::NotApplicable;
        }
        match watch_url_for(url) {
            Some(to) => {
                log::info!("Redirecting Shorts {} to {}", url, to);
                RedirectDecision::Redirect {
                    from: url.to_string(),
                    to,
                }
            }
            None => {
                log::info!("Shorts URL {} has no video id, relying on CSS hiding", url);
                RedirectDecision::Unresolvable {
                    url: url.to_string(),
                }
            }
        }
    }

    /// Reactive check for a link the user activated.
    pub fn intercept(&self, href: &str) -> LinkActivation {
        match self.evaluate(href) {
            RedirectDecision::Redirect { to, .. } => LinkActivation::Redirect(to),
            RedirectDecision::NotApplicable | RedirectDecision::Unresolvable { .. } => {
                LinkActivation::Proceed
            }
        }
    }
}

pub fn is_shorts_url(url: &str) -> bool {
    crate::utils::split_url(url).path.contains("/shorts/")
}

/// Extract the video id from a Shorts URL.
pub fn shorts_video_id(url: &str) -> Option<&str> {
    let path = crate::utils::split_url(url).path;
    SHORTS_PATH
        .captures(path)
        .and_then(|caps| caps.name("id"))
        .map(|id| id.as_str())
}

/// Rewrite `<origin>/shorts/<id>` to `<origin>/watch?v=<id>`, keeping the
/// origin (or its absence for path-only URLs).
pub fn watch_url_for(url: &str) -> Option<String> {
    let origin = crate::utils::split_url(url).origin;
    shorts_video_id(url).map(|id| format!("{}/watch?v={}", origin, id))
}
