//! YT Controller content injection
//!
//! Page-state-aware filtering for the YouTube mobile site shown inside an
//! embedded browser view. Classifies the current page, generates a scoped
//! stylesheet plus behavior script from the user's settings, and manages the
//! lifecycle of that patch across single-page navigations.

pub mod models;
pub mod error;
pub mod classifier;
pub mod generator;
pub mod applier;
pub mod redirect;
pub mod parser;
pub mod validator;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use models::{PageType, Patch, SettingsModel, StatusMessage};
pub use error::{InjectionError, SettingsError};
pub use classifier::classify;
pub use generator::{build_patch, generate};
pub use applier::{PatchApplier, Session, ViewContext};
pub use redirect::{RedirectDecision, ShortsRedirectPolicy};

use anyhow::Result;

/// What the host should do with the view at a given URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    /// Shorts are hidden and the URL is a Shorts page; navigate here instead
    /// of injecting anything.
    Redirect { from: String, to: String },
    Patch(Patch),
}

/// Main entry point: produce the injection for `url`.
pub fn prepare_injection(settings: &SettingsModel, url: &str, authenticated: bool) -> Result<Prepared> {
    // 1. Validate and sanitize settings
    let settings = checked_settings(settings)?;

    // 2. Proactive Shorts redirect
    if let RedirectDecision::Redirect { from, to } = ShortsRedirectPolicy::from_settings(&settings).evaluate(url) {
        return Ok(Prepared::Redirect { from, to });
    }

    // 3. Classify
    let page_type = classify(url);

    // 4. Generate
    let patch = build_patch(&settings, page_type, authenticated);

    // 5. Validate result
    validator::validate_patch(&patch)?;

    Ok(Prepared::Patch(patch))
}

/// Settings with custom CSS sanitized; fails only if sanitizing cannot make
/// them valid.
pub fn checked_settings(settings: &SettingsModel) -> Result<SettingsModel> {
    let report = validator::validate_settings(settings);
    for warning in &report.warnings {
        log::info!("Settings: {}", warning);
    }
    if report.is_valid() {
        return Ok(settings.clone());
    }

    for error in &report.errors {
        log::warn!("Settings: {}", error);
    }
    let sanitized = SettingsModel {
        custom_css: validator::sanitize_custom_css(&settings.custom_css),
        ..settings.clone()
    };
    let recheck = validator::validate_settings(&sanitized);
    if !recheck.is_valid() {
        let messages: Vec<String> = recheck.errors.iter().map(|e| e.to_string()).collect();
        return Err(InjectionError::InvalidSettings(messages.join(", ")).into());
    }
    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_redirects_shorts_before_generating() {
        let settings = SettingsModel {
            show_shorts: false,
            ..SettingsModel::default()
        };
        let prepared = prepare_injection(&settings, "https://host/shorts/abc123", false).unwrap();
        assert_eq!(
            prepared,
            Prepared::Redirect {
                from: "https://host/shorts/abc123".to_string(),
                to: "https://host/watch?v=abc123".to_string(),
            }
        );
    }

    #[test]
    fn test_prepare_sanitizes_custom_css() {
        let settings = SettingsModel {
            custom_css: "@import url(evil.css); a { color: red; }".to_string(),
            ..SettingsModel::default()
        };
        let Prepared::Patch(patch) = prepare_injection(&settings, "https://m.youtube.com/", false).unwrap() else {
            panic!("expected a patch");
        };
        assert!(!patch.rule_text.contains("@import"));
        assert!(patch.rule_text.contains("a { color: red; }"));
    }

    #[test]
    fn test_prepare_classifies_url() {
        let prepared = prepare_injection(&SettingsModel::default(), "https://m.youtube.com/feed/subscriptions", true).unwrap();
        match prepared {
            Prepared::Patch(patch) => {
                assert_eq!(patch.page_type, PageType::Subscriptions);
                assert!(patch.authenticated);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
