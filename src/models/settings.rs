//! Filtering settings supplied by the host application

use serde::{Deserialize, Serialize};

/// User-facing filter configuration.
///
/// Field names follow the host app's stored JSON, so a settings blob saved by
/// the app deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsModel {
    pub show_recommendations: bool,
    pub show_sidebar: bool,
    pub show_comments: bool,
    pub show_related_videos: bool,
    pub show_shorts: bool,
    #[serde(rename = "customCSS")]
    pub custom_css: String,
    /// Milliseconds to wait after page load before applying a patch.
    pub injection_delay: u64,
    /// Shows an on-page status badge while a patch is live.
    pub debug_mode: bool,
    pub auto_inject: bool,
    /// Host UI theme. Carried through exports untouched; patches ignore it.
    pub theme: Theme,
}

impl Default for SettingsModel {
    fn default() -> Self {
        Self {
            show_recommendations: false,
            show_sidebar: false,
            show_comments: false,
            show_related_videos: false,
            show_shorts: true,
            custom_css: String::new(),
            injection_delay: 1000,
            debug_mode: false,
            auto_inject: true,
            theme: Theme::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

/// The toggles a patch was generated for, echoed back in status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    pub show_recommendations: bool,
    pub show_sidebar: bool,
    pub show_comments: bool,
    pub show_related_videos: bool,
    pub show_shorts: bool,
}

impl SettingsModel {
    /// Every feature visible; the unfiltered site.
    pub fn show_everything() -> Self {
        Self {
            show_recommendations: true,
            show_sidebar: true,
            show_comments: true,
            show_related_videos: true,
            show_shorts: true,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            show_recommendations: self.show_recommendations,
            show_sidebar: self.show_sidebar,
            show_comments: self.show_comments,
            show_related_videos: self.show_related_videos,
            show_shorts: self.show_shorts,
        }
    }

    pub fn has_custom_css(&self) -> bool {
        !self.custom_css.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_host_app() {
        let settings = SettingsModel::default();
        assert!(!settings.show_recommendations);
        assert!(settings.show_shorts);
        assert_eq!(settings.injection_delay, 1000);
        assert!(settings.auto_inject);
        assert_eq!(settings.theme, Theme::Auto);
    }

    #[test]
    fn test_deserializes_host_json_with_missing_fields() {
        let json = r#"{ "showShorts": false, "customCSS": "a { color: red; }" }"#;
        let settings: SettingsModel = serde_json::from_str(json).unwrap();
        assert!(!settings.show_shorts);
        assert_eq!(settings.custom_css, "a { color: red; }");
        assert_eq!(settings.injection_delay, 1000);
    }

    #[test]
    fn test_snapshot_uses_camel_case() {
        let value = serde_json::to_value(SettingsModel::default().snapshot()).unwrap();
        assert_eq!(value["showShorts"], true);
        assert_eq!(value["showRelatedVideos"], false);
    }

    #[test]
    fn test_blank_custom_css_is_ignored() {
        let settings = SettingsModel {
            custom_css: "  \n ".to_string(),
            ..SettingsModel::default()
        };
        assert!(!settings.has_custom_css());
    }
}
