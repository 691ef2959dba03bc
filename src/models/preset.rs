//! Named settings presets

use super::SettingsModel;
use serde::{Deserialize, Serialize};

/// Partial toggle set; `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetToggles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_recommendations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_sidebar: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_comments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_related_videos: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_shorts: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPreset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub settings: PresetToggles,
}

impl SettingsPreset {
    fn builtin(id: &str, name: &str, description: &str, toggles: [bool; 5]) -> Self {
        let [recommendations, sidebar, comments, related, shorts] = toggles;
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            settings: PresetToggles {
                show_recommendations: Some(recommendations),
                show_sidebar: Some(sidebar),
                show_comments: Some(comments),
                show_related_videos: Some(related),
                show_shorts: Some(shorts),
            },
        }
    }

    /// Overlay this preset onto `settings`.
    pub fn apply_to(&self, settings: &SettingsModel) -> SettingsModel {
        let toggles = &self.settings;
        SettingsModel {
            show_recommendations: toggles.show_recommendations.unwrap_or(settings.show_recommendations),
            show_sidebar: toggles.show_sidebar.unwrap_or(settings.show_sidebar),
            show_comments: toggles.show_comments.unwrap_or(settings.show_comments),
            show_related_videos: toggles.show_related_videos.unwrap_or(settings.show_related_videos),
            show_shorts: toggles.show_shorts.unwrap_or(settings.show_shorts),
            ..settings.clone()
        }
    }

    /// True when every toggle the preset defines matches `settings`.
    pub fn matches(&self, settings: &SettingsModel) -> bool {
        let toggles = &self.settings;
        let same = |preset: Option<bool>, actual: bool| preset.map_or(true, |p| p == actual);
        same(toggles.show_recommendations, settings.show_recommendations)
            && same(toggles.show_sidebar, settings.show_sidebar)
            && same(toggles.show_comments, settings.show_comments)
            && same(toggles.show_related_videos, settings.show_related_videos)
            && same(toggles.show_shorts, settings.show_shorts)
    }
}

/// Presets shipped with the app.
/// Toggle order: recommendations, sidebar, comments, related videos, shorts.
pub fn builtin_presets() -> Vec<SettingsPreset> {
    vec![
        SettingsPreset::builtin(
            "focus",
            "Focus Mode",
            "Hide all distractions - just search and watch",
            [false, false, false, false, false],
        ),
        SettingsPreset::builtin(
            "minimal",
            "Minimal Mode",
            "Hide recommendations but keep basic features",
            [false, true, true, false, true],
        ),
        SettingsPreset::builtin(
            "normal",
            "Normal Mode",
            "Show all YouTube features",
            [true, true, true, true, true],
        ),
        SettingsPreset::builtin(
            "comments-only",
            "Comments Only",
            "Hide everything except comments",
            [false, false, true, false, false],
        ),
        SettingsPreset::builtin(
            "discovery",
            "Discovery Mode",
            "Show recommendations and related videos only",
            [true, false, false, true, true],
        ),
        SettingsPreset::builtin(
            "no-shorts",
            "No Shorts Mode",
            "Hide all Shorts content while keeping other features",
            [true, true, true, true, false],
        ),
    ]
}

pub fn find_preset<'a>(presets: &'a [SettingsPreset], id: &str) -> Option<&'a SettingsPreset> {
    presets.iter().find(|p| p.id == id)
}

/// Name of the first built-in preset matching `settings`, or "Custom".
pub fn current_mode(settings: &SettingsModel) -> String {
    builtin_presets()
        .into_iter()
        .find(|p| p.matches(settings))
        .map(|p| p.name)
        .unwrap_or_else(|| "Custom".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_focus_preset_keeps_other_fields() {
        let base = SettingsModel {
            custom_css: "x {}".to_string(),
            injection_delay: 250,
            ..SettingsModel::show_everything()
        };
        let presets = builtin_presets();
        let focus = find_preset(&presets, "focus").unwrap();
        let applied = focus.apply_to(&base);

        assert!(!applied.show_shorts);
        assert!(!applied.show_comments);
        assert_eq!(applied.custom_css, "x {}");
        assert_eq!(applied.injection_delay, 250);
    }

    #[test]
    fn test_current_mode_names_matching_preset() {
        assert_eq!(current_mode(&SettingsModel::show_everything()), "Normal Mode");

        let custom = SettingsModel {
            show_comments: true,
            ..SettingsModel::default()
        };
        assert_eq!(current_mode(&custom), "Custom");
    }

    #[test]
    fn test_partial_preset_leaves_unset_toggles() {
        let preset = SettingsPreset {
            id: "custom_1".to_string(),
            name: "Mine".to_string(),
            description: String::new(),
            settings: PresetToggles {
                show_shorts: Some(false),
                ..PresetToggles::default()
            },
        };
        let applied = preset.apply_to(&SettingsModel::show_everything());
        assert!(!applied.show_shorts);
        assert!(applied.show_comments);
        assert!(preset.matches(&applied));
    }
}
