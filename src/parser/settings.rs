//! Settings file parsing and export bundles

use crate::models::{SettingsModel, SettingsPreset};
use crate::validator::validate_settings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const BUNDLE_VERSION: &str = "1.0";

/// Parse settings from bytes. Comments are allowed; missing fields take
/// their defaults.
pub fn parse_settings(content: &[u8]) -> Result<SettingsModel> {
    let content_str = std::str::from_utf8(content)
        .context("Invalid UTF-8 in settings file")?;

    let settings: SettingsModel = json5::from_str(content_str)
        .context("Failed to parse settings")?;

    Ok(settings)
}

pub fn parse_settings_from_file(path: impl AsRef<Path>) -> Result<SettingsModel> {
    let path = path.as_ref();
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    parse_settings(&content)
}

pub fn parse_settings_from_str(content: &str) -> Result<SettingsModel> {
    parse_settings(content.as_bytes())
}

/// Settings plus user presets, as exported by the host app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsBundle {
    pub settings: SettingsModel,
    #[serde(default)]
    pub custom_presets: Vec<SettingsPreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    BUNDLE_VERSION.to_string()
}

pub fn export_bundle(settings: &SettingsModel, custom_presets: &[SettingsPreset]) -> Result<String> {
    let bundle = SettingsBundle {
        settings: settings.clone(),
        custom_presets: custom_presets.to_vec(),
        exported_at: None,
        version: default_version(),
    };
    serde_json::to_string_pretty(&bundle).context("Failed to serialize settings bundle")
}

/// Import a bundle. The embedded settings must pass validation.
pub fn import_bundle(raw: &str) -> Result<SettingsBundle> {
    let value: serde_json::Value = json5::from_str(raw)
        .context("Invalid import file: not JSON")?;
    if value.get("settings").is_none() {
        anyhow::bail!("Invalid import file: missing settings");
    }

    let bundle: SettingsBundle = serde_json::from_value(value)
        .context("Invalid import file")?;

    let report = validate_settings(&bundle.settings);
    if !report.is_valid() {
        let messages: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("Invalid imported settings: {}", messages.join(", "));
    }
    Ok(bundle)
}
