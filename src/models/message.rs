//! Status messages posted from the embedded browser to the host app
//!
//! The field names are part of the host's status UI contract and must stay
//! stable.

use super::{PageType, SettingsSnapshot};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StatusMessage {
    #[serde(rename_all = "camelCase")]
    InjectionSuccess {
        page_type: PageType,
        timestamp: u64,
        settings: SettingsSnapshot,
        location: String,
        authenticated: bool,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        page_type: Option<PageType>,
        timestamp: u64,
    },
    #[serde(rename_all = "camelCase")]
    NavigationDetected {
        from: String,
        to: String,
        page_type: PageType,
    },
    #[serde(rename_all = "camelCase")]
    ShortsRedirect {
        from: String,
        to: String,
    },
    #[serde(rename_all = "camelCase")]
    InjectionStatusResponse {
        #[serde(skip_serializing_if = "Option::is_none")]
        page_type: Option<PageType>,
        installed: bool,
    },
}

impl StatusMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            StatusMessage::InjectionSuccess { .. } => "injection-success",
            StatusMessage::Error { .. } => "error",
            StatusMessage::NavigationDetected { .. } => "navigation-detected",
            StatusMessage::ShortsRedirect { .. } => "shorts-redirect",
            StatusMessage::InjectionStatusResponse { .. } => "injection-status-response",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error { .. })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize status message")
    }
}

/// Decode a message posted by the in-page script.
pub fn parse_status_message(raw: &str) -> Result<StatusMessage> {
    serde_json::from_str(raw).with_context(|| {
        let kind = serde_json::from_str::<serde_json::Value>(raw)
            .ok()
            .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_string))
            .unwrap_or_else(|| "<missing>".to_string());
        format!("Unrecognized status message (type: {})", kind)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SettingsModel;

    #[test]
    fn test_success_message_field_names() {
        let message = StatusMessage::InjectionSuccess {
            page_type: PageType::Watch,
            timestamp: 42,
            settings: SettingsModel::default().snapshot(),
            location: "https://m.youtube.com/watch?v=x".to_string(),
            authenticated: true,
        };
        let value: serde_json::Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "injection-success");
        assert_eq!(value["pageType"], "watch");
        assert_eq!(value["timestamp"], 42);
        assert_eq!(value["settings"]["showShorts"], true);
    }

    #[test]
    fn test_parse_error_message_from_page() {
        let raw = r#"{"type":"error","error":"TypeError: x","timestamp":7}"#;
        let message = parse_status_message(raw).unwrap();
        assert!(message.is_error());
        assert_eq!(message.kind(), "error");
    }

    #[test]
    fn test_parse_unknown_type_is_error_value() {
        let err = parse_status_message(r#"{"type":"show-quick-settings"}"#).unwrap_err();
        assert!(err.to_string().contains("show-quick-settings"));
        assert!(parse_status_message("not json").is_err());
    }
}
