//! Report generation

use crate::generator::RuleTable;
use crate::models::{current_mode, Patch, SettingsModel, StatusMessage};
use crate::validator::ValidationReport;
use anyhow::Result;

pub fn generate_markdown_report(
    settings: &SettingsModel,
    patch: &Patch,
    validation: &ValidationReport,
) -> Result<String> {
    let table = RuleTable::build(settings, patch.authenticated);
    let mut report = String::new();

    report.push_str("# YT Controller Patch Report\n\n");

    // Summary
    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Page Type**: {}\n", patch.page_type));
    report.push_str(&format!("- **Mode**: {}\n", current_mode(settings)));
    report.push_str(&format!("- **Signed In**: {}\n", if patch.authenticated { "yes" } else { "no" }));
    report.push_str(&format!("- **Rules**: {}\n", table.rules().len()));
    report.push_str(&format!("- **Stylesheet Size**: {} bytes\n", patch.rule_text.len()));
    report.push_str(&format!("- **Script Size**: {} bytes\n", patch.script.len()));
    report.push_str(&format!("- **Custom CSS**: {}\n", if settings.has_custom_css() { "included" } else { "none" }));
    report.push_str(&format!("- **Injection Delay**: {} ms\n\n", settings.injection_delay));

    // Features
    report.push_str("## Active Rule Groups\n\n");
    for feature in table.features() {
        let count = table.rules().iter().filter(|r| r.feature == feature).count();
        report.push_str(&format!("- {} ({} rules)\n", feature.name(), count));
    }
    report.push('\n');

    let hidden = table.hidden_on(patch.page_type);
    if !hidden.is_empty() {
        report.push_str(&format!("## Hidden on {} Pages\n\n", patch.page_type));
        for selector in hidden {
            report.push_str(&format!("- `{}`\n", selector));
        }
        report.push('\n');
    }

    // Validation
    if !validation.errors.is_empty() {
        report.push_str("## ⛔ Settings Errors\n\n");
        for error in &validation.errors {
            report.push_str(&format!("- {}\n", error));
        }
        report.push('\n');
    }

    if !validation.warnings.is_empty() {
        report.push_str("## ℹ️ Warnings\n\n");
        for warning in &validation.warnings {
            report.push_str(&format!("- {}\n", warning));
        }
        report.push('\n');
    }

    Ok(report)
}

/// One-line, human readable summary of a status message.
pub fn describe_message(message: &StatusMessage) -> String {
    match message {
        StatusMessage::InjectionSuccess {
            page_type,
            location,
            authenticated,
            ..
        } => format!(
            "Patch applied on {} page {}{}",
            page_type,
            location,
            if *authenticated { " (signed in)" } else { "" }
        ),
        StatusMessage::Error { error, page_type, .. } => match page_type {
            Some(page_type) => format!("Injection failed on {} page: {}", page_type, error),
            None => format!("Injection failed: {}", error),
        },
        StatusMessage::NavigationDetected { from, to, page_type } => {
            format!("Navigated {} -> {} ({})", from, to, page_type)
        }
        StatusMessage::ShortsRedirect { from, to } => {
            format!("Redirected Shorts {} -> {}", from, to)
        }
        StatusMessage::InjectionStatusResponse { page_type, installed } => match (installed, page_type) {
            (true, Some(page_type)) => format!("Patch installed ({} page)", page_type),
            (true, None) => "Patch installed".to_string(),
            (false, _) => "No patch installed".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::build_patch;
    use crate::models::PageType;
    use crate::validator::validate_settings;

    #[test]
    fn test_report_lists_hidden_groups() {
        let settings = SettingsModel::default();
        let patch = build_patch(&settings, PageType::Watch, false);
        let report = generate_markdown_report(&settings, &patch, &validate_settings(&settings)).unwrap();

        assert!(report.contains("- **Page Type**: watch"));
        assert!(report.contains("- **Mode**: Custom"));
        assert!(report.contains("Comments"));
        assert!(!report.contains("Settings Errors"));
    }

    #[test]
    fn test_describe_messages() {
        let message = StatusMessage::ShortsRedirect {
            from: "https://m.youtube.com/shorts/a".to_string(),
            to: "https://m.youtube.com/watch?v=a".to_string(),
        };
        assert_eq!(
            describe_message(&message),
            "Redirected Shorts https://m.youtube.com/shorts/a -> https://m.youtube.com/watch?v=a"
        );
        assert_eq!(
            describe_message(&StatusMessage::InjectionStatusResponse {
                page_type: None,
                installed: false
            }),
            "No patch installed"
        );
    }
}
