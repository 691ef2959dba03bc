//! Settings validation and custom CSS sanitization

use crate::error::SettingsError;
use crate::models::SettingsModel;
use lazy_static::lazy_static;
use regex::Regex;

pub const MAX_INJECTION_DELAY_MS: u64 = 10_000;
pub const MAX_CUSTOM_CSS_LEN: usize = 50_000;

pub const BLOCKED_REPLACEMENT: &str = "/* BLOCKED: potentially dangerous content */";
pub const TRUNCATED_TRAILER: &str = "\n/* TRUNCATED: CSS too long */";

lazy_static! {
    /// Constructs that let a stylesheet run script or pull in remote rules.
    static ref DANGEROUS_CSS: Vec<(Regex, &'static str)> = [
        (r"(?i)javascript:", "javascript:"),
        (r"(?i)expression\s*\(", "expression("),
        (r"(?i)behavior\s*:", "behavior:"),
        (r"(?i)@import", "@import"),
        (r#"(?i)url\s*\(\s*["']?\s*javascript:"#, "url(javascript:"),
        (r"(?i)eval\s*\(", "eval("),
        (r"(?i)document\.", "document."),
        (r"(?i)window\.", "window."),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).expect("valid dangerous CSS pattern"), label))
    .collect();
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<SettingsError>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate_settings(settings: &SettingsModel) -> ValidationReport {
    let mut report = ValidationReport::default();

    if settings.injection_delay > MAX_INJECTION_DELAY_MS {
        report
            .warnings
            .push("Injection delay over 10 seconds may cause poor user experience".to_string());
    }

    let css = &settings.custom_css;
    for (pattern, label) in DANGEROUS_CSS.iter() {
        if pattern.is_match(css) {
            report.errors.push(SettingsError::new(
                "customCSS",
                format!("Potentially dangerous CSS detected: {}", label),
            ));
        }
    }

    if css.chars().count() > MAX_CUSTOM_CSS_LEN {
        report
            .warnings
            .push("Custom CSS is very large and may impact performance".to_string());
    }

    let opening = css.matches('{').count();
    let closing = css.matches('}').count();
    if opening != closing {
        report
            .warnings
            .push("Custom CSS may have unmatched braces".to_string());
    }

    if !settings.show_shorts {
        report
            .warnings
            .push("Shorts blocking will redirect Shorts URLs to regular video format".to_string());
    }

    report
}

/// Neutralize dangerous constructs and cap the length of user CSS.
pub fn sanitize_custom_css(css: &str) -> String {
    let mut sanitized = css.to_string();
    for (pattern, _) in DANGEROUS_CSS.iter() {
        sanitized = pattern
            .replace_all(&sanitized, BLOCKED_REPLACEMENT)
            .into_owned();
    }

    if sanitized.chars().count() > MAX_CUSTOM_CSS_LEN {
        let cut = sanitized
            .char_indices()
            .nth(MAX_CUSTOM_CSS_LEN)
            .map(|(i, _)| i)
            .unwrap_or(sanitized.len());
        sanitized.truncate(cut);
        sanitized.push_str(TRUNCATED_TRAILER);
    }

    sanitized
}
