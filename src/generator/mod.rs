//! Patch generation
//!
//! Turns settings + page type + authentication state into a deterministic
//! patch: identical inputs always produce byte-identical output.

pub mod rules;
pub mod css;
pub mod script;

pub use rules::{Feature, RuleTable, Scope};
pub use script::{status_probe_script, teardown_script};

use crate::models::{PageType, Patch, SettingsModel};

/// Generate the complete injectable patch text (stylesheet wrapped in the
/// behavior script).
pub fn generate(settings: &SettingsModel, page_type: PageType, authenticated: bool) -> String {
    build_patch(settings, page_type, authenticated).script
}

/// Generate only the stylesheet half of the patch.
pub fn generate_stylesheet(settings: &SettingsModel, page_type: PageType, authenticated: bool) -> String {
    let table = RuleTable::build(settings, authenticated);
    css::render_stylesheet(&table, settings, page_type)
}

/// Generate a patch value for the applier.
pub fn build_patch(settings: &SettingsModel, page_type: PageType, authenticated: bool) -> Patch {
    let table = RuleTable::build(settings, authenticated);
    let rule_text = css::render_stylesheet(&table, settings, page_type);
    let snapshot = settings.snapshot();
    let script = script::render_install_script(&rule_text, &snapshot, page_type, authenticated, settings.debug_mode);

    log::debug!(
        "Generated {} rules for page type {} ({} bytes of CSS)",
        table.rules().len(),
        page_type,
        rule_text.len()
    );

    Patch {
        rule_text,
        script,
        page_type,
        settings: snapshot,
        authenticated,
        applied_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        let settings = SettingsModel {
            custom_css: "ytm-app { color: red; }".to_string(),
            show_shorts: false,
            ..SettingsModel::default()
        };
        for page in PageType::ALL {
            for authenticated in [false, true] {
                assert_eq!(
                    generate(&settings, page, authenticated),
                    generate(&settings, page, authenticated)
                );
            }
        }
    }

    #[test]
    fn test_patch_carries_inputs() {
        let patch = build_patch(&SettingsModel::default(), PageType::Watch, true);
        assert_eq!(patch.page_type, PageType::Watch);
        assert!(patch.authenticated);
        assert!(patch.applied_at.is_none());
        assert!(patch.script.contains("style.textContent"));
    }
}
