//! Stylesheet serialization for rule tables

use super::rules::{Rule, RuleTable};
use crate::models::{PageType, SettingsModel};

pub const STYLESHEET_HEADER: &str = "/* YT Controller filtering rules */";
pub const CUSTOM_CSS_HEADER: &str = "/* Custom User CSS */";

/// Serialize the table, then append the user's custom CSS verbatim.
pub fn render_stylesheet(table: &RuleTable, settings: &SettingsModel, page_type: PageType) -> String {
    let mut css = String::new();
    css.push_str(STYLESHEET_HEADER);
    css.push('\n');
    css.push_str(&format!("/* generated for page type: {} */\n", page_type));

    for rule in table.rules() {
        css.push('\n');
        css.push_str(&render_rule(rule));
    }

    if settings.has_custom_css() {
        css.push('\n');
        css.push_str(CUSTOM_CSS_HEADER);
        css.push('\n');
        css.push_str(&settings.custom_css);
        css.push('\n');
    }

    css
}

/// One rule block: comment, scoped selector list, declarations.
pub fn render_rule(rule: &Rule) -> String {
    let selectors: Vec<String> = rule
        .scope
        .selector_prefixes()
        .iter()
        .flat_map(|prefix| {
            rule.selectors.iter().map(move |selector| {
                if prefix.is_empty() {
                    selector.to_string()
                } else {
                    format!("{} {}", prefix, selector)
                }
            })
        })
        .collect();

    let mut block = format!("/* {}: {} */\n", rule.feature.name(), rule.label);
    block.push_str(&selectors.join(",\n"));
    block.push_str(" {\n");
    for declaration in rule.effect.declarations() {
        block.push_str(&format!("  {}: {};\n", declaration.property, declaration.value));
    }
    block.push_str("}\n");
    block
}
