//! Structural validation of generated patches

use crate::generator::rules::{SUBSCRIPTIONS_TAB, WATCH_PRIMARY};
use crate::generator::css::CUSTOM_CSS_HEADER;
use crate::models::{Patch, PATCH_MARKER};
use anyhow::Result;

pub fn validate_patch(patch: &Patch) -> Result<()> {
    validate_rule_text(&patch.rule_text)?;
    validate_script(&patch.script)?;
    Ok(())
}

fn validate_rule_text(rule_text: &str) -> Result<()> {
    // User CSS is opaque; only the generated part has to be well formed.
    let generated = rule_text
        .split(CUSTOM_CSS_HEADER)
        .next()
        .unwrap_or(rule_text);

    let mut depth: i64 = 0;
    for ch in generated.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            anyhow::bail!("Generated rules close a block that was never opened");
        }
    }
    if depth != 0 {
        anyhow::bail!("Generated rules leave {} block(s) open", depth);
    }

    for selector in WATCH_PRIMARY.iter().chain(SUBSCRIPTIONS_TAB) {
        if !generated.contains(selector) {
            anyhow::bail!("Always-visible selector `{}` is missing from the patch", selector);
        }
    }

    Ok(())
}

fn validate_script(script: &str) -> Result<()> {
    if !script.trim_end().ends_with("true;") {
        anyhow::bail!("Behavior script must evaluate to `true`");
    }
    if !script.contains(PATCH_MARKER) {
        anyhow::bail!("Behavior script does not mark its artifacts");
    }
    Ok(())
}
