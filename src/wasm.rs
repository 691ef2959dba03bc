//! WebAssembly bindings for an embedding WebView host

use wasm_bindgen::prelude::*;

use crate::error::InjectionError;
use crate::models::{parse_status_message, SettingsModel};
use crate::redirect::watch_url_for;
use crate::report::describe_message;
use crate::{classify, prepare_injection, Prepared};

macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&JsValue::from_str(&format_args!($($t)*).to_string())))
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Build the injection for `url`.
///
/// Returns a JSON object: `{ "kind": "redirect", "to": ... }` or
/// `{ "kind": "patch", "pageType": ..., "script": ..., "css": ..., "generatedAt": ... }`.
#[wasm_bindgen]
pub fn generate_injection(settings_json: &str, url: &str, authenticated: bool) -> Result<String, JsValue> {
    let settings: SettingsModel = if settings_json.trim().is_empty() {
        SettingsModel::default()
    } else {
        serde_json::from_str(settings_json).map_err(|e| {
            JsValue::from_str(&InjectionError::InvalidSettings(e.to_string()).to_string())
        })?
    };

    let prepared = prepare_injection(&settings, url, authenticated)
        .map_err(|e| JsValue::from_str(&format!("Injection failed: {:#}", e)))?;

    let value = match prepared {
        Prepared::Redirect { from, to } => {
            console_log!("[YT Controller] Redirecting Shorts {} to {}", from, to);
            serde_json::json!({ "kind": "redirect", "from": from, "to": to })
        }
        Prepared::Patch(patch) => {
            console_log!("[YT Controller] Generated patch for page type {}", patch.page_type);
            serde_json::json!({
                "kind": "patch",
                "pageType": patch.page_type,
                "script": patch.script,
                "css": patch.rule_text,
                "generatedAt": js_sys::Date::now() as u64,
            })
        }
    };

    serde_json::to_string(&value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn classify_url(url: &str) -> String {
    classify(url).to_string()
}

/// Watch URL for a Shorts URL, or `undefined` when it has no video id.
#[wasm_bindgen]
pub fn shorts_redirect_target(url: &str) -> Option<String> {
    watch_url_for(url)
}

/// Human readable description of a message posted by the in-page script.
#[wasm_bindgen]
pub fn describe_status_message(raw: &str) -> Result<String, JsValue> {
    parse_status_message(raw)
        .map(|message| describe_message(&message))
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
