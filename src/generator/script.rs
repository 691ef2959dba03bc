//! Behavior script generation
//!
//! The script is what the host hands to the WebView's inject primitive. It
//! tears down any earlier installation, performs the proactive Shorts
//! redirect, installs the marked stylesheet and the navigation watcher, and
//! reports back through `ReactNativeWebView.postMessage`.

use crate::models::{PageType, SettingsSnapshot, PAGE_TYPE_ATTRIBUTE, PATCH_MARKER, SIGNED_IN_ATTRIBUTE};
use crate::utils::js_string_literal;

/// Per-window slot holding the live installation's teardown hook.
pub const STATE_SLOT: &str = "__ytControllerState";

const INSTALL_TEMPLATE: &str = r#"(function() {
  var MARKER = __YTC_MARKER__;
  var PAGE_ATTR = __YTC_PAGE_ATTR__;
  var SIGNED_IN_ATTR = __YTC_SIGNED_IN_ATTR__;
  var settings = __YTC_SETTINGS__;
  var authenticated = __YTC_AUTHENTICATED__;
  var initialPageType = __YTC_PAGE_TYPE__;
  var debugMode = __YTC_DEBUG__;
  var cleanups = [];

  function post(message) {
    if (window.ReactNativeWebView) {
      window.ReactNativeWebView.postMessage(JSON.stringify(message));
    }
  }

  function removeArtifacts() {
    document.querySelectorAll('[' + MARKER + ']').forEach(function(el) { el.remove(); });
  }

  function detectPageType(href) {
    var url = new URL(href, window.location.origin);
    var path = url.pathname;
    var host = url.hostname.toLowerCase();
    if (path === '/feed/subscriptions' || href.indexOf('/feed/subscriptions') !== -1) return 'subscriptions';
    if (path.indexOf('/watch') === 0 || (host === 'youtu.be' && path.length > 1)) return 'watch';
    if (path.indexOf('/shorts/') !== -1) return 'shorts';
    if (/^\/(channel\/|c\/|user\/|@)/.test(path)) return 'channel';
    if (path.indexOf('/results') === 0 || url.searchParams.has('search_query')) return 'search';
    if (/(^|\.)(youtube\.com|youtu\.be)$/.test(host)) return 'home';
    return 'unknown';
  }

  function watchUrlFor(href) {
    var url = new URL(href, window.location.origin);
    var match = /\/shorts\/([A-Za-z0-9_-]+)/.exec(url.pathname);
    return match ? url.origin + '/watch?v=' + match[1] : null;
  }

  function redirectShorts(href) {
    if (settings.showShorts) return false;
    var target = watchUrlFor(href);
    if (!target) return false;
    console.log('[YT Controller] Redirecting Shorts to regular video:', target);
    post({ type: 'shorts-redirect', from: href, to: target });
    window.location.replace(target);
    return true;
  }

  function showIndicator(pageType) {
    if (!debugMode || !document.body) return;
    var indicator = document.getElementById('yt-controller-status');
    if (!indicator) {
      indicator = document.createElement('div');
      indicator.id = 'yt-controller-status';
      indicator.setAttribute(MARKER, 'status');
      indicator.style.cssText = 'position:fixed;bottom:8px;right:8px;z-index:99999;' +
        'padding:4px 8px;border-radius:4px;font:12px sans-serif;background:#2e7d32;color:#fff;opacity:0.8;';
      document.body.appendChild(indicator);
    }
    indicator.textContent = 'YT Controller ' + pageType;
  }

  var previous = window.__YTC_STATE__;
  if (previous && typeof previous.teardown === 'function') {
    previous.teardown();
  }
  var state = window.__YTC_STATE__ = { pageType: initialPageType, installed: false, teardown: null };
  state.teardown = function() {
    cleanups.forEach(function(fn) { fn(); });
    cleanups = [];
    removeArtifacts();
    state.installed = false;
  };

  removeArtifacts();
  if (redirectShorts(window.location.href)) {
    return;
  }

  // Registered ahead of the install so a failed install is retried on the
  // next navigation.
  var currentUrl = window.location.href;
  var onUrlChange = function() {
    if (window.location.href === currentUrl) return;
    var from = currentUrl;
    currentUrl = window.location.href;
    if (redirectShorts(currentUrl)) return;
    var pageType = detectPageType(currentUrl);
    state.pageType = pageType;
    if (document.body) document.body.setAttribute(PAGE_ATTR, pageType);
    showIndicator(pageType);
    post({ type: 'navigation-detected', from: from, to: currentUrl, pageType: pageType });
  };
  var observer = new MutationObserver(onUrlChange);
  observer.observe(document, { subtree: true, childList: true });
  window.addEventListener('popstate', onUrlChange);
  cleanups.push(function() {
    observer.disconnect();
    window.removeEventListener('popstate', onUrlChange);
  });

  try {
    var root = document.body;
    var head = document.head || document.getElementsByTagName('head')[0];
    if (!root) throw new Error('expected document anchor `body` is missing');
    if (!head) throw new Error('expected document anchor `head` is missing');

    root.setAttribute(PAGE_ATTR, initialPageType);
    root.setAttribute(SIGNED_IN_ATTR, String(authenticated));

    var style = document.createElement('style');
    style.setAttribute(MARKER, 'style');
    style.setAttribute('type', 'text/css');
    style.textContent = __YTC_CSS__;
    head.appendChild(style);

    if (!settings.showShorts) {
      var onClick = function(event) {
        var link = event.target && event.target.closest ? event.target.closest('a') : null;
        if (!link || !link.href) return;
        var target = watchUrlFor(link.href);
        if (!target) return;
        event.preventDefault();
        event.stopPropagation();
        window.location.assign(target);
      };
      document.addEventListener('click', onClick, true);
      cleanups.push(function() { document.removeEventListener('click', onClick, true); });
    }

    state.installed = true;
    showIndicator(initialPageType);

    console.log('[YT Controller] Patch applied for page type:', initialPageType);
    post({
      type: 'injection-success',
      pageType: initialPageType,
      timestamp: Date.now(),
      settings: settings,
      location: window.location.href,
      authenticated: authenticated
    });
  } catch (error) {
    console.error('[YT Controller] Injection error:', error);
    removeArtifacts();
    post({ type: 'error', error: String(error), pageType: initialPageType, timestamp: Date.now() });
  }
})();
true;
"#;

const TEARDOWN_TEMPLATE: &str = r#"(function() {
  var state = window.__YTC_STATE__;
  if (state && typeof state.teardown === 'function') {
    state.teardown();
  }
  window.__YTC_STATE__ = undefined;
})();
true;
"#;

const STATUS_PROBE_TEMPLATE: &str = r#"(function() {
  var state = window.__YTC_STATE__;
  if (window.ReactNativeWebView) {
    window.ReactNativeWebView.postMessage(JSON.stringify({
      type: 'injection-status-response',
      installed: !!(state && state.installed),
      pageType: state ? state.pageType : undefined
    }));
  }
})();
true;
"#;

/// Build the install script for one stylesheet and settings snapshot.
pub fn render_install_script(
    stylesheet: &str,
    settings: &SettingsSnapshot,
    page_type: PageType,
    authenticated: bool,
    debug: bool,
) -> String {
    let settings_json = serde_json::to_string(settings).unwrap_or_else(|_| "{}".to_string());

    // The stylesheet goes in last so user CSS can never be mistaken for a
    // placeholder.
    INSTALL_TEMPLATE
        .replace("__YTC_STATE__", STATE_SLOT)
        .replace("__YTC_MARKER__", &js_string_literal(PATCH_MARKER))
        .replace("__YTC_PAGE_ATTR__", &js_string_literal(PAGE_TYPE_ATTRIBUTE))
        .replace("__YTC_SIGNED_IN_ATTR__", &js_string_literal(SIGNED_IN_ATTRIBUTE))
        .replace("__YTC_SETTINGS__", &settings_json)
        .replace("__YTC_AUTHENTICATED__", if authenticated { "true" } else { "false" })
        .replace("__YTC_PAGE_TYPE__", &js_string_literal(page_type.as_str()))
        .replace("__YTC_DEBUG__", if debug { "true" } else { "false" })
        .replace("__YTC_CSS__", &js_string_literal(stylesheet))
}

/// Script removing every artifact and observer of the live installation.
pub fn teardown_script() -> String {
    TEARDOWN_TEMPLATE.replace("__YTC_STATE__", STATE_SLOT)
}

/// Script asking the page to post an `injection-status-response`.
pub fn status_probe_script() -> String {
    STATUS_PROBE_TEMPLATE.replace("__YTC_STATE__", STATE_SLOT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SettingsModel;

    fn script(css: &str) -> String {
        render_install_script(css, &SettingsModel::default().snapshot(), PageType::Home, false, false)
    }

    #[test]
    fn test_all_placeholders_are_substituted() {
        let script = script("a { color: red; }");
        assert!(!script.contains("__YTC_"));
        assert!(script.contains("window.__ytControllerState"));
        assert!(script.trim_end().ends_with("true;"));
    }

    #[test]
    fn test_stylesheet_is_embedded_as_string_literal() {
        let script = script("a::after { content: \"x\"; }\n</style>");
        assert!(script.contains(r#"style.textContent = "a::after { content: \"x\"; }\n\u003c/style>";"#));
    }

    #[test]
    fn test_custom_css_cannot_inject_placeholders() {
        let script = script("/* __YTC_PAGE_TYPE__ */");
        assert!(script.contains("/* __YTC_PAGE_TYPE__ */"));
        assert!(script.contains(r#"var initialPageType = "home";"#));
    }

    #[test]
    fn test_settings_snapshot_is_inlined() {
        let script = script("");
        assert!(script.contains(r#""showShorts":true"#));
    }

    #[test]
    fn test_observer_survives_failed_install() {
        let script = script("");
        let observer = script.find("new MutationObserver").unwrap();
        let install = script.find("try {").unwrap();
        assert!(observer < install);

        let catch_block = &script[script.find("} catch (error) {").unwrap()..];
        assert!(!catch_block.contains("cleanups.forEach"));
    }

    #[test]
    fn test_status_indicator_follows_debug_mode() {
        let quiet = script("");
        assert!(quiet.contains("var debugMode = false;"));

        let debug = render_install_script("", &SettingsModel::default().snapshot(), PageType::Watch, false, true);
        assert!(debug.contains("var debugMode = true;"));
        assert!(debug.contains("yt-controller-status"));
    }

    #[test]
    fn test_helper_scripts_use_state_slot() {
        assert!(teardown_script().contains("window.__ytControllerState"));
        assert!(status_probe_script().contains("injection-status-response"));
    }
}
