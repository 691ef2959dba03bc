//! Seams between the patch applier and the embedded browser
//!
//! The applier never touches a real WebView; it talks to these traits so the
//! same lifecycle runs against a live bridge or an in-memory document.

use crate::error::InjectionError;
use crate::models::{NavigationEvent, StatusMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Style,
    Script,
}

/// An element a patch installs into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Marker attribute that identifies the element for removal.
    pub marker: &'static str,
    pub content: String,
}

impl Artifact {
    pub fn style(marker: &'static str, content: impl Into<String>) -> Self {
        Self {
            kind: ArtifactKind::Style,
            marker,
            content: content.into(),
        }
    }

    pub fn script(marker: &'static str, content: impl Into<String>) -> Self {
        Self {
            kind: ArtifactKind::Script,
            marker,
            content: content.into(),
        }
    }
}

/// The document of one embedded-browser view.
pub trait BrowserContext {
    fn current_url(&self) -> String;

    /// Milliseconds on the browser's clock.
    fn now_millis(&self) -> u64;

    /// Remove every element carrying `marker`; returns how many went away.
    fn remove_marked(&mut self, marker: &str) -> usize;

    fn install(&mut self, artifact: Artifact) -> Result<(), InjectionError>;

    /// Set an attribute on the document's root element.
    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<(), InjectionError>;

    /// Navigate without leaving the current entry in history.
    fn replace_location(&mut self, url: &str);

    /// Navigate normally, pushing a history entry.
    fn assign_location(&mut self, url: &str);

    fn post_message(&mut self, message: StatusMessage);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Cancellable one-shot timers on the browser's event loop.
pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u64) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Source of navigation events for a single-page host.
pub trait NavigationWatcher {
    /// Begin watching from `url`. Returns `false` when already watching, in
    /// which case nothing is registered twice.
    fn start(&mut self, url: &str) -> bool;

    /// Feed the URL seen after a document mutation; yields an event when it
    /// differs from the last one seen.
    fn observe(&mut self, url: &str) -> Option<NavigationEvent>;

    /// Take `url` as the last URL seen without raising an event. Used when
    /// the host reports a navigation itself. No-op when not watching.
    fn resync(&mut self, url: &str);

    /// Returns `false` when the watcher was not running.
    fn stop(&mut self) -> bool;

    fn is_watching(&self) -> bool;
}
