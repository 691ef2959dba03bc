//! URL-change navigation watcher

use super::context::NavigationWatcher;
use crate::models::NavigationEvent;

/// Raises a navigation event whenever the URL seen after a document mutation
/// differs from the previous one, like a `MutationObserver` comparing
/// `location.href`.
#[derive(Debug, Default)]
pub struct UrlChangeWatcher {
    last_url: Option<String>,
    registrations: usize,
}

impl UrlChangeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the watcher has actually been registered.
    pub fn registrations(&self) -> usize {
        self.registrations
    }
}

impl NavigationWatcher for UrlChangeWatcher {
    fn start(&mut self, url: &str) -> bool {
        if self.last_url.is_some() {
            return false;
        }
        self.last_url = Some(url.to_string());
        self.registrations += 1;
        true
    }

    fn observe(&mut self, url: &str) -> Option<NavigationEvent> {
        let last = self.last_url.as_mut()?;
        if last == url {
            return None;
        }
        let from = std::mem::replace(last, url.to_string());
        Some(NavigationEvent::new(from, url))
    }

    fn resync(&mut self, url: &str) {
        if let Some(last) = self.last_url.as_mut() {
            *last = url.to_string();
        }
    }

    fn stop(&mut self) -> bool {
        self.last_url.take().is_some()
    }

    fn is_watching(&self) -> bool {
        self.last_url.is_some()
    }
}
