//! In-memory browser document and scheduler
//!
//! Used by the simulator and the tests to drive the applier without a
//! WebView. Full-page navigations replace the document, dropping every
//! artifact and root attribute like a real reload does.

use super::context::{Artifact, BrowserContext, Scheduler, TimerHandle};
use crate::error::InjectionError;
use crate::models::StatusMessage;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct InMemoryDocument {
    url: String,
    history: Vec<String>,
    clock: u64,
    has_body: bool,
    root_attributes: BTreeMap<String, String>,
    artifacts: Vec<Artifact>,
    messages: Vec<StatusMessage>,
    loads: usize,
    load_pending: bool,
}

impl InMemoryDocument {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            history: vec![url.clone()],
            url,
            clock: 0,
            has_body: true,
            root_attributes: BTreeMap::new(),
            artifacts: Vec::new(),
            messages: Vec::new(),
            loads: 1,
            load_pending: false,
        }
    }

    /// A document whose body has not been built yet.
    pub fn without_body(url: impl Into<String>) -> Self {
        Self {
            has_body: false,
            ..Self::new(url)
        }
    }

    pub fn set_body_ready(&mut self, ready: bool) {
        self.has_body = ready;
    }

    /// In-page (pushState) navigation: the URL changes, the document stays.
    pub fn navigate(&mut self, url: impl Into<String>) {
        let url = url.into();
        self.history.push(url.clone());
        self.url = url;
    }

    pub fn advance_clock(&mut self, ms: u64) {
        self.clock += ms;
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn count_marked(&self, marker: &str) -> usize {
        self.artifacts.iter().filter(|a| a.marker == marker).count()
    }

    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes.get(name).map(String::as_str)
    }

    pub fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }

    pub fn take_messages(&mut self) -> Vec<StatusMessage> {
        std::mem::take(&mut self.messages)
    }

    /// Number of full document loads, including the first.
    pub fn loads(&self) -> usize {
        self.loads
    }

    /// True once after a full-page navigation, so a driver can deliver the
    /// page-load notification.
    pub fn take_load_pending(&mut self) -> bool {
        std::mem::replace(&mut self.load_pending, false)
    }

    fn reload(&mut self, url: &str) {
        self.url = url.to_string();
        self.artifacts.clear();
        self.root_attributes.clear();
        self.loads += 1;
        self.load_pending = true;
    }
}

impl BrowserContext for InMemoryDocument {
    fn current_url(&self) -> String {
        self.url.clone()
    }

    fn now_millis(&self) -> u64 {
        self.clock
    }

    fn remove_marked(&mut self, marker: &str) -> usize {
        let before = self.artifacts.len();
        self.artifacts.retain(|a| a.marker != marker);
        before - self.artifacts.len()
    }

    fn install(&mut self, artifact: Artifact) -> Result<(), InjectionError> {
        if !self.has_body {
            return Err(InjectionError::MissingAnchor("body"));
        }
        self.artifacts.push(artifact);
        Ok(())
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<(), InjectionError> {
        if !self.has_body {
            return Err(InjectionError::MissingAnchor("body"));
        }
        self.root_attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn replace_location(&mut self, url: &str) {
        if let Some(last) = self.history.last_mut() {
            *last = url.to_string();
        }
        self.reload(url);
    }

    fn assign_location(&mut self, url: &str) {
        self.history.push(url.to_string());
        self.reload(url);
    }

    fn post_message(&mut self, message: StatusMessage) {
        self.messages.push(message);
    }
}

/// Scheduler whose clock only moves when told to.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: u64,
    next_id: u64,
    timers: Vec<(TimerHandle, u64)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward and return the timers that came due, earliest
    /// first.
    pub fn advance(&mut self, ms: u64) -> Vec<TimerHandle> {
        self.now += ms;
        let now = self.now;
        let mut due: Vec<(TimerHandle, u64)> = Vec::new();
        self.timers.retain(|&(handle, at)| {
            if at <= now {
                due.push((handle, at));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(handle, at)| (at, handle));
        due.into_iter().map(|(handle, _)| handle).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay_ms: u64) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.timers.push((handle, self.now + delay_ms));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|&(h, _)| h != handle);
    }
}
