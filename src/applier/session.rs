//! Event-loop driver over an in-memory view
//!
//! Plays the part of the host app: delivers page loads after full
//! navigations, fires due timers and forwards document mutations.

use super::{
    ApplierState, BrowserContext, InMemoryDocument, ManualScheduler, PatchApplier, UrlChangeWatcher, ViewContext,
};
use crate::models::{Patch, SettingsModel, StatusMessage};
use crate::redirect::LinkActivation;

pub type InMemoryView = ViewContext<InMemoryDocument, ManualScheduler, UrlChangeWatcher>;

/// Cap on consecutive full navigations handled by one step.
const MAX_REDIRECT_HOPS: usize = 8;

pub struct Session {
    applier: PatchApplier,
    view: InMemoryView,
}

impl Session {
    /// Open a view at `url` and deliver its first page load.
    pub fn open(settings: SettingsModel, authenticated: bool, url: &str) -> Self {
        let mut session = Self {
            applier: PatchApplier::new(settings, authenticated),
            view: ViewContext::new(
                InMemoryDocument::new(url),
                ManualScheduler::new(),
                UrlChangeWatcher::new(),
            ),
        };
        session.load();
        session
    }

    pub fn applier(&self) -> &PatchApplier {
        &self.applier
    }

    pub fn view(&self) -> &InMemoryView {
        &self.view
    }

    pub fn document(&self) -> &InMemoryDocument {
        self.view.browser()
    }

    pub fn state(&self) -> ApplierState {
        self.view.state()
    }

    pub fn active_patch(&self) -> Option<&Patch> {
        self.view.active_patch()
    }

    pub fn url(&self) -> String {
        self.view.browser().current_url()
    }

    /// Let `ms` milliseconds pass, firing due timers and any page loads they
    /// cause.
    pub fn advance(&mut self, ms: u64) {
        self.view.browser_mut().advance_clock(ms);
        for timer in self.view.scheduler_mut().advance(ms) {
            self.applier.on_timer(&mut self.view, timer);
        }
        self.deliver_loads();
    }

    /// Advance until the pending first apply (if any) has happened.
    pub fn settle(&mut self) {
        let delay = self.applier.settings().injection_delay;
        self.advance(delay);
    }

    /// In-page navigation followed by the DOM mutation it causes.
    pub fn navigate_in_page(&mut self, url: &str) {
        self.view.browser_mut().navigate(url);
        self.applier.on_dom_mutation(&mut self.view);
        self.deliver_loads();
    }

    /// A document mutation that did not come from a navigation.
    pub fn mutate_document(&mut self) {
        self.applier.on_dom_mutation(&mut self.view);
        self.deliver_loads();
    }

    /// The user taps a link pointing at `href`.
    pub fn activate_link(&mut self, href: &str) -> LinkActivation {
        let decision = self.applier.on_link_activation(&mut self.view, href);
        if decision == LinkActivation::Proceed {
            self.navigate_in_page(href);
        } else {
            self.deliver_loads();
        }
        decision
    }

    pub fn update_settings(&mut self, settings: SettingsModel) {
        self.applier.update_settings(settings, &mut self.view);
        self.deliver_loads();
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.applier.set_authenticated(authenticated, &mut self.view);
        self.deliver_loads();
    }

    pub fn close(&mut self) {
        self.applier.teardown(&mut self.view);
    }

    pub fn messages(&self) -> &[StatusMessage] {
        self.view.browser().messages()
    }

    pub fn take_messages(&mut self) -> Vec<StatusMessage> {
        self.view.browser_mut().take_messages()
    }

    fn load(&mut self) {
        self.applier.on_page_load(&mut self.view);
        self.deliver_loads();
    }

    fn deliver_loads(&mut self) {
        for _ in 0..MAX_REDIRECT_HOPS {
            if !self.view.browser_mut().take_load_pending() {
                return;
            }
            self.applier.on_page_load(&mut self.view);
        }
        log::warn!("Stopped following navigations after {} hops", MAX_REDIRECT_HOPS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PATCH_MARKER;

    #[test]
    fn test_open_and_settle_applies_once() {
        let mut session = Session::open(SettingsModel::default(), false, "https://m.youtube.com/");
        assert_eq!(session.document().count_marked(PATCH_MARKER), 0);
        session.settle();
        assert_eq!(session.state(), ApplierState::Applied);
        assert_eq!(session.document().count_marked(PATCH_MARKER), 2);
    }

    #[test]
    fn test_proceeding_link_navigates_in_page() {
        let mut session = Session::open(SettingsModel::default(), false, "https://m.youtube.com/");
        session.settle();
        let outcome = session.activate_link("https://m.youtube.com/watch?v=a");
        assert_eq!(outcome, LinkActivation::Proceed);
        assert_eq!(session.url(), "https://m.youtube.com/watch?v=a");
        assert_eq!(session.document().loads(), 1);
    }
}
