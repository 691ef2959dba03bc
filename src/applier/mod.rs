//! Patch application lifecycle
//!
//! One [`ViewContext`] exists per embedded-browser view and owns the only
//! live patch. The [`PatchApplier`] drives it:
//!
//! ```text
//! Uninitialized --page load--> Waiting --timer--> Applying --ok--> Applied
//!       ^                                             |               |
//!       +------------------- failure ----------------+    navigation / settings
//!                                                                     |
//!                                                  Applying <---------+
//! any state --teardown--> TornDown
//! ```
//!
//! Every apply removes all marked artifacts before installing new ones, so
//! at most one patch is ever live and repeated applies never accumulate.

pub mod context;
pub mod document;
pub mod session;
pub mod watcher;

pub use context::{Artifact, ArtifactKind, BrowserContext, NavigationWatcher, Scheduler, TimerHandle};
pub use document::{InMemoryDocument, ManualScheduler};
pub use session::{InMemoryView, Session};
pub use watcher::UrlChangeWatcher;

use crate::classifier::classify;
use crate::error::InjectionError;
use crate::generator;
use crate::models::{
    NavigationEvent, Patch, SettingsModel, StatusMessage, PAGE_TYPE_ATTRIBUTE, PATCH_MARKER,
    SIGNED_IN_ATTRIBUTE,
};
use crate::redirect::{LinkActivation, RedirectDecision, ShortsRedirectPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplierState {
    Uninitialized,
    /// Page loaded; the delayed first apply is scheduled.
    Waiting(TimerHandle),
    Applying,
    Applied,
    TornDown,
}

/// Everything belonging to one browser view.
pub struct ViewContext<B, S, W> {
    browser: B,
    scheduler: S,
    watcher: W,
    state: ApplierState,
    active: Option<Patch>,
}

impl<B, S, W> ViewContext<B, S, W>
where
    B: BrowserContext,
    S: Scheduler,
    W: NavigationWatcher,
{
    pub fn new(browser: B, scheduler: S, watcher: W) -> Self {
        Self {
            browser,
            scheduler,
            watcher,
            state: ApplierState::Uninitialized,
            active: None,
        }
    }

    pub fn state(&self) -> ApplierState {
        self.state
    }

    /// The patch currently installed, if any.
    pub fn active_patch(&self) -> Option<&Patch> {
        self.active.as_ref()
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut B {
        &mut self.browser
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn watcher(&self) -> &W {
        &self.watcher
    }

    pub fn is_torn_down(&self) -> bool {
        self.state == ApplierState::TornDown
    }

    fn cancel_pending(&mut self) {
        if let ApplierState::Waiting(timer) = self.state {
            self.scheduler.cancel(timer);
            self.state = ApplierState::Uninitialized;
        }
    }
}

/// Applies generated patches to a view in response to lifecycle events.
#[derive(Debug, Clone)]
pub struct PatchApplier {
    settings: SettingsModel,
    authenticated: bool,
}

impl PatchApplier {
    pub fn new(settings: SettingsModel, authenticated: bool) -> Self {
        Self {
            settings,
            authenticated,
        }
    }

    pub fn settings(&self) -> &SettingsModel {
        &self.settings
    }

    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn redirect_policy(&self) -> ShortsRedirectPolicy {
        ShortsRedirectPolicy::from_settings(&self.settings)
    }

    /// The view finished loading a document.
    ///
    /// A load replaces the document, so the previous patch and watcher are
    /// gone with it. Runs the proactive Shorts redirect, then schedules the
    /// first apply after the configured delay. A timer still in flight from
    /// an earlier load is cancelled first.
    pub fn on_page_load<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>)
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        if ctx.is_torn_down() {
            return;
        }
        ctx.cancel_pending();
        ctx.watcher.stop();
        ctx.active = None;
        ctx.state = ApplierState::Uninitialized;

        let url = ctx.browser.current_url();
        if self.redirect_proactively(ctx, &url) {
            return;
        }
        if !self.settings.auto_inject {
            log::debug!("Automatic injection disabled, not scheduling a patch");
            return;
        }

        let timer = ctx.scheduler.schedule(self.settings.injection_delay);
        log::debug!("Scheduled patch in {}ms for {}", self.settings.injection_delay, url);
        ctx.state = ApplierState::Waiting(timer);
    }

    /// A scheduled timer fired. Handles that are no longer pending are stale
    /// and ignored.
    pub fn on_timer<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>, timer: TimerHandle)
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        match ctx.state {
            ApplierState::Waiting(pending) if pending == timer => {
                ctx.state = ApplierState::Uninitialized;
                let url = ctx.browser.current_url();
                self.reapply(ctx, &url);
            }
            _ => log::debug!("Ignoring stale timer {:?}", timer),
        }
    }

    /// The page's URL changed without a document reload.
    ///
    /// The patch is regenerated for the page type of `event.to_url` and
    /// applied at once, superseding anything still scheduled.
    pub fn on_navigation<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>, event: &NavigationEvent)
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        if ctx.is_torn_down() || event.from_url == event.to_url {
            return;
        }
        ctx.cancel_pending();
        ctx.watcher.resync(&event.to_url);

        if self.redirect_proactively(ctx, &event.to_url) {
            return;
        }

        let page_type = classify(&event.to_url);
        log::info!("Navigation {} -> {} ({})", event.from_url, event.to_url, page_type);
        ctx.browser.post_message(StatusMessage::NavigationDetected {
            from: event.from_url.clone(),
            to: event.to_url.clone(),
            page_type,
        });
        self.reapply(ctx, &event.to_url);
    }

    /// The document mutated; asks the watcher whether the URL moved.
    pub fn on_dom_mutation<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>)
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        if ctx.is_torn_down() {
            return;
        }
        let url = ctx.browser.current_url();
        if let Some(event) = ctx.watcher.observe(&url) {
            self.on_navigation(ctx, &event);
        }
    }

    /// The user activated an in-page link. With Shorts hidden, Shorts links
    /// are turned into a normal navigation to the watch page.
    pub fn on_link_activation<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>, href: &str) -> LinkActivation
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        if ctx.is_torn_down() {
            return LinkActivation::Proceed;
        }
        let decision = self.redirect_policy().intercept(href);
        if let LinkActivation::Redirect(to) = &decision {
            ctx.browser.post_message(StatusMessage::ShortsRedirect {
                from: href.to_string(),
                to: to.clone(),
            });
            ctx.browser.assign_location(to);
        }
        decision
    }

    /// Replace the settings. An applied view is re-patched immediately; a
    /// pending timer picks the new settings up when it fires.
    pub fn update_settings<B, S, W>(&mut self, settings: SettingsModel, ctx: &mut ViewContext<B, S, W>)
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        if settings == self.settings {
            return;
        }
        self.settings = settings;
        self.refresh(ctx);
    }

    /// Record a change in the signed-in state.
    pub fn set_authenticated<B, S, W>(&mut self, authenticated: bool, ctx: &mut ViewContext<B, S, W>)
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        if authenticated == self.authenticated {
            return;
        }
        self.authenticated = authenticated;
        self.refresh(ctx);
    }

    /// Install `patch`, replacing whatever patch was live.
    ///
    /// The navigation watcher is started before anything is installed and
    /// survives a failure. On failure every partial artifact is removed, an
    /// `error` status is posted and the view returns to `Uninitialized`, so
    /// the next navigation retries cleanly.
    pub fn apply<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>, patch: Patch) -> Result<(), InjectionError>
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        let url = ctx.browser.current_url();
        self.apply_at(ctx, patch, &url)
    }

    fn apply_at<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>, mut patch: Patch, url: &str) -> Result<(), InjectionError>
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        if ctx.is_torn_down() {
            return Err(InjectionError::Detached);
        }
        ctx.state = ApplierState::Applying;
        let removed = ctx.browser.remove_marked(PATCH_MARKER);
        ctx.active = None;
        if removed > 0 {
            log::debug!("Removed {} artifacts of the previous patch", removed);
        }

        if ctx.watcher.start(url) {
            log::debug!("Navigation watcher started at {}", url);
        }

        let now = ctx.browser.now_millis();
        match install(&mut ctx.browser, &patch) {
            Ok(()) => {
                patch.applied_at = Some(now);
                ctx.browser.post_message(StatusMessage::InjectionSuccess {
                    page_type: patch.page_type,
                    timestamp: now,
                    settings: patch.settings,
                    location: url.to_string(),
                    authenticated: patch.authenticated,
                });
                log::info!("Patch applied for page type {}", patch.page_type);
                ctx.active = Some(patch);
                ctx.state = ApplierState::Applied;
                Ok(())
            }
            Err(err) => {
                ctx.browser.remove_marked(PATCH_MARKER);
                log::warn!("Injection failed: {}", err);
                ctx.browser.post_message(StatusMessage::Error {
                    error: err.to_string(),
                    page_type: Some(patch.page_type),
                    timestamp: now,
                });
                ctx.state = ApplierState::Uninitialized;
                Err(err)
            }
        }
    }

    /// Remove every artifact and watcher the view owns. Subsequent events
    /// are ignored.
    pub fn teardown<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>)
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        if ctx.is_torn_down() {
            return;
        }
        ctx.cancel_pending();
        let removed = ctx.browser.remove_marked(PATCH_MARKER);
        ctx.watcher.stop();
        ctx.active = None;
        ctx.state = ApplierState::TornDown;
        log::debug!("View torn down, {} artifacts removed", removed);
    }

    fn refresh<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>)
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        if ctx.state == ApplierState::Applied {
            let url = ctx.browser.current_url();
            self.reapply(ctx, &url);
        }
    }

    /// Regenerate for `url` and apply. Failures are already reported through
    /// the status channel.
    fn reapply<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>, url: &str)
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        if self.redirect_proactively(ctx, url) {
            return;
        }
        let patch = generator::build_patch(&self.settings, classify(url), self.authenticated);
        if let Some(active) = &ctx.active {
            if active.same_content(&patch) && ctx.state == ApplierState::Applied {
                log::debug!("Patch unchanged, skipping re-apply");
                return;
            }
        }
        let _ = self.apply_at(ctx, patch, url);
    }

    /// Returns `true` when the view is being sent elsewhere and nothing
    /// should be applied to the current document.
    fn redirect_proactively<B, S, W>(&self, ctx: &mut ViewContext<B, S, W>, url: &str) -> bool
    where
        B: BrowserContext,
        S: Scheduler,
        W: NavigationWatcher,
    {
        match self.redirect_policy().evaluate(url) {
            RedirectDecision::Redirect { from, to } => {
                ctx.browser.remove_marked(PATCH_MARKER);
                ctx.watcher.stop();
                ctx.active = None;
                ctx.state = ApplierState::Uninitialized;
                ctx.browser.post_message(StatusMessage::ShortsRedirect {
                    from,
                    to: to.clone(),
                });
                ctx.browser.replace_location(&to);
                true
            }
            RedirectDecision::NotApplicable | RedirectDecision::Unresolvable { .. } => false,
        }
    }
}

fn install<B: BrowserContext>(browser: &mut B, patch: &Patch) -> Result<(), InjectionError> {
    browser.set_root_attribute(PAGE_TYPE_ATTRIBUTE, patch.page_type.as_str())?;
    browser.set_root_attribute(
        SIGNED_IN_ATTRIBUTE,
        if patch.authenticated { "true" } else { "false" },
    )?;
    browser.install(Artifact::style(PATCH_MARKER, patch.rule_text.clone()))?;
    browser.install(Artifact::script(PATCH_MARKER, patch.script.clone()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageType;

    type TestView = ViewContext<InMemoryDocument, ManualScheduler, UrlChangeWatcher>;

    fn view(url: &str) -> TestView {
        ViewContext::new(InMemoryDocument::new(url), ManualScheduler::new(), UrlChangeWatcher::new())
    }

    fn fire_due(applier: &PatchApplier, ctx: &mut TestView, ms: u64) {
        for timer in ctx.scheduler_mut().advance(ms) {
            applier.on_timer(ctx, timer);
        }
    }

    #[test]
    fn test_page_load_waits_for_delay() {
        let applier = PatchApplier::new(SettingsModel::default(), false);
        let mut ctx = view("https://m.youtube.com/");

        applier.on_page_load(&mut ctx);
        assert!(matches!(ctx.state(), ApplierState::Waiting(_)));
        assert_eq!(ctx.browser().count_marked(PATCH_MARKER), 0);

        fire_due(&applier, &mut ctx, 999);
        assert_eq!(ctx.browser().count_marked(PATCH_MARKER), 0);
        fire_due(&applier, &mut ctx, 1);
        assert_eq!(ctx.state(), ApplierState::Applied);
        assert_eq!(ctx.browser().count_marked(PATCH_MARKER), 2);
        assert_eq!(ctx.browser().root_attribute(PAGE_TYPE_ATTRIBUTE), Some("home"));
    }

    #[test]
    fn test_repeated_apply_does_not_accumulate() {
        let applier = PatchApplier::new(SettingsModel::default(), false);
        let mut ctx = view("https://m.youtube.com/");
        for _ in 0..3 {
            let patch = generator::build_patch(applier.settings(), PageType::Home, false);
            applier.apply(&mut ctx, patch).unwrap();
        }
        assert_eq!(ctx.browser().count_marked(PATCH_MARKER), 2);
        assert_eq!(ctx.watcher().registrations(), 1);
    }

    #[test]
    fn test_reload_cancels_in_flight_timer() {
        let applier = PatchApplier::new(SettingsModel::default(), false);
        let mut ctx = view("https://m.youtube.com/");
        applier.on_page_load(&mut ctx);
        applier.on_page_load(&mut ctx);
        assert_eq!(ctx.scheduler().pending(), 1);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let applier = PatchApplier::new(SettingsModel::default(), false);
        let mut ctx = view("https://m.youtube.com/");
        applier.on_timer(&mut ctx, TimerHandle(42));
        assert_eq!(ctx.state(), ApplierState::Uninitialized);
        assert!(ctx.browser().messages().is_empty());
    }

    #[test]
    fn test_failure_cleans_up_and_retries() {
        let applier = PatchApplier::new(SettingsModel::default(), false);
        let mut ctx = ViewContext::new(
            InMemoryDocument::without_body("https://m.youtube.com/"),
            ManualScheduler::new(),
            UrlChangeWatcher::new(),
        );
        let patch = generator::build_patch(applier.settings(), PageType::Home, false);

        let err = applier.apply(&mut ctx, patch.clone()).unwrap_err();
        assert_eq!(err, InjectionError::MissingAnchor("body"));
        assert_eq!(ctx.state(), ApplierState::Uninitialized);
        assert_eq!(ctx.browser().count_marked(PATCH_MARKER), 0);
        assert!(ctx.browser().messages().last().is_some_and(StatusMessage::is_error));

        ctx.browser_mut().set_body_ready(true);
        applier.apply(&mut ctx, patch).unwrap();
        assert_eq!(ctx.state(), ApplierState::Applied);
    }

    #[test]
    fn test_teardown_leaves_nothing_behind() {
        let applier = PatchApplier::new(SettingsModel::default(), false);
        let mut ctx = view("https://m.youtube.com/");
        applier.apply(&mut ctx, generator::build_patch(applier.settings(), PageType::Home, false)).unwrap();

        applier.teardown(&mut ctx);
        assert_eq!(ctx.browser().count_marked(PATCH_MARKER), 0);
        assert!(!ctx.watcher().is_watching());
        assert!(ctx.active_patch().is_none());

        applier.on_page_load(&mut ctx);
        assert_eq!(ctx.scheduler().pending(), 0);
        assert_eq!(
            applier.apply(&mut ctx, generator::build_patch(applier.settings(), PageType::Home, false)),
            Err(InjectionError::Detached)
        );
    }

    #[test]
    fn test_settings_change_reapplies_applied_view() {
        let mut applier = PatchApplier::new(SettingsModel::default(), false);
        let mut ctx = view("https://m.youtube.com/watch?v=a");
        applier.on_page_load(&mut ctx);
        fire_due(&applier, &mut ctx, 1000);

        let settings = SettingsModel {
            show_comments: true,
            ..SettingsModel::default()
        };
        applier.update_settings(settings, &mut ctx);

        let active = ctx.active_patch().unwrap();
        assert!(active.settings.show_comments);
        assert_eq!(ctx.browser().count_marked(PATCH_MARKER), 2);
    }

    #[test]
    fn test_settings_change_while_waiting_uses_new_settings() {
        let mut applier = PatchApplier::new(SettingsModel::default(), false);
        let mut ctx = view("https://m.youtube.com/");
        applier.on_page_load(&mut ctx);
        applier.update_settings(
            SettingsModel {
                show_sidebar: true,
                ..SettingsModel::default()
            },
            &mut ctx,
        );
        assert!(ctx.active_patch().is_none());

        fire_due(&applier, &mut ctx, 1000);
        assert!(ctx.active_patch().unwrap().settings.show_sidebar);
    }

    #[test]
    fn test_failed_first_install_retries_on_dom_mutation() {
        let applier = PatchApplier::new(SettingsModel::default(), false);
        let mut ctx = ViewContext::new(
            InMemoryDocument::without_body("https://m.youtube.com/"),
            ManualScheduler::new(),
            UrlChangeWatcher::new(),
        );
        applier.on_page_load(&mut ctx);
        fire_due(&applier, &mut ctx, 1000);
        assert_eq!(ctx.state(), ApplierState::Uninitialized);
        assert!(ctx.watcher().is_watching());

        ctx.browser_mut().set_body_ready(true);
        ctx.browser_mut().navigate("https://m.youtube.com/watch?v=a");
        applier.on_dom_mutation(&mut ctx);

        assert_eq!(ctx.state(), ApplierState::Applied);
        assert_eq!(ctx.browser().count_marked(PATCH_MARKER), 2);
        assert_eq!(ctx.active_patch().map(|p| p.page_type), Some(PageType::Watch));
    }

    #[test]
    fn test_navigation_patch_follows_event_url() {
        let applier = PatchApplier::new(SettingsModel::default(), false);
        let mut ctx = view("https://m.youtube.com/");
        applier.on_navigation(
            &mut ctx,
            &NavigationEvent::new("https://m.youtube.com/", "https://m.youtube.com/watch?v=x"),
        );

        let announced = ctx.browser().messages().iter().find_map(|m| match m {
            StatusMessage::NavigationDetected { page_type, .. } => Some(*page_type),
            _ => None,
        });
        assert_eq!(announced, Some(PageType::Watch));
        assert_eq!(ctx.active_patch().map(|p| p.page_type), Some(PageType::Watch));
        assert_eq!(ctx.browser().root_attribute(PAGE_TYPE_ATTRIBUTE), Some("watch"));
    }

    #[test]
    fn test_page_load_forgets_previous_document() {
        let applier = PatchApplier::new(
            SettingsModel {
                auto_inject: false,
                ..SettingsModel::default()
            },
            false,
        );
        let mut ctx = view("https://m.youtube.com/");
        applier.apply(&mut ctx, generator::build_patch(applier.settings(), PageType::Home, false)).unwrap();
        assert_eq!(ctx.state(), ApplierState::Applied);

        ctx.browser_mut().assign_location("https://m.youtube.com/watch?v=b");
        applier.on_page_load(&mut ctx);

        assert_eq!(ctx.state(), ApplierState::Uninitialized);
        assert!(ctx.active_patch().is_none());
        assert!(!ctx.watcher().is_watching());
        assert_eq!(ctx.browser().count_marked(PATCH_MARKER), 0);
    }

    #[test]
    fn test_auto_inject_disabled_schedules_nothing() {
        let applier = PatchApplier::new(
            SettingsModel {
                auto_inject: false,
                ..SettingsModel::default()
            },
            false,
        );
        let mut ctx = view("https://m.youtube.com/");
        applier.on_page_load(&mut ctx);
        assert_eq!(ctx.scheduler().pending(), 0);
        assert_eq!(ctx.state(), ApplierState::Uninitialized);
    }
}
