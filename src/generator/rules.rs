//! Rule table for the filtering stylesheet
//!
//! Each rule pairs a selector group with a page-type scope and an effect.
//! The page-type exceptions (comments vs. related videos, the watch-page and
//! subscriptions-tab guarantees) live here as data and are only turned into
//! CSS text by [`super::css`].

use crate::models::{PageType, SettingsModel, PAGE_TYPE_ATTRIBUTE};

/// Which toggle a rule belongs to. `Core` rules are emitted for every setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Recommendations,
    Sidebar,
    Comments,
    RelatedVideos,
    Shorts,
    Core,
}

impl Feature {
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Recommendations => "Recommendations",
            Feature::Sidebar => "Sidebar",
            Feature::Comments => "Comments",
            Feature::RelatedVideos => "Related Videos",
            Feature::Shorts => "Shorts",
            Feature::Core => "Core",
        }
    }
}

/// Page types a rule is active on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Everywhere,
    Only(Vec<PageType>),
    Except(Vec<PageType>),
}

impl Scope {
    pub fn applies_to(&self, page: PageType) -> bool {
        match self {
            Scope::Everywhere => true,
            Scope::Only(pages) => expand(pages).contains(&page),
            Scope::Except(pages) => !expand(pages).contains(&page),
        }
    }

    /// Root-attribute prefixes realising this scope in CSS. An empty prefix
    /// means the selector applies unscoped.
    pub fn selector_prefixes(&self) -> Vec<String> {
        match self {
            Scope::Everywhere => vec![String::new()],
            Scope::Only(pages) => expand(pages)
                .into_iter()
                .map(|page| format!("body[{}=\"{}\"]", PAGE_TYPE_ATTRIBUTE, page))
                .collect(),
            Scope::Except(pages) => {
                let mut prefix = String::from("body");
                for page in expand(pages) {
                    prefix.push_str(&format!(":not([{}=\"{}\"])", PAGE_TYPE_ATTRIBUTE, page));
                }
                vec![prefix]
            }
        }
    }
}

/// Listing `Home` always brings `Unknown` along so unclassified pages are
/// styled like the home feed.
fn expand(pages: &[PageType]) -> Vec<PageType> {
    let includes = |page: PageType| {
        pages.contains(&page) || (page == PageType::Unknown && pages.contains(&PageType::Home))
    };
    PageType::ALL.into_iter().filter(|page| includes(*page)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    Flex,
}

impl Display {
    pub fn as_str(&self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::Flex => "flex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: &'static str,
    pub value: String,
}

impl Declaration {
    pub fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Hide,
    Show(Display),
    Declare(Vec<Declaration>),
}

impl Effect {
    pub fn declarations(&self) -> Vec<Declaration> {
        match self {
            Effect::Hide => vec![
                Declaration::new("display", "none !important"),
                Declaration::new("visibility", "hidden !important"),
            ],
            Effect::Show(display) => vec![
                Declaration::new("display", format!("{} !important", display.as_str())),
                Declaration::new("visibility", "visible !important"),
                Declaration::new("opacity", "1 !important"),
            ],
            Effect::Declare(declarations) => declarations.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub feature: Feature,
    pub label: &'static str,
    pub scope: Scope,
    pub selectors: &'static [&'static str],
    pub effect: Effect,
}

impl Rule {
    fn new(
        feature: Feature,
        label: &'static str,
        scope: Scope,
        selectors: &'static [&'static str],
        effect: Effect,
    ) -> Self {
        Self { feature, label, scope, selectors, effect }
    }
}

// ============================================================================
// Selector groups
// ============================================================================

pub const HOME_FEED: &[&str] = &[
    "ytm-browse .rich-grid-renderer",
    "ytm-browse ytm-rich-grid-renderer",
    "ytm-browse ytm-rich-item-renderer",
    "ytm-browse ytm-video-with-context-renderer",
    "ytm-browse ytm-playlist-video-renderer",
    "ytm-browse .media-item",
    "ytm-browse .compact-media-item",
    "ytm-browse .large-media-item",
    "ytm-browse ytm-section-list-renderer",
    "ytm-browse ytm-item-section-renderer",
    "ytm-browse .tab-content",
    "ytm-browse .browse-items-primary",
];

pub const CHIP_BARS: &[&str] = &[
    "ytm-feed-filter-chip-bar-renderer",
    "ytm-browse .feed-filter-chip-bar-container",
    "ytm-chip-cloud-renderer",
];

pub const FEED_CONTENT: &[&str] = &[
    "ytm-browse .rich-grid-renderer",
    "ytm-browse ytm-rich-grid-renderer",
    "ytm-browse ytm-section-list-renderer",
    "ytm-browse ytm-item-section-renderer",
    "ytm-browse ytm-rich-item-renderer",
    "ytm-browse ytm-video-with-context-renderer",
];

pub const SEARCH_RESULTS: &[&str] = &[
    "ytm-search ytm-section-list-renderer",
    "ytm-search ytm-item-section-renderer",
    "ytm-search ytm-compact-video-renderer",
    "ytm-search ytm-video-with-context-renderer",
];

pub const TOP_NAVIGATION: &[&str] = &[
    "ytm-mobile-topbar-renderer",
    "ytm-pivot-bar-renderer",
    "ytm-searchbox",
];

const HOME_PLACEHOLDER: &[&str] = &["ytm-browse[role=\"main\"]::after"];
const HOME_PLACEHOLDER_HOST: &[&str] = &["ytm-browse[role=\"main\"]"];

pub const DESKTOP_SIDEBAR: &[&str] = &[
    "#guide",
    "#guide-wrapper",
    "#guide-button",
    "ytd-guide-renderer",
    "ytd-mini-guide-renderer",
    "tp-yt-app-drawer",
];

const DESKTOP_PAGE_MANAGER: &[&str] = &["ytd-app #page-manager"];

pub const COMMENTS: &[&str] = &[
    "#comments",
    "ytd-comments",
    "ytm-comment-section-renderer",
    "ytm-comments-section-renderer",
    "ytm-comment-thread-renderer",
    "ytm-comments-entry-point-header-renderer",
    "ytm-comments-entry-point-teaser-renderer",
    "[section-identifier=\"comment-item-section\"]",
    ".comment-section",
    ".comments-section",
    ".comments-header",
    ".comment-entries",
];

pub const RELATED_VIDEOS: &[&str] = &[
    "ytm-watch ytm-item-section-renderer:not(.video-primary-info):not(.video-secondary-info)",
    "ytm-watch-next-secondary-results-renderer",
    "ytm-watch .watch-next-feed",
    "ytm-watch ytm-compact-video-renderer",
    "ytm-watch ytm-video-with-context-renderer",
    "ytm-watch .watch-next-continuation",
    "ytm-watch .autoplay-toggle",
    "ytm-compact-autoplay-renderer",
    "ytd-compact-autoplay-renderer",
    "ytd-watch-next-secondary-results-renderer",
    "#secondary",
    "#related",
];

pub const END_SCREENS: &[&str] = &[
    ".ytp-endscreen-content",
    ".ytp-ce-element",
    ".ytp-ce-covering-overlay",
    ".ytp-autonav-endscreen",
    ".ytp-autonav-endscreen-upnext-container",
    ".ytp-suggestion-set",
    ".ytp-videowall-still",
];

const PLAYER_CONTAINER: &[&str] = &["#player-container-outer"];

pub const SHORTS_TABS: &[&str] = &[
    "ytm-pivot-bar-renderer a[href*=\"/shorts\"]",
    "ytm-pivot-bar-renderer [tab-identifier=\"FEshorts\"]",
    "ytm-pivot-bar-item-renderer[tab-identifier=\"FEshorts\"]",
    ".pivot-shorts",
];

pub const SHORTS_SHELVES: &[&str] = &[
    "ytm-reel-shelf-renderer",
    "ytm-reel-item-renderer",
    "ytm-shorts-lockup-view-model",
    ".reel-shelf-items",
    ".shorts-container",
    "ytm-shorts-creation-entry-point-renderer",
    ".shorts-creation-guidance",
];

pub const SHORTS_PLAYER: &[&str] = &[
    "ytm-reel-app-renderer",
    "ytm-shorts-player-renderer",
    ".reel-player-overlay-actions",
    ".reel-player-header",
];

const SHORTS_PLACEHOLDER: &[&str] = &["ytm-app::before"];

/// Player, title, description and engagement controls of a watch page.
pub const WATCH_PRIMARY: &[&str] = &[
    "ytm-watch",
    "ytm-watch #player",
    "ytm-watch .player-container",
    "ytm-watch ytm-player",
    "ytm-watch .html5-video-player",
    "ytm-watch .video-stream",
    "ytm-watch video",
    "ytm-watch .watch-above-the-fold",
    "ytm-watch .video-primary-info",
    "ytm-watch .video-secondary-info",
    "ytm-watch ytm-slim-video-metadata-section-renderer",
    "ytm-watch ytm-video-metadata-section-renderer",
    "ytm-watch .ytm-video-description",
    "ytm-watch .video-title",
    "ytm-watch .video-info",
    "ytm-watch .channel-info",
    "ytm-watch .owner-container",
    "ytm-watch .subscribe-button",
    "ytm-watch .like-button-renderer",
    "ytm-watch .dislike-button-renderer",
    "ytm-watch .menu-renderer",
    "ytm-watch .video-actions",
    "ytm-watch .engagement-buttons",
    "ytm-watch .player-controls",
    "ytm-watch .ytp-chrome-bottom",
    "ytm-watch .ytp-chrome-controls",
];

/// The host's own tab-bar entry back to subscribed channels.
pub const SUBSCRIPTIONS_TAB: &[&str] = &[
    "ytm-pivot-bar-renderer a[href*=\"/feed/subscriptions\"]",
    "ytm-pivot-bar-renderer [tab-identifier=\"FEsubscriptions\"]",
    "ytm-pivot-bar-item-renderer[tab-identifier=\"FEsubscriptions\"]",
];

const HOME_MESSAGE: &str =
    "Home recommendations hidden - Use search or the subscriptions tab to find videos";
const HOME_MESSAGE_SIGNED_IN: &str =
    "Home feed hidden - Use search or the subscriptions tab to catch up on your channels";
const SHORTS_MESSAGE: &str =
    "YouTube Shorts are hidden - Shorts links open in the regular video player";

// ============================================================================
// Table
// ============================================================================

/// Ordered rule set for one settings/authentication combination.
///
/// Later rules win over earlier ones of equal specificity, so the always-on
/// guarantees are appended after every feature rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn build(settings: &SettingsModel, authenticated: bool) -> Self {
        let mut rules = Vec::new();

        if !settings.show_recommendations {
            rules.extend(recommendation_rules(authenticated));
        }
        if !settings.show_sidebar {
            rules.extend(sidebar_rules());
        }
        if !settings.show_comments {
            rules.extend(comment_rules());
        }
        if !settings.show_related_videos {
            rules.extend(related_video_rules());
        }
        if !settings.show_shorts {
            rules.extend(shorts_rules());
        }
        rules.extend(core_rules());

        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules whose scope covers `page`, in emission order.
    pub fn rules_for(&self, page: PageType) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |rule| rule.scope.applies_to(page))
    }

    pub fn features(&self) -> Vec<Feature> {
        let mut features: Vec<Feature> = Vec::new();
        for rule in &self.rules {
            if !features.contains(&rule.feature) {
                features.push(rule.feature);
            }
        }
        features
    }

    /// Resolve the final visibility of `selector` on `page`: the last
    /// hide/show rule naming it wins. Unnamed selectors are visible.
    pub fn is_hidden_on(&self, selector: &str, page: PageType) -> bool {
        self.rules_for(page)
            .filter(|rule| rule.selectors.iter().any(|s| *s == selector))
            .fold(false, |hidden, rule| match rule.effect {
                Effect::Hide => true,
                Effect::Show(_) => false,
                Effect::Declare(_) => hidden,
            })
    }

    /// Selectors that end up hidden on `page`.
    pub fn hidden_on(&self, page: PageType) -> Vec<&'static str> {
        let mut hidden: Vec<&'static str> = Vec::new();
        for rule in self.rules_for(page) {
            for &selector in rule.selectors {
                if self.is_hidden_on(selector, page) && !hidden.contains(&selector) {
                    hidden.push(selector);
                }
            }
        }
        hidden
    }
}

fn placeholder_declarations(message: &str, accent: &str) -> Vec<Declaration> {
    vec![
        Declaration::new("content", crate::utils::css_string_literal(message)),
        Declaration::new("display", "block !important"),
        Declaration::new("text-align", "center"),
        Declaration::new("padding", "60px 20px"),
        Declaration::new("margin", "20px"),
        Declaration::new("color", "#717171"),
        Declaration::new("font-size", "14px"),
        Declaration::new("background", "#f9f9f9"),
        Declaration::new("border-radius", "8px"),
        Declaration::new("border-left", format!("4px solid {}", accent)),
    ]
}

fn recommendation_rules(authenticated: bool) -> Vec<Rule> {
    let home = || Scope::Only(vec![PageType::Home]);
    let message = if authenticated { HOME_MESSAGE_SIGNED_IN } else { HOME_MESSAGE };

    vec![
        Rule::new(Feature::Recommendations, "Home feed grid", home(), HOME_FEED, Effect::Hide),
        Rule::new(Feature::Recommendations, "Feed filter chips", home(), CHIP_BARS, Effect::Hide),
        Rule::new(
            Feature::Recommendations,
            "Placeholder container",
            home(),
            HOME_PLACEHOLDER_HOST,
            Effect::Declare(vec![
                Declaration::new("position", "relative !important"),
                Declaration::new("min-height", "300px !important"),
            ]),
        ),
        Rule::new(
            Feature::Recommendations,
            "Placeholder message",
            home(),
            HOME_PLACEHOLDER,
            Effect::Declare(placeholder_declarations(message, "#FF0000")),
        ),
        Rule::new(
            Feature::Recommendations,
            "Subscription and watch feeds stay visible",
            Scope::Only(vec![PageType::Subscriptions, PageType::Watch]),
            FEED_CONTENT,
            Effect::Show(Display::Block),
        ),
        Rule::new(
            Feature::Recommendations,
            "Search results stay visible",
            Scope::Only(vec![PageType::Search]),
            SEARCH_RESULTS,
            Effect::Show(Display::Block),
        ),
        Rule::new(
            Feature::Recommendations,
            "Navigation stays visible",
            Scope::Everywhere,
            TOP_NAVIGATION,
            Effect::Show(Display::Flex),
        ),
    ]
}

fn sidebar_rules() -> Vec<Rule> {
    vec![
        Rule::new(Feature::Sidebar, "Desktop guide", Scope::Everywhere, DESKTOP_SIDEBAR, Effect::Hide),
        Rule::new(
            Feature::Sidebar,
            "Desktop layout without guide",
            Scope::Everywhere,
            DESKTOP_PAGE_MANAGER,
            Effect::Declare(vec![Declaration::new("margin-left", "0 !important")]),
        ),
    ]
}

fn comment_rules() -> Vec<Rule> {
    vec![Rule::new(Feature::Comments, "Comment threads", Scope::Everywhere, COMMENTS, Effect::Hide)]
}

fn related_video_rules() -> Vec<Rule> {
    let watch = || Scope::Only(vec![PageType::Watch]);
    vec![
        Rule::new(Feature::RelatedVideos, "Up next and related", watch(), RELATED_VIDEOS, Effect::Hide),
        Rule::new(Feature::RelatedVideos, "End screens and autoplay", watch(), END_SCREENS, Effect::Hide),
        Rule::new(
            Feature::RelatedVideos,
            "Full-width player",
            watch(),
            PLAYER_CONTAINER,
            Effect::Declare(vec![Declaration::new("max-width", "100% !important")]),
        ),
    ]
}

fn shorts_rules() -> Vec<Rule> {
    vec![
        Rule::new(Feature::Shorts, "Shorts tab", Scope::Everywhere, SHORTS_TABS, Effect::Hide),
        Rule::new(Feature::Shorts, "Shorts shelves", Scope::Everywhere, SHORTS_SHELVES, Effect::Hide),
        Rule::new(
            Feature::Shorts,
            "Shorts player",
            Scope::Except(vec![PageType::Watch]),
            SHORTS_PLAYER,
            Effect::Hide,
        ),
        Rule::new(
            Feature::Shorts,
            "Shorts placeholder",
            Scope::Only(vec![PageType::Shorts]),
            SHORTS_PLACEHOLDER,
            Effect::Declare(placeholder_declarations(SHORTS_MESSAGE, "#f44336")),
        ),
    ]
}

fn core_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            Feature::Core,
            "Watch page player and details",
            Scope::Only(vec![PageType::Watch]),
            WATCH_PRIMARY,
            Effect::Show(Display::Block),
        ),
        Rule::new(
            Feature::Core,
            "Subscriptions tab",
            Scope::Everywhere,
            SUBSCRIPTIONS_TAB,
            Effect::Show(Display::Flex),
        ),
    ]
}
