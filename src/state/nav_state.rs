/// Navigation state definitions for the browser session
///
/// This module defines every state the navigation controller can be in
/// while it walks the list → detail → back cycle.
use std::fmt;

/// Represents where the browser session currently is in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavState {
    // ===== Startup States =====
    /// Session created, search page not loaded yet
    Init,

    /// Search page loaded, consent banner being dismissed
    CookieConsent,

    // ===== Cycle States =====
    /// Waiting for (or sitting on) a list page
    ListReady,

    /// Browser is on a listing's detail page
    DetailVisit,

    /// Going back from a detail page to the list
    ReturnToList,

    /// Looking for and clicking the next-page control
    Paginate,

    // ===== Final State =====
    /// Browser session released
    Terminal,
}

impl NavState {
    /// Returns true once the session has been released
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }

    /// Returns true if the browser is expected to show a list page
    pub fn on_list(&self) -> bool {
        matches!(self, Self::ListReady | Self::Paginate)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Every live state may move to `Terminal`; nothing leaves `Terminal`.
    pub fn can_transition_to(&self, next: NavState) -> bool {
        use NavState::*;

        match (self, next) {
            (Terminal, _) => false,
            (_, Terminal) => true,
            (Init, CookieConsent) => true,
            (CookieConsent, ListReady) => true,
            (ListReady, DetailVisit) | (ListReady, Paginate) => true,
            (DetailVisit, ReturnToList) => true,
            (ReturnToList, ListReady) => true,
            (Paginate, ListReady) => true,
            _ => false,
        }
    }

    /// Returns a short lowercase label, used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::CookieConsent => "cookie_consent",
            Self::ListReady => "list_ready",
            Self::DetailVisit => "detail_visit",
            Self::ReturnToList => "return_to_list",
            Self::Paginate => "paginate",
            Self::Terminal => "terminal",
        }
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
