//! Page event binding.
//!
//! The page reports raw [`DomEvent`]s; the [`EventBinder`] resolves them
//! against its registered subscriptions and returns the [`Action`] the
//! application should perform. Subscriptions are registered explicitly on
//! mount and removed on unmount, so binding twice is an error rather than
//! a duplicate handler.

use serde::Serialize;
use thiserror::Error;

use crate::models::ListKind;
use crate::view::View;

/// Key code of the Enter key, the only key that submits a search.
pub const KEY_ENTER: u32 = 13;

/// Attribute carrying the catalog id on every "add to watchlist" affordance.
pub const MOVIE_ID_ATTR: &str = "data-movie-id";

/// Page elements the application listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    LoginButton,
    CatalogInput,
    AddToWatchlist,
    ShowWatched,
    ShowUnwatched,
    ShowSearch,
    WatchedInput,
    UnwatchedInput,
}

impl Target {
    pub const ALL: &[Target] = &[
        Self::LoginButton,
        Self::CatalogInput,
        Self::AddToWatchlist,
        Self::ShowWatched,
        Self::ShowUnwatched,
        Self::ShowSearch,
        Self::WatchedInput,
        Self::UnwatchedInput,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            Self::LoginButton => "btn-login",
            Self::CatalogInput => "user-input",
            Self::AddToWatchlist => "add-to-watchlist",
            Self::ShowWatched => "btn-showWatched",
            Self::ShowUnwatched => "btn-showUnWatched",
            Self::ShowSearch => "btn-normSearch",
            Self::WatchedInput => "user-watched",
            Self::UnwatchedInput => "user-unwatched",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.element_id() == id)
    }
}

/// What kind of interaction a subscription reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Click,
    /// A key press with [`KEY_ENTER`].
    Enter,
}

/// A raw event reported by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    Click {
        element_id: String,
        /// Value of the [`MOVIE_ID_ATTR`] attribute, if the element has one.
        movie_id: Option<String>,
    },
    KeyDown {
        element_id: String,
        key_code: u32,
        value: String,
    },
}

impl DomEvent {
    pub fn click(element_id: impl Into<String>) -> Self {
        Self::Click {
            element_id: element_id.into(),
            movie_id: None,
        }
    }

    pub fn click_add(movie_id: impl Into<String>) -> Self {
        Self::Click {
            element_id: Target::AddToWatchlist.element_id().into(),
            movie_id: Some(movie_id.into()),
        }
    }

    pub fn enter(element_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::KeyDown {
            element_id: element_id.into(),
            key_code: KEY_ENTER,
            value: value.into(),
        }
    }

    /// Resolve the target and trigger. Clicks carrying a movie id resolve to
    /// [`Target::AddToWatchlist`] wherever the clicked element sits.
    fn resolve(&self) -> Option<(Target, Trigger)> {
        match self {
            Self::Click {
                movie_id: Some(_), ..
            } => Some((Target::AddToWatchlist, Trigger::Click)),
            Self::Click { element_id, .. } => {
                Target::from_element_id(element_id).map(|t| (t, Trigger::Click))
            }
            Self::KeyDown {
                element_id,
                key_code,
                ..
            } if *key_code == KEY_ENTER => {
                Target::from_element_id(element_id).map(|t| (t, Trigger::Enter))
            }
            Self::KeyDown { .. } => None,
        }
    }
}

/// What the application should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Action {
    ToggleLogin,
    AddToWatchlist(u64),
    SearchCatalog(String),
    SearchList(ListKind, String),
    Show(View),
}

/// A resolved event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    pub action: Action,
    /// The page must suppress the element's default behavior (form submission).
    pub prevent_default: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("event handlers are already mounted")]
    AlreadyMounted,

    #[error("malformed target #{element_id}: {reason}")]
    MalformedTarget { element_id: String, reason: String },
}

/// Handle returned by [`EventBinder::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone)]
struct Subscription {
    id: SubscriptionId,
    target: Target,
    trigger: Trigger,
}

/// Subscriptions mounted for the lifetime of a page.
const DEFAULT_SUBSCRIPTIONS: &[(Target, Trigger)] = &[
    (Target::LoginButton, Trigger::Click),
    (Target::AddToWatchlist, Trigger::Click),
    (Target::CatalogInput, Trigger::Enter),
    (Target::ShowWatched, Trigger::Click),
    (Target::ShowUnwatched, Trigger::Click),
    (Target::ShowSearch, Trigger::Click),
    (Target::WatchedInput, Trigger::Enter),
    (Target::UnwatchedInput, Trigger::Enter),
];

#[derive(Debug, Default)]
pub struct EventBinder {
    subscriptions: Vec<Subscription>,
    next_id: u64,
    mounted: bool,
}

impl EventBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach every page handler. Fails if already mounted.
    pub fn mount(&mut self) -> Result<(), BindError> {
        if self.mounted {
            return Err(BindError::AlreadyMounted);
        }
        for (target, trigger) in DEFAULT_SUBSCRIPTIONS {
            self.subscribe(*target, *trigger);
        }
        self.mounted = true;
        tracing::debug!(subscriptions = self.subscriptions.len(), "event handlers mounted");
        Ok(())
    }

    /// Detach every handler, returning how many were removed.
    pub fn unmount(&mut self) -> usize {
        let removed = self.subscriptions.len();
        self.subscriptions.clear();
        self.mounted = false;
        tracing::debug!(removed, "event handlers unmounted");
        removed
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Register interest in `trigger` on `target`. Subscribing to the same
    /// pair twice returns the existing handle.
    pub fn subscribe(&mut self, target: Target, trigger: Trigger) -> SubscriptionId {
        if let Some(existing) = self
            .subscriptions
            .iter()
            .find(|s| s.target == target && s.trigger == trigger)
        {
            return existing.id;
        }
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            target,
            trigger,
        });
        id
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        before != self.subscriptions.len()
    }

    fn is_subscribed(&self, target: Target, trigger: Trigger) -> bool {
        self.subscriptions
            .iter()
            .any(|s| s.target == target && s.trigger == trigger)
    }

    /// Resolve a page event. `Ok(None)` means no subscription wants it.
    pub fn dispatch(&self, event: &DomEvent) -> Result<Option<Dispatch>, BindError> {
        let Some((target, trigger)) = event.resolve() else {
            return Ok(None);
        };
        if !self.is_subscribed(target, trigger) {
            return Ok(None);
        }

        let action = match (target, event) {
            (Target::LoginButton, _) => Action::ToggleLogin,
            (Target::AddToWatchlist, DomEvent::Click { movie_id, .. }) => {
                Action::AddToWatchlist(parse_movie_id(movie_id.as_deref())?)
            }
            (Target::ShowWatched, _) => Action::Show(View::Watched),
            (Target::ShowUnwatched, _) => Action::Show(View::Unwatched),
            (Target::ShowSearch, _) => Action::Show(View::Search),
            (Target::CatalogInput, DomEvent::KeyDown { value, .. }) => {
                Action::SearchCatalog(value.clone())
            }
            (Target::WatchedInput, DomEvent::KeyDown { value, .. }) => {
                Action::SearchList(ListKind::Watched, value.clone())
            }
            (Target::UnwatchedInput, DomEvent::KeyDown { value, .. }) => {
                Action::SearchList(ListKind::Unwatched, value.clone())
            }
            _ => return Ok(None),
        };

        Ok(Some(Dispatch {
            prevent_default: trigger == Trigger::Enter,
            action,
        }))
    }
}

fn parse_movie_id(raw: Option<&str>) -> Result<u64, BindError> {
    let malformed = |reason: String| BindError::MalformedTarget {
        element_id: Target::AddToWatchlist.element_id().into(),
        reason,
    };
    let raw = raw.ok_or_else(|| malformed(format!("missing {MOVIE_ID_ATTR}")))?;
    raw.trim()
        .parse()
        .map_err(|_| malformed(format!("invalid {MOVIE_ID_ATTR} {raw:?}")))
}
