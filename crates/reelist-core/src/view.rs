use serde::{Deserialize, Serialize};

use crate::models::ListKind;

/// Which input panel is shown. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Search,
    Watched,
    Unwatched,
}

impl View {
    pub const ALL: &[View] = &[Self::Search, Self::Watched, Self::Unwatched];

    /// Element id of the panel this view reveals.
    pub fn panel_id(self) -> &'static str {
        match self {
            Self::Search => "user-input",
            Self::Watched => "user-watched",
            Self::Unwatched => "user-unwatched",
        }
    }

    /// The personal list backing this view, if any.
    pub fn list(self) -> Option<ListKind> {
        match self {
            Self::Search => None,
            Self::Watched => Some(ListKind::Watched),
            Self::Unwatched => Some(ListKind::Unwatched),
        }
    }
}

impl From<ListKind> for View {
    fn from(list: ListKind) -> Self {
        match list {
            ListKind::Watched => Self::Watched,
            ListKind::Unwatched => Self::Unwatched,
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search => write!(f, "Search"),
            Self::Watched => write!(f, "Watched"),
            Self::Unwatched => write!(f, "Unwatched"),
        }
    }
}

/// Display state of the three panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelVisibility {
    pub search: bool,
    pub watched: bool,
    pub unwatched: bool,
}

impl PanelVisibility {
    pub fn only(view: View) -> Self {
        Self {
            search: view == View::Search,
            watched: view == View::Watched,
            unwatched: view == View::Unwatched,
        }
    }

    pub fn is_visible(&self, view: View) -> bool {
        match view {
            View::Search => self.search,
            View::Watched => self.watched,
            View::Unwatched => self.unwatched,
        }
    }
}

/// Three-state exclusive display toggle. Starts on the search panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewToggler {
    current: View,
}

impl ViewToggler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Hide the other panels and reveal `view`. Re-selecting the current view is a no-op.
    pub fn show(&mut self, view: View) -> PanelVisibility {
        if self.current != view {
            tracing::debug!(from = %self.current, to = %view, "switching view");
            self.current = view;
        }
        self.visibility()
    }

    /// Return to the search panel.
    pub fn reset(&mut self) -> PanelVisibility {
        self.show(View::Search)
    }

    pub fn visibility(&self) -> PanelVisibility {
        PanelVisibility::only(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible_count(v: PanelVisibility) -> usize {
        View::ALL.iter().filter(|view| v.is_visible(**view)).count()
    }

    #[test]
    fn test_initial_state_is_search() {
        let toggler = ViewToggler::new();
        assert_eq!(toggler.current(), View::Search);
        assert_eq!(toggler.visibility(), PanelVisibility::only(View::Search));
    }

    #[test]
    fn test_show_watched_from_any_state() {
        for prior in View::ALL {
            let mut toggler = ViewToggler::new();
            toggler.show(*prior);
            let vis = toggler.show(View::Watched);
            assert!(vis.watched);
            assert!(!vis.search);
            assert!(!vis.unwatched);
        }
    }

    #[test]
    fn test_exactly_one_visible() {
        let mut toggler = ViewToggler::new();
        for view in [View::Unwatched, View::Search, View::Watched, View::Watched] {
            assert_eq!(visible_count(toggler.show(view)), 1);
        }
    }

    #[test]
    fn test_reselect_is_idempotent() {
        let mut toggler = ViewToggler::new();
        let first = toggler.show(View::Unwatched);
        let second = toggler.show(View::Unwatched);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reset_returns_to_search() {
        let mut toggler = ViewToggler::new();
        toggler.show(View::Watched);
        assert!(toggler.reset().search);
        assert_eq!(toggler.current(), View::Search);
    }
}
