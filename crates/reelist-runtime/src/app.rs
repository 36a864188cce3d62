use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use reelist_api::traits::{MovieCatalog, MovieStore};
use reelist_core::events::{Action, Dispatch, DomEvent, EventBinder};
use reelist_core::matcher;
use reelist_core::models::{ListKind, MovieCard, RecordPatch, StoredMovie};
use reelist_core::sequence::{SearchSequencer, Ticket};
use reelist_core::view::{PanelVisibility, View, ViewToggler};

use crate::assembler::assemble_record;
use crate::session::{Session, User};
use crate::AppError;

/// Kind of user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A message shown to the user until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Everything the page needs to draw itself.
#[derive(Debug, Clone, Serialize)]
pub struct UiState {
    pub view: View,
    pub panels: PanelVisibility,
    pub cards: Vec<MovieCard>,
    pub notice: Option<Notice>,
    pub user: Option<User>,
}

struct Inner {
    toggler: ViewToggler,
    cards: Vec<MovieCard>,
    notice: Option<Notice>,
}

/// Whether a response was rendered or dropped because a newer request superseded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    Applied(usize),
    Stale,
}

/// The watchlist page controller.
///
/// Page events go through the [`EventBinder`]; the resulting actions call
/// the catalog and store and update the [`UiState`]. Every failure is
/// returned to the caller and also left in the state as an error notice.
pub struct App<C, S> {
    catalog: C,
    store: S,
    session: Session,
    image_base_url: String,
    binder: Mutex<EventBinder>,
    sequencer: SearchSequencer,
    inner: RwLock<Inner>,
}

impl<C: MovieCatalog, S: MovieStore> App<C, S> {
    pub fn new(catalog: C, store: S, session: Session, image_base_url: String) -> Self {
        Self {
            catalog,
            store,
            session,
            image_base_url,
            binder: Mutex::new(EventBinder::new()),
            sequencer: SearchSequencer::new(),
            inner: RwLock::new(Inner {
                toggler: ViewToggler::new(),
                cards: Vec::new(),
                notice: None,
            }),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Attach the page handlers. Fails if they are already attached.
    pub fn mount(&self) -> Result<(), AppError> {
        self.binder
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .mount()
            .map_err(AppError::from)
    }

    /// Detach the page handlers.
    pub fn unmount(&self) {
        self.binder
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .unmount();
    }

    /// Snapshot of the current page state.
    pub async fn state(&self) -> UiState {
        let inner = self.inner.read().await;
        UiState {
            view: inner.toggler.current(),
            panels: inner.toggler.visibility(),
            cards: inner.cards.clone(),
            notice: inner.notice.clone(),
            user: self.session.current_user(),
        }
    }

    pub async fn dismiss_notice(&self) {
        self.inner.write().await.notice = None;
    }

    // ── Event handling ──────────────────────────────────────────

    /// Resolve a page event and perform its action.
    ///
    /// Returns the dispatch so the page can honor `prevent_default`, or
    /// `None` when nothing is subscribed to the event.
    pub async fn handle_event(&self, event: &DomEvent) -> Result<Option<Dispatch>, AppError> {
        let dispatch = self
            .binder
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .dispatch(event);

        let dispatch = match dispatch {
            Ok(Some(dispatch)) => dispatch,
            Ok(None) => return Ok(None),
            Err(e) => return Err(self.fail(e.into()).await),
        };

        self.perform(dispatch.action.clone()).await?;
        Ok(Some(dispatch))
    }

    /// Perform a resolved action.
    pub async fn perform(&self, action: Action) -> Result<(), AppError> {
        tracing::debug!(?action, "performing action");
        match action {
            Action::ToggleLogin => {
                self.toggle_login().await;
                Ok(())
            }
            Action::AddToWatchlist(movie_id) => self.add_to_watchlist(movie_id).await.map(|_| ()),
            Action::SearchCatalog(query) => self.search_catalog(&query).await.map(|_| ()),
            Action::SearchList(list, query) => self.search_list(list, &query).await.map(|_| ()),
            Action::Show(view) => self.show(view).await.map(|_| ()),
        }
    }

    // ── Actions ─────────────────────────────────────────────────

    /// Sign in or out. Either way the page returns to the search panel.
    pub async fn toggle_login(&self) -> Option<User> {
        self.sequencer.issue();
        let user = self.session.log_in_log_out();
        let mut inner = self.inner.write().await;
        inner.toggler.reset();
        inner.cards.clear();
        inner.notice = Some(Notice {
            kind: NoticeKind::Info,
            message: match &user {
                Some(u) => format!("Signed in as {}", u.display_name),
                None => "Signed out".into(),
            },
        });
        user
    }

    /// Assemble a record for `movie_id` and persist it.
    pub async fn add_to_watchlist(&self, movie_id: u64) -> Result<StoredMovie, AppError> {
        let record = match assemble_record(
            &self.catalog,
            &self.session,
            &self.image_base_url,
            movie_id,
            Utc::now(),
        )
        .await
        {
            Ok(record) => record,
            Err(e) => return Err(self.fail(e.into()).await),
        };

        match self.store.add_movie(&record).await {
            Ok(stored) => {
                tracing::info!(movie_id, key = %stored.key, title = %stored.movie.title, "added to watchlist");
                self.notify(NoticeKind::Success, format!("Added {}", stored.movie.title))
                    .await;
                Ok(stored)
            }
            Err(e) => Err(self.fail(AppError::Store(e.to_string())).await),
        }
    }

    /// Search the catalog and render the results.
    pub async fn search_catalog(&self, query: &str) -> Result<Rendered, AppError> {
        let ticket = self.sequencer.issue();
        let query = query.trim();
        if query.is_empty() {
            return Ok(self.render(ticket, Vec::new()).await);
        }

        match self.catalog.search_movies(query).await {
            Ok(results) => {
                let cards = results.iter().map(MovieCard::from).collect();
                Ok(self.render(ticket, cards).await)
            }
            Err(e) => {
                tracing::warn!(query, "catalog search failed: {e}");
                Err(self.fail_current(ticket, AppError::Catalog(e.to_string())).await)
            }
        }
    }

    /// Switch panels. List views load the user's records for that list;
    /// the search panel starts empty.
    pub async fn show(&self, view: View) -> Result<Rendered, AppError> {
        let ticket = self.sequencer.issue();
        self.inner.write().await.toggler.show(view);
        match view.list() {
            Some(list) => self.load_list(list).await,
            None => Ok(self.render(ticket, Vec::new()).await),
        }
    }

    /// Render every record in `list`.
    pub async fn load_list(&self, list: ListKind) -> Result<Rendered, AppError> {
        let ticket = self.sequencer.issue();
        let movies = self.fetch_list(ticket, list).await?;
        let cards = movies.iter().map(MovieCard::from).collect();
        Ok(self.render(ticket, cards).await)
    }

    /// Fuzzy-search the titles in `list`, fetched fresh, and render the ranked hits.
    pub async fn search_list(&self, list: ListKind, query: &str) -> Result<Rendered, AppError> {
        let ticket = self.sequencer.issue();
        let movies = self.fetch_list(ticket, list).await?;
        let cards = matcher::search_titles(query, &movies)
            .iter()
            .map(|hit| MovieCard::from(&hit.item))
            .collect();
        Ok(self.render(ticket, cards).await)
    }

    pub async fn mark_watched(&self, key: &str, watched: bool) -> Result<StoredMovie, AppError> {
        self.update(
            key,
            RecordPatch {
                watched: Some(watched),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn set_rating(&self, key: &str, rating: u8) -> Result<StoredMovie, AppError> {
        self.update(
            key,
            RecordPatch {
                rating: Some(rating),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn set_favorite(&self, key: &str, favorite: bool) -> Result<StoredMovie, AppError> {
        self.update(
            key,
            RecordPatch {
                favorite: Some(favorite),
                ..Default::default()
            },
        )
        .await
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn update(&self, key: &str, patch: RecordPatch) -> Result<StoredMovie, AppError> {
        let Some(user) = self.session.current_user() else {
            return Err(self.fail(AppError::SignedOut).await);
        };
        let stored = match self.store.update_movie(&user.uid, key, &patch).await {
            Ok(stored) => stored,
            Err(e) => return Err(self.fail(AppError::Store(e.to_string())).await),
        };

        let mut inner = self.inner.write().await;
        let list = inner.toggler.current().list();
        if let Some(pos) = inner.cards.iter().position(|c| c.key.as_deref() == Some(key)) {
            match list {
                Some(list) if !stored.movie.in_list(list) => {
                    inner.cards.remove(pos);
                }
                _ => inner.cards[pos] = MovieCard::from(&stored),
            }
        }
        Ok(stored)
    }

    async fn fetch_list(&self, ticket: Ticket, list: ListKind) -> Result<Vec<StoredMovie>, AppError> {
        let Some(user) = self.session.current_user() else {
            return Err(self.fail_current(ticket, AppError::SignedOut).await);
        };
        match self.store.get_movies(&user.uid).await {
            Ok(mut movies) => {
                movies.retain(|m| m.movie.in_list(list));
                Ok(movies)
            }
            Err(e) => {
                tracing::warn!(%list, "loading list failed: {e}");
                Err(self.fail_current(ticket, AppError::Store(e.to_string())).await)
            }
        }
    }

    /// Replace the rendered cards unless a newer request has been issued.
    async fn render(&self, ticket: Ticket, cards: Vec<MovieCard>) -> Rendered {
        let mut inner = self.inner.write().await;
        if !self.sequencer.is_current(ticket) {
            tracing::debug!(ticket = ticket.get(), "dropping stale response");
            return Rendered::Stale;
        }
        let count = cards.len();
        inner.cards = cards;
        Rendered::Applied(count)
    }

    async fn notify(&self, kind: NoticeKind, message: String) {
        self.inner.write().await.notice = Some(Notice { kind, message });
    }

    /// Record `err` as the visible error notice and hand it back.
    async fn fail(&self, err: AppError) -> AppError {
        tracing::warn!("{err}");
        self.notify(NoticeKind::Error, err.to_string()).await;
        err
    }

    /// Like [`Self::fail`], but a superseded request does not touch the page.
    async fn fail_current(&self, ticket: Ticket, err: AppError) -> AppError {
        if self.sequencer.is_current(ticket) {
            self.fail(err).await
        } else {
            err
        }
    }
}
