use crate::error::Result;
use crate::models::{NewsId, NewsItem};
use crate::store::Lookup;

use super::{Generation, Ticket};

pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load this article. Please try again later.";
pub const NOT_FOUND_MESSAGE: &str = "This article does not exist.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Idle,
    Loading,
    Failed(String),
    NotFound,
    Loaded(Box<NewsItem>),
}

/// A point lookup the detail view wants issued.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRequest {
    pub ticket: Ticket,
    pub id: NewsId,
}

#[derive(Debug, Default)]
pub struct DetailView {
    state: DetailState,
    generation: Generation,
    id: Option<NewsId>,
    scroll: u16,
    /// Last row offset that still fills the screen. Unknown until drawn.
    max_scroll: Option<u16>,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the row `id`, superseding any load still in flight.
    pub fn activate(&mut self, id: NewsId) -> DetailRequest {
        self.id = Some(id.clone());
        self.scroll = 0;
        self.max_scroll = None;
        self.state = DetailState::Loading;
        DetailRequest {
            ticket: self.generation.issue(),
            id,
        }
    }

    /// Re-issue the lookup for the current id.
    pub fn reload(&mut self) -> Option<DetailRequest> {
        let id = self.id.clone()?;
        self.state = DetailState::Loading;
        Some(DetailRequest {
            ticket: self.generation.issue(),
            id,
        })
    }

    /// Commit the outcome of the lookup identified by `ticket`.
    /// Returns false when a newer lookup has superseded it.
    pub fn finish(&mut self, ticket: Ticket, result: Result<Lookup<NewsItem>>) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!("Discarding superseded detail result {:?}", ticket);
            return false;
        }

        self.state = match result {
            Ok(Lookup::Found(item)) => DetailState::Loaded(Box::new(item)),
            Ok(Lookup::NotFound) => {
                tracing::info!("News item {:?} does not exist", self.id);
                DetailState::NotFound
            }
            Err(e) => {
                tracing::error!("Failed to fetch news item {:?}: {}", self.id, e);
                DetailState::Failed(DETAIL_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    #[cfg(test)]
    pub fn current_id(&self) -> Option<&NewsId> {
        self.id.as_ref()
    }

    pub fn item(&self) -> Option<&NewsItem> {
        match &self.state {
            DetailState::Loaded(item) => Some(&**item),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Idle | DetailState::Loading)
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
        if let Some(max) = self.max_scroll {
            self.scroll = self.scroll.min(max);
        }
    }

    /// Records how far the rendered page can scroll and pulls the offset back
    /// inside it.
    pub fn set_max_scroll(&mut self, max: u16) {
        self.max_scroll = Some(max);
        self.scroll = self.scroll.min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn item(id: &str, title: &str) -> NewsItem {
        NewsItem {
            id: NewsId::new(id),
            title: Some(title.to_string()),
            host: None,
            created_at: "2025-08-30T12:00:00+00:00".to_string(),
            word_count: None,
            meta_filter: None,
            article: None,
            text: None,
            summarizer: None,
            url: None,
        }
    }

    fn timeout() -> AppError {
        AppError::Store {
            status: 504,
            message: "gateway timeout".to_string(),
        }
    }

    #[test]
    fn zero_rows_reaches_not_found_not_error() {
        let mut view = DetailView::new();
        let request = view.activate(NewsId::new("404"));

        view.finish(request.ticket, Ok(Lookup::NotFound));

        assert_eq!(view.state(), &DetailState::NotFound);
    }

    #[test]
    fn failure_is_distinct_from_not_found() {
        let mut view = DetailView::new();
        let request = view.activate(NewsId::new("1"));

        view.finish(request.ticket, Err(timeout()));

        assert_eq!(
            view.state(),
            &DetailState::Failed(DETAIL_ERROR_MESSAGE.to_string())
        );
    }

    #[test]
    fn retry_reissues_the_same_lookup_and_never_sticks_in_loading() {
        let mut view = DetailView::new();
        let first = view.activate(NewsId::new("7"));
        view.finish(first.ticket, Err(timeout()));

        let retry = view.reload().unwrap();
        assert_eq!(retry.id, NewsId::new("7"));
        assert_ne!(retry.ticket, first.ticket);
        assert!(view.is_loading());

        view.finish(retry.ticket, Ok(Lookup::Found(item("7", "seven"))));
        assert_eq!(view.item().and_then(|i| i.title.as_deref()), Some("seven"));

        let again = view.reload().unwrap();
        view.finish(again.ticket, Ok(Lookup::Found(item("7", "seven, edited"))));
        assert!(!view.is_loading());
        assert_eq!(
            view.item().and_then(|i| i.title.as_deref()),
            Some("seven, edited")
        );
    }

    #[test]
    fn stale_response_for_previous_id_is_discarded() {
        let mut view = DetailView::new();
        let old = view.activate(NewsId::new("1"));
        let new = view.activate(NewsId::new("2"));

        assert!(!view.finish(old.ticket, Ok(Lookup::Found(item("1", "old")))));
        assert!(view.is_loading());

        assert!(view.finish(new.ticket, Ok(Lookup::Found(item("2", "new")))));
        assert_eq!(view.item().map(|i| i.id.as_str()), Some("2"));
        assert_eq!(view.current_id(), Some(&NewsId::new("2")));
    }

    #[test]
    fn reload_without_an_id_does_nothing() {
        let mut view = DetailView::new();

        assert!(view.reload().is_none());
        assert_eq!(view.state(), &DetailState::Idle);
    }

    #[test]
    fn activation_resets_scroll() {
        let mut view = DetailView::new();
        view.activate(NewsId::new("1"));
        view.scroll_down(12);
        view.scroll_up(2);
        assert_eq!(view.scroll(), 10);

        view.activate(NewsId::new("2"));
        assert_eq!(view.scroll(), 0);
    }

    #[test]
    fn scrolling_stays_within_the_rendered_page() {
        let mut view = DetailView::new();
        view.activate(NewsId::new("1"));
        view.set_max_scroll(5);

        for _ in 0..50 {
            view.scroll_down(1);
        }
        assert_eq!(view.scroll(), 5);

        view.scroll_up(1);
        assert_eq!(view.scroll(), 4);

        view.scroll_down(3);
        view.set_max_scroll(2);
        assert_eq!(view.scroll(), 2);
    }
}
