use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::error::Result;
use crate::models::{NewsItem, NewsSummary};
use crate::route::Route;
use crate::store::{Lookup, NewsStore};
use crate::tui::AppAction;
use crate::view::{DateLocale, DetailRequest, DetailView, ListView, Ticket};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const PAGE_LINES: u16 = 10;

/// Message from a finished background query, tagged with the load it answers.
#[derive(Debug)]
pub enum QueryOutcome {
    List {
        ticket: Ticket,
        result: Result<Vec<NewsSummary>>,
    },
    Detail {
        ticket: Ticket,
        result: Result<Lookup<NewsItem>>,
    },
}

pub struct App {
    // Navigation
    pub route: Route,
    pub base_path: String,

    // Views
    pub list: ListView,
    pub detail: DetailView,

    // UI State
    pub show_help: bool,
    pub date_locale: DateLocale,
    spinner_frame: usize,

    // Async state
    result_rx: mpsc::Receiver<QueryOutcome>,
    result_tx: mpsc::Sender<QueryOutcome>,

    // Services
    store: Arc<NewsStore>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let store = Arc::new(NewsStore::new(config)?);
        let (result_tx, result_rx) = mpsc::channel(8);

        Ok(Self {
            route: Route::List,
            base_path: config.base_path.clone(),
            list: ListView::new(),
            detail: DetailView::new(),
            show_help: false,
            date_locale: config.date_locale,
            spinner_frame: 0,
            result_rx,
            result_tx,
            store,
        })
    }

    /// Switch to `route` and issue that view's query.
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!("Navigating to {}", route.path(&self.base_path));
        match &route {
            Route::List => {
                let ticket = self.list.load();
                self.spawn_list_query(ticket);
            }
            Route::Detail(id) => {
                let request = self.detail.activate(id.clone());
                self.spawn_detail_query(request);
            }
        }
        self.route = route;
    }

    pub fn handle_action(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::Quit => return true,

            AppAction::MoveUp => self.list.move_up(),
            AppAction::MoveDown => self.list.move_down(),
            AppAction::MoveToTop => self.list.move_to_top(),
            AppAction::MoveToBottom => self.list.move_to_bottom(),

            AppAction::OpenSelected => {
                if let Some(row) = self.list.selected_row() {
                    let id = row.id.clone();
                    self.navigate(Route::Detail(id));
                }
            }

            AppAction::ScrollUp => self.detail.scroll_up(1),
            AppAction::ScrollDown => self.detail.scroll_down(1),
            AppAction::PageUp => self.detail.scroll_up(PAGE_LINES),
            AppAction::PageDown => self.detail.scroll_down(PAGE_LINES),

            AppAction::Back => self.navigate(Route::List),

            AppAction::Reload => self.reload(),

            AppAction::OpenInBrowser => {
                if let Some(url) = self.current_url() {
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                    }
                }
            }

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,
        }

        false
    }

    /// Re-issue the current view's query with the same parameters.
    fn reload(&mut self) {
        match self.route {
            Route::List => {
                let ticket = self.list.load();
                self.spawn_list_query(ticket);
            }
            Route::Detail(_) => {
                if let Some(request) = self.detail.reload() {
                    self.spawn_detail_query(request);
                }
            }
        }
    }

    /// Commit every finished query (non-blocking).
    pub fn poll_query_results(&mut self) {
        while let Ok(outcome) = self.result_rx.try_recv() {
            self.apply(outcome);
        }
    }

    pub fn apply(&mut self, outcome: QueryOutcome) {
        match outcome {
            QueryOutcome::List { ticket, result } => {
                self.list.finish(ticket, result);
            }
            QueryOutcome::Detail { ticket, result } => {
                self.detail.finish(ticket, result);
            }
        }
    }

    /// External link of whatever is in focus: the selected card or the open article.
    pub fn current_url(&self) -> Option<String> {
        let url = match self.route {
            Route::List => self.list.selected_row().and_then(|row| row.url.clone()),
            Route::Detail(_) => self.detail.item().and_then(|item| item.url.clone()),
        };
        url.filter(|u| !u.trim().is_empty())
    }

    pub fn is_loading(&self) -> bool {
        match self.route {
            Route::List => self.list.is_loading(),
            Route::Detail(_) => self.detail.is_loading(),
        }
    }

    pub fn tick_spinner(&mut self) {
        if self.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    fn spawn_list_query(&self, ticket: Ticket) {
        let store = Arc::clone(&self.store);
        let tx = self.result_tx.clone();

        tokio::spawn(async move {
            let result = store.list_news().await;
            let _ = tx.send(QueryOutcome::List { ticket, result }).await;
        });
    }

    fn spawn_detail_query(&self, request: DetailRequest) {
        let store = Arc::clone(&self.store);
        let tx = self.result_tx.clone();

        tokio::spawn(async move {
            let DetailRequest { ticket, id } = request;
            let result = store.get_news(&id).await;
            let _ = tx.send(QueryOutcome::Detail { ticket, result }).await;
        });
    }
}
