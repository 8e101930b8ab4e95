use crate::error::Result;
use crate::models::NewsSummary;

use super::{Generation, Ticket};

pub const LIST_ERROR_MESSAGE: &str = "Failed to load news. Please try again later.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListState {
    #[default]
    Idle,
    Loading,
    Failed(String),
    Empty,
    Loaded(Vec<NewsSummary>),
}

#[derive(Debug, Default)]
pub struct ListView {
    state: ListState,
    generation: Generation,
    selected: usize,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the loading state for a fresh fetch of the list. Retry is the same call.
    pub fn load(&mut self) -> Ticket {
        self.state = ListState::Loading;
        self.generation.issue()
    }

    /// Commit the outcome of the load identified by `ticket`.
    /// Returns false when a newer load has superseded it.
    pub fn finish(&mut self, ticket: Ticket, result: Result<Vec<NewsSummary>>) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!("Discarding superseded list result {:?}", ticket);
            return false;
        }

        self.state = match result {
            Ok(rows) if rows.is_empty() => ListState::Empty,
            Ok(rows) => {
                if self.selected >= rows.len() {
                    self.selected = rows.len() - 1;
                }
                ListState::Loaded(rows)
            }
            Err(e) => {
                tracing::error!("Failed to fetch news list: {}", e);
                ListState::Failed(LIST_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Idle | ListState::Loading)
    }

    pub fn rows(&self) -> &[NewsSummary] {
        match &self.state {
            ListState::Loaded(rows) => rows,
            _ => &[],
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&NewsSummary> {
        self.rows().get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.rows().len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
        }
    }

    pub fn move_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.selected = self.rows().len().saturating_sub(1);
    }
}
