//! View state for the two screens.
//!
//! Each view owns its load state and a generation counter. Starting a load
//! hands out a [`Ticket`]; an outcome is only committed when its ticket is
//! still the newest one, so a slow response for a superseded request can
//! never overwrite what the user is looking at.

mod detail;
mod format;
mod list;
mod page;

pub use detail::{DetailRequest, DetailState, DetailView, NOT_FOUND_MESSAGE};
pub use format::DateLocale;
pub use list::{ListState, ListView, LIST_ERROR_MESSAGE};
pub use page::{BodySource, DetailPage, ListCard, NO_CONTENT};

/// Identifies one load issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct Generation {
    current: u64,
}

impl Generation {
    fn issue(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }
}
