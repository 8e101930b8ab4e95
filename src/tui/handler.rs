use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::route::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    // List navigation
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    OpenSelected,
    // Detail navigation
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Back,
    // Both screens
    Reload,
    OpenInBrowser,
    ShowHelp,
    HideHelp,
}

pub fn handle_key_event(key: KeyEvent, route: &Route, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => return Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Some(AppAction::Quit),
        (KeyCode::Char('r'), _) => return Some(AppAction::Reload),
        (KeyCode::Char('o'), _) => return Some(AppAction::OpenInBrowser),
        (KeyCode::Char('?'), _) => return Some(AppAction::ShowHelp),
        _ => {}
    }

    match route {
        Route::List => match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::MoveUp),
            KeyCode::Char('<') | KeyCode::Char('g') | KeyCode::Home => Some(AppAction::MoveToTop),
            KeyCode::Char('>') | KeyCode::Char('G') | KeyCode::End => {
                Some(AppAction::MoveToBottom)
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Some(AppAction::OpenSelected),
            _ => None,
        },
        Route::Detail(_) => match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::ScrollUp),
            KeyCode::PageDown | KeyCode::Char(' ') => Some(AppAction::PageDown),
            KeyCode::PageUp => Some(AppAction::PageUp),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
                Some(AppAction::Back)
            }
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsId;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_opens_the_selected_row_from_the_list() {
        assert_eq!(
            handle_key_event(key(KeyCode::Enter), &Route::List, false),
            Some(AppAction::OpenSelected)
        );
    }

    #[test]
    fn j_and_k_scroll_on_the_detail_screen() {
        let route = Route::Detail(NewsId::new("1"));

        assert_eq!(
            handle_key_event(key(KeyCode::Char('j')), &route, false),
            Some(AppAction::ScrollDown)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('k')), &route, false),
            Some(AppAction::ScrollUp)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Esc), &route, false),
            Some(AppAction::Back)
        );
    }

    #[test]
    fn reload_and_quit_work_everywhere() {
        let detail = Route::Detail(NewsId::new("1"));

        for route in [&Route::List, &detail] {
            assert_eq!(
                handle_key_event(key(KeyCode::Char('r')), route, false),
                Some(AppAction::Reload)
            );
            assert_eq!(
                handle_key_event(
                    KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                    route,
                    false
                ),
                Some(AppAction::Quit)
            );
        }
    }

    #[test]
    fn any_key_closes_help() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), &Route::List, true),
            Some(AppAction::HideHelp)
        );
    }

    #[test]
    fn back_is_ignored_on_the_list() {
        assert_eq!(handle_key_event(key(KeyCode::Esc), &Route::List, false), None);
    }
}
