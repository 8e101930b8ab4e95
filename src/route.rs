use std::fmt;

use crate::error::{AppError, Result};
use crate::models::NewsId;

/// The two screens and the paths they are reachable at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/news/:id`
    Detail(NewsId),
}

impl Route {
    /// Parses `path`, optionally mounted under `base_path`.
    pub fn parse(path: &str, base_path: &str) -> Result<Self> {
        let base = base_path.trim().trim_end_matches('/');
        let trimmed = path.trim();
        let relative = match trimmed.strip_prefix(base) {
            Some(rest) if !base.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest,
            _ => trimmed,
        };

        let relative = relative.trim_end_matches('/');
        if relative.is_empty() {
            return Ok(Route::List);
        }

        match relative.strip_prefix("/news/") {
            Some(id) if !id.is_empty() && !id.contains('/') => Ok(Route::Detail(NewsId::new(id))),
            _ => Err(AppError::Route(path.to_string())),
        }
    }

    pub fn path(&self, base_path: &str) -> String {
        let base = base_path.trim().trim_end_matches('/');
        match self {
            Route::List => format!("{base}/"),
            Route::Detail(id) => format!("{base}/news/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_the_list() {
        assert_eq!(Route::parse("/", "").unwrap(), Route::List);
        assert_eq!(Route::parse("", "").unwrap(), Route::List);
    }

    #[test]
    fn news_path_carries_the_id_verbatim() {
        assert_eq!(
            Route::parse("/news/42", "").unwrap(),
            Route::Detail(NewsId::new("42"))
        );
        assert_eq!(
            Route::parse("/news/a-b_c/", "").unwrap(),
            Route::Detail(NewsId::new("a-b_c"))
        );
    }

    #[test]
    fn base_path_is_optional_on_input() {
        let base = "/news-react-supabase";

        assert_eq!(Route::parse("/news-react-supabase", base).unwrap(), Route::List);
        assert_eq!(
            Route::parse("/news-react-supabase/news/7", base).unwrap(),
            Route::Detail(NewsId::new("7"))
        );
        assert_eq!(
            Route::parse("/news/7", base).unwrap(),
            Route::Detail(NewsId::new("7"))
        );
    }

    #[test]
    fn unknown_paths_are_rejected() {
        assert!(matches!(Route::parse("/news/", ""), Err(AppError::Route(_))));
        assert!(matches!(Route::parse("/news/1/edit", ""), Err(AppError::Route(_))));
        assert!(matches!(Route::parse("/about", ""), Err(AppError::Route(_))));
    }

    #[test]
    fn paths_include_the_base() {
        let route = Route::Detail(NewsId::new("7"));

        assert_eq!(route.path("/news-react-supabase/"), "/news-react-supabase/news/7");
        assert_eq!(Route::List.to_string(), "/");
    }
}
