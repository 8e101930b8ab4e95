use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod error;
mod models;
mod route;
mod store;
mod tui;
mod view;

#[cfg(test)]
mod test_support;

use app::App;
use config::Config;
use error::Result;
use route::Route;
use store::NewsStore;
use tui::{draw, handle_key_event};
use view::{
    DetailPage, DetailState, DetailView, ListCard, ListState, ListView, NOT_FOUND_MESSAGE,
};

#[derive(Debug, Parser)]
#[command(name = "news-reader", version, about = "Read the hosted news table in your terminal")]
struct Cli {
    /// Screen to open: `/` for the list or `/news/<id>` for one article
    #[arg(default_value = "/")]
    route: String,

    /// Print the screen as plain text and exit instead of starting the TUI
    #[arg(long)]
    plain: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, env = "NEWS_READER_SUPABASE_URL")]
    supabase_url: Option<String>,

    #[arg(long, env = "NEWS_READER_SUPABASE_KEY", hide_env_values = true)]
    supabase_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_overrides(cli.supabase_url.clone(), cli.supabase_key.clone());

    init_logging(&config, cli.plain)?;

    let route = Route::parse(&cli.route, &config.base_path)?;

    // Headless: print and exit
    if cli.plain {
        let shown = print_plain(&config, &route, &mut io::stdout().lock()).await?;
        return Ok(if shown {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let mut app = App::new(&config)?;
    app.navigate(route);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!("TUI exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    Ok(ExitCode::SUCCESS)
}

/// Warnings and errors by default; `RUST_LOG` overrides. The TUI logs to a
/// file so output does not land on the alternate screen.
fn init_logging(config: &Config, to_stderr: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if to_stderr {
        builder.with_writer(std::io::stderr).init();
    } else {
        let path = PathBuf::from(&config.log_file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        builder.with_writer(Mutex::new(file)).with_ansi(false).init();
    }

    Ok(())
}

/// Prints the screen for `route` to `out`, going through the same views as
/// the TUI. Returns false when the view ends in its error or not-found state.
async fn print_plain<W: Write>(config: &Config, route: &Route, out: &mut W) -> Result<bool> {
    let store = NewsStore::new(config)?;

    match route {
        Route::List => {
            let mut view = ListView::new();
            let ticket = view.load();
            view.finish(ticket, store.list_news().await);

            match view.state() {
                ListState::Loaded(rows) => {
                    for row in rows {
                        writeln!(
                            out,
                            "{}",
                            ListCard::from_summary(row, config.date_locale).to_plain_text()
                        )?;
                    }
                    Ok(true)
                }
                ListState::Empty => {
                    writeln!(out, "No news yet.")?;
                    Ok(true)
                }
                ListState::Failed(message) => {
                    writeln!(out, "{message}")?;
                    Ok(false)
                }
                ListState::Idle | ListState::Loading => Ok(false),
            }
        }
        Route::Detail(id) => {
            let mut view = DetailView::new();
            let request = view.activate(id.clone());
            view.finish(request.ticket, store.get_news(&request.id).await);

            match view.state() {
                DetailState::Loaded(item) => {
                    write!(
                        out,
                        "{}",
                        DetailPage::from_item(item, config.date_locale).to_plain_text()
                    )?;
                    Ok(true)
                }
                DetailState::NotFound => {
                    writeln!(out, "{NOT_FOUND_MESSAGE}")?;
                    Ok(false)
                }
                DetailState::Failed(message) => {
                    writeln!(out, "{message}")?;
                    Ok(false)
                }
                DetailState::Idle | DetailState::Loading => Ok(false),
            }
        }
    }
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.tick_spinner();

        // Commit finished queries
        app.poll_query_results();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, &app.route, app.show_help) {
                        if app.handle_action(action) {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsId;
    use crate::test_support::{serve_once, test_config};
    use crate::view::LIST_ERROR_MESSAGE;

    async fn plain(route: Route, status: &'static str, body: &'static str) -> (bool, String) {
        let (url, server) = serve_once(status, body).await;
        let mut out = Vec::new();

        let shown = print_plain(&test_config(&url), &route, &mut out)
            .await
            .unwrap();
        server.await.unwrap();

        (shown, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn plain_list_prints_the_fixed_message_on_store_errors() {
        let (shown, out) = plain(
            Route::List,
            "500 Internal Server Error",
            r#"{"code":"42P01","message":"relation does not exist"}"#,
        )
        .await;

        assert!(!shown);
        assert_eq!(out.trim(), LIST_ERROR_MESSAGE);
        assert!(!out.contains("relation"));
    }

    #[tokio::test]
    async fn plain_list_prints_cards_in_store_order() {
        let (shown, out) = plain(
            Route::List,
            "200 OK",
            r#"[{"id":2,"title":"Second","created_at":"2025-08-30T12:00:00+00:00"},
                {"id":1,"title":"First","created_at":"2025-08-29T12:00:00+00:00"}]"#,
        )
        .await;

        assert!(shown);
        assert!(out.find("Second").unwrap() < out.find("First").unwrap());
    }

    #[tokio::test]
    async fn plain_detail_reports_missing_rows_on_stdout() {
        let (shown, out) = plain(
            Route::Detail(NewsId::new("999")),
            "406 Not Acceptable",
            r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned","details":"The result contains 0 rows","hint":null}"#,
        )
        .await;

        assert!(!shown);
        assert_eq!(out.trim(), NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn plain_detail_hides_store_errors() {
        let (shown, out) = plain(
            Route::Detail(NewsId::new("1")),
            "500 Internal Server Error",
            r#"{"message":"relation does not exist"}"#,
        )
        .await;

        assert!(!shown);
        assert!(out.starts_with("Failed to load this article."));
        assert!(!out.contains("relation"));
    }
}
