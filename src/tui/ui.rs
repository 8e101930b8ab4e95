use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::route::Route;
use crate::view::{
    BodySource, DetailPage, DetailState, ListCard, ListState as ListViewState, NOT_FOUND_MESSAGE,
};

use super::markdown::markdown_lines;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Current view
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.route {
        Route::List => render_list(frame, app, chunks[1]),
        Route::Detail(_) => render_detail(frame, app, chunks[1]),
    }
    render_status(frame, app, chunks[2]);

    // Render help popup if active
    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (title, text) = match &app.route {
        Route::List => {
            let stats = match app.list.state() {
                ListViewState::Loaded(rows) => format!(" {} stories, newest first", rows.len()),
                _ => String::new(),
            };
            (" News ".to_string(), stats)
        }
        Route::Detail(id) => {
            let title = app
                .detail
                .item()
                .and_then(|item| item.title.clone())
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("News #{id}"));
            (" Article ".to_string(), format!(" {title}"))
        }
    };

    let block = Block::default()
        .title(title)
        .title(
            Line::from(format!(" {} ", app.route.path(&app.base_path)))
                .alignment(Alignment::Right),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    let rows = match app.list.state() {
        ListViewState::Idle | ListViewState::Loading => {
            render_message(frame, area, block, loading_lines(app, "Loading news..."));
            return;
        }
        ListViewState::Failed(message) => {
            render_message(frame, area, block, error_lines(message));
            return;
        }
        ListViewState::Empty => {
            let lines = vec![Line::styled(
                "No news yet.",
                Style::default().fg(Color::DarkGray),
            )];
            render_message(frame, area, block, lines);
            return;
        }
        ListViewState::Loaded(rows) => rows,
    };

    // borders plus the highlight symbol
    let text_width = usize::from(area.width.saturating_sub(4)).max(10);

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| card_item(&ListCard::from_summary(row, app.date_locale), text_width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.list.selected_index()));

    frame.render_stateful_widget(list, area, &mut state);
}

fn card_item(card: &ListCard, width: usize) -> ListItem<'static> {
    let mut title = vec![Span::styled(
        card.title.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    if card.url.is_some() {
        title.push(Span::styled(" ↗", Style::default().fg(Color::Green)));
    }

    let mut meta = Vec::new();
    if let Some(host) = &card.host {
        meta.push(Span::styled(format!("[{host}] "), Style::default().fg(Color::Blue)));
    }
    meta.push(Span::styled(
        card.collected_at.clone(),
        Style::default().fg(Color::DarkGray),
    ));
    if let Some(count) = card.word_count {
        meta.push(Span::styled(
            format!("  {count} words"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(title), Line::from(meta)];
    if !card.summary.is_empty() {
        for wrapped in textwrap::wrap(&card.summary, width) {
            lines.push(Line::styled(
                wrapped.into_owned(),
                Style::default().fg(Color::Gray),
            ));
        }
    }
    lines.push(Line::default());

    ListItem::new(lines)
}

fn render_detail(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let item = match app.detail.state() {
        DetailState::Idle | DetailState::Loading => {
            render_message(frame, area, block, loading_lines(app, "Loading article..."));
            return;
        }
        DetailState::Failed(message) => {
            render_message(frame, area, block, error_lines(message));
            return;
        }
        DetailState::NotFound => {
            let lines = vec![
                Line::styled(NOT_FOUND_MESSAGE, Style::default().fg(Color::Yellow)),
                Line::default(),
                Line::styled(
                    "Press Esc to go back to the list.",
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            render_message(frame, area, block, lines);
            return;
        }
        DetailState::Loaded(item) => item,
    };

    let page = DetailPage::from_item(item, app.date_locale);
    let lines = detail_lines(&page);

    // scroll offsets count wrapped rows, not source lines
    let inner = block.inner(area);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let rows = paragraph.line_count(inner.width);
    let max_scroll = u16::try_from(rows.saturating_sub(usize::from(inner.height)))
        .unwrap_or(u16::MAX);
    app.detail.set_max_scroll(max_scroll);

    let paragraph = paragraph.block(block).scroll((app.detail.scroll(), 0));

    frame.render_widget(paragraph, area);
}

fn detail_lines(page: &DetailPage) -> Vec<Line<'static>> {
    let heading = |text: &'static str, color: Color| {
        Line::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    };

    let mut lines = vec![
        Line::styled(page.meta_line(), Style::default().fg(Color::DarkGray)),
        Line::default(),
    ];

    if let Some(metadata) = &page.metadata {
        lines.push(heading("Metadata", Color::Cyan));
        for (label, value) in metadata.fields() {
            lines.push(Line::from(vec![
                Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
                Span::raw(value.to_string()),
            ]));
        }
        if !metadata.tags.is_empty() {
            let mut chips = vec![Span::styled("Tags: ", Style::default().fg(Color::DarkGray))];
            for tag in &metadata.tags {
                chips.push(Span::styled(
                    format!(" {tag} "),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                ));
                chips.push(Span::raw(" "));
            }
            lines.push(Line::from(chips));
        }
        lines.push(Line::default());
    }

    let body_style = match page.body_source {
        BodySource::Placeholder => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        BodySource::Article | BodySource::Text => Style::default().fg(Color::White),
    };
    for paragraph in &page.paragraphs {
        for line in paragraph.lines() {
            lines.push(Line::styled(line.to_string(), body_style));
        }
        lines.push(Line::default());
    }

    if let Some(summary) = &page.summary {
        lines.push(heading("Summary", Color::Magenta));
        lines.extend(markdown_lines(summary, Style::default().fg(Color::LightBlue)));
        lines.push(Line::default());
    }

    if let Some(url) = &page.url {
        lines.push(Line::from(vec![
            Span::styled("↗ Original: ", Style::default().fg(Color::Green)),
            Span::styled(
                url.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            Span::styled("  (o to open)", Style::default().fg(Color::DarkGray)),
        ]));
    }

    lines
}

fn loading_lines(app: &App, text: &'static str) -> Vec<Line<'static>> {
    vec![Line::styled(
        format!("{} {text}", app.spinner()),
        Style::default().fg(Color::Blue),
    )]
}

fn error_lines(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::styled(message.to_string(), Style::default().fg(Color::Red)),
        Line::default(),
        Line::styled(
            "Press r to retry.",
            Style::default().fg(Color::DarkGray),
        ),
    ]
}

fn render_message(frame: &mut Frame, area: Rect, block: Block, lines: Vec<Line<'static>>) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // vertically center the message
    let top = inner.height.saturating_sub(lines.len() as u16) / 2;
    let message_area = Rect {
        y: inner.y + top,
        height: inner.height - top,
        ..inner
    };

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, message_area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.route {
        Route::List => "j/k:nav  enter:open  o:original  r:reload  ?:help  q:quit",
        Route::Detail(_) => "j/k:scroll  space:page  esc:back  o:original  r:reload  ?:help  q:quit",
    };

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " List:",
        "   j / ↓      Move down",
        "   k / ↑      Move up",
        "   g / G      Jump to top / bottom",
        "   Enter      Open article",
        "",
        " Article:",
        "   j / k      Scroll",
        "   Space      Page down",
        "   PgUp       Page up",
        "   Esc        Back to list",
        "",
        " General:",
        "   o          Open original in browser",
        "   r          Reload / retry",
        "   ?          Toggle this help",
        "   q          Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
