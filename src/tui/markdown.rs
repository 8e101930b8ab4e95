use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Render markdown into styled terminal lines. Blocks are separated by one blank line.
pub fn markdown_lines(source: &str, base: Style) -> Vec<Line<'static>> {
    let mut writer = MarkdownWriter::new(base);
    for event in Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH) {
        writer.handle(event);
    }
    writer.finish()
}

struct MarkdownWriter {
    base: Style,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    // one entry per open list: next number, or None when bulleted
    lists: Vec<Option<u64>>,
    in_code_block: bool,
}

impl MarkdownWriter {
    fn new(base: Style) -> Self {
        Self {
            base,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            in_code_block: false,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    let style = self.style();
                    for (i, line) in text.split('\n').enumerate() {
                        if i > 0 {
                            self.flush();
                        }
                        if !line.is_empty() {
                            self.spans.push(Span::styled(line.to_string(), style));
                        }
                    }
                } else {
                    let style = self.style();
                    self.spans.push(Span::styled(text.into_string(), style));
                }
            }
            Event::Code(code) => {
                let style = self.style().add_modifier(Modifier::REVERSED);
                self.spans.push(Span::styled(code.into_string(), style));
            }
            Event::SoftBreak => {
                let style = self.style();
                self.spans.push(Span::styled(" ", style));
            }
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push(Line::styled("────────", self.base));
                self.blank();
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => {
                self.flush();
                self.push_style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
            }
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
                self.push_style(Style::default().add_modifier(Modifier::DIM));
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                self.spans
                    .push(Span::styled(format!("{indent}{marker}"), self.base));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.flush();
                self.blank();
            }
            TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::CodeBlock => {
                self.styles.pop();
                self.in_code_block = false;
                self.flush();
                self.blank();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => self.flush(),
            _ => {}
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.base)
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            let spans = std::mem::take(&mut self.spans);
            self.lines.push(Line::from(spans));
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|line| !line.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}
