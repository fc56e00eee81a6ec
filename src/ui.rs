pub mod frequency;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, Mode, Status};
use crate::render::{SpanKind, StyledSpan, CURSOR};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const TIME_FORMAT: &str = "%H:%M:%S";
const LEGEND: &str =
    "(esc) quit  (^r) reset  (^n) sample  (^u) address  (^o) file  (^s) sort  (tab) skip";

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn span_style(kind: SpanKind) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match kind {
        SpanKind::Matched | SpanKind::Correct => bold.fg(Color::Green),
        SpanKind::Mismatched | SpanKind::Incorrect => bold.fg(Color::Red),
        SpanKind::Overflow => bold.fg(Color::Magenta),
        SpanKind::Pending => bold.add_modifier(Modifier::DIM),
        SpanKind::Cursor => bold.fg(Color::Yellow),
        SpanKind::Placeholder => Style::default()
            .add_modifier(Modifier::ITALIC)
            .add_modifier(Modifier::DIM),
    }
}

/// Screen text for a span: newlines become `↵`, and wrong spaces `·` so
/// they stay visible.
pub fn visible_text(span: &StyledSpan) -> String {
    let marks_spaces = matches!(
        span.kind,
        SpanKind::Mismatched | SpanKind::Incorrect | SpanKind::Overflow
    );
    span.text
        .chars()
        .map(|c| match c {
            '\n' => '↵',
            ' ' if marks_spaces => '·',
            c => c,
        })
        .collect()
}

pub fn styled_line(spans: &[StyledSpan]) -> Line<'static> {
    Line::from(
        spans
            .iter()
            .map(|span| Span::styled(visible_text(span), span_style(span.kind)))
            .collect::<Vec<Span>>(),
    )
}

/// The widest tail of `text` that fits in `width` columns.
pub fn fit_tail(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = idx;
    }
    &text[start..]
}

pub fn stats_line(app: &App) -> String {
    let stats = app.session.stats();
    let mut line = format!(
        "{}% err  {} chars/min  {} words/min",
        stats.error_rate, stats.chars_per_minute, stats.words_per_minute
    );
    if app.session.is_complete() {
        line.push_str("  done");
    }
    line
}

pub fn status_line(status: &Status) -> (String, Style) {
    match status {
        Status::Ready { source, at } => (
            format!("{source}  loaded {}", at.format(TIME_FORMAT)),
            Style::default().fg(Color::Cyan),
        ),
        Status::Loading { what, since } => (
            format!("loading {what}…  since {}", since.format(TIME_FORMAT)),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ),
        Status::Failed { message, at } => (
            format!("failed at {}: {message}", at.format(TIME_FORMAT)),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    }
}

fn prompt_line(app: &App, width: u16) -> Line<'static> {
    let label = match app.mode {
        Mode::Address => "address: ",
        Mode::File => "file: ",
        Mode::Typing => "",
    };
    let hint = "  (enter) load  (esc) cancel";
    let room = (width as usize).saturating_sub(label.width() + CURSOR.width() + hint.width());
    Line::from(vec![
        Span::styled(
            label.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(fit_tail(&app.prompt, room).to_string()),
        Span::styled(CURSOR.to_string(), span_style(SpanKind::Cursor)),
        Span::styled(hint.to_string(), Style::default().add_modifier(Modifier::DIM)),
    ])
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // target window
                Constraint::Length(1), // input echo
                Constraint::Length(1), // padding
                Constraint::Length(1), // stats
                Constraint::Min(3),    // frequency table
                Constraint::Length(1), // status
                Constraint::Length(1), // legend or prompt
            ])
            .split(area);

        Paragraph::new(styled_line(&self.session.target_window(self.window)))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        Paragraph::new(styled_line(&self.session.input_echo(self.window)))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            stats_line(self),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        let rows = self.frequency_rows();
        if rows.is_empty() {
            frequency::empty_frequency(self.frequency_order).render(chunks[4], buf);
        } else {
            frequency::frequency_table(&rows, self.frequency_order).render(chunks[4], buf);
        }

        let (status, status_style) = status_line(&self.status);
        Paragraph::new(Span::styled(status, status_style)).render(chunks[5], buf);

        match self.mode {
            Mode::Typing => Paragraph::new(LEGEND)
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::DIM))
                .render(chunks[6], buf),
            Mode::Address | Mode::File => {
                Paragraph::new(prompt_line(self, chunks[6].width)).render(chunks[6], buf)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn rendered(app: &App) -> String {
        let area = Rect::new(0, 0, 100, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_fresh_screen() {
        let (app, _rx) = test_app("hello world");
        let screen = rendered(&app);
        assert!(screen.contains("|hell"));
        assert!(screen.contains("start typing…"));
        assert!(screen.contains("0% err  0 chars/min  0 words/min"));
        assert!(screen.contains("No characters typed yet."));
        assert!(screen.contains("command line text  loaded"));
        assert!(screen.contains("(esc) quit"));
    }

    #[test]
    fn test_screen_while_typing() {
        let (mut app, _rx) = test_app("hello world");
        type_str(&mut app, "hex");
        let screen = rendered(&app);
        assert!(screen.contains("hel|lo w"));
        assert!(screen.contains("hex|"));
        assert!(screen.contains("33.33% err"));
        assert!(screen.contains("Typed characters (first seen)"));
    }

    #[test]
    fn test_prompt_replaces_legend() {
        let (mut app, _rx) = test_app("abc");
        app.on_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_str(&mut app, "example.org");
        let screen = rendered(&app);
        assert!(screen.contains("address: example.org|"));
        assert!(!screen.contains("(esc) quit"));
    }

    #[test]
    fn test_visible_text_marks_spaces_and_newlines() {
        assert_eq!(
            visible_text(&StyledSpan::new(SpanKind::Incorrect, "a b\n")),
            "a·b↵"
        );
        assert_eq!(
            visible_text(&StyledSpan::new(SpanKind::Pending, "a b\n")),
            "a b↵"
        );
    }

    #[test]
    fn test_fit_tail() {
        assert_eq!(fit_tail("short", 10), "short");
        assert_eq!(fit_tail("https://example.org", 7), "ple.org");
        assert_eq!(fit_tail("日本語", 4), "本語");
        assert_eq!(fit_tail("abc", 0), "");
    }

    #[test]
    fn test_status_lines() {
        let (app, _rx) = test_app("abc");
        let (text, _) = status_line(&app.status);
        assert!(text.starts_with("command line text  loaded "));

        let failed = Status::Failed {
            message: "file is empty".into(),
            at: chrono::Local::now(),
        };
        let (text, style) = status_line(&failed);
        assert!(text.ends_with(": file is empty"));
        assert_eq!(style.fg, Some(Color::Red));
    }
}
