//! Scrolling views over the target text and the typed input.
//!
//! Both projections are pure functions of `(target, input, window)` and
//! return styled spans; the terminal layer decides what each style looks like.

pub const DEFAULT_WINDOW: usize = 40;
pub const CURSOR: &str = "|";
pub const START_TYPING: &str = "start typing…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Target character the user typed correctly.
    Matched,
    /// Target character the user got wrong.
    Mismatched,
    /// Target character not reached yet.
    Pending,
    Cursor,
    /// Input character equal to the target at its offset.
    Correct,
    /// Input character different from the target at its offset.
    Incorrect,
    /// Input character past the end of the target.
    Overflow,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub kind: SpanKind,
    pub text: String,
}

impl StyledSpan {
    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn cursor() -> Self {
        Self::new(SpanKind::Cursor, CURSOR)
    }
}

/// Half-open range of offsets shown in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWindow {
    pub start: usize,
    pub end: usize,
}

impl DisplayWindow {
    /// `window` characters behind and ahead of the cursor.
    pub fn around_cursor(cursor: usize, window: usize) -> Self {
        Self {
            start: cursor.saturating_sub(window),
            end: cursor.saturating_add(window),
        }
    }

    /// The last `window` characters up to the cursor.
    pub fn trailing(cursor: usize, window: usize) -> Self {
        let start = cursor.saturating_sub(window);
        Self {
            start,
            end: cursor.min(start.saturating_add(window)),
        }
    }
}

// Adjacent characters of the same kind share a span; cursors never merge.
fn push_char(spans: &mut Vec<StyledSpan>, kind: SpanKind, c: char) {
    match spans.last_mut() {
        Some(last) if last.kind == kind && kind != SpanKind::Cursor => last.text.push(c),
        _ => spans.push(StyledSpan::new(kind, c.to_string())),
    }
}

/// The target around the cursor: typed part marked matched/mismatched (always
/// showing the expected character), a cursor, then the untyped part.
pub fn render_target(target: &str, input: &str, window: usize) -> Vec<StyledSpan> {
    let target: Vec<char> = target.chars().collect();
    let input: Vec<char> = input.chars().collect();
    let cursor = input.len();
    let view = DisplayWindow::around_cursor(cursor, window);

    let mut spans = Vec::new();
    for i in view.start..cursor {
        // typed past the end of the target: nothing to show here
        let Some(&expected) = target.get(i) else {
            break;
        };
        match input.get(i) {
            Some(&typed) if typed == expected => push_char(&mut spans, SpanKind::Matched, expected),
            Some(_) => push_char(&mut spans, SpanKind::Mismatched, expected),
            None => push_char(&mut spans, SpanKind::Matched, ' '),
        }
    }

    spans.push(StyledSpan::cursor());

    for &c in target.iter().take(view.end).skip(cursor) {
        push_char(&mut spans, SpanKind::Pending, c);
    }
    spans
}

/// The tail of the input, each character judged against the target.
pub fn render_input_echo(input: &str, target: &str, window: usize) -> Vec<StyledSpan> {
    let input: Vec<char> = input.chars().collect();
    if input.is_empty() {
        return vec![StyledSpan::new(SpanKind::Placeholder, START_TYPING)];
    }
    let target: Vec<char> = target.chars().collect();
    let view = DisplayWindow::trailing(input.len(), window);

    let mut spans = Vec::new();
    for (i, &typed) in input.iter().enumerate().take(view.end).skip(view.start) {
        let kind = match target.get(i) {
            Some(&expected) if expected == typed => SpanKind::Correct,
            Some(_) => SpanKind::Incorrect,
            None => SpanKind::Overflow,
        };
        push_char(&mut spans, kind, typed);
    }
    spans.push(StyledSpan::cursor());
    spans
}
