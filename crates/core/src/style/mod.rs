//! Styled text values.
//!
//! Layout code builds [`Line`]s out of [`Span`]s and never touches escape
//! sequences; [`Line::write_to`] resolves them into crossterm commands at the
//! very end of the pipeline.

use std::io::{self, Write};

pub use crossterm::style::Color;
use crossterm::{
    queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
    pub reverse: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            dim: false,
            reverse: false,
        }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    fn is_plain(&self) -> bool {
        *self == Style::new()
    }

    fn queue<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let Some(color) = self.fg {
            queue!(out, SetForegroundColor(color))?;
        }
        if let Some(color) = self.bg {
            queue!(out, SetBackgroundColor(color))?;
        }
        if self.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if self.dim {
            queue!(out, SetAttribute(Attribute::Dim))?;
        }
        if self.reverse {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn raw(text: impl Into<String>) -> Self {
        Self::styled(text, Style::new())
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn width(&self) -> usize {
        self.text.width()
    }
}

/// One terminal row. Equality is what the diff renderer compares.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::new().with(Span::raw(text))
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self::new().with(Span::styled(text, style))
    }

    pub fn with(mut self, span: Span) -> Self {
        self.push(span);
        self
    }

    /// Appends a span, merging it into the previous one when styles match.
    pub fn push(&mut self, span: Span) {
        if span.text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == span.style => last.text.push_str(&span.text),
            _ => self.spans.push(span),
        }
    }

    pub fn extend(&mut self, other: Line) {
        for span in other.spans {
            self.push(span);
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Display width in terminal cells, ignoring styling.
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// Text content with styling stripped.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Cuts the row to `max_width` cells, ending with `…` when cut. Styles of
    /// the kept spans are preserved.
    pub fn truncated(self, max_width: usize) -> Line {
        if self.width() <= max_width {
            return self;
        }
        let mut out = Line::new();
        let mut remaining = max_width;
        for span in self.spans {
            let width = span.width();
            if width < remaining {
                remaining -= width;
                out.push(span);
                continue;
            }
            out.push(Span::styled(clip_with_ellipsis(&span.text, remaining), span.style));
            break;
        }
        out
    }

    /// Writes the row at the current cursor position and resets attributes.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for span in &self.spans {
            if span.style.is_plain() {
                queue!(out, Print(&span.text))?;
                continue;
            }
            span.style.queue(out)?;
            queue!(out, Print(&span.text), SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

/// Cuts `text` so it fits in `max_width` cells, ending with `…` when cut.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    clip_with_ellipsis(text, max_width)
}

fn clip_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Pads `text` with spaces up to `width` cells.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = text.width();
    let mut out = text.to_string();
    if current < width {
        out.push_str(&" ".repeat(width - current));
    }
    out
}

/// Scales an RGB color by `factor` (clamped to `[0, 1]`).
pub fn scale_rgb(color: (u8, u8, u8), factor: f64) -> Color {
    let factor = factor.clamp(0.0, 1.0);
    let scale = |channel: u8| (channel as f64 * factor).round() as u8;
    Color::Rgb {
        r: scale(color.0),
        g: scale(color.1),
        b: scale(color.2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_spans_with_equal_style_merge() {
        let mut line = Line::raw("ab");
        line.push(Span::raw("cd"));
        line.push(Span::styled("e", Style::new().bold()));
        assert_eq!(line.spans().len(), 2);
        assert_eq!(line.plain(), "abcde");
    }

    #[test]
    fn width_ignores_styling_and_counts_wide_glyphs() {
        let line = Line::styled("日本", Style::new().fg(Color::Red)).with(Span::raw("x"));
        assert_eq!(line.width(), 5);
    }

    #[test]
    fn truncation_appends_ellipsis_within_budget() {
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello…");
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("日本語", 4), "日…");
        assert_eq!(truncate_with_ellipsis("abc", 0), "");
    }

    #[test]
    fn truncated_rows_keep_span_styles() {
        let bold = Style::new().bold();
        let line = Line::raw("ab").with(Span::styled("cdef", bold)).with(Span::raw("gh"));

        let cut = line.clone().truncated(5);
        assert_eq!(cut.plain(), "abcd…");
        assert_eq!(cut.width(), 5);
        assert_eq!(cut.spans()[1].style, bold);

        let exact = line.clone().truncated(6);
        assert_eq!(exact.plain(), "abcde…");
        assert_eq!(line.clone().truncated(8), line);
        assert!(line.truncated(0).is_empty());
    }

    #[test]
    fn plain_rows_are_written_without_escape_codes() {
        let mut out = Vec::new();
        Line::raw("plain").write_to(&mut out).unwrap();
        assert_eq!(out, b"plain");
    }

    #[test]
    fn styled_rows_reset_after_each_span() {
        let mut out = Vec::new();
        Line::styled("hot", Style::new().fg(Color::Red).bold())
            .write_to(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("hot"));
        assert!(text.ends_with("\x1b[0m"));
    }
}
