//! Turns the dashboard state into the rows of one screen.
//!
//! The layout never writes to the terminal. It produces a [`Composition`]
//! that the diff renderer consumes and a [`ScrollState`] that the input
//! handler keeps between ticks.

use std::ops::Range;

use crate::{
    config::{BoardConfig, LayoutConfig, RippleConfig},
    effects::{bordered_box, RippleState, ScanlineBar},
    palette,
    style::{pad_to_width, truncate_with_ellipsis, Color, Line, Span, Style},
    timeline::{PhraseInfo, PHRASE_BEATS},
    track::{CategoryFilter, RecommendedTrack, Track, TransitionType},
};
use unicode_width::UnicodeWidthStr;

const WARN: Style = Style::new().fg(Color::Rgb {
    r: 255,
    g: 196,
    b: 0,
});
const DIM: Style = Style::new().fg(Color::Rgb {
    r: 120,
    g: 124,
    b: 140,
});
const TEXT: Style = Style::new().fg(Color::White);
const ACCENT: Style = Style::new()
    .fg(Color::Rgb {
        r: 0,
        g: 200,
        b: 255,
    })
    .bold();
const ALERT: Style = Style::new()
    .fg(Color::Rgb {
        r: 255,
        g: 80,
        b: 80,
    })
    .bold();
const BAR_FILLED: Style = Style::new().fg(Color::Rgb {
    r: 0,
    g: 200,
    b: 255,
});

/// Rows in the help panel.
const HELP: [&str; 4] = [
    "←/→ Tab  category    ↑/↓ j/k  scroll    PgUp/PgDn  page",
    "?  help    d  debug log    space  play/pause",
    "n  next track    r  reset board and replay flaps",
    "q Esc  quit (press twice to confirm)",
];

/// Terminal geometry in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Everything the dashboard shows for one tick.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub track: Option<Track>,
    pub phrase: Option<PhraseInfo>,
    pub recommendations: Vec<RecommendedTrack>,
    pub show_exit_warning: bool,
    pub debug_message: Option<String>,
    pub log_lines: Vec<String>,
    pub selected: CategoryFilter,
    pub scroll_offset: usize,
    pub show_help: bool,
    pub notices: Vec<String>,
    pub library_size: usize,
}

/// Scroll position after clamping, echoed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    pub offset: usize,
    pub max_scroll: usize,
}

/// A laid-out screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub rows: Vec<Line>,
    pub scroll: ScrollState,
    /// Rows available to the recommendation list.
    pub visible_window: usize,
    /// Filtered recommendation rows before slicing.
    pub total_rows: usize,
    /// Indices in `rows` holding recommendation rows, padding excluded.
    pub list_rows: Range<usize>,
}

/// Number of filled cells for a progress bar `bar_width` cells wide.
pub fn progress_fill(bar_width: usize, percent: f64) -> usize {
    if percent.is_nan() || percent <= 0.0 {
        return 0;
    }
    if percent >= 1.0 {
        return bar_width;
    }
    ((bar_width as f64 * percent).round() as usize).min(bar_width)
}

fn format_clock(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn category_style(kind: TransitionType) -> Style {
    let color = match kind {
        TransitionType::Smooth => Color::Rgb {
            r: 110,
            g: 230,
            b: 140,
        },
        TransitionType::MoodSwitch => Color::Rgb {
            r: 210,
            g: 130,
            b: 255,
        },
        TransitionType::EnergyUp => Color::Rgb {
            r: 255,
            g: 150,
            b: 60,
        },
        TransitionType::RhythmicBreaker => Color::Rgb {
            r: 80,
            g: 200,
            b: 255,
        },
    };
    Style::new().fg(color).bold()
}

#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    ripple: RippleConfig,
    log_lines: usize,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            config: config.layout.clone(),
            ripple: config.ripple.clone(),
            log_lines: config.log_lines,
        }
    }

    /// Usable content width for a terminal `width` columns wide.
    pub fn content_width(&self, width: u16) -> usize {
        let lower = self.config.min_content_width;
        let upper = self.config.max_content_width.max(lower);
        usize::from(width)
            .saturating_sub(self.config.margin)
            .clamp(lower, upper)
    }

    pub fn compose(&self, state: &BoardState, size: Size, now_ms: i64) -> Composition {
        let height = usize::from(size.height);

        if size.width < self.config.min_width {
            let mut rows = self.too_narrow(size);
            rows.truncate(height);
            return Composition {
                rows,
                scroll: ScrollState {
                    offset: state.scroll_offset,
                    max_scroll: 0,
                },
                visible_window: 0,
                total_rows: 0,
                list_rows: 0..0,
            };
        }

        let width = self.content_width(size.width);

        let mut top = self.header(width, now_ms);
        for notice in &state.notices {
            let text = truncate_with_ellipsis(&format!("⚠ {notice}"), width);
            top.push(Line::styled(text, WARN));
        }
        match &state.track {
            Some(track) => self.track_section(&mut top, track, width, now_ms),
            None => top.push(Line::styled("  Waiting for playback…", DIM)),
        }
        self.phrase_section(&mut top, state, now_ms);
        top.push(Line::new());
        top.push(self.tab_strip(state, width));

        let list = self.recommendation_rows(state, width);

        let mut panels = self.debug_rows(state, width);
        if state.show_help {
            panels.extend(self.help_rows(width));
        }
        let status_height = if state.show_exit_warning { 2 } else { 3 };

        let visible_window = height.saturating_sub(top.len() + panels.len() + status_height);
        let total_rows = list.len();
        let max_scroll = total_rows.saturating_sub(visible_window);
        let offset = state.scroll_offset.min(max_scroll);
        let scroll = ScrollState { offset, max_scroll };
        let status = self.status_rows(state, width, scroll, visible_window, total_rows);

        let mut rows = top;
        let list_rows;
        if visible_window == 0 {
            // The notice and status rows always fit; the top section and
            // then the panels give up rows to make room.
            let room = height.saturating_sub(1 + status.len());
            rows.truncate(room);
            panels.truncate(room - rows.len());
            rows.push(Line::styled(
                truncate_with_ellipsis("  Terminal too small to list recommendations.", width),
                WARN,
            ));
            list_rows = rows.len()..rows.len();
        } else {
            let end = (offset + visible_window).min(total_rows);
            let start = rows.len();
            rows.extend(list[offset..end].iter().cloned());
            list_rows = start..rows.len();
            let padding = visible_window - (end - offset);
            rows.extend(std::iter::repeat(Line::new()).take(padding));
        }

        rows.extend(panels);
        rows.extend(status);

        rows.truncate(height);
        let list_rows = list_rows.start.min(rows.len())..list_rows.end.min(rows.len());
        Composition {
            rows,
            scroll,
            visible_window,
            total_rows,
            list_rows,
        }
    }

    fn too_narrow(&self, size: Size) -> Vec<Line> {
        let width = usize::from(size.width);
        [
            (String::from("Terminal too narrow"), ALERT),
            (
                format!(
                    "Need {} columns, have {}. Widen the window to continue.",
                    self.config.min_width, size.width
                ),
                TEXT,
            ),
        ]
        .into_iter()
        .map(|(text, style)| Line::styled(truncate_with_ellipsis(&text, width), style))
        .collect()
    }

    fn header(&self, width: usize, now_ms: i64) -> Vec<Line> {
        let ripple = RippleState::at(now_ms, width, 3, &self.ripple);
        let title = truncate_with_ellipsis(&self.config.title, width.saturating_sub(4));
        let title = Line::raw(" ").with(Span::styled(title, ACCENT));
        bordered_box(width, &[title], &ripple)
    }

    fn track_section(&self, rows: &mut Vec<Line>, track: &Track, width: usize, now_ms: i64) {
        let blink = self.config.blink_ms.max(1);
        let indicator = if !track.is_playing {
            Span::styled("‖", DIM.dim())
        } else if now_ms.div_euclid(blink) % 2 == 0 {
            Span::styled("▶", ACCENT)
        } else {
            Span::raw(" ")
        };

        let title = format!("{} — {}", track.name, track.artist);
        let budget = width.saturating_sub(10).saturating_sub(4);
        let title = truncate_with_ellipsis(&title, budget);
        rows.push(
            Line::raw("  ")
                .with(indicator)
                .with(Span::raw(" "))
                .with(Span::styled(title, TEXT.bold())),
        );

        let mut tempo = Line::styled("  BPM ", DIM);
        if track.tempo > 0.0 {
            tempo.push(Span::styled(format!("{:.1}", track.tempo), TEXT));
        } else {
            tempo.push(Span::styled("—", TEXT));
        }
        tempo.push(Span::styled("   KEY ", DIM));
        match track.key.as_deref() {
            Some(key) => tempo.push(Span::styled(
                key.to_string(),
                Style::new().fg(palette::key_color(key)).bold(),
            )),
            None => tempo.push(Span::styled("—", TEXT)),
        }
        if let Some(beats) = track.time_signature {
            tempo.push(Span::styled(format!("   {beats}/4"), DIM));
        }
        rows.push(tempo);

        let label = format!(
            "{} / {}",
            format_clock(track.position_ms(now_ms)),
            format_clock(track.duration_ms)
        );
        let bar_width = width / 2;
        let filled = progress_fill(bar_width, track.progress_fraction(now_ms));
        rows.push(
            Line::raw("  ")
                .with(Span::styled("█".repeat(filled), BAR_FILLED))
                .with(Span::styled("░".repeat(bar_width - filled), DIM))
                .with(Span::raw("  "))
                .with(Span::styled(label, TEXT)),
        );
    }

    fn phrase_section(&self, rows: &mut Vec<Line>, state: &BoardState, now_ms: i64) {
        let odd_meter = state.track.as_ref().filter(|track| track.has_odd_meter());
        if let Some(track) = odd_meter {
            let beats = track.time_signature.unwrap_or_default();
            rows.push(Line::styled(
                format!("  Phrase tracking disabled: {beats}/4 time has no 32-beat phrases"),
                DIM,
            ));
            return;
        }

        let Some(phrase) = state.phrase.filter(PhraseInfo::is_active) else {
            return;
        };

        let bar = ScanlineBar::at(phrase.beats_remaining, now_ms);
        let mut scanline = Line::raw("  ");
        scanline.extend(bar.render());
        rows.push(scanline);

        let readout_style = if phrase.beats_remaining <= 8.0 { ALERT } else { TEXT };
        rows.push(
            Line::raw("  ")
                .with(Span::styled(
                    format!("{:.1} beats", phrase.beats_remaining),
                    readout_style,
                ))
                .with(Span::styled(
                    format!(
                        "  ·  {:.1}s to next phrase  ·  beat {}/{}",
                        phrase.time_remaining_seconds, phrase.phrase_count, PHRASE_BEATS as u32
                    ),
                    DIM,
                )),
        );
    }

    fn tab_strip(&self, state: &BoardState, width: usize) -> Line {
        let mut line = Line::raw(" ");
        for tab in CategoryFilter::tabs() {
            let count = state
                .recommendations
                .iter()
                .filter(|rec| tab.matches(rec.transition))
                .count();
            let text = format!(" {} {count} ", tab.short_label());
            let style = if tab == state.selected {
                ACCENT.reverse()
            } else {
                DIM
            };
            line.push(Span::raw(" "));
            line.push(Span::styled(text, style));
        }
        line.truncated(width)
    }

    fn recommendation_rows(&self, state: &BoardState, width: usize) -> Vec<Line> {
        if state.library_size == 0 {
            return vec![
                Line::styled("  Your library is empty.", WARN),
                Line::styled(
                    truncate_with_ellipsis(
                        "  Tip: add tracks to your library to start getting harmonic matches.",
                        width,
                    ),
                    DIM,
                ),
            ];
        }

        let reference = state.track.as_ref().map(|track| track.tempo).unwrap_or(0.0);
        let mut rows = Vec::new();
        match state.selected {
            CategoryFilter::All => {
                for kind in TransitionType::ALL {
                    let group: Vec<&RecommendedTrack> = state
                        .recommendations
                        .iter()
                        .filter(|rec| rec.transition == kind)
                        .collect();
                    if group.is_empty() {
                        continue;
                    }
                    rows.push(group_header(kind, group.len(), width));
                    rows.extend(group.into_iter().map(|rec| track_row(rec, reference, width)));
                }
            }
            CategoryFilter::Only(kind) => {
                rows.extend(
                    state
                        .recommendations
                        .iter()
                        .filter(|rec| rec.transition == kind)
                        .map(|rec| track_row(rec, reference, width)),
                );
            }
        }

        if rows.is_empty() {
            rows.push(Line::styled(
                format!("  No harmonic matches in {}.", state.selected.label()),
                DIM,
            ));
        }
        rows
    }

    fn debug_rows(&self, state: &BoardState, width: usize) -> Vec<Line> {
        if state.debug_message.is_none() && state.log_lines.is_empty() {
            return Vec::new();
        }
        let mut rows = vec![section_rule("DEBUG", width)];
        let skip = state.log_lines.len().saturating_sub(self.log_lines);
        for entry in state.log_lines.iter().skip(skip) {
            let text = truncate_with_ellipsis(&format!("  {entry}"), width);
            rows.push(Line::styled(text, DIM));
        }
        if let Some(message) = &state.debug_message {
            let text = truncate_with_ellipsis(&format!("  » {message}"), width);
            rows.push(Line::styled(text, WARN));
        }
        rows
    }

    fn help_rows(&self, width: usize) -> Vec<Line> {
        let mut rows = vec![section_rule("KEYS", width)];
        for text in HELP {
            let text = truncate_with_ellipsis(&format!("  {text}"), width);
            rows.push(Line::styled(text, TEXT));
        }
        rows
    }

    fn status_rows(
        &self,
        state: &BoardState,
        width: usize,
        scroll: ScrollState,
        visible_window: usize,
        total_rows: usize,
    ) -> Vec<Line> {
        let rule = Line::styled("─".repeat(width), DIM);
        if state.show_exit_warning {
            return vec![
                rule,
                Line::styled("  Press q again to quit, any other key to stay.", ALERT),
            ];
        }

        let hints = "  ←/→ category   ↑/↓ scroll   ? help   q quit";
        let shown = if total_rows == 0 || visible_window == 0 {
            String::from("nothing to show")
        } else {
            let last = (scroll.offset + visible_window).min(total_rows);
            format!("rows {}–{last} of {total_rows}", scroll.offset + 1)
        };
        let mut status = format!("  Library: {} tracks  ·  {shown}", state.library_size);
        if scroll.offset < scroll.max_scroll {
            status.push_str("  ↓ more");
        }
        vec![
            rule,
            Line::styled(truncate_with_ellipsis(hints, width), DIM),
            Line::styled(truncate_with_ellipsis(&status, width), TEXT),
        ]
    }
}

fn section_rule(title: &str, width: usize) -> Line {
    let head = format!("── {title} ");
    let fill = width.saturating_sub(head.width());
    Line::styled(head, ACCENT).with(Span::styled("─".repeat(fill), DIM))
}

fn group_header(kind: TransitionType, count: usize, width: usize) -> Line {
    let head = format!("  {} ({count}) ", kind.label());
    let fill = width.saturating_sub(head.width());
    Line::styled(head, category_style(kind)).with(Span::styled("─".repeat(fill), DIM))
}

/// One recommendation. Only the name/artist column is ever shortened.
fn track_row(rec: &RecommendedTrack, reference_bpm: f64, width: usize) -> Line {
    let key = format!("  {} ", pad_to_width(&rec.key, 3));
    let bpm = format!("  {:>6.1} BPM", rec.tempo);
    let (delta_text, delta_style) = match rec.tempo_delta_percent(reference_bpm) {
        Some(delta) if delta.abs() > 5.0 => (format!("{delta:>+7.1}%"), WARN),
        Some(delta) => (format!("{delta:>+7.1}%"), DIM),
        None => (format!("{:>8}", "—"), DIM),
    };

    let fixed = key.width() + bpm.width() + delta_text.width() + 1;
    let budget = width.saturating_sub(fixed);
    let title = truncate_with_ellipsis(&format!("{} — {}", rec.name, rec.artist), budget);

    Line::styled(key, Style::new().fg(palette::key_color(&rec.key)).bold())
        .with(Span::styled(pad_to_width(&title, budget), TEXT))
        .with(Span::styled(bpm, DIM))
        .with(Span::raw(" "))
        .with(Span::styled(delta_text, delta_style))
}
