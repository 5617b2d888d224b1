use crate::{
    config::RippleConfig,
    style::{pad_to_width, Color, Line, Span, Style},
};

const BORDER: Style = Style::new().fg(Color::Rgb {
    r: 70,
    g: 92,
    b: 128,
});
const HIGHLIGHT: Style = Style::new()
    .fg(Color::Rgb {
        r: 125,
        g: 220,
        b: 255,
    })
    .bold();

/// A diagonal band of highlight sweeping across a rectangular border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RippleState {
    pub band: usize,
    pub cycle: usize,
    pub phase: usize,
}

impl RippleState {
    pub fn at(now_ms: i64, width: usize, height: usize, config: &RippleConfig) -> Self {
        let cycle = (width + height.clamp(6, 60)).max(1);
        let step = config.step_ms.max(1);
        let phase = (now_ms.div_euclid(step)).rem_euclid(cycle as i64) as usize;
        Self {
            band: config.band.min(cycle),
            cycle,
            phase,
        }
    }

    /// Whether the border cell at `(row, col)` sits inside the band.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        let position = (row + col) % self.cycle;
        let offset = (position + self.cycle - self.phase) % self.cycle;
        offset < self.band
    }

    /// Styles one border glyph. Only horizontal rules change shape.
    pub fn decorate(&self, row: usize, col: usize, glyph: char) -> Span {
        if !self.contains(row, col) {
            return Span::styled(glyph.to_string(), BORDER);
        }
        let glyph = match glyph {
            '─' => '━',
            other => other,
        };
        Span::styled(glyph.to_string(), HIGHLIGHT)
    }
}

/// Draws `content` inside a rounded box `width` cells wide, with every
/// border cell run through the ripple.
pub fn bordered_box(width: usize, content: &[Line], ripple: &RippleState) -> Vec<Line> {
    let width = width.max(2);
    let inner = width - 2;
    let bottom = content.len() + 1;
    let mut rows = Vec::with_capacity(content.len() + 2);

    rows.push(rule(0, width, ('╭', '╮'), ripple));
    for (index, body) in content.iter().enumerate() {
        let row = index + 1;
        let mut line = Line::new();
        line.push(ripple.decorate(row, 0, '│'));
        let fill = inner.saturating_sub(body.width());
        line.extend(body.clone());
        line.push(Span::raw(pad_to_width("", fill)));
        line.push(ripple.decorate(row, width - 1, '│'));
        rows.push(line);
    }
    rows.push(rule(bottom, width, ('╰', '╯'), ripple));
    rows
}

fn rule(row: usize, width: usize, corners: (char, char), ripple: &RippleState) -> Line {
    let mut line = Line::new();
    for col in 0..width {
        let glyph = if col == 0 {
            corners.0
        } else if col == width - 1 {
            corners.1
        } else {
            '─'
        };
        line.push(ripple.decorate(row, col, glyph));
    }
    line
}
