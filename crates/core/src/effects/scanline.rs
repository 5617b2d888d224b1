use crate::style::{scale_rgb, Color, Line, Span, Style};

/// Number of cells in the bar; one per beat of a phrase.
pub const BAR_CELLS: usize = 32;

/// Brightness falloff around the pulse centre.
pub const PULSE_GRADIENT: [f64; 5] = [0.3, 0.6, 1.0, 0.6, 0.3];

const BASE_BG: Color = Color::Rgb {
    r: 24,
    g: 26,
    b: 36,
};
const EMPTY_FG: Color = Color::Rgb {
    r: 90,
    g: 94,
    b: 110,
};

/// How close the next phrase boundary is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Eight beats or fewer left; the pulse stops moving.
    Final,
    Closing,
    Running,
    Idle,
}

impl Urgency {
    pub fn from_beats(beats_remaining: f64) -> Self {
        if beats_remaining <= 8.0 {
            Urgency::Final
        } else if beats_remaining <= 16.0 {
            Urgency::Closing
        } else if beats_remaining <= 32.0 {
            Urgency::Running
        } else {
            Urgency::Idle
        }
    }

    /// Milliseconds per pulse step; `None` when frozen.
    pub fn step_ms(self) -> Option<i64> {
        match self {
            Urgency::Final => None,
            Urgency::Closing => Some(50),
            Urgency::Running => Some(100),
            Urgency::Idle => Some(250),
        }
    }

    fn rgb(self) -> (u8, u8, u8) {
        match self {
            Urgency::Final => (255, 64, 64),
            Urgency::Closing => (255, 176, 0),
            Urgency::Running | Urgency::Idle => (0, 200, 255),
        }
    }
}

/// Shortest distance between two cells on a ring of `len` cells.
pub fn circular_distance(a: usize, b: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let diff = a.abs_diff(b) % len;
    diff.min(len - diff)
}

/// One frame of the phrase countdown bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanlineBar {
    pub filled: usize,
    pub center: usize,
    pub urgency: Urgency,
}

impl ScanlineBar {
    pub fn at(beats_remaining: f64, now_ms: i64) -> Self {
        let filled = if beats_remaining.is_finite() {
            beats_remaining.floor().clamp(0.0, BAR_CELLS as f64) as usize
        } else {
            0
        };
        let urgency = Urgency::from_beats(beats_remaining);
        let center = match urgency.step_ms() {
            Some(step) => now_ms.div_euclid(step).rem_euclid(BAR_CELLS as i64) as usize,
            None => filled.saturating_sub(1) / 2,
        };
        Self {
            filled,
            center,
            urgency,
        }
    }

    /// Gradient weight for `cell`, or `None` when outside the pulse.
    pub fn intensity(&self, cell: usize) -> Option<f64> {
        let half = PULSE_GRADIENT.len() / 2;
        let distance = circular_distance(cell, self.center, BAR_CELLS);
        (distance <= half).then(|| PULSE_GRADIENT[half + distance])
    }

    pub fn render(&self) -> Line {
        let tint = self.urgency.rgb();
        let lit = Color::Rgb {
            r: tint.0,
            g: tint.1,
            b: tint.2,
        };
        let mut line = Line::new();
        for cell in 0..BAR_CELLS {
            let bg = match self.intensity(cell) {
                Some(weight) => scale_rgb(tint, weight),
                None => BASE_BG,
            };
            let (glyph, fg) = if cell < self.filled {
                ('■', lit)
            } else {
                ('·', EMPTY_FG)
            };
            let mut style = Style::new().fg(fg).bg(bg);
            if self.urgency == Urgency::Final {
                style = style.bold();
            }
            line.push(Span::styled(glyph.to_string(), style));
        }
        line
    }
}
