//! Split-flap animation for board rows whose text changes in place.
//!
//! Unlike the other effects this one keeps state: a cell only flips when the
//! row it belongs to changed since the previous frame.

use unicode_width::UnicodeWidthChar;

use crate::style::{Line, Span};

/// Glyphs on a flap drum, in the order they spin past.
pub const FLAP_CHARSET: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789:-'.";
pub const FLIP_MIN: u8 = 2;
pub const FLIP_MAX: u8 = 9;

/// Flip counts for each cell of `target` that differs from `current`.
///
/// Counts depend only on the cell index and the target glyph, so the same
/// change always animates the same way. Cells whose target is not a single
/// column wide are never animated.
pub fn seed_flap_counts(current: &[char], target: &[char]) -> Vec<u8> {
    let spread = u32::from(FLIP_MAX - FLIP_MIN) + 1;
    target
        .iter()
        .enumerate()
        .map(|(index, &want)| {
            let have = current.get(index).copied().unwrap_or(' ');
            if have == want || want.width() != Some(1) {
                0
            } else {
                let mix = (index as u32).wrapping_mul(7).wrapping_add(u32::from(want));
                FLIP_MIN + (mix % spread) as u8
            }
        })
        .collect()
}

fn next_flap(glyph: char) -> char {
    let mut drum = FLAP_CHARSET.chars().cycle();
    if drum.by_ref().take(FLAP_CHARSET.len()).any(|c| c == glyph) {
        drum.next().unwrap_or(' ')
    } else {
        FLAP_CHARSET.chars().nth(1).unwrap_or(' ')
    }
}

/// One row of flaps moving towards a styled target line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlapRow {
    current: Vec<char>,
    target: Line,
    glyphs: Vec<char>,
    counters: Vec<u8>,
}

impl FlapRow {
    /// A row already showing `target`.
    pub fn settled(target: Line) -> Self {
        let glyphs: Vec<char> = target.plain().chars().collect();
        Self {
            current: glyphs.clone(),
            counters: vec![0; glyphs.len()],
            glyphs,
            target,
        }
    }

    /// A blank row that flips every cell into `target`.
    pub fn flip_in(target: Line) -> Self {
        let mut row = Self::default();
        row.set_target(target);
        row
    }

    pub fn target(&self) -> &Line {
        &self.target
    }

    /// Retargets the row, keeping what is on the flaps now.
    pub fn set_target(&mut self, target: Line) {
        self.glyphs = target.plain().chars().collect();
        self.current.resize(self.glyphs.len(), ' ');
        for glyph in &mut self.current {
            if glyph.width() != Some(1) {
                *glyph = ' ';
            }
        }
        self.counters = seed_flap_counts(&self.current, &self.glyphs);
        self.target = target;
    }

    /// Advances every flipping cell by one flap. Returns whether any flipped.
    pub fn step(&mut self) -> bool {
        let mut active = false;
        for ((glyph, count), want) in self
            .current
            .iter_mut()
            .zip(self.counters.iter_mut())
            .zip(&self.glyphs)
        {
            if *count > 0 {
                *glyph = next_flap(*glyph);
                *count -= 1;
                active = true;
            } else {
                *glyph = *want;
            }
        }
        active
    }

    pub fn is_flipping(&self) -> bool {
        self.counters.iter().any(|&count| count > 0)
    }

    /// The target line with cells still in motion replaced by their flap,
    /// drawn dimmed in the style of the cell they will become.
    pub fn render(&self) -> Line {
        if !self.is_flipping() {
            return self.target.clone();
        }
        let mut line = Line::new();
        let mut index = 0;
        for span in self.target.spans() {
            for glyph in span.text.chars() {
                let flipping = self.counters.get(index).is_some_and(|&count| count > 0);
                let shown = if flipping {
                    Span::styled(
                        self.current.get(index).copied().unwrap_or(' ').to_string(),
                        span.style.dim(),
                    )
                } else {
                    Span::styled(glyph.to_string(), span.style)
                };
                line.push(shown);
                index += 1;
            }
        }
        line
    }
}

/// Split-flap state for a block of consecutive screen rows.
#[derive(Debug, Clone)]
pub struct FlapBoard {
    rows: Vec<FlapRow>,
    step_ms: i64,
    last_step_ms: Option<i64>,
    replay: bool,
}

impl FlapBoard {
    pub fn new(step_ms: i64) -> Self {
        Self {
            rows: Vec::new(),
            step_ms: step_ms.max(1),
            last_step_ms: None,
            replay: false,
        }
    }

    /// Rewrites `lines` in place with their flap state at `now_ms`.
    ///
    /// Rows whose text changed start flipping when `animate` is set and snap
    /// straight to the new text otherwise. Slots seen for the first time
    /// are always settled.
    pub fn apply(&mut self, lines: &mut [Line], now_ms: i64, animate: bool) {
        let steps = self.elapsed_steps(now_ms);
        let replay = std::mem::take(&mut self.replay);
        self.rows.truncate(lines.len());

        for (slot, line) in lines.iter_mut().enumerate() {
            match self.rows.get_mut(slot) {
                Some(row) if replay => *row = FlapRow::flip_in(line.clone()),
                Some(row) => {
                    for _ in 0..steps {
                        if !row.step() {
                            break;
                        }
                    }
                    if row.target() != &*line {
                        if animate {
                            row.set_target(line.clone());
                        } else {
                            *row = FlapRow::settled(line.clone());
                        }
                    }
                }
                None if replay => self.rows.push(FlapRow::flip_in(line.clone())),
                None => self.rows.push(FlapRow::settled(line.clone())),
            }
            if let Some(row) = self.rows.get(slot) {
                *line = row.render();
            }
        }
    }

    /// Flips every row in from blank on the next [`FlapBoard::apply`].
    pub fn replay(&mut self) {
        self.replay = true;
    }

    /// Forgets all rows; the next frame is shown settled.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.last_step_ms = None;
    }

    pub fn is_flipping(&self) -> bool {
        self.rows.iter().any(FlapRow::is_flipping)
    }

    fn elapsed_steps(&mut self, now_ms: i64) -> u32 {
        let Some(last) = self.last_step_ms else {
            self.last_step_ms = Some(now_ms);
            return 0;
        };
        if now_ms <= last {
            return 0;
        }
        let steps = (now_ms - last) / self.step_ms;
        if steps >= i64::from(FLIP_MAX) {
            self.last_step_ms = Some(now_ms);
            return u32::from(FLIP_MAX);
        }
        self.last_step_ms = Some(last + steps * self.step_ms);
        steps as u32
    }
}
