//! Visual decorators.
//!
//! The ripple and scanline effects are recomputed from `now_ms` and geometry
//! on every frame. The split-flap board is the one stateful effect: it
//! remembers each row's last text so it can flip changed cells in.

mod flap;
mod ripple;
mod scanline;

pub use flap::{seed_flap_counts, FlapBoard, FlapRow, FLAP_CHARSET, FLIP_MAX, FLIP_MIN};
pub use ripple::{bordered_box, RippleState};
pub use scanline::{circular_distance, ScanlineBar, Urgency, BAR_CELLS, PULSE_GRADIENT};
