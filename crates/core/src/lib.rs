//! Core library for the Phrase Board mixing dashboard.
//!
//! The crate turns plain data about the track on deck and its recommended
//! follow-ups into a flicker-free terminal screen. Timing lives in
//! [`timeline`], screen composition in [`layout`] (decorated by
//! [`effects`]), and the minimal-write terminal output in [`render`].
//! [`Dashboard`] ties one layout engine to one renderer.

pub mod board;
pub mod config;
pub mod effects;
pub mod error;
pub mod layout;
pub mod palette;
pub mod render;
pub mod style;
pub mod timeline;
pub mod track;

pub use board::Dashboard;
pub use config::{BoardConfig, FlapConfig, LayoutConfig, RippleConfig};
pub use error::{BoardError, Result};
pub use layout::{BoardState, Composition, LayoutEngine, ScrollState, Size};
pub use render::DiffRenderer;
pub use style::{Line, Span, Style};
pub use timeline::{Clock, ManualClock, PhraseInfo, SystemClock};
pub use track::{CategoryFilter, RecommendedTrack, Track, TransitionType};
