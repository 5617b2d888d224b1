use std::io::Write;

use crate::{
    config::BoardConfig,
    effects::FlapBoard,
    layout::{BoardState, LayoutEngine, ScrollState, Size},
    render::DiffRenderer,
    track::CategoryFilter,
    Result,
};

/// One dashboard per terminal session: lays out each tick, flips changed
/// recommendation rows in, and repaints the rows that changed since the
/// last one.
#[derive(Debug)]
pub struct Dashboard<W: Write> {
    layout: LayoutEngine,
    renderer: DiffRenderer<W>,
    flaps: FlapBoard,
    last_size: Option<Size>,
    /// Category and scroll offset of the previous tick. Rows that change
    /// because the user navigated are not animated.
    last_view: Option<(CategoryFilter, usize)>,
}

impl<W: Write> Dashboard<W> {
    pub fn new(out: W, config: &BoardConfig) -> Self {
        Self {
            layout: LayoutEngine::new(config),
            renderer: DiffRenderer::new(out),
            flaps: FlapBoard::new(config.flap.step_ms),
            last_size: None,
            last_view: None,
        }
    }

    /// Renders one tick. The returned scroll state must be fed back into the
    /// next call's `state.scroll_offset`.
    pub fn render_train_board(
        &mut self,
        state: &BoardState,
        size: Size,
        now_ms: i64,
    ) -> Result<ScrollState> {
        if self.last_size.is_some_and(|last| last != size) {
            tracing::debug!(width = size.width, height = size.height, "terminal resized");
            self.renderer.clear_screen()?;
            self.flaps.clear();
        }
        self.last_size = Some(size);

        let mut composition = self.layout.compose(state, size, now_ms);
        let view = (state.selected, composition.scroll.offset);
        let animate = self.last_view == Some(view);
        self.last_view = Some(view);
        let list = composition.list_rows.clone();
        if let Some(rows) = composition.rows.get_mut(list) {
            self.flaps.apply(rows, now_ms, animate);
        }

        self.renderer
            .write_frame(&composition.rows, usize::from(size.height))?;
        Ok(composition.scroll)
    }

    /// Flips every visible recommendation row in from blank on the next tick.
    pub fn replay_flaps(&mut self) {
        self.flaps.replay();
    }

    /// Forces the next tick to repaint every row.
    pub fn reset_frame_cache(&mut self) {
        self.renderer.reset_frame_cache();
    }

    /// Clears the terminal and forces a full repaint.
    pub fn clear(&mut self) -> Result<()> {
        self.renderer.clear_screen()
    }

    pub fn renderer(&self) -> &DiffRenderer<W> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut DiffRenderer<W> {
        &mut self.renderer
    }

    pub fn into_inner(self) -> W {
        self.renderer.into_inner()
    }
}
