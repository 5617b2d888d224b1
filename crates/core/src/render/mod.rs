use std::io::Write;

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};

use crate::{style::Line, Result};

/// Row indices whose content differs between two frames. A missing row on
/// either side counts as an empty row.
pub fn changed_rows(previous: &[Line], next: &[Line]) -> Vec<usize> {
    let empty = Line::new();
    let rows = previous.len().max(next.len());
    (0..rows)
        .filter(|&index| {
            let old = previous.get(index).unwrap_or(&empty);
            let new = next.get(index).unwrap_or(&empty);
            old != new
        })
        .collect()
}

/// Writes frames to a terminal, repainting only the rows that changed.
///
/// The renderer owns the last frame it wrote; it is the only state carried
/// between ticks and must not be shared between render loops.
#[derive(Debug)]
pub struct DiffRenderer<W: Write> {
    out: W,
    previous: Vec<Line>,
    buffer: Vec<u8>,
}

impl<W: Write> DiffRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: Vec::new(),
            buffer: Vec::new(),
        }
    }

    /// Brings the terminal from the previous frame to `rows` and returns the
    /// number of bytes written. Rows past `height` are dropped so the
    /// terminal never scrolls.
    pub fn write_frame(&mut self, rows: &[Line], height: usize) -> Result<usize> {
        let visible = &rows[..rows.len().min(height)];
        let changed = changed_rows(&self.previous, visible);

        let mut buffer = std::mem::take(&mut self.buffer);
        buffer.clear();

        let mut homed = false;
        for index in changed.iter().copied().filter(|index| *index < height) {
            if !homed {
                queue!(buffer, MoveTo(0, 0))?;
                homed = true;
            }
            let row = u16::try_from(index).unwrap_or(u16::MAX);
            queue!(buffer, MoveTo(0, row))?;
            if let Some(line) = visible.get(index) {
                line.write_to(&mut buffer)?;
            }
            queue!(buffer, Clear(ClearType::UntilNewLine))?;
        }

        self.previous = visible.to_vec();

        let written = buffer.len();
        if written > 0 {
            tracing::trace!(rows = changed.len(), bytes = written, "repainting rows");
            self.out.write_all(&buffer)?;
            self.out.flush()?;
        }
        self.buffer = buffer;
        Ok(written)
    }

    /// Forgets the previous frame so the next write repaints every row.
    pub fn reset_frame_cache(&mut self) {
        self.previous.clear();
    }

    /// Clears the whole screen and forgets the previous frame.
    pub fn clear_screen(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.flush()?;
        self.reset_frame_cache();
        Ok(())
    }

    /// Rows written by the last frame.
    pub fn previous_frame(&self) -> &[Line] {
        &self.previous
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        data: Vec<u8>,
        writes: usize,
        flushes: usize,
    }

    impl Write for RecordingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn frame(rows: &[&str]) -> Vec<Line> {
        rows.iter().map(|row| Line::raw(*row)).collect()
    }

    fn output(renderer: &mut DiffRenderer<Vec<u8>>) -> String {
        let text = String::from_utf8(renderer.writer().clone()).unwrap();
        renderer.writer_mut().clear();
        text
    }

    #[test]
    fn first_frame_paints_every_row() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.write_frame(&frame(&["alpha", "beta"]), 10).unwrap();
        let text = output(&mut renderer);

        assert!(text.starts_with("\x1b[1;1H"));
        assert!(text.contains("\x1b[1;1Halpha\x1b[K"));
        assert!(text.contains("\x1b[2;1Hbeta\x1b[K"));
    }

    #[test]
    fn identical_frames_write_nothing() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let rows = frame(&["alpha", "beta"]);
        renderer.write_frame(&rows, 10).unwrap();
        output(&mut renderer);

        assert_eq!(renderer.write_frame(&rows, 10).unwrap(), 0);
        assert!(renderer.writer().is_empty());
    }

    #[test]
    fn only_changed_rows_are_rewritten() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.write_frame(&frame(&["a", "b", "c"]), 10).unwrap();
        output(&mut renderer);

        renderer.write_frame(&frame(&["a", "B", "c"]), 10).unwrap();
        let text = output(&mut renderer);
        assert_eq!(text, "\x1b[1;1H\x1b[2;1HB\x1b[K");
    }

    #[test]
    fn shorter_frames_clear_stale_rows() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.write_frame(&frame(&["a", "b", "c"]), 10).unwrap();
        output(&mut renderer);

        renderer.write_frame(&frame(&["a"]), 10).unwrap();
        let text = output(&mut renderer);
        assert!(text.contains("\x1b[2;1H\x1b[K"));
        assert!(text.contains("\x1b[3;1H\x1b[K"));
        assert_eq!(renderer.previous_frame().len(), 1);
    }

    #[test]
    fn rows_past_the_terminal_are_clipped() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer
            .write_frame(&frame(&["one", "two", "three", "four"]), 2)
            .unwrap();
        let text = output(&mut renderer);

        assert!(!text.contains("three"));
        assert!(!text.contains("\x1b[3;1H"));
        assert_eq!(renderer.previous_frame().len(), 2);
    }

    #[test]
    fn reset_forces_full_repaint() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let rows = frame(&["alpha", "beta"]);
        renderer.write_frame(&rows, 10).unwrap();
        output(&mut renderer);

        renderer.reset_frame_cache();
        renderer.write_frame(&rows, 10).unwrap();
        let text = output(&mut renderer);
        assert!(text.contains("alpha") && text.contains("beta"));
    }

    #[test]
    fn returning_to_a_frame_repaints_exactly_the_differing_rows() {
        let a = frame(&["title", "one", "two", "footer"]);
        let b = frame(&["title", "uno", "two", "pie", "extra"]);

        assert_eq!(changed_rows(&a, &b), vec![1, 3, 4]);
        assert_eq!(changed_rows(&b, &a), changed_rows(&a, &b));

        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.write_frame(&a, 10).unwrap();
        renderer.write_frame(&b, 10).unwrap();
        output(&mut renderer);
        renderer.write_frame(&a, 10).unwrap();
        let text = output(&mut renderer);

        assert_eq!(
            text,
            "\x1b[1;1H\x1b[2;1Hone\x1b[K\x1b[4;1Hfooter\x1b[K\x1b[5;1H\x1b[K"
        );
    }

    #[test]
    fn each_frame_is_a_single_write_and_flush() {
        let mut renderer = DiffRenderer::new(RecordingSink::default());
        renderer.write_frame(&frame(&["a", "b", "c"]), 10).unwrap();
        renderer.write_frame(&frame(&["a", "b", "c"]), 10).unwrap();

        let sink = renderer.into_inner();
        assert_eq!(sink.writes, 1);
        assert_eq!(sink.flushes, 1);
        assert!(!sink.data.is_empty());
    }
}
