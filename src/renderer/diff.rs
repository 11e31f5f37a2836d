//! Differential renderer.
//!
//! The DiffRenderer compares the current frame to the previous frame and only
//! outputs cells that have changed.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update block
//! 2. For each cell in the new frame:
//!    - If previous frame exists and cell is unchanged: skip
//!    - Otherwise: move the cursor (only if not already there), switch colors
//!      and attributes (only if they differ from the last emitted cell), print
//! 3. Flush the writer once
//! 4. Store current frame as previous for next comparison

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};
use crossterm::queue;

use super::buffer::{FrameBuffer, CONTINUATION};
use crate::types::{Attr, Cell, Rgba};

/// Terminal state as last emitted, to skip redundant escape codes.
#[derive(Debug, Default)]
struct PenState {
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Attr,
    cursor: Option<(u16, u16)>,
}

/// Differential renderer over any writer.
///
/// Keeps track of the previous frame to enable diff-based rendering.
pub struct DiffRenderer<W: Write> {
    out: W,
    pen: PenState,
    previous: Option<FrameBuffer>,
}

impl<W: Write> DiffRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pen: PenState::default(),
            previous: None,
        }
    }

    /// Render a frame, outputting only changed cells.
    ///
    /// Returns true if any cells were changed.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<bool> {
        let mut has_changes = false;
        queue!(self.out, BeginSynchronizedUpdate)?;
        self.pen = PenState::default();

        let same_size = self
            .previous
            .as_ref()
            .is_some_and(|prev| prev.width() == buffer.width() && prev.height() == buffer.height());

        for (x, y, cell) in buffer.iter() {
            let changed = match &self.previous {
                Some(prev) if same_size => prev.get(x, y) != Some(cell),
                _ => true,
            };

            if changed {
                has_changes = true;
                self.render_cell(x, y, cell)?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(has_changes)
    }

    /// Invalidate the previous frame. Next render will be a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Mutable access to the underlying writer.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        // The wide character to the left already covers this column
        if cell.char == CONTINUATION {
            self.pen.cursor = None;
            return Ok(());
        }

        if self.pen.cursor != Some((x, y)) {
            queue!(self.out, MoveTo(x, y))?;
        }

        if cell.attrs != self.pen.attrs {
            // Reset drops colors too
            queue!(self.out, SetAttribute(Attribute::Reset))?;
            self.pen.fg = None;
            self.pen.bg = None;
            for attribute in attributes(cell.attrs) {
                queue!(self.out, SetAttribute(attribute))?;
            }
            self.pen.attrs = cell.attrs;
        }

        if self.pen.fg != Some(cell.fg) {
            queue!(self.out, SetForegroundColor(to_color(cell.fg)))?;
            self.pen.fg = Some(cell.fg);
        }
        if self.pen.bg != Some(cell.bg) {
            queue!(self.out, SetBackgroundColor(to_color(cell.bg)))?;
            self.pen.bg = Some(cell.bg);
        }

        queue!(self.out, Print(cell.char))?;
        let width = crate::layout::char_width(cell.char).max(1) as u16;
        self.pen.cursor = Some((x.saturating_add(width), y));
        Ok(())
    }
}

/// Convert to a crossterm color. Terminal default maps to `Reset`.
fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r.clamp(0, 255) as u8,
            g: color.g.clamp(0, 255) as u8,
            b: color.b.clamp(0, 255) as u8,
        }
    }
}

fn attributes(attrs: Attr) -> impl Iterator<Item = Attribute> {
    [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::INVERSE, Attribute::Reverse),
        (Attr::STRIKETHROUGH, Attribute::CrossedOut),
    ]
    .into_iter()
    .filter(move |(flag, _)| attrs.contains(*flag))
    .map(|(_, attribute)| attribute)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn output(renderer: &mut DiffRenderer<Vec<u8>>) -> String {
        let text = String::from_utf8_lossy(renderer.writer_mut()).into_owned();
        renderer.writer_mut().clear();
        text
    }

    #[test]
    fn test_first_render_draws_everything() {
        let mut renderer = DiffRenderer::new(Vec::new());
        assert!(!renderer.has_previous());

        let mut buf = FrameBuffer::new(4, 1);
        buf.draw_text(0, 0, "abcd", Rgba::WHITE, Attr::NONE, None);

        assert!(renderer.render(&buf).unwrap());
        assert!(output(&mut renderer).contains("abcd"));
        assert!(renderer.has_previous());
    }

    #[test]
    fn test_unchanged_frame_emits_no_cells() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let mut buf = FrameBuffer::new(4, 1);
        buf.draw_text(0, 0, "abcd", Rgba::WHITE, Attr::NONE, None);

        renderer.render(&buf).unwrap();
        output(&mut renderer);

        assert!(!renderer.render(&buf).unwrap());
        assert!(!output(&mut renderer).contains('a'));
    }

    #[test]
    fn test_only_changed_cell_is_printed() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let mut buf = FrameBuffer::new(4, 1);
        buf.draw_text(0, 0, "abcd", Rgba::WHITE, Attr::NONE, None);
        renderer.render(&buf).unwrap();
        output(&mut renderer);

        buf.draw_text(2, 0, "X", Rgba::WHITE, Attr::NONE, None);
        assert!(renderer.render(&buf).unwrap());
        let text = output(&mut renderer);
        assert!(text.contains('X'));
        assert!(!text.contains('a'));
        assert!(!text.contains('d'));
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let mut buf = FrameBuffer::new(2, 1);
        buf.draw_text(0, 0, "ok", Rgba::WHITE, Attr::BOLD, None);
        renderer.render(&buf).unwrap();
        output(&mut renderer);

        renderer.invalidate();
        assert!(renderer.render(&buf).unwrap());
        assert!(output(&mut renderer).contains("ok"));
    }
}
