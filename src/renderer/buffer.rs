//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of Cells that represents what should be displayed
//! on the terminal. All drawing operations work on this buffer.
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Signed coordinates**: callers draw in screen space, which can be
//!   negative for content scrolled or offset above the top edge; anything
//!   outside the buffer or the clip rect is dropped.
//! - **Alpha blending**: translucent backgrounds blend with existing cells.
//! - **Wide characters**: the cell after a wide character holds `'\0'`.

use crate::layout::char_width;
use crate::types::{Attr, Cell, ClipRect, Rgba};

/// Marker stored in the second cell of a wide character.
pub const CONTINUATION: char = '\0';

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer bounds as a ClipRect.
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Flat index for in-bounds signed coordinates.
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Get a cell reference (None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x as i32, y as i32).map(|i| &self.cells[i])
    }

    /// Get a mutable cell reference (None if out of bounds).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x as i32, y as i32).map(|i| &mut self.cells[i])
    }

    /// Raw cells slice (for diff rendering).
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            ((i % width) as u16, (i / width) as u16, cell)
        })
    }

    /// Clear the entire buffer to default cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Resize the buffer (clears content).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.resize(width as usize * height as usize, Cell::default());
        self.clear();
    }

    /// The characters of row `y`, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|cell| cell.char)
            .filter(|&c| c != CONTINUATION)
            .collect()
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell with optional clipping.
    ///
    /// Returns true if the cell was set.
    #[allow(clippy::too_many_arguments)]
    pub fn set_cell(
        &mut self,
        x: i32,
        y: i32,
        char: char,
        fg: Rgba,
        bg: Rgba,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> bool {
        if clip.is_some_and(|clip| !clip.contains(x, y)) {
            return false;
        }
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        let cell = &mut self.cells[idx];

        // A transparent background keeps whatever is underneath
        cell.bg = if bg.is_opaque() || bg.is_terminal_default() {
            bg
        } else {
            Rgba::blend(bg, cell.bg)
        };
        cell.char = char;
        cell.fg = fg;
        cell.attrs = attrs;

        true
    }

    /// Fill a rectangle with a background color, clearing its characters.
    pub fn fill_rect(&mut self, rect: ClipRect, bg: Rgba, clip: Option<&ClipRect>) {
        let area = match clip {
            Some(clip) => rect.intersect(clip),
            None => Some(rect),
        };
        let Some(area) = area.and_then(|a| a.intersect(&self.bounds())) else {
            return;
        };

        let opaque = bg.is_opaque() || bg.is_terminal_default();
        for row in area.y..area.y + area.height {
            for col in area.x..area.x + area.width {
                if let Some(idx) = self.index(col, row) {
                    let cell = &mut self.cells[idx];
                    cell.bg = if opaque { bg } else { Rgba::blend(bg, cell.bg) };
                    cell.char = ' ';
                    cell.attrs = Attr::NONE;
                }
            }
        }
    }

    /// Draw text at a position, keeping the background underneath.
    ///
    /// Returns the number of columns advanced (handles wide characters).
    pub fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Rgba,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> u16 {
        let mut col = x;

        for ch in text.chars() {
            if col >= self.width as i32 {
                break;
            }

            let w = char_width(ch);
            if w == 0 {
                continue;
            }

            if self.set_cell(col, y, ch, fg, Rgba::TRANSPARENT, attrs, clip) && w == 2 {
                self.set_cell(col + 1, y, CONTINUATION, fg, Rgba::TRANSPARENT, attrs, clip);
            }

            col += w as i32;
        }

        (col - x).max(0) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framebuffer_creation() {
        let buf = FrameBuffer::new(80, 24);
        assert_eq!(buf.width(), 80);
        assert_eq!(buf.height(), 24);
        assert_eq!(buf.cells().len(), 80 * 24);
    }

    #[test]
    fn test_set_cell_clips() {
        let mut buf = FrameBuffer::new(10, 10);
        let clip = ClipRect::new(2, 2, 3, 3);

        assert!(buf.set_cell(2, 2, 'X', Rgba::RED, Rgba::BLUE, Attr::BOLD, Some(&clip)));
        assert!(!buf.set_cell(5, 2, 'Y', Rgba::RED, Rgba::BLUE, Attr::NONE, Some(&clip)));
        assert!(!buf.set_cell(-1, 0, 'Z', Rgba::RED, Rgba::BLUE, Attr::NONE, None));

        let cell = buf.get(2, 2).unwrap();
        assert_eq!(cell.char, 'X');
        assert_eq!(cell.bg, Rgba::BLUE);
        assert_eq!(cell.attrs, Attr::BOLD);
    }

    #[test]
    fn test_fill_rect_partially_offscreen() {
        let mut buf = FrameBuffer::new(10, 10);
        buf.fill_rect(ClipRect::new(-2, 8, 4, 5), Rgba::GREEN, None);

        assert_eq!(buf.get(0, 8).unwrap().bg, Rgba::GREEN);
        assert_eq!(buf.get(1, 9).unwrap().bg, Rgba::GREEN);
        assert_eq!(buf.get(2, 9).unwrap().bg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_draw_text_keeps_background() {
        let mut buf = FrameBuffer::new(10, 2);
        buf.fill_rect(buf.bounds(), Rgba::BLUE, None);
        let used = buf.draw_text(1, 0, "hi", Rgba::WHITE, Attr::NONE, None);

        assert_eq!(used, 2);
        assert_eq!(buf.row_text(0), " hi       ");
        assert_eq!(buf.get(1, 0).unwrap().bg, Rgba::BLUE);
    }

    #[test]
    fn test_wide_char_continuation() {
        let mut buf = FrameBuffer::new(6, 1);
        let used = buf.draw_text(0, 0, "日x", Rgba::WHITE, Attr::NONE, None);

        assert_eq!(used, 3);
        assert_eq!(buf.get(1, 0).unwrap().char, CONTINUATION);
        assert_eq!(buf.row_text(0), "日x   ");
    }
}
