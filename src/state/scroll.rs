//! Scroll State Module
//!
//! Manages the document viewport:
//! - Viewport size (terminal size, or the headless size)
//! - Vertical scroll offset (user state)
//! - Scroll bounds from layout (content height minus viewport height)
//! - Scroll operations with clamping
//!
//! The document is laid out with unconstrained height; the viewport is the
//! window of rows currently on screen. Intersection observation and the
//! frame pipeline both read it.

use std::cell::RefCell;

use crate::layout::ComputedLayout;

// =============================================================================
// SCROLL CONSTANTS
// =============================================================================

/// Default scroll amount for arrow keys (lines).
pub const LINE_SCROLL: u16 = 1;

/// Default scroll amount for Page Up/Down (90% of viewport).
pub const PAGE_SCROLL_FACTOR: f32 = 0.9;

// =============================================================================
// VIEWPORT STATE
// =============================================================================

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    /// First document row on screen.
    pub scroll_y: u16,
    /// Largest valid `scroll_y` for the last layout.
    pub max_scroll_y: u16,
}

impl Viewport {
    /// Document rows `[top, bottom)` currently on screen.
    pub fn visible_rows(&self) -> (i32, i32) {
        let top = self.scroll_y as i32;
        (top, top + self.height as i32)
    }
}

thread_local! {
    static VIEWPORT: RefCell<Viewport> = RefCell::new(Viewport::default());
}

/// Current viewport.
pub fn viewport() -> Viewport {
    VIEWPORT.with(|v| *v.borrow())
}

/// Resize the viewport. Scroll is re-clamped on the next layout.
pub fn set_viewport_size(width: u16, height: u16) {
    VIEWPORT.with(|v| {
        let mut v = v.borrow_mut();
        v.width = width;
        v.height = height;
    });
}

/// Recompute scroll bounds from a fresh layout and clamp the offset.
pub fn update_scroll_bounds(layout: &ComputedLayout) {
    VIEWPORT.with(|v| {
        let mut v = v.borrow_mut();
        v.max_scroll_y = layout.content_height.saturating_sub(v.height);
        v.scroll_y = v.scroll_y.min(v.max_scroll_y);
    });
}

// =============================================================================
// SCROLL OPERATIONS
// =============================================================================

/// Set the scroll offset, clamped to bounds.
pub fn scroll_to(y: u16) {
    VIEWPORT.with(|v| {
        let mut v = v.borrow_mut();
        v.scroll_y = y.min(v.max_scroll_y);
    });
}

/// Scroll by a delta. Returns true if the offset changed.
pub fn scroll_by(delta_y: i32) -> bool {
    VIEWPORT.with(|v| {
        let mut v = v.borrow_mut();
        let target = (v.scroll_y as i32 + delta_y).clamp(0, v.max_scroll_y as i32) as u16;
        let changed = target != v.scroll_y;
        v.scroll_y = target;
        changed
    })
}

pub fn scroll_to_bottom() {
    scroll_to(u16::MAX);
}

/// Rows moved by Page Up/Down.
pub fn page_size() -> u16 {
    let height = viewport().height;
    ((height as f32 * PAGE_SCROLL_FACTOR) as u16).max(1)
}

/// Reset viewport state (for testing).
pub fn reset_scroll() {
    VIEWPORT.with(|v| *v.borrow_mut() = Viewport::default());
}
