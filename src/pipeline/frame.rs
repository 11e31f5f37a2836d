//! Frame composition - layout and visual arrays into a FrameBuffer.
//!
//! Walks the laid-out tree from the roots, in flex order, and paints each
//! component into a viewport-sized buffer:
//!
//! - Document rows are shifted by the viewport scroll and by each
//!   component's projection offset (accumulated down the tree).
//! - Scale clips the subtree to `ceil(height * scale)` rows, anchored at the
//!   top or centered per [`ScaleOrigin`], and `ceil(width * scale)` columns,
//!   centered.
//! - Opacity multiplies down the tree and fades colors toward the background
//!   underneath. Subtrees below [`MIN_OPACITY`] are not painted.

use crate::engine::arrays::visual::{self, ScaleOrigin};
use crate::engine::arrays::{core, text as text_arrays};
use crate::layout::{wrap_text, ComputedLayout};
use crate::renderer::FrameBuffer;
use crate::state::scroll::Viewport;
use crate::types::{Attr, ClipRect, ComponentType, Rgba};

/// Subtrees fainter than this are skipped entirely.
pub const MIN_OPACITY: f32 = 0.05;

/// What a component passes down to its children.
#[derive(Debug, Clone, Copy)]
struct Inherited {
    clip: ClipRect,
    opacity: f32,
    offset_y: f32,
    fg: Rgba,
    bg: Rgba,
}

/// Compose one frame for `viewport` from `layout`.
pub fn compose_frame(layout: &ComputedLayout, viewport: Viewport) -> FrameBuffer {
    let mut buffer = FrameBuffer::new(viewport.width, viewport.height);
    let root = Inherited {
        clip: buffer.bounds(),
        opacity: 1.0,
        offset_y: -(viewport.scroll_y as f32),
        fg: Rgba::TERMINAL_DEFAULT,
        bg: Rgba::TERMINAL_DEFAULT,
    };

    for &index in &layout.roots {
        paint(&mut buffer, layout, index, root);
    }
    buffer
}

/// Rows and columns left visible by `scale`, as a screen rect.
fn scale_clip(x: i32, y: i32, width: i32, height: i32, scale: f32, origin: ScaleOrigin) -> ClipRect {
    let scale = scale.clamp(0.0, 1.0);
    let rows = (height as f32 * scale).ceil() as i32;
    let cols = (width as f32 * scale).ceil() as i32;
    let top = match origin {
        ScaleOrigin::Top => y,
        ScaleOrigin::Center => y + (height - rows) / 2,
    };
    ClipRect::new(x + (width - cols) / 2, top, cols, rows)
}

fn paint(buffer: &mut FrameBuffer, layout: &ComputedLayout, index: usize, inherited: Inherited) {
    if !layout.is_laid_out(index) {
        return;
    }

    let opacity = inherited.opacity * visual::get_opacity(index).clamp(0.0, 1.0);
    if opacity < MIN_OPACITY {
        return;
    }
    let scale = visual::get_scale(index);
    if scale <= 0.0 {
        return;
    }

    let offset_y = inherited.offset_y + visual::get_offset_y(index);
    let (x, y, width, height) = layout.get(index);
    let (x, width, height) = (x as i32, width as i32, height as i32);
    let y = y as i32 + offset_y.round() as i32;

    let rect = ClipRect::new(x, y, width, height);
    let clip = if scale < 1.0 {
        scale_clip(x, y, width, height, scale, visual::get_scale_origin(index))
    } else {
        rect
    };
    // Fully clipped: children inherit an empty clip
    let clip = clip.intersect(&inherited.clip).unwrap_or(ClipRect::new(x, y, 0, 0));

    let own_bg = visual::get_bg_color(index);
    let bg = if own_bg.is_transparent() {
        inherited.bg
    } else {
        let faded = Rgba::fade(own_bg, inherited.bg, opacity);
        buffer.fill_rect(rect, faded, Some(&clip));
        faded
    };

    let own_fg = visual::get_fg_color(index);
    let fg_source = if own_fg.is_terminal_default() { inherited.fg } else { own_fg };

    if core::get_component_type(index) == ComponentType::Text && width > 0 {
        let fg = Rgba::fade(fg_source, bg, opacity);
        let mut attrs = text_arrays::get_text_attrs(index);
        if opacity < 0.5 {
            attrs |= Attr::DIM;
        }
        let content = text_arrays::get_text_content(index);
        for (row, line) in wrap_text(&content, width as u16).iter().enumerate() {
            buffer.draw_text(x, y + row as i32, line, fg, attrs, Some(&clip));
        }
    }

    let next = Inherited {
        clip,
        opacity,
        offset_y,
        fg: fg_source,
        bg,
    };
    for &child in layout.children_of(index) {
        paint(buffer, layout, child, next);
    }
}
