//! Terminal renderer - the "blind" output layer.
//!
//! The renderer knows only about cells. It doesn't understand components,
//! layout, or reactivity. It takes a filled [`FrameBuffer`] and writes the
//! cells that changed since the last frame through crossterm.

pub mod buffer;
pub mod diff;

pub use buffer::{FrameBuffer, CONTINUATION};
pub use diff::DiffRenderer;
