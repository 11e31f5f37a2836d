//! Visual Arrays
//!
//! Visual properties read by the frame pipeline:
//! - fgColor / bgColor: colors (bindable to signals and getters)
//! - opacity, scale, scaleOrigin: written by the animation system
//! - offsetY: layout projection offset (rows, fractional)
//!
//! Opacity and scale apply to the whole subtree of a component.

use super::SlotArray;
use crate::types::Rgba;

/// Anchor point for the scale clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleOrigin {
    /// Scale around the center of the box.
    #[default]
    Center,
    /// Top edge stays fixed; the box grows downward.
    Top,
}

// =============================================================================
// Arrays
// =============================================================================

thread_local! {
    /// Foreground (text) color.
    static FG_COLOR: SlotArray<Rgba> = SlotArray::new(Rgba::TERMINAL_DEFAULT);

    /// Background color (transparent = draw nothing).
    static BG_COLOR: SlotArray<Rgba> = SlotArray::new(Rgba::TRANSPARENT);

    /// Opacity 0.0 - 1.0.
    static OPACITY: SlotArray<f32> = SlotArray::new(1.0);

    /// Scale 0.0 - 1.0.
    static SCALE: SlotArray<f32> = SlotArray::new(1.0);

    /// Where the scale clip is anchored.
    static SCALE_ORIGIN: SlotArray<ScaleOrigin> = SlotArray::new(ScaleOrigin::Center);

    /// Vertical projection offset in rows.
    static OFFSET_Y: SlotArray<f32> = SlotArray::new(0.0);
}

// =============================================================================
// Capacity Management
// =============================================================================

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    FG_COLOR.with(|arr| arr.ensure(index));
    BG_COLOR.with(|arr| arr.ensure(index));
    OPACITY.with(|arr| arr.ensure(index));
    SCALE.with(|arr| arr.ensure(index));
    SCALE_ORIGIN.with(|arr| arr.ensure(index));
    OFFSET_Y.with(|arr| arr.ensure(index));
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    FG_COLOR.with(|arr| arr.clear(index));
    BG_COLOR.with(|arr| arr.clear(index));
    OPACITY.with(|arr| arr.clear(index));
    SCALE.with(|arr| arr.clear(index));
    SCALE_ORIGIN.with(|arr| arr.clear(index));
    OFFSET_Y.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    FG_COLOR.with(|arr| arr.clear_all());
    BG_COLOR.with(|arr| arr.clear_all());
    OPACITY.with(|arr| arr.clear_all());
    SCALE.with(|arr| arr.clear_all());
    SCALE_ORIGIN.with(|arr| arr.clear_all());
    OFFSET_Y.with(|arr| arr.clear_all());
}

// =============================================================================
// Colors
// =============================================================================

/// Get foreground color at index.
pub fn get_fg_color(index: usize) -> Rgba {
    FG_COLOR.with(|arr| arr.get(index))
}

/// Set foreground color at index.
pub fn set_fg_color(index: usize, color: Rgba) {
    FG_COLOR.with(|arr| arr.set_value(index, color));
}

/// Set foreground color from a getter.
pub fn set_fg_color_getter(index: usize, getter: impl Fn() -> Rgba + 'static) {
    FG_COLOR.with(|arr| arr.set_getter(index, getter));
}

/// Get background color at index.
pub fn get_bg_color(index: usize) -> Rgba {
    BG_COLOR.with(|arr| arr.get(index))
}

/// Set background color at index.
pub fn set_bg_color(index: usize, color: Rgba) {
    BG_COLOR.with(|arr| arr.set_value(index, color));
}

/// Set background color from a getter.
pub fn set_bg_color_getter(index: usize, getter: impl Fn() -> Rgba + 'static) {
    BG_COLOR.with(|arr| arr.set_getter(index, getter));
}

// =============================================================================
// Animated properties
// =============================================================================

pub fn get_opacity(index: usize) -> f32 {
    OPACITY.with(|arr| arr.get(index))
}

pub fn set_opacity(index: usize, value: f32) {
    OPACITY.with(|arr| arr.set_value(index, value.clamp(0.0, 1.0)));
}

pub fn get_scale(index: usize) -> f32 {
    SCALE.with(|arr| arr.get(index))
}

/// Set scale. Springs may overshoot slightly, so values are clamped.
pub fn set_scale(index: usize, value: f32) {
    SCALE.with(|arr| arr.set_value(index, value.clamp(0.0, 1.0)));
}

pub fn get_scale_origin(index: usize) -> ScaleOrigin {
    SCALE_ORIGIN.with(|arr| arr.get(index))
}

pub fn set_scale_origin(index: usize, origin: ScaleOrigin) {
    SCALE_ORIGIN.with(|arr| arr.set_value(index, origin));
}

pub fn get_offset_y(index: usize) -> f32 {
    OFFSET_Y.with(|arr| arr.get(index))
}

pub fn set_offset_y(index: usize, value: f32) {
    OFFSET_Y.with(|arr| arr.set_value(index, value));
}
