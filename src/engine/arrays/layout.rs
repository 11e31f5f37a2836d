//! Layout Arrays
//!
//! Flexbox properties read by the taffy bridge:
//! - container: flexDirection, justifyContent, alignItems, gap
//! - item: grow, order
//! - size: width, height
//! - spacing: padding (top, right, bottom, left)
//!
//! `order` is not a taffy style property; the bridge sorts siblings by it
//! before attaching them.

use super::SlotArray;
use crate::types::{AlignItems, Dimension, FlexDirection, JustifyContent};

/// Padding on four sides, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Spacing {
    /// Same value on every side.
    pub const fn all(value: u16) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Vertical (top/bottom) and horizontal (left/right) values.
    pub const fn symmetric(vertical: u16, horizontal: u16) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

// =============================================================================
// Arrays
// =============================================================================

thread_local! {
    static FLEX_DIRECTION: SlotArray<FlexDirection> = SlotArray::new(FlexDirection::Column);
    static JUSTIFY_CONTENT: SlotArray<JustifyContent> = SlotArray::new(JustifyContent::FlexStart);
    static ALIGN_ITEMS: SlotArray<AlignItems> = SlotArray::new(AlignItems::Stretch);
    static GAP: SlotArray<u16> = SlotArray::new(0);
    static GROW: SlotArray<f32> = SlotArray::new(0.0);
    static ORDER: SlotArray<i32> = SlotArray::new(0);
    static WIDTH: SlotArray<Dimension> = SlotArray::new(Dimension::Auto);
    static HEIGHT: SlotArray<Dimension> = SlotArray::new(Dimension::Auto);
    static PADDING: SlotArray<Spacing> = SlotArray::new(Spacing::default());
}

// =============================================================================
// Capacity Management
// =============================================================================

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    FLEX_DIRECTION.with(|arr| arr.ensure(index));
    JUSTIFY_CONTENT.with(|arr| arr.ensure(index));
    ALIGN_ITEMS.with(|arr| arr.ensure(index));
    GAP.with(|arr| arr.ensure(index));
    GROW.with(|arr| arr.ensure(index));
    ORDER.with(|arr| arr.ensure(index));
    WIDTH.with(|arr| arr.ensure(index));
    HEIGHT.with(|arr| arr.ensure(index));
    PADDING.with(|arr| arr.ensure(index));
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    FLEX_DIRECTION.with(|arr| arr.clear(index));
    JUSTIFY_CONTENT.with(|arr| arr.clear(index));
    ALIGN_ITEMS.with(|arr| arr.clear(index));
    GAP.with(|arr| arr.clear(index));
    GROW.with(|arr| arr.clear(index));
    ORDER.with(|arr| arr.clear(index));
    WIDTH.with(|arr| arr.clear(index));
    HEIGHT.with(|arr| arr.clear(index));
    PADDING.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    FLEX_DIRECTION.with(|arr| arr.clear_all());
    JUSTIFY_CONTENT.with(|arr| arr.clear_all());
    ALIGN_ITEMS.with(|arr| arr.clear_all());
    GAP.with(|arr| arr.clear_all());
    GROW.with(|arr| arr.clear_all());
    ORDER.with(|arr| arr.clear_all());
    WIDTH.with(|arr| arr.clear_all());
    HEIGHT.with(|arr| arr.clear_all());
    PADDING.with(|arr| arr.clear_all());
}

// =============================================================================
// Accessors
// =============================================================================

pub fn get_flex_direction(index: usize) -> FlexDirection {
    FLEX_DIRECTION.with(|arr| arr.get(index))
}

pub fn set_flex_direction(index: usize, value: FlexDirection) {
    FLEX_DIRECTION.with(|arr| arr.set_value(index, value));
}

pub fn get_justify_content(index: usize) -> JustifyContent {
    JUSTIFY_CONTENT.with(|arr| arr.get(index))
}

pub fn set_justify_content(index: usize, value: JustifyContent) {
    JUSTIFY_CONTENT.with(|arr| arr.set_value(index, value));
}

pub fn get_align_items(index: usize) -> AlignItems {
    ALIGN_ITEMS.with(|arr| arr.get(index))
}

pub fn set_align_items(index: usize, value: AlignItems) {
    ALIGN_ITEMS.with(|arr| arr.set_value(index, value));
}

pub fn get_gap(index: usize) -> u16 {
    GAP.with(|arr| arr.get(index))
}

pub fn set_gap(index: usize, value: u16) {
    GAP.with(|arr| arr.set_value(index, value));
}

pub fn get_grow(index: usize) -> f32 {
    GROW.with(|arr| arr.get(index))
}

pub fn set_grow(index: usize, value: f32) {
    GROW.with(|arr| arr.set_value(index, value));
}

/// Sibling order (lower first, ties broken by index).
pub fn get_order(index: usize) -> i32 {
    ORDER.with(|arr| arr.get(index))
}

pub fn set_order(index: usize, value: i32) {
    ORDER.with(|arr| arr.set_value(index, value));
}

pub fn get_width(index: usize) -> Dimension {
    WIDTH.with(|arr| arr.get(index))
}

pub fn set_width(index: usize, value: Dimension) {
    WIDTH.with(|arr| arr.set_value(index, value));
}

/// Bind width to a getter (signal-backed props).
pub fn set_width_getter(index: usize, getter: impl Fn() -> Dimension + 'static) {
    WIDTH.with(|arr| arr.set_getter(index, getter));
}

pub fn get_height(index: usize) -> Dimension {
    HEIGHT.with(|arr| arr.get(index))
}

pub fn set_height(index: usize, value: Dimension) {
    HEIGHT.with(|arr| arr.set_value(index, value));
}

/// Bind height to a getter (signal-backed props).
pub fn set_height_getter(index: usize, getter: impl Fn() -> Dimension + 'static) {
    HEIGHT.with(|arr| arr.set_getter(index, getter));
}

pub fn get_padding(index: usize) -> Spacing {
    PADDING.with(|arr| arr.get(index))
}

pub fn set_padding(index: usize, value: Spacing) {
    PADDING.with(|arr| arr.set_value(index, value));
}
