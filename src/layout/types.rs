//! Layout output types.

use std::collections::HashMap;

/// Computed layout for every laid-out component.
///
/// Positions are absolute (document space, before viewport scrolling).
/// Indices that were not laid out (invisible, or under an invisible parent)
/// have zero size and are absent from `children`/`roots`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedLayout {
    /// X position (column) of each component.
    pub x: Vec<u16>,

    /// Y position (row) of each component.
    pub y: Vec<u16>,

    /// Width of each component.
    pub width: Vec<u16>,

    /// Height of each component.
    pub height: Vec<u16>,

    /// Whether the index took part in this layout pass.
    pub laid_out: Vec<bool>,

    /// Children of each laid-out parent, in flex order.
    pub children: HashMap<usize, Vec<usize>>,

    /// Root components, ascending.
    pub roots: Vec<usize>,

    /// Total content width (widest root).
    pub content_width: u16,

    /// Total content height (roots stack vertically from the top).
    pub content_height: u16,
}

impl ComputedLayout {
    /// Create a new empty computed layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the position and size of a component.
    ///
    /// Returns (x, y, width, height) or zeros if index is out of bounds.
    pub fn get(&self, index: usize) -> (u16, u16, u16, u16) {
        (
            self.x.get(index).copied().unwrap_or(0),
            self.y.get(index).copied().unwrap_or(0),
            self.width.get(index).copied().unwrap_or(0),
            self.height.get(index).copied().unwrap_or(0),
        )
    }

    /// Whether the index was part of this layout.
    pub fn is_laid_out(&self, index: usize) -> bool {
        self.laid_out.get(index).copied().unwrap_or(false)
    }

    /// Children of `index` in flex order.
    pub fn children_of(&self, index: usize) -> &[usize] {
        self.children.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }
}
