//! Taffy Bridge - Integration with Taffy layout engine
//!
//! Converts the layout arrays to Taffy styles, runs layout computation,
//! and extracts absolute positions back to [`ComputedLayout`].

use std::collections::HashMap;

use taffy::{
    AlignItems as TaffyAlignItems, AvailableSpace, Dimension as TaffyDimension, Display,
    FlexDirection as TaffyFlexDirection, JustifyContent as TaffyJustifyContent, LengthPercentage,
    NodeId, Rect, Size, Style, TaffyResult, TaffyTree,
};

use crate::engine::arrays::{core, layout, text};
use crate::engine::get_allocated_indices;
use crate::types::{AlignItems, ComponentType, Dimension, FlexDirection, JustifyContent};

use super::text_measure::{string_width, wrap_text};
use super::types::ComputedLayout;

// =============================================================================
// CONVERSIONS
// =============================================================================

fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Cells(n) => TaffyDimension::Length(n as f32),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

fn to_taffy_flex_direction(dir: FlexDirection) -> TaffyFlexDirection {
    match dir {
        FlexDirection::Column => TaffyFlexDirection::Column,
        FlexDirection::Row => TaffyFlexDirection::Row,
        FlexDirection::ColumnReverse => TaffyFlexDirection::ColumnReverse,
        FlexDirection::RowReverse => TaffyFlexDirection::RowReverse,
    }
}

fn to_taffy_justify_content(justify: JustifyContent) -> Option<TaffyJustifyContent> {
    Some(match justify {
        JustifyContent::FlexStart => TaffyJustifyContent::FlexStart,
        JustifyContent::Center => TaffyJustifyContent::Center,
        JustifyContent::FlexEnd => TaffyJustifyContent::FlexEnd,
        JustifyContent::SpaceBetween => TaffyJustifyContent::SpaceBetween,
        JustifyContent::SpaceAround => TaffyJustifyContent::SpaceAround,
        JustifyContent::SpaceEvenly => TaffyJustifyContent::SpaceEvenly,
    })
}

fn to_taffy_align_items(align: AlignItems) -> Option<TaffyAlignItems> {
    Some(match align {
        AlignItems::Stretch => TaffyAlignItems::Stretch,
        AlignItems::FlexStart => TaffyAlignItems::FlexStart,
        AlignItems::Center => TaffyAlignItems::Center,
        AlignItems::FlexEnd => TaffyAlignItems::FlexEnd,
    })
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

/// Build a Taffy Style from the layout arrays.
fn build_style(idx: usize) -> Style {
    let padding = layout::get_padding(idx);
    let gap = layout::get_gap(idx) as f32;

    let mut style = Style {
        display: Display::Flex,
        flex_direction: to_taffy_flex_direction(layout::get_flex_direction(idx)),
        justify_content: to_taffy_justify_content(layout::get_justify_content(idx)),
        align_items: to_taffy_align_items(layout::get_align_items(idx)),
        flex_grow: layout::get_grow(idx),
        size: Size {
            width: to_taffy_dimension(layout::get_width(idx)),
            height: to_taffy_dimension(layout::get_height(idx)),
        },
        padding: Rect {
            top: LengthPercentage::Length(padding.top as f32),
            right: LengthPercentage::Length(padding.right as f32),
            bottom: LengthPercentage::Length(padding.bottom as f32),
            left: LengthPercentage::Length(padding.left as f32),
        },
        gap: Size {
            width: LengthPercentage::Length(gap),
            height: LengthPercentage::Length(gap),
        },
        ..Default::default()
    };

    // Text sizes itself through the measure function
    if core::get_component_type(idx) == ComponentType::Text {
        style.size = Size::auto();
    }

    style
}

// =============================================================================
// TEXT MEASUREMENT
// =============================================================================

fn measure_text(
    idx: usize,
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
) -> Size<f32> {
    let content = text::get_text_content(idx);
    if content.is_empty() {
        return Size::ZERO;
    }

    let avail_width = match available_space.width {
        AvailableSpace::Definite(w) => w.max(1.0) as u16,
        AvailableSpace::MinContent => 1,
        AvailableSpace::MaxContent => u16::MAX,
    };
    let wrap_width = known_dimensions.width.map(|w| w as u16).unwrap_or(avail_width);

    let lines = wrap_text(&content, wrap_width.max(1));
    let text_width = lines.iter().map(|l| string_width(l)).max().unwrap_or(0);

    Size {
        width: known_dimensions.width.unwrap_or(text_width as f32),
        height: known_dimensions.height.unwrap_or(lines.len() as f32),
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Compute layout for all visible components.
///
/// Width is constrained to `viewport_width`; height is unconstrained so the
/// document can be taller than the viewport. Root components stack
/// vertically in index order. Invisible components and everything under
/// them are excluded.
pub fn compute_layout(viewport_width: u16) -> ComputedLayout {
    let indices = get_allocated_indices();
    if indices.is_empty() {
        return ComputedLayout::new();
    }

    match build_and_compute(&indices, viewport_width) {
        Ok(layout) => layout,
        Err(err) => {
            tracing::warn!(error = %err, "layout computation failed");
            ComputedLayout::new()
        }
    }
}

fn build_and_compute(indices: &[usize], viewport_width: u16) -> TaffyResult<ComputedLayout> {
    let array_size = indices.iter().max().copied().unwrap_or(0) + 1;
    let mut result = ComputedLayout {
        x: vec![0; array_size],
        y: vec![0; array_size],
        width: vec![0; array_size],
        height: vec![0; array_size],
        laid_out: vec![false; array_size],
        ..Default::default()
    };

    // Parent → children among visible components, in flex order
    let mut roots: Vec<usize> = Vec::new();
    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    for &idx in indices {
        if !core::get_visible(idx) {
            continue;
        }
        match core::get_parent_index(idx) {
            Some(parent) => children.entry(parent).or_default().push(idx),
            None => roots.push(idx),
        }
    }
    for siblings in children.values_mut() {
        siblings.sort_by_key(|&idx| (layout::get_order(idx), idx));
    }

    let mut tree: TaffyTree<usize> = TaffyTree::new();
    let mut index_to_node: HashMap<usize, NodeId> = HashMap::new();

    // Depth-first from the roots; children of hidden parents are never reached
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(idx) = stack.pop() {
        let style = build_style(idx);
        let node = if core::get_component_type(idx) == ComponentType::Text {
            tree.new_leaf_with_context(style, idx)?
        } else {
            tree.new_leaf(style)?
        };
        index_to_node.insert(idx, node);

        if let Some(parent) = core::get_parent_index(idx) {
            if let Some(&parent_node) = index_to_node.get(&parent) {
                tree.add_child(parent_node, node)?;
            }
        }

        if let Some(kids) = children.get(&idx) {
            stack.extend(kids.iter().rev());
        }
    }

    let available = Size {
        width: AvailableSpace::Definite(viewport_width as f32),
        height: AvailableSpace::MaxContent,
    };

    let mut measure_fn = |known_dimensions: Size<Option<f32>>,
                          available_space: Size<AvailableSpace>,
                          _node_id: NodeId,
                          context: Option<&mut usize>,
                          _style: &Style| {
        match context {
            Some(&mut idx) => measure_text(idx, known_dimensions, available_space),
            None => Size::ZERO,
        }
    };

    let mut root_y: u16 = 0;
    for &root in &roots {
        let Some(&root_node) = index_to_node.get(&root) else {
            continue;
        };
        tree.compute_layout_with_measure(root_node, available, &mut measure_fn)?;

        // Accumulate parent offsets: taffy locations are parent-relative
        let mut stack = vec![(root, 0u16, root_y)];
        while let Some((idx, origin_x, origin_y)) = stack.pop() {
            let Some(&node) = index_to_node.get(&idx) else {
                continue;
            };
            let l = tree.layout(node)?;
            let x = origin_x.saturating_add(l.location.x.max(0.0).round() as u16);
            let y = origin_y.saturating_add(l.location.y.max(0.0).round() as u16);
            result.x[idx] = x;
            result.y[idx] = y;
            result.width[idx] = l.size.width.max(0.0).round() as u16;
            result.height[idx] = l.size.height.max(0.0).round() as u16;
            result.laid_out[idx] = true;

            if let Some(kids) = children.get(&idx) {
                stack.extend(kids.iter().map(|&kid| (kid, x, y)));
            }
        }

        result.content_width = result.content_width.max(result.width[root]);
        root_y = root_y.saturating_add(result.height[root]);
    }
    result.content_height = root_y;

    // Only keep parent/child entries that made it into the tree
    children.retain(|parent, _| index_to_node.contains_key(parent));
    result.children = children;
    result.roots = roots;

    Ok(result)
}
