//! Box Primitive - Container component with flexbox layout.
//!
//! The fundamental container component. Can have children, a class list,
//! colors and explicit layout props.
//!
//! # Reactivity
//!
//! Visibility, size and color props are bound directly to the arrays, so a
//! signal or getter stays connected after the box is created.
//!
//! # Example
//!
//! ```ignore
//! use spark_reveal::primitives::{box_primitive, text, BoxProps, TextProps};
//! use spark_signals::signal;
//!
//! let width = signal(Dimension::Cells(40));
//!
//! let cleanup = box_primitive(BoxProps {
//!     class: Some("flex-col items-center".into()),
//!     width: Some(width.clone().into()),
//!     children: Some(Box::new(|| {
//!         text(TextProps {
//!             content: "Hello!".into(),
//!             ..Default::default()
//!         });
//!     })),
//!     ..Default::default()
//! });
//!
//! // Update width - layout follows on the next frame
//! width.set(Dimension::Cells(80));
//! ```

use crate::engine::arrays::{core, layout, visual};
use crate::engine::{allocate_index, get_current_parent_index, release_index, with_parent_context};
use crate::types::ComponentType;

use super::class_list::apply_class_list;
use super::types::{BoxProps, Cleanup, PropValue};

// =============================================================================
// Helper: Bind PropValue to an array
// =============================================================================

/// Bind a PropValue to an array setter pair.
///
/// - Static values are set directly
/// - Signals and getters become array getters
macro_rules! bind_array {
    ($set:path, $set_getter:path, $index:expr, $prop:expr) => {
        match $prop {
            PropValue::Static(v) => $set($index, v),
            PropValue::Signal(s) => $set_getter($index, move || s.get()),
            PropValue::Getter(g) => $set_getter($index, move || g()),
        }
    };
}

pub(crate) use bind_array;

// =============================================================================
// Box Component
// =============================================================================

/// Create a box container component.
///
/// Returns a cleanup function that releases the box and everything under it.
pub fn box_primitive(props: BoxProps) -> Cleanup {
    // 1. ALLOCATE INDEX
    let index = allocate_index(props.id.as_deref());

    // 2. CORE SETUP - Type, parent
    core::set_component_type(index, ComponentType::Box);
    core::set_parent_index(index, get_current_parent_index());

    // 3. BIND VISIBILITY
    if let Some(visible) = props.visible {
        bind_array!(core::set_visible, core::set_visible_getter, index, visible);
    }

    // 4. CLASS LIST - explicit props below override it
    if let Some(class) = props.class.as_deref() {
        apply_class_list(index, class);
    }

    // 5. LAYOUT
    if let Some(dir) = props.flex_direction {
        layout::set_flex_direction(index, dir);
    }
    if let Some(justify) = props.justify_content {
        layout::set_justify_content(index, justify);
    }
    if let Some(align) = props.align_items {
        layout::set_align_items(index, align);
    }
    if let Some(gap) = props.gap {
        layout::set_gap(index, gap);
    }
    if let Some(padding) = props.padding {
        layout::set_padding(index, padding);
    }
    if let Some(grow) = props.grow {
        layout::set_grow(index, grow);
    }
    if let Some(order) = props.order {
        layout::set_order(index, order);
    }
    if let Some(w) = props.width {
        bind_array!(layout::set_width, layout::set_width_getter, index, w);
    }
    if let Some(h) = props.height {
        bind_array!(layout::set_height, layout::set_height_getter, index, h);
    }

    // 6. VISUAL
    if let Some(fg) = props.fg {
        bind_array!(visual::set_fg_color, visual::set_fg_color_getter, index, fg);
    }
    if let Some(bg) = props.bg {
        bind_array!(visual::set_bg_color, visual::set_bg_color_getter, index, bg);
    }

    // 7. RENDER CHILDREN
    if let Some(children) = props.children {
        with_parent_context(Some(index), children);
    }

    // 8. RETURN CLEANUP
    Box::new(move || release_index(index))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reset_registry;
    use crate::types::{AlignItems, Dimension, FlexDirection, Rgba};
    use spark_signals::signal;

    fn setup() {
        reset_registry();
    }

    #[test]
    fn test_box_creation() {
        setup();

        let cleanup = box_primitive(BoxProps {
            width: Some(PropValue::Static(Dimension::Cells(50))),
            height: Some(20.into()),
            ..Default::default()
        });

        assert_eq!(core::get_component_type(0), ComponentType::Box);
        assert_eq!(layout::get_height(0), Dimension::Cells(20));

        cleanup();
        assert_eq!(core::get_component_type(0), ComponentType::None);
    }

    #[test]
    fn test_box_with_children() {
        setup();

        let _cleanup = box_primitive(BoxProps {
            children: Some(Box::new(|| {
                let _ = box_primitive(BoxProps::default());
            })),
            ..Default::default()
        });

        assert_eq!(core::get_component_type(1), ComponentType::Box);
        assert_eq!(core::get_parent_index(1), Some(0));
    }

    #[test]
    fn test_box_reactive_width() {
        setup();

        let width = signal(Dimension::Cells(40));

        let _cleanup = box_primitive(BoxProps {
            width: Some(width.clone().into()),
            ..Default::default()
        });

        assert_eq!(layout::get_width(0), Dimension::Cells(40));
        width.set(Dimension::Cells(80));
        assert_eq!(layout::get_width(0), Dimension::Cells(80));
    }

    #[test]
    fn test_explicit_props_override_class() {
        setup();

        let _cleanup = box_primitive(BoxProps {
            class: Some("flex-col-reverse items-center bg-[#0000ff]".into()),
            flex_direction: Some(FlexDirection::Row),
            ..Default::default()
        });

        assert_eq!(layout::get_flex_direction(0), FlexDirection::Row);
        assert_eq!(layout::get_align_items(0), AlignItems::Center);
        assert_eq!(visual::get_bg_color(0), Rgba::BLUE);
    }
}
