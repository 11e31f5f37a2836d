//! Text Primitive - Display text with styling and wrapping.
//!
//! A pure display component for text content. Cannot have children.
//! Content can be a static string, signal, or getter; layout measures it on
//! every frame, so changes show up without re-binding.

use crate::engine::arrays::{core, text as text_arrays, visual};
use crate::engine::{allocate_index, get_current_parent_index, release_index};
use crate::types::ComponentType;

use super::box_primitive::bind_array;
use super::types::{Cleanup, PropValue, TextProps};

/// Create a text display component.
///
/// Returns a cleanup function that releases resources when called.
pub fn text(props: TextProps) -> Cleanup {
    let index = allocate_index(props.id.as_deref());

    core::set_component_type(index, ComponentType::Text);
    core::set_parent_index(index, get_current_parent_index());

    if let Some(visible) = props.visible {
        bind_array!(core::set_visible, core::set_visible_getter, index, visible);
    }

    bind_array!(
        text_arrays::set_text_content,
        text_arrays::set_text_content_getter,
        index,
        props.content
    );

    if let Some(attrs) = props.attrs {
        text_arrays::set_text_attrs(index, attrs);
    }
    if let Some(fg) = props.fg {
        bind_array!(visual::set_fg_color, visual::set_fg_color_getter, index, fg);
    }
    if let Some(bg) = props.bg {
        bind_array!(visual::set_bg_color, visual::set_bg_color_getter, index, bg);
    }

    Box::new(move || release_index(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reset_registry;
    use crate::types::Attr;
    use spark_signals::signal;
    use std::rc::Rc;

    #[test]
    fn test_text_creation() {
        reset_registry();

        let cleanup = text(TextProps {
            content: "Hello".into(),
            attrs: Some(Attr::BOLD),
            ..Default::default()
        });

        assert_eq!(core::get_component_type(0), ComponentType::Text);
        assert_eq!(text_arrays::get_text_content(0), "Hello");
        assert_eq!(text_arrays::get_text_attrs(0), Attr::BOLD);

        cleanup();
        assert_eq!(text_arrays::get_text_content(0), "");
    }

    #[test]
    fn test_text_reactive_content() {
        reset_registry();

        let count = signal(0);
        let count_clone = count.clone();
        let _cleanup = text(TextProps {
            content: PropValue::Getter(Rc::new(move || format!("Count: {}", count_clone.get()))),
            ..Default::default()
        });

        assert_eq!(text_arrays::get_text_content(0), "Count: 0");
        count.set(42);
        assert_eq!(text_arrays::get_text_content(0), "Count: 42");
    }
}
