//! Reveal Item - One animated entry of a reveal list.
//!
//! Wraps a child in a full-width box that:
//! - enters with scale and opacity springing from 0 to 1, anchored at its top edge
//! - follows layout moves (siblings added above or below) with the same spring
//! - on cleanup, plays the reverse transition and only then releases itself
//!
//! If the box is released while its exit is still running (the whole list
//! unmounting), the exit is abandoned and the child is cleaned up at once.

use crate::engine::arrays::visual::{self, ScaleOrigin};
use crate::engine::arrays::{core, layout};
use crate::engine::{allocate_index, get_current_parent_index, on_destroy, release_index, with_parent_context};
use crate::state::animate;
use crate::types::ComponentType;

use super::class_list::apply_class_list;
use super::types::{Cleanup, RevealConfig, RevealItemProps};

/// Create a reveal list item around `props.child`.
///
/// Returns a cleanup that starts the exit transition.
pub fn reveal_item(props: RevealItemProps) -> Cleanup {
    let RevealItemProps { child, order, spring } = props;

    let index = allocate_index(None);
    core::set_component_type(index, ComponentType::Box);
    core::set_parent_index(index, get_current_parent_index());
    apply_class_list(index, RevealConfig::ITEM_CLASSES);
    layout::set_order(index, order);
    visual::set_scale_origin(index, ScaleOrigin::Top);

    let child_cleanup = with_parent_context(Some(index), || child.render());
    on_destroy(index, child_cleanup);

    animate::animate_enter(index, spring);
    animate::track_layout(index, spring);

    tracing::trace!(index, key = child.key(), order, "reveal item mounted");

    Box::new(move || {
        animate::animate_exit(index, spring, move || release_index(index));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{get_children, is_allocated, reset_registry};
    use crate::primitives::types::{RevealChild, RevealChildren};
    use crate::primitives::{text, TextProps};
    use crate::state::animate::{reset_animations, step_animations, Spring};
    use crate::types::Dimension;
    use std::time::Duration;

    fn setup() -> RevealChild {
        reset_registry();
        reset_animations();
        let children = RevealChildren::new([RevealChild::new(|| {
            text(TextProps {
                content: "hello".into(),
                ..Default::default()
            })
        })]);
        children.get(0).cloned().unwrap()
    }

    fn settle() {
        for _ in 0..100 {
            step_animations(Duration::from_millis(16));
        }
    }

    #[test]
    fn test_item_enters_from_zero() {
        let child = setup();

        let _cleanup = reveal_item(RevealItemProps {
            child,
            order: -2,
            spring: Spring::REVEAL,
        });

        assert_eq!(visual::get_scale(0), 0.0);
        assert_eq!(visual::get_opacity(0), 0.0);
        assert_eq!(visual::get_scale_origin(0), ScaleOrigin::Top);
        assert_eq!(layout::get_order(0), -2);
        assert_eq!(layout::get_width(0), Dimension::Percent(100.0));
        assert_eq!(get_children(0).len(), 1);

        settle();
        assert_eq!(visual::get_scale(0), 1.0);
        assert_eq!(visual::get_opacity(0), 1.0);
    }

    #[test]
    fn test_cleanup_exits_then_releases() {
        let child = setup();

        let cleanup = reveal_item(RevealItemProps {
            child,
            order: 0,
            spring: Spring::REVEAL,
        });
        settle();

        cleanup();
        assert!(is_allocated(0));
        step_animations(Duration::from_millis(16));
        assert!(visual::get_opacity(0) < 1.0);

        settle();
        assert!(!is_allocated(0));
        assert!(!is_allocated(1));
    }

    #[test]
    fn test_release_during_exit_is_immediate() {
        let child = setup();

        let cleanup = reveal_item(RevealItemProps {
            child,
            order: 0,
            spring: Spring::REVEAL,
        });
        cleanup();
        release_index(0);

        assert!(!is_allocated(0));
        assert!(!animate::any_animating());
    }
}
