//! Reveal List - Children appear one at a time once the list scrolls into view.
//!
//! # Behavior
//!
//! 1. On mount the container starts observing its own intersection with the
//!    viewport (grown by `root_margin`), once.
//! 2. The first time it intersects, the list becomes "in view" for good and
//!    a repeating timer is armed at `delay`.
//! 3. Every tick takes the next unrevealed child (position = revealed count)
//!    and prepends it to the revealed list. When every child is revealed, or
//!    a tick finds nothing left, the list is complete and no timer stays armed.
//! 4. Revealed children render through keyed [`each`], each wrapped in a
//!    [`reveal_item`]. The container is `flex-col-reverse`, so the newest
//!    child (first in data order) sits at the bottom.
//!
//! # Timer ownership
//!
//! The timer lives in an [`IntervalHandle`]. An effect re-runs
//! [`restart_reveal`] whenever the visibility flag, phase, delay, children or
//! revealed count change; it always drops the previous handle before arming
//! a new one, so there is never more than one live timer per list.
//! Unmounting stops the effect scope, which drops the handle, then runs
//! the item cleanups and releases the container.
//!
//! # Example
//!
//! ```ignore
//! use spark_reveal::primitives::{reveal_list, RevealChild, RevealChildren, RevealListProps, RevealState};
//!
//! let state = RevealState::new();
//! let cleanup = reveal_list(RevealListProps {
//!     class: "w-full px-4".into(),
//!     children: RevealChildren::new(notifications.iter().map(notification_card)).into(),
//!     delay: Duration::from_millis(600).into(),
//!     state: Some(state.clone()),
//!     ..Default::default()
//! });
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use spark_signals::{effect, effect_scope, on_scope_dispose};

use crate::engine::arrays::core;
use crate::engine::{allocate_index, get_current_parent_index, release_index, with_parent_context};
use crate::state::animate::Spring;
use crate::state::clock::{self, IntervalHandle};
use crate::state::intersection::{observe, ObserverOptions};
use crate::types::ComponentType;

use super::class_list::apply_class_list;
use super::control_flow::each;
use super::reveal_item::reveal_item;
use super::types::{
    Cleanup, RevealChild, RevealChildren, RevealConfig, RevealItemProps, RevealListProps, RevealPhase,
    RevealState,
};

/// Shared state of one mounted reveal list.
struct RevealContext {
    index: usize,
    state: RevealState,
    children: Rc<dyn Fn() -> RevealChildren>,
    delay: Rc<dyn Fn() -> Duration>,
    timer: RefCell<Option<IntervalHandle>>,
}

/// Create a reveal list.
///
/// Returns a cleanup that cancels any pending reveal, stops observation and
/// releases the container with all its items.
pub fn reveal_list(props: RevealListProps) -> Cleanup {
    let RevealListProps {
        id,
        class,
        children,
        delay,
        root_margin,
        spring,
        state,
    } = props;

    // 1. CONTAINER
    let index = allocate_index(id.as_deref());
    core::set_component_type(index, ComponentType::Box);
    core::set_parent_index(index, get_current_parent_index());
    let classes = if class.trim().is_empty() {
        RevealConfig::CONTAINER_CLASSES.to_string()
    } else {
        format!("{} {}", RevealConfig::CONTAINER_CLASSES, class)
    };
    apply_class_list(index, &classes);

    let ctx = Rc::new(RevealContext {
        index,
        state: state.unwrap_or_default(),
        children: children.into_getter(),
        delay: delay.into_getter(),
        timer: RefCell::new(None),
    });

    let scope = effect_scope(false);
    let ctx_scope = ctx.clone();

    scope.run(move || {
        let ctx = ctx_scope;

        // 2. OBSERVE - once, with the configured margin
        ctx.state.phase.set(RevealPhase::Observing);
        let ctx_observer = ctx.clone();
        let observer = observe(
            index,
            ObserverOptions {
                root_margin,
                once: true,
            },
            move |visible| {
                if visible {
                    enter_view(&ctx_observer);
                }
            },
        );
        let observer = RefCell::new(Some(observer));
        on_scope_dispose(move || {
            observer.borrow_mut().take();
        });

        // 3. TIMER - re-armed whenever its inputs change
        let ctx_effect = ctx.clone();
        let _effect_cleanup = effect(move || restart_reveal(&ctx_effect));

        let ctx_dispose = ctx.clone();
        on_scope_dispose(move || {
            ctx_dispose.timer.borrow_mut().take();
        });
    });

    // 4. ITEMS - outside the scope: unmount orders their cleanup explicitly
    let revealed = ctx.state.revealed.clone();
    let items = with_parent_context(Some(index), || {
        each(
            move || revealed.get(),
            move |get_child, _key| render_item(get_child(), spring),
            |child| child.key().to_string(),
        )
    });

    Box::new(move || {
        scope.stop();
        items();
        release_index(ctx.index);
        tracing::debug!(index = ctx.index, revealed = ctx.state.revealed_count(), "reveal list unmounted");
    })
}

fn render_item(child: RevealChild, spring: Spring) -> Cleanup {
    // Earlier children sort later: the newest reveal is first in flex order
    let order = -(child.position().min(i32::MAX as usize) as i32);
    reveal_item(RevealItemProps {
        child,
        order,
        spring,
    })
}

/// First intersection: mark in view and pick the next phase.
fn enter_view(ctx: &RevealContext) {
    let total = (ctx.children)().len();
    tracing::trace!(index = ctx.index, total, "reveal list entered view");

    if ctx.state.phase.get() == RevealPhase::Observing {
        let next = if total == 0 {
            RevealPhase::Complete
        } else {
            RevealPhase::Revealing
        };
        ctx.state.phase.set(next);
    }
    ctx.state.in_view.set(true);
}

/// Drop the pending timer and arm a new one while the list is revealing.
/// Runs inside an effect, so every signal read here is tracked.
///
/// The tick itself decides whether anything is left: children replaced by a
/// shorter sequence complete the list on the next tick.
fn restart_reveal(ctx: &Rc<RevealContext>) {
    let in_view = ctx.state.in_view.get();
    let phase = ctx.state.phase.get();
    let revealed = ctx.state.revealed.get().len();
    let total = (ctx.children)().len();
    let delay = (ctx.delay)();

    // Old timer goes first: at most one live timer
    ctx.timer.borrow_mut().take();

    if !in_view || phase == RevealPhase::Complete {
        return;
    }

    if delay < clock::MIN_INTERVAL {
        tracing::debug!(?delay, "reveal delay below timer granularity, clamping");
    }

    let weak: Weak<RevealContext> = Rc::downgrade(ctx);
    let handle = clock::set_interval(delay, move || {
        if let Some(ctx) = weak.upgrade() {
            reveal_next(&ctx);
        }
    });
    tracing::debug!(index = ctx.index, ?delay, revealed, total, "reveal timer armed");
    *ctx.timer.borrow_mut() = Some(handle);
}

/// Timer tick: prepend the next child, or finish.
fn reveal_next(ctx: &RevealContext) {
    let children = (ctx.children)();
    let mut revealed = ctx.state.revealed.get();
    let count = revealed.len();

    let Some(next) = children.get(count).cloned() else {
        ctx.state.phase.set(RevealPhase::Complete);
        ctx.timer.borrow_mut().take();
        return;
    };

    tracing::debug!(index = ctx.index, key = next.key(), count = count + 1, "revealing child");
    revealed.insert(0, next);
    let done = revealed.len() >= children.len();

    if done {
        ctx.state.phase.set(RevealPhase::Complete);
    }
    ctx.state.revealed.set(revealed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{get_allocated_count, get_children, reset_registry};
    use crate::layout::compute_layout;
    use crate::state::animate::reset_animations;
    use crate::state::clock::{active_timer_count, advance, reset_clock};
    use crate::state::intersection::{reset_observers, update_intersections};
    use crate::state::scroll::{reset_scroll, set_viewport_size, viewport};

    fn setup() {
        reset_registry();
        reset_clock();
        reset_observers();
        reset_animations();
        reset_scroll();
        set_viewport_size(40, 10);
    }

    fn child() -> RevealChild {
        RevealChild::new(|| {
            let index = allocate_index(None);
            core::set_component_type(index, ComponentType::Box);
            core::set_parent_index(index, get_current_parent_index());
            crate::engine::arrays::layout::set_height(index, crate::types::Dimension::Cells(1));
            Box::new(move || release_index(index))
        })
    }

    fn children(n: usize) -> RevealChildren {
        RevealChildren::new((0..n).map(|_| child()))
    }

    fn observe_frame() {
        let layout = compute_layout(viewport().width);
        update_intersections(&layout, viewport());
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_nothing_happens_before_view() {
        setup();
        let state = RevealState::new();
        let _cleanup = reveal_list(RevealListProps {
            children: children(3).into(),
            delay: ms(100).into(),
            state: Some(state.clone()),
            ..Default::default()
        });

        assert_eq!(state.phase(), RevealPhase::Observing);
        advance(ms(1000));
        assert_eq!(state.revealed_count(), 0);
        assert_eq!(active_timer_count(), 0);
    }

    #[test]
    fn test_reveals_one_per_tick_newest_first() {
        setup();
        let state = RevealState::new();
        let _cleanup = reveal_list(RevealListProps {
            children: children(3).into(),
            delay: ms(100).into(),
            state: Some(state.clone()),
            ..Default::default()
        });

        observe_frame();
        assert!(state.in_view());
        assert_eq!(state.phase(), RevealPhase::Revealing);
        assert_eq!(state.revealed_count(), 0);

        advance(ms(100));
        assert_eq!(state.revealed_keys(), vec![".0"]);
        advance(ms(100));
        assert_eq!(state.revealed_keys(), vec![".1", ".0"]);
        advance(ms(100));
        assert_eq!(state.revealed_keys(), vec![".2", ".1", ".0"]);
        assert_eq!(state.phase(), RevealPhase::Complete);
        assert_eq!(active_timer_count(), 0);

        advance(ms(100));
        assert_eq!(state.revealed_count(), 3);
    }

    #[test]
    fn test_empty_children_complete_at_first_sight() {
        setup();
        let state = RevealState::new();
        let _cleanup = reveal_list(RevealListProps {
            state: Some(state.clone()),
            ..Default::default()
        });

        observe_frame();
        assert_eq!(state.phase(), RevealPhase::Complete);
        assert_eq!(active_timer_count(), 0);
        assert_eq!(get_allocated_count(), 1);
    }

    #[test]
    fn test_unmount_cancels_timer() {
        setup();
        let state = RevealState::new();
        let cleanup = reveal_list(RevealListProps {
            children: children(3).into(),
            delay: ms(100).into(),
            state: Some(state.clone()),
            ..Default::default()
        });

        observe_frame();
        advance(ms(100));
        assert_eq!(active_timer_count(), 1);

        cleanup();
        assert_eq!(active_timer_count(), 0);
        assert_eq!(get_allocated_count(), 0);

        advance(ms(1000));
        assert_eq!(state.revealed_count(), 1);
    }

    #[test]
    fn test_items_mount_under_container() {
        setup();
        let state = RevealState::new();
        let _cleanup = reveal_list(RevealListProps {
            children: children(2).into(),
            delay: ms(50).into(),
            state: Some(state.clone()),
            ..Default::default()
        });

        observe_frame();
        advance(ms(100));
        // Container + 2 items + 2 child boxes
        assert_eq!(get_allocated_count(), 5);
        assert_eq!(get_children(0).len(), 2);
    }

    #[test]
    fn test_zero_delay_is_clamped() {
        setup();
        let state = RevealState::new();
        let _cleanup = reveal_list(RevealListProps {
            children: children(5).into(),
            delay: Duration::ZERO.into(),
            state: Some(state.clone()),
            ..Default::default()
        });

        observe_frame();
        advance(ms(3));
        assert_eq!(state.revealed_count(), 3);
    }
}
