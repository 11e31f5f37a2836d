//! Intersection Observation - Viewport visibility with a root margin
//!
//! Components register an observer on their index. After each layout pass,
//! [`update_intersections`] compares every observed component's rows against
//! the viewport grown by the observer's root margin and notifies on change.
//!
//! - Positive margin: the component counts as visible before it scrolls in
//! - Negative margin: it must be that far inside the viewport
//! - `once`: the observer detaches after its first positive notification
//!
//! Observers start out "not intersecting"; the first notification is the
//! first transition to intersecting.

use std::cell::RefCell;
use std::rc::Rc;

use super::scroll::Viewport;
use crate::layout::ComputedLayout;

/// Observer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObserverOptions {
    /// Rows added above and below the viewport (negative shrinks it).
    pub root_margin: i32,
    /// Stop observing after the first time the component is in view.
    pub once: bool,
}

/// Identifier of a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Observer {
    id: ObserverId,
    index: usize,
    options: ObserverOptions,
    callback: Rc<dyn Fn(bool)>,
    intersecting: bool,
}

#[derive(Default)]
struct ObserverRegistry {
    next_id: u64,
    observers: Vec<Observer>,
}

thread_local! {
    static OBSERVERS: RefCell<ObserverRegistry> = RefCell::new(ObserverRegistry::default());
}

/// Owner of an observer registration. Dropping it stops observation.
#[derive(Debug)]
#[must_use = "dropping the handle stops observation"]
pub struct ObserverHandle {
    id: ObserverId,
}

impl ObserverHandle {
    pub fn id(&self) -> ObserverId {
        self.id
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        unobserve(self.id);
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Observe the component at `index`. `callback` receives the new
/// intersecting state on every change.
pub fn observe(
    index: usize,
    options: ObserverOptions,
    callback: impl Fn(bool) + 'static,
) -> ObserverHandle {
    OBSERVERS.with(|registry| {
        let mut registry = registry.borrow_mut();
        let id = ObserverId(registry.next_id);
        registry.next_id += 1;
        registry.observers.push(Observer {
            id,
            index,
            options,
            callback: Rc::new(callback),
            intersecting: false,
        });
        ObserverHandle { id }
    })
}

/// Stop an observer. Unknown ids are ignored.
pub fn unobserve(id: ObserverId) {
    let _ = OBSERVERS.try_with(|registry| {
        if let Ok(mut registry) = registry.try_borrow_mut() {
            registry.observers.retain(|o| o.id != id);
        }
    });
}

/// Whether the rows of `index` overlap the viewport grown by `root_margin`.
///
/// A zero-height component counts as a single row boundary at its `y`.
pub fn intersects(layout: &ComputedLayout, index: usize, viewport: Viewport, root_margin: i32) -> bool {
    if !layout.is_laid_out(index) {
        return false;
    }
    let (top, bottom) = viewport.visible_rows();
    let top = top.saturating_sub(root_margin);
    let bottom = bottom.saturating_add(root_margin);
    if bottom <= top {
        return false;
    }

    let y = layout.y[index] as i32;
    let height = layout.height[index] as i32;
    if height == 0 {
        y >= top && y < bottom
    } else {
        y < bottom && y + height > top
    }
}

/// Re-evaluate every observer and notify those whose state changed.
///
/// Callbacks run after the registry is released, in registration order.
pub fn update_intersections(layout: &ComputedLayout, viewport: Viewport) {
    let notifications: Vec<(Rc<dyn Fn(bool)>, bool)> = OBSERVERS.with(|registry| {
        let mut registry = registry.borrow_mut();
        let mut notifications = Vec::new();

        registry.observers.retain_mut(|observer| {
            let now = intersects(layout, observer.index, viewport, observer.options.root_margin);
            if now == observer.intersecting {
                return true;
            }
            observer.intersecting = now;
            notifications.push((observer.callback.clone(), now));
            !(now && observer.options.once)
        });

        notifications
    });

    for (callback, intersecting) in notifications {
        callback(intersecting);
    }
}

/// Number of registered observers.
pub fn observer_count() -> usize {
    OBSERVERS.with(|registry| registry.borrow().observers.len())
}

/// Drop every observer (for testing).
pub fn reset_observers() {
    let observers = OBSERVERS.with(|registry| std::mem::take(&mut registry.borrow_mut().observers));
    drop(observers);
}
