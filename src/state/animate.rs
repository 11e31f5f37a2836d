//! Animation System - Spring-driven enter, exit and layout transitions
//!
//! Each animated component index owns three springs that write into the
//! visual arrays every step:
//!
//! - **scale** → `visual::set_scale`
//! - **opacity** → `visual::set_opacity`
//! - **offset** → `visual::set_offset_y` (layout projection)
//!
//! Springs are integrated against the virtual clock's frame delta
//! ([`step_animations`]), so tests can drive them exactly.
//!
//! # Pattern
//!
//! - [`animate_enter`]: scale/opacity 0 → 1
//! - [`animate_exit`]: scale/opacity → 0, then run a completion callback
//! - [`track_layout`] + [`project_layout`]: when a component's laid-out
//!   position changes, it starts at its old visual position and springs to
//!   the new one
//! - Releasing a component cancels its animation (no callback runs)

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::arrays::visual;
use crate::engine::on_destroy;
use crate::layout::ComputedLayout;

// =============================================================================
// SPRING
// =============================================================================

/// Damped spring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl Spring {
    /// Spring used for list item reveal, exit and layout moves.
    pub const REVEAL: Self = Self {
        stiffness: 350.0,
        damping: 40.0,
        mass: 1.0,
    };
}

impl Default for Spring {
    fn default() -> Self {
        Self::REVEAL
    }
}

/// Largest integration step, in seconds.
const MAX_SUBSTEP: f32 = 1.0 / 240.0;

/// Distance from target below which a spring may rest.
const REST_DELTA: f32 = 0.01;

/// Speed below which a spring may rest.
const REST_SPEED: f32 = 0.01;

/// One animated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringState {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
}

impl SpringState {
    /// A spring resting at `value`.
    pub const fn at_rest(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    /// Integrate for `dt` seconds (semi-implicit Euler, fixed substeps).
    ///
    /// Snaps to the target once both distance and speed are within the
    /// rest thresholds.
    pub fn step(&mut self, spring: &Spring, dt: f32) {
        if self.is_settled() {
            return;
        }

        let mass = spring.mass.max(f32::EPSILON);
        let mut remaining = dt.max(0.0);
        while remaining > 0.0 {
            let h = remaining.min(MAX_SUBSTEP);
            let force =
                -spring.stiffness * (self.value - self.target) - spring.damping * self.velocity;
            self.velocity += force / mass * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if (self.value - self.target).abs() < REST_DELTA && self.velocity.abs() < REST_SPEED {
            *self = Self::at_rest(self.target);
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

struct Animation {
    spring: Spring,
    scale: SpringState,
    opacity: SpringState,
    offset: SpringState,
    tracks_layout: bool,
    last_y: Option<u16>,
    on_exit: Option<Box<dyn FnOnce()>>,
}

impl Animation {
    fn new(index: usize, spring: Spring) -> Self {
        Self {
            spring,
            scale: SpringState::at_rest(visual::get_scale(index)),
            opacity: SpringState::at_rest(visual::get_opacity(index)),
            offset: SpringState::at_rest(visual::get_offset_y(index)),
            tracks_layout: false,
            last_y: None,
            on_exit: None,
        }
    }

    fn is_settled(&self) -> bool {
        self.scale.is_settled() && self.opacity.is_settled() && self.offset.is_settled()
    }
}

thread_local! {
    static ANIMATIONS: RefCell<HashMap<usize, Animation>> = RefCell::new(HashMap::new());
}

/// Run `f` on the animation for `index`, creating it if needed.
fn with_animation<R>(index: usize, spring: Spring, f: impl FnOnce(&mut Animation) -> R) -> R {
    let (created, result) = ANIMATIONS.with(|animations| {
        let mut animations = animations.borrow_mut();
        let created = !animations.contains_key(&index);
        let animation = animations
            .entry(index)
            .or_insert_with(|| Animation::new(index, spring));
        animation.spring = spring;
        (created, f(animation))
    });
    if created {
        on_destroy(index, move || cancel_animation(index));
    }
    result
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Start an enter transition: scale and opacity from 0 to 1.
pub fn animate_enter(index: usize, spring: Spring) {
    visual::set_scale(index, 0.0);
    visual::set_opacity(index, 0.0);
    with_animation(index, spring, |animation| {
        animation.scale = SpringState { target: 1.0, ..SpringState::at_rest(0.0) };
        animation.opacity = SpringState { target: 1.0, ..SpringState::at_rest(0.0) };
    });
}

/// Start an exit transition from the current visual state to scale and
/// opacity 0. `on_complete` runs from [`step_animations`] once both settle.
///
/// A later `animate_exit` replaces the pending callback.
pub fn animate_exit(index: usize, spring: Spring, on_complete: impl FnOnce() + 'static) {
    with_animation(index, spring, |animation| {
        animation.scale.target = 0.0;
        animation.opacity.target = 0.0;
        animation.on_exit = Some(Box::new(on_complete));
    });
}

/// Animate changes in the laid-out position of `index`.
pub fn track_layout(index: usize, spring: Spring) {
    with_animation(index, spring, |animation| {
        animation.tracks_layout = true;
    });
}

/// Feed a fresh layout to every tracked component.
///
/// A component whose row changed keeps its previous visual position (the
/// offset absorbs the jump) and springs back to offset 0.
pub fn project_layout(layout: &ComputedLayout) {
    ANIMATIONS.with(|animations| {
        for (&index, animation) in animations.borrow_mut().iter_mut() {
            if !animation.tracks_layout || !layout.is_laid_out(index) {
                continue;
            }
            let y = layout.y[index];
            if let Some(prev) = animation.last_y {
                if prev != y {
                    animation.offset.value += prev as f32 - y as f32;
                    animation.offset.target = 0.0;
                    visual::set_offset_y(index, animation.offset.value);
                }
            }
            animation.last_y = Some(y);
        }
    });
}

/// Advance every animation by `dt` and write the results to the visual
/// arrays. Completed exits run their callbacks after the registry is
/// released, so callbacks may release components.
pub fn step_animations(dt: Duration) {
    let dt = dt.as_secs_f32();

    let finished: Vec<Box<dyn FnOnce()>> = ANIMATIONS.with(|animations| {
        let mut animations = animations.borrow_mut();
        let mut finished = Vec::new();
        let mut done = Vec::new();

        for (&index, animation) in animations.iter_mut() {
            let spring = animation.spring;
            animation.scale.step(&spring, dt);
            animation.opacity.step(&spring, dt);
            animation.offset.step(&spring, dt);

            visual::set_scale(index, animation.scale.value);
            visual::set_opacity(index, animation.opacity.value);
            visual::set_offset_y(index, animation.offset.value);

            if !animation.is_settled() {
                continue;
            }
            if let Some(callback) = animation.on_exit.take() {
                finished.push(callback);
                done.push(index);
            } else if !animation.tracks_layout {
                done.push(index);
            }
        }

        for index in done {
            animations.remove(&index);
        }
        finished
    });

    for callback in finished {
        callback();
    }
}

/// Drop the animation for `index` without running its exit callback.
pub fn cancel_animation(index: usize) {
    // The removed entry (and its callback) drops outside the borrow
    let removed = ANIMATIONS.with(|animations| animations.borrow_mut().remove(&index));
    drop(removed);
}

/// Whether `index` has an unsettled animation or a pending exit.
pub fn is_animating(index: usize) -> bool {
    ANIMATIONS.with(|animations| {
        animations
            .borrow()
            .get(&index)
            .is_some_and(|a| !a.is_settled() || a.on_exit.is_some())
    })
}

/// Whether any animation is in flight.
pub fn any_animating() -> bool {
    ANIMATIONS.with(|animations| {
        animations
            .borrow()
            .values()
            .any(|a| !a.is_settled() || a.on_exit.is_some())
    })
}

/// Reset all animation state (for testing).
pub fn reset_animations() {
    let all = ANIMATIONS.with(|animations| std::mem::take(&mut *animations.borrow_mut()));
    drop(all);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, release_index, reset_registry};
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() -> usize {
        reset_registry();
        reset_animations();
        allocate_index(None)
    }

    fn run_for(ms: u64) {
        for _ in 0..ms / 16 {
            step_animations(Duration::from_millis(16));
        }
    }

    #[test]
    fn test_spring_settles_within_a_second() {
        let mut state = SpringState { target: 1.0, ..SpringState::at_rest(0.0) };
        for _ in 0..60 {
            state.step(&Spring::REVEAL, 1.0 / 60.0);
        }
        assert!(state.is_settled());
        assert_eq!(state.value, 1.0);
    }

    #[test]
    fn test_spring_does_not_overshoot_much() {
        let mut state = SpringState { target: 1.0, ..SpringState::at_rest(0.0) };
        let mut peak: f32 = 0.0;
        for _ in 0..120 {
            state.step(&Spring::REVEAL, 1.0 / 120.0);
            peak = peak.max(state.value);
        }
        assert!(peak <= 1.01, "peak {peak}");
    }

    #[test]
    fn test_enter_starts_hidden_and_reaches_full() {
        let idx = setup();

        animate_enter(idx, Spring::REVEAL);
        assert_eq!(visual::get_scale(idx), 0.0);
        assert_eq!(visual::get_opacity(idx), 0.0);
        assert!(is_animating(idx));

        step_animations(Duration::from_millis(50));
        let mid = visual::get_scale(idx);
        assert!(mid > 0.0 && mid < 1.0);

        run_for(1000);
        assert_eq!(visual::get_scale(idx), 1.0);
        assert_eq!(visual::get_opacity(idx), 1.0);
        assert!(!is_animating(idx));
    }

    #[test]
    fn test_exit_runs_callback_once_settled() {
        let idx = setup();
        let done = Rc::new(Cell::new(false));
        let d = done.clone();

        animate_exit(idx, Spring::REVEAL, move || d.set(true));
        step_animations(Duration::from_millis(16));
        assert!(!done.get());

        run_for(1000);
        assert!(done.get());
        assert_eq!(visual::get_opacity(idx), 0.0);
        assert!(!any_animating());
    }

    #[test]
    fn test_release_cancels_exit() {
        let idx = setup();
        let done = Rc::new(Cell::new(false));
        let d = done.clone();

        animate_exit(idx, Spring::REVEAL, move || d.set(true));
        release_index(idx);
        run_for(1000);

        assert!(!done.get());
        assert!(!any_animating());
    }

    #[test]
    fn test_layout_projection_springs_back() {
        let idx = setup();
        track_layout(idx, Spring::REVEAL);

        let mut layout = ComputedLayout::new();
        layout.x = vec![0];
        layout.y = vec![10];
        layout.width = vec![10];
        layout.height = vec![2];
        layout.laid_out = vec![true];
        project_layout(&layout);
        assert_eq!(visual::get_offset_y(idx), 0.0);

        // Moved up by three rows: starts three rows lower visually
        layout.y[0] = 7;
        project_layout(&layout);
        assert_eq!(visual::get_offset_y(idx), 3.0);

        run_for(1000);
        assert_eq!(visual::get_offset_y(idx), 0.0);
    }
}
