//! Clock - Cooperative virtual time and interval timers
//!
//! Time only moves when [`advance`] is called. The runtime advances it by
//! real elapsed time every tick; tests advance it by exact amounts, which
//! makes every timer-driven behavior deterministic.
//!
//! # Pattern
//!
//! - [`set_interval`] returns an [`IntervalHandle`]
//! - Dropping the handle cancels the timer
//! - Due callbacks run inside [`advance`], in due-time order, with no
//!   internal borrow held (callbacks may create or cancel timers)
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use spark_reveal::state::clock;
//!
//! let handle = clock::set_interval(Duration::from_millis(100), || println!("tick"));
//! clock::advance(Duration::from_millis(250)); // prints twice
//! drop(handle);                               // cancelled
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Shortest interval period. Shorter requests are clamped up to this.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Identifier of a registered interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    period: Duration,
    next_due: Duration,
    callback: Rc<dyn Fn()>,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
}

thread_local! {
    static CLOCK: RefCell<Clock> = RefCell::new(Clock::default());
}

// =============================================================================
// INTERVAL HANDLE
// =============================================================================

/// Owner of a repeating timer. Dropping it cancels the timer.
#[derive(Debug)]
#[must_use = "dropping the handle cancels the interval"]
pub struct IntervalHandle {
    id: TimerId,
}

impl IntervalHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Whether the timer is still registered.
    pub fn is_active(&self) -> bool {
        CLOCK.with(|clock| clock.borrow().timers.iter().any(|t| t.id == self.id))
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        clear_interval(self.id);
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Register `callback` to run every `period` of virtual time.
///
/// The first run is one period from now. Periods below [`MIN_INTERVAL`] are
/// clamped.
pub fn set_interval(period: Duration, callback: impl Fn() + 'static) -> IntervalHandle {
    let period = period.max(MIN_INTERVAL);
    CLOCK.with(|clock| {
        let mut clock = clock.borrow_mut();
        let id = TimerId(clock.next_id);
        clock.next_id += 1;
        let next_due = clock.now + period;
        clock.timers.push(Timer {
            id,
            period,
            next_due,
            callback: Rc::new(callback),
        });
        IntervalHandle { id }
    })
}

/// Cancel a timer. Unknown ids are ignored.
pub fn clear_interval(id: TimerId) {
    // try_with: handles can outlive the thread-local during thread teardown
    let _ = CLOCK.try_with(|clock| {
        if let Ok(mut clock) = clock.try_borrow_mut() {
            clock.timers.retain(|t| t.id != id);
        }
    });
}

/// Current virtual time.
pub fn now() -> Duration {
    CLOCK.with(|clock| clock.borrow().now)
}

/// Due time of the earliest registered timer.
pub fn next_due() -> Option<Duration> {
    CLOCK.with(|clock| clock.borrow().timers.iter().map(|t| t.next_due).min())
}

/// Move virtual time forward by `dt`, running every timer that falls due.
///
/// A timer that falls due several times within `dt` runs once per period.
/// Returns the number of callbacks that ran.
pub fn advance(dt: Duration) -> usize {
    let target = now() + dt;
    let mut fired = 0;

    loop {
        let due = CLOCK.with(|clock| {
            let mut clock = clock.borrow_mut();
            let next = clock
                .timers
                .iter_mut()
                .filter(|t| t.next_due <= target)
                .min_by_key(|t| (t.next_due, t.id))?;
            let at = next.next_due;
            next.next_due += next.period;
            let callback = next.callback.clone();
            clock.now = at;
            Some(callback)
        });

        let Some(callback) = due else { break };
        callback();
        fired += 1;
    }

    CLOCK.with(|clock| clock.borrow_mut().now = target);
    fired
}

/// Number of registered timers.
pub fn active_timer_count() -> usize {
    CLOCK.with(|clock| clock.borrow().timers.len())
}

/// Reset time to zero and drop every timer (for testing).
pub fn reset_clock() {
    // Take the timers out first: dropping callbacks may drop handles
    let timers = CLOCK.with(|clock| {
        let mut clock = clock.borrow_mut();
        clock.now = Duration::ZERO;
        std::mem::take(&mut clock.timers)
    });
    drop(timers);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_interval_fires_each_period() {
        reset_clock();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let _handle = set_interval(ms(100), move || c.set(c.get() + 1));

        advance(ms(99));
        assert_eq!(count.get(), 0);
        advance(ms(1));
        assert_eq!(count.get(), 1);
        advance(ms(250));
        assert_eq!(count.get(), 3);
        assert_eq!(now(), ms(350));
    }

    #[test]
    fn test_drop_cancels() {
        reset_clock();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let handle = set_interval(ms(10), move || c.set(c.get() + 1));
        assert!(handle.is_active());
        assert_eq!(active_timer_count(), 1);

        drop(handle);
        assert_eq!(active_timer_count(), 0);
        advance(ms(100));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        reset_clock();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = log.clone();
        let b = log.clone();
        let _slow = set_interval(ms(30), move || a.borrow_mut().push("slow"));
        let _fast = set_interval(ms(20), move || b.borrow_mut().push("fast"));

        advance(ms(60));
        assert_eq!(*log.borrow(), vec!["fast", "slow", "fast", "slow", "fast"]);
    }

    #[test]
    fn test_callback_may_cancel_itself() {
        reset_clock();
        let slot: Rc<RefCell<Option<IntervalHandle>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0));

        let s = slot.clone();
        let c = count.clone();
        let handle = set_interval(ms(10), move || {
            c.set(c.get() + 1);
            s.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(handle);

        assert_eq!(advance(ms(100)), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(active_timer_count(), 0);
    }

    #[test]
    fn test_next_due_tracks_earliest_timer() {
        reset_clock();
        assert_eq!(next_due(), None);

        let _slow = set_interval(ms(30), || {});
        let fast = set_interval(ms(20), || {});
        assert_eq!(next_due(), Some(ms(20)));

        advance(ms(20));
        assert_eq!(next_due(), Some(ms(30)));
        drop(fast);
        advance(ms(10));
        assert_eq!(next_due(), Some(ms(60)));
    }

    #[test]
    fn test_zero_period_is_clamped() {
        reset_clock();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let _handle = set_interval(Duration::ZERO, move || c.set(c.get() + 1));

        advance(ms(5));
        assert_eq!(count.get(), 5);
    }
}
