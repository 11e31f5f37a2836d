//! Mount API - Application lifecycle and the frame loop.
//!
//! This module provides the entry point for mounting a reveal application,
//! either on the real terminal or headless into an in-memory buffer.
//!
//! # Frame
//!
//! Every frame runs the same steps in order:
//!
//! ```text
//! compute_layout → scroll bounds → project_layout → intersections → compose → render
//! ```
//!
//! Time moves only through [`MountHandle::advance`]. Springs step up to each
//! timer's due time before it fires, so anything a timer mounts animates from
//! that moment rather than from the start of the step. A frame is produced
//! at the end. [`tick`] feeds it wall-clock time; tests feed it exact
//! durations.
//!
//! # Example
//!
//! ```ignore
//! use spark_reveal::pipeline::{mount, run};
//!
//! let mut handle = mount(|| reveal_list(props))?;
//! run(&mut handle)?; // Blocks until q / Ctrl+C
//! handle.unmount()?;
//! ```

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::MountError;
use crate::layout::compute_layout;
use crate::primitives::Cleanup;
use crate::renderer::{DiffRenderer, FrameBuffer};
use crate::state::{animate, clock, intersection, scroll};

use super::frame::compose_frame;
use super::terminal::{terminal_size, TerminalSession};

/// Poll timeout for one [`tick`] (~60fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Where frames go.
enum Output {
    /// Nothing is written; the last frame is kept in the handle.
    Headless,
    Terminal {
        renderer: DiffRenderer<Stdout>,
        session: TerminalSession,
    },
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`] and [`mount_headless`].
///
/// Dropping the handle unmounts the root and restores the terminal.
pub struct MountHandle {
    root_cleanup: Option<Cleanup>,
    output: Output,
    buffer: FrameBuffer,
    running: bool,
    last_tick: Instant,
}

impl MountHandle {
    fn new(output: Output, width: u16, height: u16) -> Self {
        Self {
            root_cleanup: None,
            output,
            buffer: FrameBuffer::new(width, height),
            running: true,
            last_tick: Instant::now(),
        }
    }

    /// Advance time by `dt`: fire due timers, step animations, draw a frame.
    ///
    /// Animations are stepped in slices split at each timer's due time.
    pub fn advance(&mut self, dt: Duration) -> Result<&FrameBuffer, MountError> {
        let target = clock::now() + dt;
        let mut fired = 0;

        // Timers always land at least MIN_INTERVAL ahead, so this terminates
        while let Some(due) = clock::next_due().filter(|&due| due <= target) {
            let step = due.saturating_sub(clock::now());
            animate::step_animations(step);
            fired += clock::advance(step);
        }
        let rest = target.saturating_sub(clock::now());
        animate::step_animations(rest);
        fired += clock::advance(rest);

        if fired > 0 {
            tracing::trace!(fired, now = ?clock::now(), "timers fired");
        }
        self.frame()
    }

    /// Produce a frame at the current time.
    pub fn frame(&mut self) -> Result<&FrameBuffer, MountError> {
        let layout = compute_layout(scroll::viewport().width);
        scroll::update_scroll_bounds(&layout);
        animate::project_layout(&layout);

        // Observer callbacks may arm timers or mount components; they are
        // picked up by the next frame
        let viewport = scroll::viewport();
        intersection::update_intersections(&layout, viewport);

        self.buffer = compose_frame(&layout, viewport);
        if let Output::Terminal { renderer, .. } = &mut self.output {
            renderer.render(&self.buffer)?;
        }
        Ok(&self.buffer)
    }

    /// Scroll by `delta` rows and redraw. Returns true if the offset changed.
    pub fn scroll_by(&mut self, delta: i32) -> Result<bool, MountError> {
        let changed = scroll::scroll_by(delta);
        if changed {
            self.frame()?;
        }
        Ok(changed)
    }

    /// Scroll to row `y` (clamped) and redraw.
    pub fn scroll_to(&mut self, y: u16) -> Result<(), MountError> {
        scroll::scroll_to(y);
        self.frame()?;
        Ok(())
    }

    /// Resize the viewport and redraw everything.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), MountError> {
        scroll::set_viewport_size(width, height);
        if let Output::Terminal { renderer, .. } = &mut self.output {
            renderer.invalidate();
        }
        self.frame()?;
        Ok(())
    }

    /// The last composed frame.
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ask [`run`] to return after the current tick.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Unmount the root and restore the terminal.
    pub fn unmount(mut self) -> Result<(), MountError> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<(), MountError> {
        self.running = false;
        if let Some(cleanup) = self.root_cleanup.take() {
            cleanup();
            tracing::info!("root unmounted");
        }
        if let Output::Terminal { session, .. } = &mut self.output {
            session.restore()?;
        }
        Ok(())
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            tracing::warn!(%err, "unmount failed");
        }
    }
}

// =============================================================================
// Mount Functions
// =============================================================================

/// Mount `root` fullscreen on the terminal.
///
/// Enters raw mode and the alternate screen, renders the root and draws the
/// first frame. The terminal is restored by [`MountHandle::unmount`] or when
/// the handle drops.
pub fn mount(root: impl FnOnce() -> Cleanup) -> Result<MountHandle, MountError> {
    let (width, height) = terminal_size()?;
    let session = TerminalSession::enter()?;
    let output = Output::Terminal {
        renderer: DiffRenderer::new(io::stdout()),
        session,
    };
    tracing::info!(width, height, "mounting on terminal");
    mount_with(output, width, height, root)
}

/// Mount `root` without a terminal, into a `width` x `height` buffer.
///
/// Nothing moves until the caller advances time.
pub fn mount_headless(width: u16, height: u16, root: impl FnOnce() -> Cleanup) -> MountHandle {
    tracing::debug!(width, height, "mounting headless");
    let mut handle = MountHandle::new(Output::Headless, width, height);
    scroll::set_viewport_size(width, height);
    handle.root_cleanup = Some(root());
    // Headless output cannot fail
    let _ = handle.frame();
    handle
}

fn mount_with(
    output: Output,
    width: u16,
    height: u16,
    root: impl FnOnce() -> Cleanup,
) -> Result<MountHandle, MountError> {
    let mut handle = MountHandle::new(output, width, height);
    scroll::set_viewport_size(width, height);
    handle.root_cleanup = Some(root());
    handle.frame()?;
    Ok(handle)
}

// =============================================================================
// Event Loop
// =============================================================================

/// Run the event loop once.
///
/// Waits up to [`FRAME_INTERVAL`] for input, handles it, then advances time
/// by the wall-clock time since the previous tick.
///
/// * `Ok(true)` - Continue running
/// * `Ok(false)` - Stop requested (q, Ctrl+C or [`MountHandle::stop`])
/// * `Err(e)` - Terminal I/O failed
pub fn tick(handle: &mut MountHandle) -> Result<bool, MountError> {
    if !handle.is_running() {
        return Ok(false);
    }

    if event::poll(FRAME_INTERVAL)? {
        match event::read()? {
            Event::Key(key) => handle_key(handle, key)?,
            Event::Resize(width, height) => handle.resize(width, height)?,
            _ => {}
        }
    }

    let now = Instant::now();
    let dt = now.duration_since(handle.last_tick);
    handle.last_tick = now;
    if handle.is_running() {
        handle.advance(dt)?;
    }

    Ok(handle.is_running())
}

/// Run the event loop until stopped.
pub fn run(handle: &mut MountHandle) -> Result<(), MountError> {
    handle.last_tick = Instant::now();
    while tick(handle)? {}
    Ok(())
}

fn handle_key(handle: &mut MountHandle, key: KeyEvent) -> Result<(), MountError> {
    if key.kind == KeyEventKind::Release {
        return Ok(());
    }

    let line = scroll::LINE_SCROLL as i32;
    let page = scroll::page_size() as i32;
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => handle.stop(),
        KeyCode::Char('q') | KeyCode::Esc => handle.stop(),
        KeyCode::Up | KeyCode::Char('k') => {
            handle.scroll_by(-line)?;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            handle.scroll_by(line)?;
        }
        KeyCode::PageUp => {
            handle.scroll_by(-page)?;
        }
        KeyCode::PageDown | KeyCode::Char(' ') => {
            handle.scroll_by(page)?;
        }
        KeyCode::Home => handle.scroll_to(0)?,
        KeyCode::End => handle.scroll_to(u16::MAX)?,
        _ => {}
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{get_allocated_count, reset_registry};
    use crate::primitives::{text, TextProps};

    fn setup() {
        reset_registry();
        clock::reset_clock();
        animate::reset_animations();
        intersection::reset_observers();
        scroll::reset_scroll();
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_headless_mount_draws_first_frame() {
        setup();
        let handle = mount_headless(10, 2, || {
            text(TextProps {
                content: "hello".into(),
                ..Default::default()
            })
        });

        assert_eq!(handle.buffer().row_text(0).trim_end(), "hello");
        assert_eq!(handle.buffer().width(), 10);
    }

    #[test]
    fn test_unmount_releases_root() {
        setup();
        let handle = mount_headless(10, 2, || {
            text(TextProps {
                content: "bye".into(),
                ..Default::default()
            })
        });
        assert_eq!(get_allocated_count(), 1);

        handle.unmount().unwrap();
        assert_eq!(get_allocated_count(), 0);
    }

    #[test]
    fn test_quit_keys_stop_the_loop() {
        setup();
        let mut handle = mount_headless(4, 1, || Box::new(|| {}));
        handle_key(&mut handle, key(KeyCode::Char('x'))).unwrap();
        assert!(handle.is_running());

        handle_key(&mut handle, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap();
        assert!(!handle.is_running());
        assert!(!tick(&mut handle).unwrap());
    }

    #[test]
    fn test_arrow_keys_scroll() {
        setup();
        let mut handle = mount_headless(10, 2, || {
            text(TextProps {
                content: "a\nb\nc\nd".into(),
                ..Default::default()
            })
        });

        handle_key(&mut handle, key(KeyCode::Down)).unwrap();
        assert_eq!(scroll::viewport().scroll_y, 1);
        assert_eq!(handle.buffer().row_text(0).trim_end(), "b");

        handle_key(&mut handle, key(KeyCode::End)).unwrap();
        assert_eq!(scroll::viewport().scroll_y, 2);
        handle_key(&mut handle, key(KeyCode::Home)).unwrap();
        assert_eq!(handle.buffer().row_text(0).trim_end(), "a");
    }
}
