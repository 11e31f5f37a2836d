//! Frame Pipeline
//!
//! Connects the component arrays to the screen:
//!
//! ```text
//! Component Tree → compute_layout → compose_frame → DiffRenderer
//! ```
//!
//! - [`frame`] - Paints layout and visual arrays into a FrameBuffer
//! - [`terminal`] - Raw mode and alternate screen session
//! - [`mount`] - Mounting, the frame loop and key handling

pub mod frame;
pub mod mount;
pub mod terminal;

pub use frame::{compose_frame, MIN_OPACITY};
pub use mount::{mount, mount_headless, run, tick, MountHandle, FRAME_INTERVAL};
pub use terminal::{terminal_size, TerminalSession};
