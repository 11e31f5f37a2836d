//! State Module - Runtime state systems
//!
//! - **Clock** - Virtual time and interval timers
//! - **Animate** - Springs for enter, exit and layout transitions
//! - **Scroll** - Document viewport and scroll offset
//! - **Intersection** - Viewport visibility observers with root margin

pub mod animate;
pub mod clock;
pub mod intersection;
pub mod scroll;
