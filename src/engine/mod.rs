//! Engine - Component registry and parallel arrays.
//!
//! The engine manages the core data structures:
//! - Registry: Index allocation, ID mapping, parent context
//! - Arrays: Parallel arrays for component state
//!
//! # Architecture
//!
//! Components are NOT objects. They are indices into parallel arrays:
//!
//! ```text
//! Index 0: Box  (parent=-,  direction=column-reverse, gap=1, ...)
//! Index 1: Box  (parent=0,  width=100%, opacity=0.4, scale=0.4, ...)
//! Index 2: Text (parent=1,  content="Payment received", ...)
//! ```

mod registry;
pub mod arrays;

pub use registry::*;
