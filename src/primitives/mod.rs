//! Primitives - Component building blocks.
//!
//! - [`box_primitive`] - Container with flexbox layout, class list and colors
//! - [`text`] - Text display
//! - [`each`] - Keyed list rendering
//! - [`reveal_item`] - Animated list entry (enter, exit, layout moves)
//! - [`reveal_list`] - List that reveals its children one per interval once in view
//!
//! # Architecture
//!
//! Components are indices into parallel arrays. Each component:
//! 1. Allocates an index from the registry
//! 2. Writes its props into the arrays (signals and getters stay connected)
//! 3. Renders its children with itself as the parent context
//! 4. Returns a cleanup function
//!
//! # Reactivity
//!
//! Props can be:
//! - Static values: `width: 50`
//! - Signals: `width: my_signal` (stays connected!)
//! - Getters: `width: || compute_width()`
//!
//! Pass props directly; extracting a signal's value before binding freezes it.

mod box_primitive;
mod class_list;
mod control_flow;
mod reveal_item;
mod reveal_list;
mod text;
mod types;

pub use box_primitive::box_primitive;
pub use class_list::{apply_class_list, parse_class_list, spacing_cells, ClassStyle};
pub use control_flow::each;
pub use reveal_item::reveal_item;
pub use reveal_list::reveal_list;
pub use text::text;
pub use types::*;
