//! # spark-reveal
//!
//! Scroll-triggered, animated reveal lists for reactive terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity and [taffy](https://github.com/DioxusLabs/taffy)
//! for flexbox layout.
//!
//! A [`reveal_list`] waits until its container scrolls within a margin of the
//! viewport, then moves its children into view one per interval. The newest
//! child is prepended and, because the container lays out in reverse, lands
//! at the bottom; every item springs in from nothing and slides when its
//! siblings move.
//!
//! ## Architecture
//!
//! Components are indices into columnar arrays rather than objects. Each array
//! cell is a slot that can hold a static value or a getter bound to signals.
//!
//! ```text
//! Component Tree → compute_layout → intersections / springs → compose_frame → DiffRenderer
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Dimension, Rgba, Cell, ComponentType, ...)
//! - [`error`] - Error types
//! - [`engine`] - Component registry and parallel arrays
//! - [`layout`] - Taffy bridge and text measurement
//! - [`state`] - Virtual clock, springs, scroll viewport, intersection observers
//! - [`primitives`] - Box, text, keyed `each`, reveal item and reveal list
//! - [`renderer`] - Frame buffer and differential crossterm output
//! - [`pipeline`] - Frame composition, terminal session, mount and event loop
//!
//! ## Example
//!
//! ```ignore
//! use spark_reveal::*;
//!
//! let children: RevealChildren = messages
//!     .iter()
//!     .map(|msg| {
//!         let msg = msg.clone();
//!         RevealChild::keyed(msg.id.clone(), move || text(TextProps {
//!             content: msg.body.clone().into(),
//!             ..Default::default()
//!         }))
//!     })
//!     .collect();
//!
//! let mut handle = mount(move || reveal_list(RevealListProps {
//!     children: children.into(),
//!     ..Default::default()
//! }))?;
//! run(&mut handle)?;
//! handle.unmount()?;
//! ```

pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{MountError, RevealError};

pub use engine::{
    allocate_index, get_allocated_count, get_current_parent_index, get_id, get_index,
    is_allocated, on_destroy, release_index, reset_registry, with_parent_context,
};

pub use layout::{compute_layout, measure_text_height, string_width, wrap_text, ComputedLayout};

pub use renderer::{DiffRenderer, FrameBuffer};

pub use pipeline::{compose_frame, mount, mount_headless, run, tick, MountHandle};

pub use primitives::{
    box_primitive, each, reveal_item, reveal_list, text, BoxProps, Cleanup, PropValue,
    RevealChild, RevealChildren, RevealConfig, RevealItemProps, RevealListProps, RevealPhase,
    RevealState, TextProps,
};

pub use state::animate::Spring;
pub use state::intersection::{observe, ObserverHandle, ObserverOptions};
pub use state::scroll::Viewport;
