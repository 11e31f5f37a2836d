//! Layout Module
//!
//! Flexbox layout computation for terminal UI using Taffy.
//!
//! # Architecture
//!
//! The layout module uses [Taffy](https://github.com/DioxusLabs/taffy) for
//! W3C-compliant flexbox computation. The bridge:
//!
//! 1. Converts layout arrays → Taffy styles
//! 2. Builds the Taffy tree from parent relationships, siblings sorted by `order`
//! 3. Provides measure functions for text intrinsic sizing
//! 4. Extracts absolute positions back into [`ComputedLayout`]
//!
//! The document is laid out at the viewport width with unconstrained height;
//! scrolling is applied later by the frame pipeline.

mod taffy_bridge;
mod text_measure;
mod types;

pub use taffy_bridge::compute_layout;
pub use text_measure::*;
pub use types::*;
