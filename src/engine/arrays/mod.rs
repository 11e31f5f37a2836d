//! Parallel Arrays
//!
//! All component state lives in these parallel arrays.
//! Each array index corresponds to one component.
//!
//! Components write directly to these arrays using `set_value()` or
//! `set_getter()`. The frame pipeline reads them with `get()`, which calls
//! getters, so signal-backed props stay live without re-binding.
//!
//! # Array Categories
//!
//! - **core**: Component type, parent, visibility
//! - **layout**: Flex container/item properties, sizes, spacing, order
//! - **visual**: Colors, opacity, scale, layout offset
//! - **text**: Text content and attributes

pub mod core;
pub mod layout;
pub mod text;
pub mod visual;

use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// SlotArray - one column of component state
// =============================================================================

/// A single cell in a [`SlotArray`]: a stored value or a getter.
#[derive(Clone)]
pub enum Binding<T> {
    /// Static value.
    Value(T),
    /// Getter evaluated on every read.
    Getter(Rc<dyn Fn() -> T>),
}

/// A growable column of bindings with a default for unset indices.
pub struct SlotArray<T: Clone + 'static> {
    default: T,
    slots: RefCell<Vec<Binding<T>>>,
}

impl<T: Clone + 'static> SlotArray<T> {
    /// Create an empty array whose unset cells read as `default`.
    pub fn new(default: T) -> Self {
        Self {
            default,
            slots: RefCell::new(Vec::new()),
        }
    }

    /// Grow the array so `index` is addressable.
    pub fn ensure(&self, index: usize) {
        let mut slots = self.slots.borrow_mut();
        while slots.len() <= index {
            slots.push(Binding::Value(self.default.clone()));
        }
    }

    /// Read the value at `index`, calling the getter if one is bound.
    pub fn get(&self, index: usize) -> T {
        // Clone out of the borrow: getters may read other arrays (or this one).
        let binding = self.slots.borrow().get(index).cloned();
        match binding {
            Some(Binding::Value(v)) => v,
            Some(Binding::Getter(g)) => g(),
            None => self.default.clone(),
        }
    }

    /// Store a static value at `index`.
    pub fn set_value(&self, index: usize, value: T) {
        self.ensure(index);
        self.slots.borrow_mut()[index] = Binding::Value(value);
    }

    /// Bind a getter at `index`.
    pub fn set_getter(&self, index: usize, getter: impl Fn() -> T + 'static) {
        self.ensure(index);
        self.slots.borrow_mut()[index] = Binding::Getter(Rc::new(getter));
    }

    /// Reset `index` to the default value.
    pub fn clear(&self, index: usize) {
        if let Some(slot) = self.slots.borrow_mut().get_mut(index) {
            *slot = Binding::Value(self.default.clone());
        }
    }

    /// Drop every cell.
    pub fn clear_all(&self) {
        self.slots.borrow_mut().clear();
    }

    /// Number of addressable cells.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// True when no cell has been addressed yet.
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

/// Ensure all arrays have capacity for the given index.
///
/// Called by registry when allocating.
pub fn ensure_all_capacity(index: usize) {
    core::ensure_capacity(index);
    layout::ensure_capacity(index);
    visual::ensure_capacity(index);
    text::ensure_capacity(index);
}

/// Clear all array values at an index.
///
/// Called by registry when releasing.
pub fn clear_all_at_index(index: usize) {
    core::clear_at_index(index);
    layout::clear_at_index(index);
    visual::clear_at_index(index);
    text::clear_at_index(index);
}

/// Reset all parallel arrays to release memory.
///
/// Called automatically when all components are destroyed.
pub fn reset_all_arrays() {
    core::reset();
    layout::reset();
    visual::reset();
    text::reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_slot_array_default_and_value() {
        let arr = SlotArray::new(7u16);
        assert_eq!(arr.get(3), 7);
        assert!(arr.is_empty());

        arr.set_value(3, 42);
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.get(3), 42);
        assert_eq!(arr.get(0), 7);

        arr.clear(3);
        assert_eq!(arr.get(3), 7);
    }

    #[test]
    fn test_slot_array_getter_reads_live() {
        let source = Rc::new(Cell::new(1));
        let source_clone = source.clone();

        let arr = SlotArray::new(0);
        arr.set_getter(0, move || source_clone.get() * 10);
        assert_eq!(arr.get(0), 10);

        source.set(5);
        assert_eq!(arr.get(0), 50);
    }
}
