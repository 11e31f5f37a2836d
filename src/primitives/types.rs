//! Primitive types - Props and cleanup.
//!
//! These types define the interface for component props.
//! Props support static values, signals, and getters for reactivity.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use spark_signals::{signal, Signal};

use crate::engine::arrays::layout::Spacing;
use crate::error::RevealError;
use crate::state::animate::Spring;
use crate::types::{AlignItems, Attr, Dimension, FlexDirection, JustifyContent, Rgba};

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// This enables reactive props while maintaining type safety.
/// When binding to arrays, the reactive connection is preserved.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    ///
    /// Inside an effect, signal and getter reads are tracked.
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }

    /// Convert into a shared getter closure.
    pub fn into_getter(self) -> Rc<dyn Fn() -> T> {
        match self {
            PropValue::Static(v) => Rc::new(move || v.clone()),
            PropValue::Signal(s) => Rc::new(move || s.get()),
            PropValue::Getter(f) => f,
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl From<u16> for PropValue<Dimension> {
    fn from(value: u16) -> Self {
        PropValue::Static(Dimension::from(value))
    }
}

impl From<&str> for PropValue<String> {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

// =============================================================================
// Box Props
// =============================================================================

/// Properties for the Box component.
///
/// `class` is applied first; explicit props override what it sets.
///
/// # Example
///
/// ```ignore
/// use spark_reveal::primitives::{box_primitive, BoxProps};
///
/// let cleanup = box_primitive(BoxProps {
///     class: Some("flex flex-col items-center gap-4".into()),
///     width: Some(40.into()),
///     children: Some(Box::new(|| {
///         // Child components here
///     })),
///     ..Default::default()
/// });
/// ```
#[derive(Default)]
pub struct BoxProps {
    /// Optional component ID for lookup.
    pub id: Option<String>,

    /// Utility class list (`flex-col-reverse gap-4 w-full` ...).
    pub class: Option<String>,

    /// Whether the component is visible (default: true).
    pub visible: Option<PropValue<bool>>,

    // Layout - container
    pub flex_direction: Option<FlexDirection>,
    pub justify_content: Option<JustifyContent>,
    pub align_items: Option<AlignItems>,
    /// Gap between children, in cells.
    pub gap: Option<u16>,
    pub padding: Option<Spacing>,

    // Layout - item
    pub grow: Option<f32>,
    /// Sibling order (lower first).
    pub order: Option<i32>,
    pub width: Option<PropValue<Dimension>>,
    pub height: Option<PropValue<Dimension>>,

    // Visual
    pub fg: Option<PropValue<Rgba>>,
    pub bg: Option<PropValue<Rgba>>,

    /// Children render function, called with this box as parent.
    pub children: Option<Box<dyn FnOnce()>>,
}

// =============================================================================
// Text Props
// =============================================================================

/// Properties for the Text component.
#[derive(Default)]
pub struct TextProps {
    pub id: Option<String>,
    pub visible: Option<PropValue<bool>>,

    /// The text to display.
    pub content: PropValue<String>,

    /// Bold, dim, italic ...
    pub attrs: Option<Attr>,

    pub fg: Option<PropValue<Rgba>>,
    pub bg: Option<PropValue<Rgba>>,
}

// =============================================================================
// Reveal children
// =============================================================================

/// One renderable node handed to a reveal list.
///
/// The render function creates the node's components under the current
/// parent and returns their cleanup. It may run once per reveal.
#[derive(Clone)]
pub struct RevealChild {
    explicit_key: Option<String>,
    key: String,
    position: usize,
    render: Rc<dyn Fn() -> Cleanup>,
}

impl RevealChild {
    /// A child identified by its position in the sequence.
    pub fn new(render: impl Fn() -> Cleanup + 'static) -> Self {
        Self {
            explicit_key: None,
            key: String::new(),
            position: 0,
            render: Rc::new(render),
        }
    }

    /// A child identified by a caller-chosen key.
    pub fn keyed(key: impl Into<String>, render: impl Fn() -> Cleanup + 'static) -> Self {
        Self {
            explicit_key: Some(key.into()),
            key: String::new(),
            position: 0,
            render: Rc::new(render),
        }
    }

    /// Identity key: `.{position}` or `.${key}`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Position in the sequence it was collected into.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Render this child under the current parent context.
    pub fn render(&self) -> Cleanup {
        (self.render)()
    }
}

impl PartialEq for RevealChild {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && Rc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for RevealChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealChild")
            .field("key", &self.key)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// Ordered sequence of reveal children with resolved, unique keys.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct RevealChildren {
    items: Vec<RevealChild>,
}

impl RevealChildren {
    /// Build a sequence, resolving keys.
    ///
    /// A duplicate explicit key is logged and replaced by the child's
    /// positional key.
    pub fn new(children: impl IntoIterator<Item = RevealChild>) -> Self {
        let mut seen = HashSet::new();
        let items = children
            .into_iter()
            .enumerate()
            .map(|(position, mut child)| {
                child.position = position;
                let key = resolve_key(position, child.explicit_key.as_deref());
                child.key = if seen.insert(key.clone()) {
                    key
                } else {
                    tracing::warn!(%key, position, "duplicate reveal child key, falling back to position");
                    let fallback = resolve_key(position, None);
                    seen.insert(fallback.clone());
                    fallback
                };
                child
            })
            .collect();
        Self { items }
    }

    /// Build a sequence, rejecting duplicate keys.
    pub fn try_new(children: impl IntoIterator<Item = RevealChild>) -> Result<Self, RevealError> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for (position, mut child) in children.into_iter().enumerate() {
            let key = resolve_key(position, child.explicit_key.as_deref());
            if !seen.insert(key.clone()) {
                return Err(RevealError::DuplicateKey { key });
            }
            child.key = key;
            child.position = position;
            items.push(child);
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&RevealChild> {
        self.items.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RevealChild> {
        self.items.iter()
    }
}

impl FromIterator<RevealChild> for RevealChildren {
    fn from_iter<I: IntoIterator<Item = RevealChild>>(iter: I) -> Self {
        Self::new(iter)
    }
}

fn resolve_key(position: usize, explicit: Option<&str>) -> String {
    match explicit {
        Some(key) => format!(".${key}"),
        None => format!(".{position}"),
    }
}

// =============================================================================
// Reveal list configuration and state
// =============================================================================

/// Defaults for reveal lists.
pub struct RevealConfig;

impl RevealConfig {
    /// Interval between reveals.
    pub const DELAY: Duration = Duration::from_millis(1000);
    /// Rows around the viewport that already count as "in view".
    pub const ROOT_MARGIN: i32 = 100;
    /// Container classes; the caller's class is appended.
    pub const CONTAINER_CLASSES: &'static str = "flex flex-col-reverse items-center gap-4";
    /// Item classes.
    pub const ITEM_CLASSES: &'static str = "mx-auto w-full";
    /// Item transition.
    pub const SPRING: Spring = Spring::REVEAL;
}

/// Progress of a reveal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealPhase {
    /// Not mounted yet.
    #[default]
    Unobserved,
    /// Mounted, waiting to scroll into view.
    Observing,
    /// In view, revealing one child per interval.
    Revealing,
    /// Every child is revealed. Terminal.
    Complete,
}

/// Observable handle over a reveal list's signals.
///
/// Clone it into the props to watch the list from outside.
#[derive(Clone)]
pub struct RevealState {
    pub(crate) in_view: Signal<bool>,
    pub(crate) revealed: Signal<Vec<RevealChild>>,
    pub(crate) phase: Signal<RevealPhase>,
}

impl RevealState {
    pub fn new() -> Self {
        Self {
            in_view: signal(false),
            revealed: signal(Vec::new()),
            phase: signal(RevealPhase::Unobserved),
        }
    }

    /// Whether the list has entered the viewport (never reverts).
    pub fn in_view(&self) -> bool {
        self.in_view.get()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.get().len()
    }

    /// Keys of the revealed children in display data order (newest first).
    pub fn revealed_keys(&self) -> Vec<String> {
        self.revealed.get().iter().map(|c| c.key().to_string()).collect()
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase.get()
    }
}

impl Default for RevealState {
    fn default() -> Self {
        Self::new()
    }
}

/// Properties for one reveal list item.
pub struct RevealItemProps {
    /// The wrapped child.
    pub child: RevealChild,
    /// Flex order among siblings.
    pub order: i32,
    /// Enter/exit/layout transition.
    pub spring: Spring,
}

/// Properties for the reveal list.
pub struct RevealListProps {
    pub id: Option<String>,
    /// Extra container classes, appended to the defaults.
    pub class: String,
    /// The children to reveal, in reveal order.
    pub children: PropValue<RevealChildren>,
    /// Interval between reveals.
    pub delay: PropValue<Duration>,
    /// Signed intersection margin in rows.
    pub root_margin: i32,
    /// Item enter/exit/layout transition.
    pub spring: Spring,
    /// Caller-owned state handle; a fresh one is created when absent.
    pub state: Option<RevealState>,
}

impl Default for RevealListProps {
    fn default() -> Self {
        Self {
            id: None,
            class: String::new(),
            children: PropValue::default(),
            delay: PropValue::Static(RevealConfig::DELAY),
            root_margin: RevealConfig::ROOT_MARGIN,
            spring: RevealConfig::SPRING,
            state: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> RevealChild {
        RevealChild::new(|| Box::new(|| {}))
    }

    #[test]
    fn test_positional_and_explicit_keys() {
        let children = RevealChildren::new([
            noop(),
            RevealChild::keyed("bell", || Box::new(|| {})),
            noop(),
        ]);
        let keys: Vec<&str> = children.iter().map(RevealChild::key).collect();
        assert_eq!(keys, vec![".0", ".$bell", ".2"]);
    }

    #[test]
    fn test_try_new_rejects_duplicates() {
        let result = RevealChildren::try_new([
            RevealChild::keyed("a", || Box::new(|| {})),
            RevealChild::keyed("a", || Box::new(|| {})),
        ]);
        assert_eq!(
            result.unwrap_err(),
            RevealError::DuplicateKey { key: ".$a".into() }
        );
    }

    #[test]
    fn test_new_disambiguates_duplicates() {
        let children = RevealChildren::new([
            RevealChild::keyed("a", || Box::new(|| {})),
            RevealChild::keyed("a", || Box::new(|| {})),
        ]);
        let keys: Vec<&str> = children.iter().map(RevealChild::key).collect();
        assert_eq!(keys, vec![".$a", ".1"]);
    }

    #[test]
    fn test_prop_value_getter() {
        let value = signal(3u16);
        let prop: PropValue<u16> = value.clone().into();
        let getter = prop.into_getter();
        value.set(7);
        assert_eq!(getter(), 7);
    }

    #[test]
    fn test_reveal_props_defaults() {
        let props = RevealListProps::default();
        assert_eq!(props.delay.get(), Duration::from_millis(1000));
        assert_eq!(props.root_margin, 100);
        assert_eq!(props.spring, Spring::REVEAL);
        assert!(props.children.get().is_empty());
    }
}
