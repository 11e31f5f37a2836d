//! Control Flow - Keyed list rendering.
//!
//! [`each`] renders one component per item and keeps them in sync with a
//! reactive item list.
//!
//! # Pattern: EffectScope-based Cleanup
//!
//! 1. Create an EffectScope to manage the lifetime of the list effect
//! 2. Run rendering logic inside `scope.run()`
//! 3. Register cleanup with `on_scope_dispose()`
//! 4. Return `Box::new(move || scope.stop())` as the Cleanup
//!
//! # Pattern: Parent Context Restoration
//!
//! The parent index is captured when `each()` is called and restored around
//! every render, so items created by later effect runs still attach to it.
//!
//! # Item Lifecycle
//!
//! - Items tracked by key (from `key_fn`)
//! - New keys: create signal + render component
//! - Existing keys: update signal (NO component recreation!)
//! - Removed keys: cleanup runs (the component decides how it leaves)
//! - On each() cleanup: all item cleanups run, scope stopped

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::Rc;

use spark_signals::{effect, effect_scope, on_scope_dispose, signal, Signal};

use crate::engine::{get_current_parent_index, with_parent_context};
use crate::primitives::Cleanup;

struct Entry<T: Clone + PartialEq + 'static> {
    item: Signal<T>,
    cleanup: Cleanup,
}

/// Render a list of components reactively with fine-grained updates.
///
/// # Arguments
///
/// * `items_getter` - Getter that returns the items (creates reactive dependency)
/// * `render_fn` - Function receiving (getItem getter, key) that renders one item
/// * `key_fn` - Function to extract unique key from each item
///
/// # Returns
///
/// A cleanup function that destroys all components and stops tracking.
///
/// # Example
///
/// ```ignore
/// use spark_reveal::primitives::{each, text, TextProps};
/// use spark_signals::signal;
///
/// let items = signal(vec!["apple", "banana"]);
/// let items_clone = items.clone();
///
/// let cleanup = each(
///     move || items_clone.get(),
///     |get_item, _key| {
///         text(TextProps {
///             content: PropValue::Getter(Rc::new(move || get_item().to_string())),
///             ..Default::default()
///         })
///     },
///     |item| item.to_string(),
/// );
///
/// items.set(vec!["cherry", "apple", "banana"]); // renders only "cherry"
/// cleanup();
/// ```
///
/// # Duplicate Key Handling
///
/// Duplicate keys are warned but don't crash. Only the first occurrence is tracked.
pub fn each<T, K, RenderF>(
    items_getter: impl Fn() -> Vec<T> + 'static,
    render_fn: RenderF,
    key_fn: impl Fn(&T) -> K + 'static,
) -> Cleanup
where
    T: Clone + PartialEq + 'static,
    K: Clone + Eq + Hash + std::fmt::Debug + 'static,
    RenderF: Fn(Rc<dyn Fn() -> T>, K) -> Cleanup + 'static,
{
    // Capture parent index at creation time
    let parent_index = get_current_parent_index();

    let scope = effect_scope(false);

    let entries: Rc<RefCell<HashMap<K, Entry<T>>>> = Rc::new(RefCell::new(HashMap::new()));
    let entries_effect = entries.clone();
    let entries_dispose = entries;

    scope.run(move || {
        let _effect_cleanup = effect(move || {
            let items = items_getter();
            let mut current_keys = HashSet::new();
            let mut created: Vec<(K, Entry<T>)> = Vec::new();

            with_parent_context(parent_index, || {
                for item in &items {
                    let key = key_fn(item);

                    if !current_keys.insert(key.clone()) {
                        tracing::warn!(?key, "duplicate key in each(), skipping item");
                        continue;
                    }

                    // Existing item: update its signal only
                    let existing = entries_effect.borrow().get(&key).map(|e| e.item.clone());
                    if let Some(item_signal) = existing {
                        item_signal.set(item.clone());
                        continue;
                    }

                    // New item: render without holding the entry map
                    let item_signal = signal(item.clone());
                    let reader = item_signal.clone();
                    let getter: Rc<dyn Fn() -> T> = Rc::new(move || reader.get());
                    let cleanup = render_fn(getter, key.clone());
                    created.push((
                        key,
                        Entry {
                            item: item_signal,
                            cleanup,
                        },
                    ));
                }
            });

            let removed: Vec<Entry<T>> = {
                let mut map = entries_effect.borrow_mut();
                map.extend(created);
                let stale: Vec<K> = map
                    .keys()
                    .filter(|k| !current_keys.contains(*k))
                    .cloned()
                    .collect();
                stale.into_iter().filter_map(|k| map.remove(&k)).collect()
            };

            for entry in removed {
                (entry.cleanup)();
            }
        });

        on_scope_dispose(move || {
            let drained: Vec<Entry<T>> = entries_dispose.borrow_mut().drain().map(|(_, e)| e).collect();
            for entry in drained {
                (entry.cleanup)();
            }
        });
    });

    Box::new(move || {
        scope.stop();
    })
}
