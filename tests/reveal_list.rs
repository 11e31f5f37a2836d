//! Reveal list driven end to end through a headless mount and the virtual clock.

use std::time::Duration;

use spark_reveal::engine::arrays::visual;
use spark_reveal::engine::get_children;
use spark_reveal::state::{animate, clock, intersection, scroll};
use spark_reveal::{
    box_primitive, get_allocated_count, get_index, mount_headless, reset_registry, reveal_list,
    text, with_parent_context, BoxProps, Cleanup, Dimension, MountHandle, RevealChild,
    RevealChildren, RevealError, RevealListProps, RevealPhase, RevealState, TextProps,
};
use spark_signals::signal;

const WIDTH: u16 = 20;
const HEIGHT: u16 = 10;

fn setup() {
    reset_registry();
    clock::reset_clock();
    animate::reset_animations();
    intersection::reset_observers();
    scroll::reset_scroll();
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn line(key: &str) -> RevealChild {
    let content = key.to_string();
    RevealChild::keyed(key, move || {
        text(TextProps {
            content: content.clone().into(),
            ..Default::default()
        })
    })
}

fn lines(keys: &[&str]) -> RevealChildren {
    RevealChildren::new(keys.iter().map(|key| line(key)))
}

fn list_props(children: RevealChildren, state: &RevealState) -> RevealListProps {
    RevealListProps {
        class: "w-full".to_string(),
        children: children.into(),
        delay: ms(100).into(),
        state: Some(state.clone()),
        ..Default::default()
    }
}

/// A page with a `spacer`-row box above the list.
fn page(spacer: u16, props: RevealListProps) -> impl FnOnce() -> Cleanup {
    move || {
        let page_cleanup = box_primitive(BoxProps {
            id: Some("page".to_string()),
            class: Some("flex flex-col w-full".to_string()),
            ..Default::default()
        });
        let page = get_index("page");
        let list_cleanup = with_parent_context(page, || {
            box_primitive(BoxProps {
                height: Some(Dimension::Cells(spacer).into()),
                ..Default::default()
            });
            reveal_list(props)
        });
        let cleanup: Cleanup = Box::new(move || {
            list_cleanup();
            page_cleanup();
        });
        cleanup
    }
}

fn settle(handle: &mut MountHandle) {
    for _ in 0..120 {
        handle.advance(ms(16)).unwrap();
    }
}

fn keys(state: &RevealState) -> Vec<String> {
    state.revealed_keys()
}

#[test]
fn test_reveals_newest_first_one_per_interval() {
    setup();
    let state = RevealState::new();
    let props = list_props(lines(&["A", "B", "C"]), &state);
    let mut handle = mount_headless(WIDTH, HEIGHT, move || reveal_list(props));

    // Visible from the first frame, nothing revealed yet
    assert!(state.in_view());
    assert!(keys(&state).is_empty());

    handle.advance(ms(100)).unwrap();
    assert_eq!(keys(&state), vec![".$A"]);
    handle.advance(ms(100)).unwrap();
    assert_eq!(keys(&state), vec![".$B", ".$A"]);
    handle.advance(ms(100)).unwrap();
    assert_eq!(keys(&state), vec![".$C", ".$B", ".$A"]);
    assert_eq!(state.phase(), RevealPhase::Complete);
    assert_eq!(clock::active_timer_count(), 0);

    handle.advance(ms(100)).unwrap();
    assert_eq!(keys(&state).len(), 3);
}

#[test]
fn test_nothing_reveals_until_scrolled_into_view() {
    setup();
    let state = RevealState::new();
    // Container sits 101 rows below the last visible row
    let props = list_props(lines(&["A", "B"]), &state);
    let mut handle = mount_headless(WIDTH, HEIGHT, page(HEIGHT + 100, props));

    handle.advance(ms(5000)).unwrap();
    assert!(!state.in_view());
    assert_eq!(state.phase(), RevealPhase::Observing);
    assert_eq!(state.revealed_count(), 0);
    assert_eq!(clock::active_timer_count(), 0);

    handle.scroll_by(1).unwrap();
    assert!(state.in_view());
    assert_eq!(state.revealed_count(), 0);

    handle.advance(ms(100)).unwrap();
    assert_eq!(keys(&state), vec![".$A"]);

    // Scrolling away does not pause the reveal
    handle.scroll_to(0).unwrap();
    handle.advance(ms(100)).unwrap();
    assert_eq!(keys(&state), vec![".$B", ".$A"]);
}

#[test]
fn test_default_margin_boundary() {
    setup();
    let near = RevealState::new();
    let props = list_props(lines(&["A"]), &near);
    let handle = mount_headless(WIDTH, HEIGHT, page(HEIGHT + 99, props));
    assert!(near.in_view());
    handle.unmount().unwrap();

    setup();
    let far = RevealState::new();
    let props = list_props(lines(&["A"]), &far);
    let _handle = mount_headless(WIDTH, HEIGHT, page(HEIGHT + 100, props));
    assert!(!far.in_view());
}

#[test]
fn test_negative_margin_requires_overlap() {
    setup();
    let state = RevealState::new();
    let props = RevealListProps {
        root_margin: -2,
        ..list_props(lines(&["A"]), &state)
    };
    let mut handle = mount_headless(WIDTH, HEIGHT, page(HEIGHT - 1, props));
    assert!(!state.in_view());

    handle.scroll_to(u16::MAX).unwrap();
    handle.advance(ms(100)).unwrap();
    assert!(!state.in_view());
}

#[test]
fn test_empty_children_complete_without_timer() {
    setup();
    let state = RevealState::new();
    let props = list_props(RevealChildren::default(), &state);
    let mut handle = mount_headless(WIDTH, HEIGHT, move || reveal_list(props));

    assert_eq!(state.phase(), RevealPhase::Complete);
    handle.advance(ms(1000)).unwrap();
    assert_eq!(clock::active_timer_count(), 0);
    assert_eq!(get_allocated_count(), 1);
    assert!((0..HEIGHT).all(|y| handle.buffer().row_text(y).trim().is_empty()));
}

#[test]
fn test_single_child_reveals_once() {
    setup();
    let state = RevealState::new();
    let props = list_props(lines(&["only"]), &state);
    let mut handle = mount_headless(WIDTH, HEIGHT, move || reveal_list(props));

    handle.advance(ms(99)).unwrap();
    assert_eq!(state.revealed_count(), 0);
    handle.advance(ms(1)).unwrap();
    assert_eq!(state.revealed_count(), 1);
    assert_eq!(state.phase(), RevealPhase::Complete);

    handle.advance(ms(1000)).unwrap();
    assert_eq!(state.revealed_count(), 1);
    assert_eq!(clock::active_timer_count(), 0);
}

#[test]
fn test_unmount_cancels_pending_reveal() {
    setup();
    let state = RevealState::new();
    let props = list_props(lines(&["A", "B", "C"]), &state);
    let mut handle = mount_headless(WIDTH, HEIGHT, move || reveal_list(props));

    handle.advance(ms(100)).unwrap();
    assert_eq!(clock::active_timer_count(), 1);

    handle.unmount().unwrap();
    assert_eq!(clock::active_timer_count(), 0);
    assert_eq!(get_allocated_count(), 0);
    assert!(!animate::any_animating());

    clock::advance(ms(1000));
    assert_eq!(state.revealed_count(), 1);
}

#[test]
fn test_item_springs_in_within_a_second() {
    setup();
    let state = RevealState::new();
    let props = list_props(lines(&["A"]), &state);
    let mut handle = mount_headless(WIDTH, HEIGHT, move || reveal_list(props));

    handle.advance(ms(100)).unwrap();
    let item = get_children(0)[0];
    assert!(visual::get_scale(item) < 1.0);
    assert!(visual::get_opacity(item) < 1.0);

    handle.advance(ms(1000)).unwrap();
    assert!(!animate::is_animating(item));
    assert_eq!(visual::get_scale(item), 1.0);
    assert_eq!(visual::get_opacity(item), 1.0);
}

#[test]
fn test_item_revealed_at_end_of_long_advance_still_enters() {
    setup();
    let state = RevealState::new();
    let props = RevealListProps {
        delay: ms(1000).into(),
        ..list_props(lines(&["A"]), &state)
    };
    let mut handle = mount_headless(WIDTH, HEIGHT, move || reveal_list(props));

    // Revealed at the very end of the step, so no spring time has passed
    handle.advance(ms(1000)).unwrap();
    assert_eq!(state.revealed_count(), 1);
    let item = get_children(0)[0];
    assert!(animate::is_animating(item));
    assert!(visual::get_scale(item) < 1.0);

    settle(&mut handle);
    assert_eq!(visual::get_scale(item), 1.0);
}

#[test]
fn test_changing_delay_rearms_single_timer() {
    setup();
    let state = RevealState::new();
    let delay = signal(ms(100));
    let props = RevealListProps {
        delay: delay.clone().into(),
        ..list_props(lines(&["A", "B", "C"]), &state)
    };
    let mut handle = mount_headless(WIDTH, HEIGHT, move || reveal_list(props));

    handle.advance(ms(100)).unwrap();
    assert_eq!(state.revealed_count(), 1);

    delay.set(ms(300));
    assert_eq!(clock::active_timer_count(), 1);

    // Next reveal is one new period after the change
    handle.advance(ms(299)).unwrap();
    assert_eq!(state.revealed_count(), 1);
    handle.advance(ms(1)).unwrap();
    assert_eq!(state.revealed_count(), 2);
    assert_eq!(clock::active_timer_count(), 1);

    handle.advance(ms(300)).unwrap();
    assert_eq!(keys(&state), vec![".$C", ".$B", ".$A"]);
    assert_eq!(clock::active_timer_count(), 0);
}

#[test]
fn test_newest_item_is_at_the_bottom() {
    setup();
    let state = RevealState::new();
    let props = list_props(lines(&["A", "B", "C"]), &state);
    let mut handle = mount_headless(WIDTH, HEIGHT, move || reveal_list(props));

    handle.advance(ms(300)).unwrap();
    settle(&mut handle);

    let buffer = handle.buffer();
    // gap-4 is one cell between items
    assert_eq!(buffer.row_text(0).trim(), "A");
    assert_eq!(buffer.row_text(2).trim(), "B");
    assert_eq!(buffer.row_text(4).trim(), "C");
    assert!(buffer.row_text(5).trim().is_empty());
}

#[test]
fn test_replaced_children_continue_from_revealed_count() {
    setup();
    let state = RevealState::new();
    let children = signal(lines(&["A", "B", "C"]));
    let props = RevealListProps {
        children: children.clone().into(),
        ..list_props(RevealChildren::default(), &state)
    };
    let mut handle = mount_headless(WIDTH, HEIGHT, move || reveal_list(props));

    handle.advance(ms(100)).unwrap();
    children.set(lines(&["X", "Y", "Z", "W"]));
    handle.advance(ms(100)).unwrap();
    assert_eq!(keys(&state), vec![".$Y", ".$A"]);

    // Shrinking below the revealed count completes the list
    children.set(lines(&["X"]));
    handle.advance(ms(100)).unwrap();
    assert_eq!(state.phase(), RevealPhase::Complete);
    assert_eq!(clock::active_timer_count(), 0);
}

#[test]
fn test_duplicate_keys() {
    let strict = RevealChildren::try_new([line("a"), line("a")]);
    assert_eq!(
        strict.unwrap_err(),
        RevealError::DuplicateKey {
            key: ".$a".to_string()
        }
    );

    let lenient = RevealChildren::new([line("a"), line("a")]);
    assert_eq!(lenient.len(), 2);
    assert_ne!(lenient.get(0).unwrap().key(), lenient.get(1).unwrap().key());
}
