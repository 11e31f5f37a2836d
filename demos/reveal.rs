//! Reveal Example - Notifications that slide in once you scroll to them
//!
//! A page with a tall intro, then a reveal list of notifications. Scroll down
//! (arrows, j/k, PageUp/PageDown, Home/End) and the list starts revealing one
//! card every 600ms, newest at the bottom. q or Ctrl+C quits.
//!
//! Run with: cargo run --example reveal
//! Logs: RUST_LOG=spark_reveal=debug cargo run --example reveal (written to spark-reveal.log)

use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;

use spark_reveal::{
    box_primitive, get_index, mount, reveal_list, run, text, with_parent_context, Attr, BoxProps,
    Cleanup, Dimension, MountError, RevealChild, RevealChildren, RevealListProps, Rgba,
    TextProps,
};
use tracing_subscriber::EnvFilter;

const NOTIFICATIONS: &[(&str, &str, &str)] = &[
    ("pay-1", "Payment received", "$120.00 from Ada Lovelace"),
    ("msg-1", "New message", "Grace: are we still on for Friday?"),
    ("build-1", "Build passed", "main @ 3f2c1d9 in 2m 14s"),
    ("user-1", "New sign-up", "linus@example.com joined the team"),
    ("alert-1", "Disk usage high", "/var is at 91%"),
    ("msg-2", "New message", "Ken: merged, thanks!"),
];

fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    // stderr belongs to the UI; logs go to a file
    let Ok(file) = File::create("spark-reveal.log") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn notification(key: &str, title: &'static str, body: &'static str) -> RevealChild {
    RevealChild::keyed(key, move || {
        box_primitive(BoxProps {
            class: Some("flex flex-col px-2 py-1 bg-[#1e1e2e]".to_string()),
            children: Some(Box::new(move || {
                text(TextProps {
                    content: title.into(),
                    attrs: Some(Attr::BOLD),
                    fg: Some(Rgba::from_hex("#f5c2e7").unwrap_or(Rgba::WHITE).into()),
                    ..Default::default()
                });
                text(TextProps {
                    content: body.into(),
                    fg: Some(Rgba::from_hex("#cdd6f4").unwrap_or(Rgba::WHITE).into()),
                    ..Default::default()
                });
            })),
            ..Default::default()
        })
    })
}

fn page() -> Cleanup {
    let page_cleanup = box_primitive(BoxProps {
        id: Some("page".to_string()),
        class: Some("flex flex-col w-full px-4 gap-4".to_string()),
        ..Default::default()
    });
    let Some(page) = get_index("page") else {
        return page_cleanup;
    };

    let list_cleanup = with_parent_context(Some(page), || {
        text(TextProps {
            content: "Scroll down to see what happened while you were away.".into(),
            attrs: Some(Attr::ITALIC),
            ..Default::default()
        });
        box_primitive(BoxProps {
            height: Some(Dimension::Cells(60).into()),
            children: Some(Box::new(|| {
                text(TextProps {
                    content: "...".into(),
                    attrs: Some(Attr::DIM),
                    ..Default::default()
                });
            })),
            ..Default::default()
        });

        let children: RevealChildren = NOTIFICATIONS
            .iter()
            .map(|&(key, title, body)| notification(key, title, body))
            .collect();

        reveal_list(RevealListProps {
            class: "w-full".to_string(),
            children: children.into(),
            delay: Duration::from_millis(600).into(),
            ..Default::default()
        })
    });

    Box::new(move || {
        list_cleanup();
        page_cleanup();
    })
}

fn main() -> Result<(), MountError> {
    init_logging();

    let mut handle = mount(page)?;
    run(&mut handle)?;
    handle.unmount()
}
