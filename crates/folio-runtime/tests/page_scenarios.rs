#![forbid(unsafe_code)]

//! End-to-end scenarios against the stock portfolio markup.
//!
//! Run:
//!   cargo test -p folio-runtime --test page_scenarios

mod common;

use std::time::Duration;

use common::{SECTIONS, current_links, env, mounted};
use folio_core::{
    DomCommand, Document, KeyCode, KeyEvent, PageConfig, PageEvent, ScrollBehavior,
};
use folio_runtime::MenuState;
use pretty_assertions::assert_eq;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn scroll_and_frame(page: &mut folio_runtime::Page<folio_core::MemoryDocument>, y: f64, t: u64) {
    page.handle(PageEvent::Scroll { offset_y: y });
    page.frame(ms(t));
}

// ── active section ───────────────────────────────────────────────────────

#[test]
fn work_entering_band_marks_work_and_clears_about() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    assert_eq!(page.active_section(), None);

    // Reading line at 700 + 160 = 860: inside #about.
    scroll_and_frame(&mut page, 700.0, 16);
    assert_eq!(page.active_section().map(|s| s.as_str()), Some("about"));
    assert_eq!(current_links(&page, &f), vec![0]);

    // Reading line at 1860: inside #work.
    scroll_and_frame(&mut page, 1700.0, 32);
    assert_eq!(page.active_section().map(|s| s.as_str()), Some("work"));
    assert_eq!(current_links(&page, &f), vec![1]);
    let doc = page.document();
    assert!(doc.has_class(f.links[1], "nav__link--active"));
    assert!(!doc.has_class(f.links[0], "nav__link--active"));
    assert_eq!(doc.attribute(f.links[0], "aria-current"), None);
}

#[test]
fn monotonic_scroll_visits_sections_in_document_order() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    let mut visited: Vec<String> = Vec::new();
    let mut t = 0;
    let mut y = 0.0;
    while y <= 3800.0 {
        t += 16;
        scroll_and_frame(&mut page, y, t);
        assert!(current_links(&page, &f).len() <= 1);
        if let Some(active) = page.active_section() {
            if visited.last().map(String::as_str) != Some(active.as_str()) {
                visited.push(active.to_string());
            }
        }
        y += 50.0;
    }
    assert_eq!(visited, SECTIONS.to_vec());
}

#[test]
fn burst_of_scrolls_evaluates_only_latest_offset() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    // About, then work, then contact within a single frame.
    page.handle(PageEvent::Scroll { offset_y: 700.0 });
    page.handle(PageEvent::Scroll { offset_y: 1700.0 });
    let last = page.handle(PageEvent::Scroll { offset_y: 2700.0 });
    assert!(!last.request_frame);
    assert!(page.frame(ms(16)));
    assert_eq!(page.active_section().map(|s| s.as_str()), Some("contact"));
    assert_eq!(current_links(&page, &f), vec![2]);
}

// ── menu ─────────────────────────────────────────────────────────────────

#[test]
fn toggle_click_from_closed_opens_and_locks_scroll() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    page.document_mut().take_journal();

    let outcome = page.handle(PageEvent::Click { target: f.toggle });
    assert!(!outcome.prevent_default);

    let body = page.document().body();
    assert_eq!(
        page.document_mut().take_journal(),
        vec![
            DomCommand::SetAttribute {
                node: f.toggle,
                name: "aria-expanded".into(),
                value: "true".into(),
            },
            DomCommand::AddClass {
                node: f.list,
                class: "nav__list--open".into(),
            },
            DomCommand::SetStyle {
                node: body,
                property: "overflow".into(),
                value: "hidden".into(),
            },
        ]
    );
    assert_eq!(page.menu().map(|m| m.state()), Some(MenuState::Open));
}

#[test]
fn every_close_path_restores_body_scroll() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    let body = page.document().body();
    let closers: Vec<PageEvent> = vec![
        PageEvent::Click { target: f.toggle },
        PageEvent::Click { target: f.links[2] },
        PageEvent::Click {
            target: f.footer_text,
        },
        PageEvent::Key(KeyEvent::new(KeyCode::Escape)),
        PageEvent::Key(KeyEvent::new(KeyCode::Char(' ')).with_target(f.toggle)),
    ];
    for close in closers {
        page.handle(PageEvent::Click { target: f.toggle });
        assert_eq!(page.document().style(body, "overflow"), Some("hidden"));
        page.handle(close.clone());
        assert!(!page.is_menu_open(), "still open after {close:?}");
        assert_eq!(page.document().style(body, "overflow"), None);
        assert_eq!(
            page.document().attribute(f.toggle, "aria-expanded"),
            Some("false")
        );
    }
}

#[test]
fn escape_while_open_closes_and_focuses_toggle() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    page.handle(PageEvent::Click { target: f.toggle });
    page.document_mut().focus(f.links[1]);
    let outcome = page.handle(PageEvent::Key(
        KeyEvent::new(KeyCode::Escape).with_target(f.links[1]),
    ));
    assert!(!outcome.prevent_default);
    assert!(!page.is_menu_open());
    assert_eq!(page.document().focused(), Some(f.toggle));
}

#[test]
fn enter_on_toggle_opens_and_prevents_default() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    let outcome = page.handle(PageEvent::Key(
        KeyEvent::new(KeyCode::Enter).with_target(f.toggle),
    ));
    assert!(outcome.prevent_default);
    assert!(page.is_menu_open());
}

#[test]
fn external_class_removal_is_repaired_on_next_event() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    page.set_menu_open(true);
    page.document_mut().remove_class(f.list, "nav__list--open");
    page.handle(PageEvent::Scroll { offset_y: 10.0 });
    assert!(page.document().has_class(f.list, "nav__list--open"));
}

// ── navigation helpers ───────────────────────────────────────────────────

#[test]
fn nav_link_click_scrolls_below_header_and_closes_menu() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    page.handle(PageEvent::Click { target: f.toggle });
    let outcome = page.handle(PageEvent::Click { target: f.links[1] });
    assert!(outcome.prevent_default);
    assert!(!page.is_menu_open());
    assert_eq!(
        page.document().last_scroll(),
        Some((1720.0, ScrollBehavior::Smooth))
    );
    assert_eq!(page.document().location_hash(), Some("#work"));
}

#[test]
fn arrow_keys_move_focus_between_links() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    page.document_mut().focus(f.links[0]);
    let outcome = page.handle(PageEvent::Key(
        KeyEvent::new(KeyCode::Right).with_target(f.links[0]),
    ));
    assert!(outcome.prevent_default);
    assert_eq!(page.document().focused(), Some(f.links[1]));
    page.handle(PageEvent::Key(
        KeyEvent::new(KeyCode::End).with_target(f.links[1]),
    ));
    assert_eq!(page.document().focused(), Some(f.links[2]));
}

// ── reveal, header, parallax ─────────────────────────────────────────────

#[test]
fn reveal_staggers_cards_and_reveals_on_entry() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    for (i, &card) in f.cards.iter().enumerate() {
        assert!(page.document().has_class(card, "reveal"));
        assert!(
            page.document()
                .has_class(card, &format!("stagger-{}", i + 1))
        );
    }
    // Band 1700..2450.
    scroll_and_frame(&mut page, 1700.0, 16);
    let doc = page.document();
    assert!(doc.has_class(f.titles[1], "reveal--visible"));
    assert!(doc.has_class(f.cards[2], "reveal--visible"));
    assert!(!doc.has_class(f.cards[3], "reveal--visible"));
    // Jumped past without a frame in between.
    assert!(!doc.has_class(f.titles[0], "reveal--visible"));

    scroll_and_frame(&mut page, 0.0, 32);
    assert!(page.document().has_class(f.cards[2], "reveal--visible"));
}

#[test]
fn header_flag_follows_offset() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    scroll_and_frame(&mut page, 51.0, 16);
    assert!(page.document().has_class(f.header, "header--scrolled"));
    scroll_and_frame(&mut page, 0.0, 32);
    assert!(!page.document().has_class(f.header, "header--scrolled"));
}

#[test]
fn parallax_moves_hero_content() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    scroll_and_frame(&mut page, 200.0, 16);
    let doc = page.document();
    assert_eq!(
        doc.style(f.hero_content, "transform"),
        Some("translate3d(0, 100px, 0)")
    );
    assert_eq!(doc.style(f.hero_content, "opacity"), Some("0.75"));
}

#[test]
fn reduced_motion_leaves_markup_unanimated() {
    let mut e = env();
    e.reduced_motion = true;
    let (mut page, f) = mounted(PageConfig::default(), e);
    scroll_and_frame(&mut page, 1700.0, 16);
    let doc = page.document();
    assert!(!doc.has_class(f.cards[0], "reveal"));
    assert!(!doc.has_class(f.cards[0], "reveal--visible"));
    assert_eq!(doc.style(f.hero_content, "transform"), None);
    // Unaffected components keep working.
    assert_eq!(page.active_section().map(|s| s.as_str()), Some("work"));
}

// ── resize ───────────────────────────────────────────────────────────────

#[test]
fn resize_moves_reading_line_after_settle() {
    let (mut page, _f) = mounted(PageConfig::default(), env());
    scroll_and_frame(&mut page, 1500.0, 16);
    // Line at 1500 + 160 = 1660: about.
    assert_eq!(page.active_section().map(|s| s.as_str()), Some("about"));

    page.set_time(ms(100));
    let outcome = page.handle(PageEvent::Resize {
        width: 1280.0,
        height: 2000.0,
    });
    assert!(outcome.request_frame);
    assert_eq!(page.next_deadline(), Some(ms(250)));
    assert!(page.poll(ms(250)));
    // Line at 1500 + 400 = 1900: work.
    assert_eq!(page.active_section().map(|s| s.as_str()), Some("work"));
}

#[test]
fn scroll_during_resize_settle_is_kept() {
    let (mut page, f) = mounted(PageConfig::default(), env());
    scroll_and_frame(&mut page, 1500.0, 16);
    assert_eq!(page.active_section().map(|s| s.as_str()), Some("about"));

    page.set_time(ms(100));
    page.handle(PageEvent::Resize {
        width: 1280.0,
        height: 2000.0,
    });
    page.frame(ms(116));
    // Line at 1500 + 400 = 1900: work.
    assert_eq!(page.active_section().map(|s| s.as_str()), Some("work"));

    // Still inside the settle window. Line at 2700 + 400 = 3100: contact.
    scroll_and_frame(&mut page, 2700.0, 150);
    assert_eq!(page.active_section().map(|s| s.as_str()), Some("contact"));

    assert!(page.poll(ms(250)));
    assert_eq!(page.viewport().scroll_y, 2700.0);
    assert_eq!(page.active_section().map(|s| s.as_str()), Some("contact"));
    assert_eq!(current_links(&page, &f), vec![2]);
    assert!(page.is_header_scrolled());
}
