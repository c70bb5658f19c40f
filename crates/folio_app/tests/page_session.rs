//! Whole-page sessions driven through synthetic frames and input

use folio_animation::{CancelPolicy, PlayState};
use folio_app::{Page, PageConfig};
use folio_core::{ElementId, Event, VisualProperty};
use folio_motion::{
    is_scroll_plugin_registered, register_scroll_plugin, FormField, HoverPolicy, MemorySink,
    Region,
};
use std::rc::Rc;

fn config(hover_policy: HoverPolicy) -> PageConfig {
    let mut config = PageConfig::default();
    config.loading.enabled = false;
    config.motion.hover_policy = hover_policy;
    config
}

/// Content mounted and mount timelines settled
fn settled_page(hover_policy: HoverPolicy) -> Page {
    let mut page = Page::new(config(hover_policy)).unwrap();
    page.mount().unwrap();
    page.advance(4.0).unwrap();
    page
}

fn prop(page: &Page, element: ElementId, prop: VisualProperty) -> f32 {
    page.document().property(element, prop).unwrap()
}

fn assert_near(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn mount_timelines_start_once_and_survive_rerender() {
    let mut page = Page::new(config(HoverPolicy::default())).unwrap();
    page.mount().unwrap();

    let mount_trigger = &page.hero().registrar().triggers()[0];
    assert_eq!(mount_trigger.fire_count(), 1);
    let hero_timeline = page.hero().timeline().unwrap();
    let timelines = page.scheduler().timeline_count();

    page.advance(0.8).unwrap();
    let progress = page.scheduler().handle().progress(hero_timeline).unwrap();
    assert!(progress > 0.0);

    for _ in 0..3 {
        page.rerender();
    }
    assert_eq!(page.hero().registrar().triggers()[0].fire_count(), 1);
    assert_eq!(page.scheduler().timeline_count(), timelines);
    assert_eq!(page.hero().timeline(), Some(hero_timeline));
    // Re-render neither restarts nor rewinds
    assert!(page.scheduler().handle().progress(hero_timeline).unwrap() >= progress);

    page.advance(4.0).unwrap();
    let headline = page.hero().headline().unwrap();
    assert_near(prop(&page, headline, VisualProperty::Opacity), 1.0);
}

#[test]
fn scroll_reveal_plays_forward_and_reverses_without_stacking() {
    let mut page = settled_page(HoverPolicy::default());
    let image = page.about().image().unwrap();
    let timeline = page.about().timeline().unwrap();

    // Primed: hidden until its trigger fires
    assert_near(prop(&page, image, VisualProperty::Opacity), 0.0);
    assert_near(prop(&page, image, VisualProperty::X), -100.0);

    let timelines = page.scheduler().timeline_count();
    let resources = page.about().registrar().len();

    page.scroll_to(600.0);
    page.advance(2.5).unwrap();
    assert_near(prop(&page, image, VisualProperty::Opacity), 1.0);
    assert_near(prop(&page, image, VisualProperty::Blur), 0.0);
    assert_eq!(page.scheduler().handle().state(timeline), Some(PlayState::Finished));

    page.scroll_to(0.0);
    page.advance(2.5).unwrap();
    assert_near(prop(&page, image, VisualProperty::Opacity), 0.0);
    assert_near(prop(&page, image, VisualProperty::X), -100.0);

    for _ in 0..5 {
        page.scroll_to(600.0);
        page.advance(0.2).unwrap();
        page.scroll_to(0.0);
        page.advance(0.2).unwrap();
    }
    assert_eq!(page.scheduler().timeline_count(), timelines);
    assert_eq!(page.about().registrar().len(), resources);
    assert_eq!(page.about().timeline(), Some(timeline));

    page.scroll_to(600.0);
    page.advance(3.0).unwrap();
    for &skill in page.about().skills() {
        assert_near(prop(&page, skill, VisualProperty::Opacity), 1.0);
        assert_near(prop(&page, skill, VisualProperty::Scale), 1.0);
    }
}

#[test]
fn cancel_mid_flight_leaves_terminal_states() {
    let mut page = settled_page(HoverPolicy::default());
    let handle = page.scheduler().handle();

    page.scroll_to(600.0);
    page.advance(0.3).unwrap();
    let about = page.about().timeline().unwrap();
    assert!(handle.is_playing(about));
    assert!(handle.cancel(about, CancelPolicy::JumpToEnd));
    assert!(!handle.cancel(about, CancelPolicy::JumpToEnd));

    let image = page.about().image().unwrap();
    assert_eq!(prop(&page, image, VisualProperty::Opacity), 1.0);
    assert_eq!(prop(&page, image, VisualProperty::X), 0.0);
    assert_eq!(prop(&page, image, VisualProperty::Blur), 0.0);
    for &skill in page.about().skills() {
        assert_eq!(prop(&page, skill, VisualProperty::Y), 0.0);
        assert_eq!(prop(&page, skill, VisualProperty::Scale), 1.0);
    }

    page.scroll_to(1500.0);
    page.advance(0.3).unwrap();
    let projects = page.projects().timeline().unwrap();
    assert!(handle.cancel(projects, CancelPolicy::JumpToStart));
    for &card in page.projects().cards() {
        assert_eq!(prop(&page, card, VisualProperty::Opacity), 0.0);
        assert_eq!(prop(&page, card, VisualProperty::Y), 100.0);
        assert_eq!(prop(&page, card, VisualProperty::Scale), 0.8);
    }

    // Cancelled timelines stay put
    page.advance(1.0).unwrap();
    assert_eq!(handle.state(projects), Some(PlayState::Cancelled));
    let card = page.projects().cards()[0];
    assert_eq!(prop(&page, card, VisualProperty::Y), 100.0);
}

#[test]
fn loading_percent_is_monotonic_and_hands_over_once() {
    let mut page = Page::new(PageConfig::default()).unwrap();
    page.mount().unwrap();
    assert_eq!(page.loading().percent(), 0);

    let mut last = 0;
    let mut hand_over_frame = None;
    for frame in 0..(6 * 60) {
        page.tick_frame().unwrap();
        let percent = page.snapshot().loading_percent;
        assert!(percent >= last, "percent went from {last} to {percent}");
        assert!(percent <= 100);
        last = percent;
        if page.is_content_mounted() && hand_over_frame.is_none() {
            assert_eq!(percent, 100);
            hand_over_frame = Some(frame);
        }
    }

    assert!(hand_over_frame.is_some());
    assert!(page.loading().is_complete());
    assert!(!page.loading().is_mounted());
    assert_eq!(page.hero().registrar().triggers()[0].fire_count(), 1);
    assert!(page.snapshot().loading_complete);
}

#[test]
fn navigate_away_removes_every_listener() {
    let mut page = settled_page(HoverPolicy::default());
    page.scroll_to(600.0);
    let cta = page.hero().cta().unwrap();
    page.pointer_enter(cta);
    page.click(page.navigation().menu_button().unwrap());
    assert!(page.navigation().is_menu_open());
    assert!(page.events().listener_count() > 0);
    assert!(!page.context().scroll_observers.is_empty());

    let about = page.about().timeline().unwrap();
    assert_eq!(page.navigate_away(), 0);

    assert_eq!(page.events().listener_count(), 0);
    assert_eq!(page.scheduler().timeline_count(), 0);
    assert!(page.context().scroll_observers.is_empty());
    assert!(page.document().read(|tree| tree.is_empty()));

    // Synthetic events after teardown reach nobody
    assert_eq!(page.events().dispatch(&Event::scroll(1200.0)), 0);
    assert_eq!(page.refresh(), 0);
    assert_eq!(page.pointer_enter(cta), 0);

    // Stale handles are inert
    let handle = page.scheduler().handle();
    assert!(!handle.play(about));
    assert!(!handle.cancel(about, CancelPolicy::JumpToEnd));
    assert!(!page.document().contains(cta));
}

#[test]
fn submit_without_sink_clears_draft() {
    let page = settled_page(HoverPolicy::default());
    page.input(FormField::Name, "Ada");
    page.input(FormField::Email, "a@x.com");
    page.input(FormField::Message, "Hello");

    let draft = page.contact().draft();
    assert_eq!(draft.get(FormField::Name), "Ada");
    assert_eq!(draft.get(FormField::Email), "a@x.com");
    assert_eq!(draft.get(FormField::Message), "Hello");

    assert_eq!(page.submit(), 1);
    assert!(page.contact().draft().is_empty());
    assert_eq!(page.contact().submitted(), 1);
}

#[test]
fn submit_with_sink_delivers_draft() {
    let sink = Rc::new(MemorySink::new());
    let mut page = Page::new(config(HoverPolicy::default()))
        .unwrap()
        .with_sink(sink.clone());
    page.mount().unwrap();

    page.input(FormField::Name, "Ada");
    page.input(FormField::Email, "a@x.com");
    page.input(FormField::Message, "Hello");
    page.submit();

    let delivered = sink.submissions();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].name, "Ada");
    assert_eq!(delivered[0].message, "Hello");
    assert!(page.contact().draft().is_empty());

    // Pulse settles back to rest
    page.advance(0.5).unwrap();
    let button = page.contact().submit_button().unwrap();
    assert_near(prop(&page, button, VisualProperty::Scale), 1.0);
}

#[test]
fn hover_cancel_and_restart() {
    let mut page = settled_page(HoverPolicy::CancelAndRestart);
    let cta = page.hero().cta().unwrap();

    page.pointer_enter(cta);
    page.advance(0.1).unwrap();
    let mid = prop(&page, cta, VisualProperty::Scale);
    assert!(mid > 1.0 && mid < 1.05);

    // The in-flight enter settles before the new one starts
    page.pointer_enter(cta);
    assert_near(prop(&page, cta, VisualProperty::Scale), 1.05);

    page.pointer_leave(cta);
    page.advance(0.5).unwrap();
    assert_near(prop(&page, cta, VisualProperty::Scale), 1.0);
}

#[test]
fn hover_ignore_while_active() {
    let mut page = settled_page(HoverPolicy::IgnoreWhileActive);
    let cta = page.hero().cta().unwrap();
    let timelines = page.scheduler().timeline_count();

    page.pointer_enter(cta);
    page.advance(0.1).unwrap();
    let mid = prop(&page, cta, VisualProperty::Scale);
    assert!(mid > 1.0 && mid < 1.05);

    page.pointer_enter(cta);
    assert_eq!(prop(&page, cta, VisualProperty::Scale), mid);
    assert_eq!(page.scheduler().timeline_count(), timelines + 1);

    // Leave still cuts the enter short
    page.pointer_leave(cta);
    assert_near(prop(&page, cta, VisualProperty::Scale), 1.05);
    page.pointer_enter(cta);
    page.advance(0.5).unwrap();
    assert_near(prop(&page, cta, VisualProperty::Scale), 1.0);
    assert_eq!(page.scheduler().timeline_count(), timelines + 1);
}

#[test]
fn scroll_plugin_registration_is_idempotent() {
    let _page = Page::new(config(HoverPolicy::default())).unwrap();
    assert!(is_scroll_plugin_registered());
    assert!(!register_scroll_plugin());

    let mut second = Page::new(config(HoverPolicy::default())).unwrap();
    second.mount().unwrap();
    assert!(second.about().is_mounted());
}

#[test]
fn navigation_tracks_scroll_and_menu() {
    let mut page = settled_page(HoverPolicy::default());
    assert!(!page.snapshot().nav_scrolled);

    page.scroll_to(120.0);
    assert!(page.navigation().is_scrolled());
    page.scroll_to(10.0);
    assert!(!page.navigation().is_scrolled());

    page.click(page.navigation().menu_button().unwrap());
    assert!(page.navigation().is_menu_open());
    page.advance(0.5).unwrap();
    let menu = page.navigation().menu().unwrap();
    assert_near(prop(&page, menu, VisualProperty::Opacity), 1.0);

    let link = page
        .document()
        .read(|tree| tree.find_by_label("nav.menu.about"))
        .unwrap();
    page.click(link);
    assert!(!page.navigation().is_menu_open());
    assert!(!page.document().contains(menu));
}

#[test]
fn short_page_reveals_on_refresh() {
    let mut config = config(HoverPolicy::default());
    config.viewport.height = 5000.0;
    let mut page = Page::new(config).unwrap();
    page.mount().unwrap();
    page.advance(4.0).unwrap();

    // Every section already sits above its start line
    let footer = page.footer().root().unwrap();
    assert_near(prop(&page, footer, VisualProperty::Opacity), 1.0);
    let card = page.projects().cards()[5];
    assert_near(prop(&page, card, VisualProperty::Opacity), 1.0);
}
