//! End-to-end overlay flow on the deterministic host.
//!
//! Every test drives time by hand; nothing sleeps.

use core::time::Duration;

use hguard_core::event::{Control, Event, KeyCode, KeyEvent, WheelEvent};
use hguard_core::geometry::{Point, Rect, Size};
use hguard_overlay::model::{CURSOR_HINT_TIMER, OverlayModel, SCAN_TIMER, STARTUP_TIMER};
use hguard_overlay::state::OverlayState;
use hguard_overlay::view::{self, ids};
use hguard_runtime::surface::{Element, Surface};
use hguard_web::host::{ContentRegion, OverlayHost, StaticContent, StaticLayout};
use hguard_web::step_program::StepProgram;
use pretty_assertions::assert_eq;

type Program = StepProgram<OverlayModel, OverlayHost<StaticContent, StaticLayout>>;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn program_on(surface: Surface) -> Program {
    let content = StaticContent::new(
        Rect::new(40.0, 60.0, 700.0, 560.0),
        Size::new(700.0, 2400.0),
    )
    .with_anchor(ids::CLAIM_TARGET, Rect::new(80.0, 420.0, 400.0, 48.0));
    let layout = StaticLayout::new(Rect::from_size(1280.0, 720.0), Size::new(300.0, 90.0))
        .with_panel(Rect::new(880.0, 40.0, 360.0, 640.0));
    let mut p = StepProgram::new(
        OverlayModel::default(),
        OverlayHost::new(content, layout),
        surface,
        1280.0,
        720.0,
    );
    p.init().expect("init");
    p
}

fn program() -> Program {
    program_on(view::full_surface())
}

fn click(p: &mut Program, control: Control) {
    p.push_event(Event::Click(control));
    p.step().expect("step");
}

fn advance(p: &mut Program, n: u64) {
    p.advance_time(ms(n)).expect("advance");
    p.step().expect("step");
}

fn el<'a>(p: &'a Program, id: &str) -> &'a Element {
    p.surface().get(id).expect("element registered")
}

fn has(p: &Program, id: &str, class: &str) -> bool {
    el(p, id).has_class(class)
}

fn showing_scan(p: &Program) -> bool {
    !has(p, ids::SCAN_BLOCK, view::HIDDEN) && has(p, ids::RESULT_BLOCK, view::HIDDEN)
}

fn showing_result(p: &Program) -> bool {
    has(p, ids::SCAN_BLOCK, view::HIDDEN) && !has(p, ids::RESULT_BLOCK, view::HIDDEN)
}

#[test]
fn scan_reveals_result_at_900ms_and_retracts_hint_at_2700ms() {
    let mut p = program();
    click(&mut p, Control::Activate);
    assert_eq!(p.model().state(), OverlayState::Scanning);
    assert!(has(&p, ids::PANEL, view::OPEN));

    advance(&mut p, 899);
    assert!(showing_scan(&p));
    assert_eq!(p.model().state(), OverlayState::Scanning);

    advance(&mut p, 1);
    assert!(showing_result(&p));
    assert_eq!(
        el(&p, ids::CLAIM_TEXT).text(),
        "A sudden \u{201c}sense of doom\u{201d} can be a warning sign of a heart attack."
    );
    assert_eq!(el(&p, ids::CONFIDENCE).text(), "0.92");
    let sources: Vec<_> = el(&p, ids::SOURCES)
        .children()
        .iter()
        .map(|row| row.children()[0].text().to_owned())
        .collect();
    assert_eq!(
        sources,
        vec![
            "American Heart Association",
            "NHLBI (NIH)",
            "Mayo Clinic",
            "Research summaries"
        ]
    );
    assert!(has(&p, ids::CURSOR, view::VISIBLE));
    assert!(has(&p, ids::CLAIM_TARGET, view::ACTIVE));

    advance(&mut p, 1799);
    assert!(has(&p, ids::CURSOR, view::VISIBLE));
    advance(&mut p, 1);
    assert!(!has(&p, ids::CURSOR, view::VISIBLE));
    assert!(!p.timers().is_scheduled(CURSOR_HINT_TIMER));
    assert_eq!(p.timers().live_count(), 0);
    assert_eq!(p.model().state(), OverlayState::Result);
}

#[test]
fn scan_start_scrolls_content_smoothly_to_180() {
    let mut p = program();
    click(&mut p, Control::Activate);
    let content = p.host().content();
    assert_eq!(content.scroll_position().top, 180.0);
    assert_eq!(content.last_smooth(), Some(true));
}

#[test]
fn bubble_is_placed_above_claim_after_reveal() {
    let mut p = program();
    click(&mut p, Control::Activate);
    advance(&mut p, 900);
    let bubble = el(&p, ids::BUBBLE);
    // Claim on screen at (40 + 80, 60 + 420 - 180) = (120, 300).
    assert_eq!(bubble.position(), Some((106.0, 192.0)));
    assert!(bubble.has_class(view::OPEN));
    assert_eq!(bubble.aria_hidden(), Some(false));
}

#[test]
fn background_wheel_scroll_repositions_bubble() {
    let mut p = program();
    click(&mut p, Control::Activate);
    advance(&mut p, 900);

    p.push_event(Event::Wheel(WheelEvent::new(Point::new(10.0, 10.0), 0.0, 100.0)));
    let r = p.step().expect("step");
    assert_eq!(r.default_prevented, 1);
    assert_eq!(p.host().content().scroll_position().top, 280.0);

    // The scroll notification arrives on the next step and is handled on the frame.
    let r = p.step().expect("step");
    assert_eq!(r.frames_run, 1);
    assert_eq!(el(&p, ids::BUBBLE).position(), Some((106.0, 92.0)));
}

#[test]
fn scroll_bursts_reposition_once_per_frame() {
    let mut p = program();
    click(&mut p, Control::Activate);
    advance(&mut p, 900);
    let requests_before = p.frames().requests();
    for top in [200.0, 220.0, 240.0, 260.0, 280.0] {
        p.push_event(Event::ContentScroll { top, left: 0.0 });
    }
    let r = p.step().expect("step");
    assert_eq!(r.events_processed, 5);
    assert_eq!(r.frames_run, 1);
    assert_eq!(p.frames().requests() - requests_before, 1);
}

#[test]
fn wheel_inside_content_is_left_native() {
    let mut p = program();
    click(&mut p, Control::Activate);
    let calls = p.host().content().scroll_calls();
    p.push_event(Event::Wheel(WheelEvent::new(Point::new(300.0, 300.0), 0.0, 100.0)));
    let r = p.step().expect("step");
    assert_eq!(r.default_prevented, 0);
    assert_eq!(p.host().content().scroll_calls(), calls);
}

#[test]
fn close_during_scan_means_scan_never_fires() {
    let mut p = program();
    click(&mut p, Control::Activate);
    advance(&mut p, 500);
    p.push_event(Event::Key(KeyEvent::new(KeyCode::Escape)));
    p.step().expect("step");
    assert_eq!(p.model().state(), OverlayState::Closed);
    assert_eq!(p.timers().live_count(), 0);

    advance(&mut p, 10_000);
    assert_eq!(p.model().state(), OverlayState::Closed);
    assert!(p.model().result().is_none());
    assert!(!has(&p, ids::PANEL, view::OPEN));

    // Reopening starts a fresh session from its own t=0.
    click(&mut p, Control::Activate);
    advance(&mut p, 899);
    assert!(showing_scan(&p));
    advance(&mut p, 1);
    assert!(showing_result(&p));
}

#[test]
fn toggle_twice_leaves_no_live_timers() {
    let mut p = program();
    click(&mut p, Control::Activate);
    assert!(p.timers().is_scheduled(SCAN_TIMER));
    click(&mut p, Control::Activate);
    assert_eq!(p.model().state(), OverlayState::Closed);
    assert_eq!(p.timers().live_count(), 0);
    assert_eq!(el(&p, ids::PANEL).aria_hidden(), Some(true));
}

#[test]
fn replay_n_times_only_last_scan_fires() {
    let mut p = program();
    click(&mut p, Control::Activate);
    for _ in 0..5 {
        advance(&mut p, 100);
        click(&mut p, Control::Replay);
        assert_eq!(p.timers().live_count(), 1);
    }
    advance(&mut p, 899);
    assert!(showing_scan(&p));
    advance(&mut p, 1);
    assert!(showing_result(&p));
    assert_eq!(p.timers().fired_total(), 1);
    assert_eq!(p.model().session(), 6);
}

#[test]
fn replay_from_result_hides_bubble_and_rescans() {
    let mut p = program();
    click(&mut p, Control::Activate);
    advance(&mut p, 900);
    click(&mut p, Control::Replay);
    assert!(showing_scan(&p));
    assert!(!has(&p, ids::BUBBLE, view::OPEN));
    assert!(!has(&p, ids::CLAIM_TARGET, view::ACTIVE));
    assert!(!has(&p, ids::CURSOR, view::VISIBLE));
    assert!(!p.timers().is_scheduled(CURSOR_HINT_TIMER));
}

#[test]
fn startup_auto_scan_after_650ms() {
    let mut p = program();
    assert!(p.timers().is_scheduled(STARTUP_TIMER));
    advance(&mut p, 649);
    assert_eq!(p.model().state(), OverlayState::Closed);
    advance(&mut p, 1);
    assert_eq!(p.model().state(), OverlayState::Scanning);
    advance(&mut p, 900);
    assert_eq!(p.model().state(), OverlayState::Result);
}

#[test]
fn escape_while_closed_keeps_startup_scan() {
    let mut p = program();
    advance(&mut p, 100);
    p.push_event(Event::Key(KeyEvent::new(KeyCode::Escape)));
    p.step().expect("step");
    assert!(p.timers().is_scheduled(STARTUP_TIMER));
    advance(&mut p, 600);
    assert_eq!(p.model().state(), OverlayState::Scanning);
    assert_eq!(p.model().session(), 1);
}

#[test]
fn user_transition_cancels_startup_scan() {
    let mut p = program();
    click(&mut p, Control::Activate);
    click(&mut p, Control::Activate);
    assert_eq!(p.model().state(), OverlayState::Closed);
    advance(&mut p, 5_000);
    assert_eq!(p.model().state(), OverlayState::Closed);
    assert_eq!(p.model().session(), 1);
}

#[test]
fn init_twice_does_not_double_schedule() {
    let mut p = program();
    p.init().expect("second init");
    assert_eq!(p.timers().live_count(), 1);
    advance(&mut p, 650);
    assert_eq!(p.model().session(), 1);
}

#[test]
fn activation_key_toggles_and_suppresses_default() {
    let mut p = program();
    p.push_event(Event::ControlKey {
        control: Control::Activate,
        key: KeyEvent::new(KeyCode::Char(' ')),
    });
    let r = p.step().expect("step");
    assert_eq!(r.default_prevented, 1);
    assert_eq!(p.model().state(), OverlayState::Scanning);
}

#[test]
fn scan_shortcut_forces_scan_from_any_state() {
    let mut p = program();
    p.push_event(Event::Key(KeyEvent::new(KeyCode::Char('R'))));
    p.step().expect("step");
    assert_eq!(p.model().state(), OverlayState::Scanning);
    advance(&mut p, 900);
    p.push_event(Event::Key(KeyEvent::new(KeyCode::Char('r'))));
    p.step().expect("step");
    assert_eq!(p.model().state(), OverlayState::Scanning);
    assert_eq!(p.model().session(), 2);
}

#[test]
fn resize_updates_root_scale() {
    let mut p = program();
    let initial: f64 = el(&p, ids::SLIDE)
        .var(view::SCALE_VAR)
        .and_then(|v| v.parse().ok())
        .expect("scale var");
    // Height-bound: (720 - 20) / 720.
    assert!((initial - 700.0 / 720.0).abs() < 1e-12);
    p.resize(660.0, 1000.0);
    p.step().expect("step");
    assert_eq!(el(&p, ids::SLIDE).var(view::SCALE_VAR), Some("0.5"));
}

#[test]
fn deployment_without_optional_elements_runs_the_full_flow() {
    let mut p = program_on(view::minimal_surface());
    click(&mut p, Control::Activate);
    advance(&mut p, 900);
    assert!(showing_result(&p));
    assert!(p.surface().get(ids::AI_PILL).is_none());
    assert_eq!(el(&p, ids::CONFIDENCE).text(), "0.92");
}

#[test]
fn missing_anchor_target_pins_bubble_to_fallback() {
    let content = StaticContent::new(
        Rect::new(40.0, 60.0, 700.0, 560.0),
        Size::new(700.0, 2400.0),
    );
    let layout = StaticLayout::new(Rect::from_size(1280.0, 720.0), Size::new(300.0, 90.0));
    let mut p = StepProgram::new(
        OverlayModel::default(),
        OverlayHost::new(content, layout),
        view::full_surface(),
        1280.0,
        720.0,
    );
    p.init().expect("init");
    p.push_event(Event::Click(Control::Activate));
    p.step().expect("step");
    p.advance_time(ms(900)).expect("advance");
    p.step().expect("step");
    let bubble = p.surface().get(ids::BUBBLE).expect("bubble");
    assert_eq!(bubble.position(), Some((14.0, 10.0)));
}
