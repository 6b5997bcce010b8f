//! The facade's headless program end to end.

use std::time::Duration;

use hguard::overlay::view::{self, ids};
use hguard::prelude::*;
use hguard::{DegradationAction, SessionRecorder, WebBackendError, replay};
use pretty_assertions::assert_eq;

#[test]
fn default_config_reveals_result_after_scan_delay() -> hguard::Result<()> {
    let mut p = hguard::headless_program(OverlayConfig::default());
    p.init()?;
    p.push_event(Event::Click(Control::Activate));
    p.step()?;
    p.advance_time(Duration::from_millis(900))?;
    p.step()?;
    assert_eq!(p.model().state(), OverlayState::Result);
    let conf = p.surface().get(ids::CONFIDENCE).map(|el| el.text().to_owned());
    assert_eq!(conf.as_deref(), Some("0.92"));
    let bubble = p.surface().get(ids::BUBBLE).and_then(|el| el.position());
    assert_eq!(bubble, Some((106.0, 192.0)));
    Ok(())
}

#[test]
fn custom_scan_delay_is_honoured() -> hguard::Result<()> {
    let config = OverlayConfig {
        scan_delay_ms: 300,
        ..OverlayConfig::default()
    };
    let mut p = hguard::headless_program(config);
    p.init()?;
    p.push_event(Event::Key(KeyEvent::new(KeyCode::Char('r'))));
    p.step()?;
    p.advance_time(Duration::from_millis(299))?;
    p.step()?;
    assert!(
        p.surface()
            .get(ids::RESULT_BLOCK)
            .is_some_and(|el| el.has_class(view::HIDDEN))
    );
    p.advance_time(Duration::from_millis(1))?;
    p.step()?;
    assert_eq!(p.model().state(), OverlayState::Result);
    Ok(())
}

#[test]
fn recorded_demo_replays_identically() -> hguard::Result<()> {
    let mut rec = SessionRecorder::new(
        hguard::headless_program(OverlayConfig::default()),
        1280.0,
        720.0,
    );
    rec.init()?;
    rec.push_event(Event::Click(Control::Activate));
    rec.step()?;
    rec.advance_time(Duration::from_millis(2_700))?;
    rec.step()?;
    let trace = rec.finish();

    let result = replay(hguard::headless_program(OverlayConfig::default()), &trace)?;
    assert!(result.ok());
    assert_eq!(result.total_frames, trace.frame_count());
    Ok(())
}

#[test]
fn stepping_before_init_maps_to_shutdown() {
    let mut p = hguard::headless_program(OverlayConfig::default());
    let err: Error = p.step().map(|_| ()).map_err(Error::from).expect_err("not initialized");
    assert!(matches!(err, Error::Backend(WebBackendError::NotInitialized)));
    assert_eq!(err.degradation(), DegradationAction::Shutdown);
}
