#![forbid(unsafe_code)]

//! Headless HealthGuard demo.
//!
//! Runs a scripted session against the in-memory page, prints the rendered
//! overlay after each step, and replays the recorded trace to check that the
//! run was deterministic.
//!
//! ```sh
//! cargo run -p hguard --bin hguard-demo
//! HGUARD_LOG=hguard=debug cargo run -p hguard --bin hguard-demo --features config -- overlay.toml
//! ```

use std::process::ExitCode;

use hguard::overlay::view::ids;
use hguard::prelude::*;
use hguard::{Element, Point, SessionRecorder, WheelEvent, replay};

fn main() -> ExitCode {
    #[cfg(feature = "tracing-json")]
    hguard::core::logging::init();

    let config = load_config(std::env::args().nth(1).as_deref());
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(
                error_type = err.error_type(),
                action = %err.degradation(),
                "demo failed: {err}"
            );
            eprintln!("hguard-demo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&str>) -> OverlayConfig {
    let Some(path) = path else {
        return OverlayConfig::default();
    };
    match read_config(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path, action = %err.degradation(), "config rejected: {err}");
            OverlayConfig::default()
        }
    }
}

#[cfg(feature = "config")]
fn read_config(path: &str) -> hguard::Result<OverlayConfig> {
    let config = if path.ends_with(".json") {
        OverlayConfig::from_json_file(path)?
    } else {
        OverlayConfig::from_toml_file(path)?
    };
    Ok(config.validated()?)
}

#[cfg(not(feature = "config"))]
fn read_config(path: &str) -> hguard::Result<OverlayConfig> {
    let _ = path;
    Err(hguard::ConfigError::Invalid(vec![
        "built without the `config` feature".to_owned(),
    ])
    .into())
}

fn run(config: OverlayConfig) -> hguard::Result<()> {
    let scan_delay = config.scan_delay();
    let hint = config.cursor_hint_duration();
    let mut rec = SessionRecorder::new(hguard::headless_program(config.clone()), 1280.0, 720.0);

    rec.init()?;
    report("init", rec.program());

    rec.push_event(Event::Click(Control::Activate));
    rec.step()?;
    report("activate", rec.program());

    rec.advance_time(scan_delay)?;
    rec.step()?;
    report("scan elapsed", rec.program());

    rec.push_event(Event::Wheel(WheelEvent::new(Point::new(10.0, 10.0), 0.0, 120.0)));
    rec.step()?;
    rec.step()?;
    report("background wheel", rec.program());

    rec.advance_time(hint)?;
    rec.step()?;
    report("hint retracted", rec.program());

    rec.push_event(Event::Key(KeyEvent::new(KeyCode::Escape)));
    rec.step()?;
    report("escape", rec.program());

    let trace = rec.finish();
    let result = replay(hguard::headless_program(config), &trace)?;
    println!(
        "replay: {} frames, checksum chain {:016x}, {}",
        result.total_frames,
        result.final_checksum_chain,
        if result.ok() { "identical" } else { "DIVERGED" }
    );
    if let Some(m) = result.first_mismatch {
        println!(
            "  first mismatch at frame {}: expected {:016x}, got {:016x}",
            m.frame_idx, m.expected, m.actual
        );
    }
    Ok(())
}

fn report(label: &str, program: &HeadlessProgram) {
    let model = program.model();
    let surface = program.surface();
    let text = |id: &str| surface.get(id).map(|el| el.text().to_owned()).unwrap_or_default();
    println!(
        "[{:>6} ms] {label:<16} state={} session={}",
        program.now().as_millis(),
        model.state(),
        model.session()
    );
    if model.result_shown() {
        println!("    claim: {}", text(ids::CLAIM_TEXT));
        println!("    confidence: {}  ai: {}", text(ids::CONFIDENCE), text(ids::AI_SCORE));
        if let Some(sources) = surface.get(ids::SOURCES) {
            for row in sources.children() {
                let cells: Vec<&str> = row.children().iter().map(Element::text).collect();
                println!("    source: {}", cells.join(" / "));
            }
        }
    }
    if let Some(pos) = model.bubble().position() {
        println!("    bubble at ({}, {})", pos.left, pos.top);
    }
    if model.cursor_hint_visible() {
        println!("    cursor hint visible");
    }
}
