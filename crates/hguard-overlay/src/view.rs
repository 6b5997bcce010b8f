#![forbid(unsafe_code)]

//! Presentation attributes for the overlay.
//!
//! Writes classes, text, accessibility flags and positions onto a
//! [`Surface`]. Optional elements (the status pill and the AI card) may be
//! absent from a deployment; writes to them are skipped.

use hguard_runtime::surface::{Element, Surface};

use crate::model::{BubbleView, OverlayModel};
use crate::result::{ScanResult, Tone};

/// Element ids.
pub mod ids {
    use hguard_runtime::surface::ElementId;

    pub const SLIDE: ElementId = "slide";
    pub const VIEWPORT: ElementId = "viewport";
    pub const CONTENT: ElementId = "article";
    pub const ACTIVATE: ElementId = "hg-btn";
    pub const PANEL: ElementId = "hg-panel";
    pub const CLOSE: ElementId = "hg-close";
    pub const REPLAY: ElementId = "hg-replay";
    pub const BUBBLE: ElementId = "hg-bubble";
    pub const CURSOR: ElementId = "hg-cursor";
    pub const SCAN_BLOCK: ElementId = "hg-scan";
    pub const RESULT_BLOCK: ElementId = "hg-result";
    pub const CLAIM_TARGET: ElementId = "claimTarget";
    pub const CLAIM_TEXT: ElementId = "hg-claim-text";
    pub const BUBBLE_NOTE: ElementId = "hg-bubble-sub";
    pub const CONFIDENCE: ElementId = "hg-conf";
    pub const EXPLAINER: ElementId = "hg-explainer";
    pub const SOURCES: ElementId = "hg-sources";
    pub const STATUS_PILL: ElementId = "hg-status-pill";
    pub const AI_PILL: ElementId = "hg-ai-pill";
    pub const AI_SCORE: ElementId = "hg-ai-score";
    pub const AI_EXPLAINER: ElementId = "hg-ai-explainer";

    /// Elements every deployment has.
    pub const REQUIRED: &[ElementId] = &[
        SLIDE,
        VIEWPORT,
        CONTENT,
        ACTIVATE,
        PANEL,
        CLOSE,
        REPLAY,
        BUBBLE,
        CURSOR,
        SCAN_BLOCK,
        RESULT_BLOCK,
        CLAIM_TARGET,
        CLAIM_TEXT,
        BUBBLE_NOTE,
        CONFIDENCE,
        EXPLAINER,
        SOURCES,
    ];

    /// Elements a deployment may leave out.
    pub const OPTIONAL: &[ElementId] = &[STATUS_PILL, AI_PILL, AI_SCORE, AI_EXPLAINER];
}

pub const OPEN: &str = "is-open";
pub const ACTIVE: &str = "is-active";
pub const VISIBLE: &str = "is-visible";
pub const HIDDEN: &str = "hidden";
pub const SCALE_VAR: &str = "--scale";

/// Surface with every required and optional element registered.
#[must_use]
pub fn full_surface() -> Surface {
    Surface::with_elements(ids::REQUIRED.iter().chain(ids::OPTIONAL).copied())
}

/// Surface with only the required elements registered.
#[must_use]
pub fn minimal_surface() -> Surface {
    Surface::with_elements(ids::REQUIRED.iter().copied())
}

pub(crate) fn render(model: &OverlayModel, surface: &mut Surface) {
    let open = model.panel().is_open();
    surface.update(ids::SLIDE, |el| {
        el.set_var(SCALE_VAR, model.scale().to_string());
    });
    surface.update(ids::PANEL, |el| {
        el.toggle_class(OPEN, open);
        el.set_aria_hidden(!open);
    });
    surface.update(ids::SCAN_BLOCK, |el| {
        el.toggle_class(HIDDEN, model.result_shown());
    });
    surface.update(ids::RESULT_BLOCK, |el| {
        el.toggle_class(HIDDEN, !model.result_shown());
    });
    surface.update(ids::CLAIM_TARGET, |el| {
        el.toggle_class(ACTIVE, model.is_highlighted());
    });
    surface.update(ids::CURSOR, |el| {
        el.toggle_class(VISIBLE, model.cursor_hint_visible());
    });
    render_bubble(model.bubble(), surface);
    if model.result_shown() {
        if let Some(result) = model.result() {
            render_result(result, surface);
        }
    }
}

fn render_bubble(bubble: BubbleView, surface: &mut Surface) {
    surface.update(ids::BUBBLE, |el| {
        el.toggle_class(OPEN, bubble.is_visible());
        match bubble {
            BubbleView::Hidden => el.set_aria_hidden(true),
            BubbleView::Provisional => {
                el.set_position(0.0, 0.0);
                el.set_aria_hidden(true);
            }
            BubbleView::Placed(pos) => {
                el.set_position(pos.left, pos.top);
                el.set_aria_hidden(false);
            }
        }
    });
}

fn render_result(result: &ScanResult, surface: &mut Surface) {
    surface.update(ids::CLAIM_TEXT, |el| el.set_text(&result.claim));
    surface.update(ids::BUBBLE_NOTE, |el| el.set_text(&result.bubble_note));
    surface.update(ids::CONFIDENCE, |el| el.set_text(&result.confidence_label()));
    surface.update(ids::EXPLAINER, |el| el.set_text(&result.explainer));
    surface.update(ids::STATUS_PILL, |el| {
        el.set_text(&result.status.label);
        el.replace_class(&Tone::CLASSES, result.status.tone.class());
    });
    surface.update(ids::AI_PILL, |el| {
        el.set_text(&result.ai.status.label);
        el.replace_class(&Tone::CLASSES, result.ai.status.tone.class());
    });
    surface.update(ids::AI_SCORE, |el| el.set_text(&result.ai_score_label()));
    surface.update(ids::AI_EXPLAINER, |el| el.set_text(&result.ai.explainer));
    surface.update(ids::SOURCES, |el| {
        let rows = result
            .sources
            .iter()
            .map(|s| {
                let name = Element::new().with_class("name").with_text(s.name.clone());
                let tag = Element::new()
                    .with_class("tag")
                    .with_class(s.tone.class())
                    .with_text(s.tag.clone());
                let mut row = Element::new().with_class("source");
                row.replace_children(vec![name, tag]);
                row
            })
            .collect();
        el.replace_children(rows);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AnchorGeometry;
    use crate::model::Msg;
    use hguard_core::geometry::{Rect, Size};
    use hguard_runtime::program::Model;
    use pretty_assertions::assert_eq;

    fn rendered(model: &OverlayModel, mut surface: Surface) -> Surface {
        model.view(&mut surface);
        surface
    }

    fn class_of(s: &Surface, id: &str, class: &str) -> bool {
        s.get(id).is_some_and(|el| el.has_class(class))
    }

    #[test]
    fn closed_overlay_hides_panel_and_bubble() {
        let s = rendered(&OverlayModel::default(), full_surface());
        assert!(!class_of(&s, ids::PANEL, OPEN));
        assert_eq!(s.get(ids::PANEL).and_then(Element::aria_hidden), Some(true));
        assert!(!class_of(&s, ids::BUBBLE, OPEN));
        assert!(class_of(&s, ids::RESULT_BLOCK, HIDDEN));
        assert!(!class_of(&s, ids::SCAN_BLOCK, HIDDEN));
        assert_eq!(s.get(ids::SLIDE).and_then(|el| el.var(SCALE_VAR)), Some("1"));
    }

    #[test]
    fn result_populates_card() {
        let mut m = OverlayModel::default();
        let _ = m.update(Msg::Toggle);
        let _ = m.update(Msg::ScanElapsed);
        let s = rendered(&m, full_surface());
        assert!(class_of(&s, ids::PANEL, OPEN));
        assert!(class_of(&s, ids::SCAN_BLOCK, HIDDEN));
        assert!(!class_of(&s, ids::RESULT_BLOCK, HIDDEN));
        assert!(class_of(&s, ids::CLAIM_TARGET, ACTIVE));
        assert!(class_of(&s, ids::CURSOR, VISIBLE));
        assert_eq!(s.get(ids::CONFIDENCE).map(Element::text), Some("0.92"));
        assert_eq!(s.get(ids::AI_SCORE).map(Element::text), Some("0.63"));
        assert!(class_of(&s, ids::STATUS_PILL, "good"));
        assert!(class_of(&s, ids::AI_PILL, "warn"));

        let rows = s.get(ids::SOURCES).map(Element::children).unwrap_or_default();
        let names: Vec<_> = rows.iter().map(|r| r.children()[0].text()).collect();
        assert_eq!(
            names,
            vec![
                "American Heart Association",
                "NHLBI (NIH)",
                "Mayo Clinic",
                "Research summaries"
            ]
        );
        assert!(rows[3].children()[1].has_class("warn"));
    }

    #[test]
    fn provisional_bubble_sits_at_origin_and_stays_hidden_to_assistive_tech() {
        let mut m = OverlayModel::default();
        let _ = m.update(Msg::Toggle);
        let _ = m.update(Msg::ScanElapsed);
        let s = rendered(&m, full_surface());
        let bubble = s.get(ids::BUBBLE).expect("bubble registered");
        assert!(bubble.has_class(OPEN));
        assert_eq!(bubble.position(), Some((0.0, 0.0)));
        assert_eq!(bubble.aria_hidden(), Some(true));

        let _ = m.update(Msg::AnchorMeasured(AnchorGeometry::new(
            Rect::new(300.0, 400.0, 200.0, 40.0),
            Rect::new(100.0, 50.0, 800.0, 600.0),
            Size::new(260.0, 80.0),
        )));
        let s = rendered(&m, s);
        let bubble = s.get(ids::BUBBLE).expect("bubble registered");
        assert_eq!(bubble.position(), Some((186.0, 252.0)));
        assert_eq!(bubble.aria_hidden(), Some(false));
    }

    #[test]
    fn status_tone_is_replaced_not_accumulated() {
        let mut m = OverlayModel::with_source(Default::default(), {
            let mut flip = false;
            move || {
                flip = !flip;
                let mut r = crate::result::sample_result();
                r.status.tone = if flip { Tone::Good } else { Tone::Bad };
                r
            }
        });
        let mut s = full_surface();
        for _ in 0..2 {
            let _ = m.update(Msg::Scan);
            let _ = m.update(Msg::ScanElapsed);
            m.view(&mut s);
        }
        let pill = s.get(ids::STATUS_PILL).expect("pill registered");
        assert!(pill.has_class("bad"));
        assert!(!pill.has_class("good"));
    }

    #[test]
    fn optional_elements_absent_is_fine() {
        let mut m = OverlayModel::default();
        let _ = m.update(Msg::Toggle);
        let _ = m.update(Msg::ScanElapsed);
        let s = rendered(&m, minimal_surface());
        assert!(s.get(ids::AI_PILL).is_none());
        assert!(s.get(ids::STATUS_PILL).is_none());
        assert_eq!(s.get(ids::CONFIDENCE).map(Element::text), Some("0.92"));
    }
}
