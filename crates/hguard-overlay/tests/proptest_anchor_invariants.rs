//! Property tests for bubble placement.
//!
//! For any target, viewport and bubble size:
//! - `left` lies in `[14, max(14, viewport.width - bubble.width - 14)]`
//! - `top` lies in `[10, max(10, viewport.height - bubble.height - 18)]`
//! - an empty target always yields the fallback `{14, 10}`

use hguard_core::geometry::{Rect, Size};
use hguard_overlay::anchor::{AnchorGeometry, BubbleAnchorEngine, BubblePosition};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -3000.0f64..3000.0
}

fn extent() -> impl Strategy<Value = f64> {
    0.0f64..2500.0
}

fn geometry() -> impl Strategy<Value = AnchorGeometry> {
    (
        coord(),
        coord(),
        1.0f64..600.0,
        1.0f64..200.0,
        coord(),
        coord(),
        extent(),
        extent(),
        extent(),
        extent(),
    )
        .prop_map(|(tx, ty, tw, th, vx, vy, vw, vh, bw, bh)| {
            AnchorGeometry::new(
                Rect::new(tx, ty, tw, th),
                Rect::new(vx, vy, vw, vh),
                Size::new(bw, bh),
            )
        })
}

proptest! {
    #[test]
    fn position_within_clamp_ranges(g in geometry()) {
        let pos = BubbleAnchorEngine::default().compute(&g);
        let max_left = (g.viewport.width - g.bubble.width - 14.0).max(14.0);
        let max_top = (g.viewport.height - g.bubble.height - 18.0).max(10.0);
        prop_assert!(pos.left >= 14.0 && pos.left <= max_left, "left {} not in [14, {}]", pos.left, max_left);
        prop_assert!(pos.top >= 10.0 && pos.top <= max_top, "top {} not in [10, {}]", pos.top, max_top);
    }

    #[test]
    fn bounds_agree_with_compute(g in geometry()) {
        let engine = BubbleAnchorEngine::default();
        let pos = engine.compute(&g);
        let ((lmin, lmax), (tmin, tmax)) = engine.bounds(&g.viewport, g.bubble);
        prop_assert!(lmin <= lmax && tmin <= tmax);
        prop_assert!((lmin..=lmax).contains(&pos.left));
        prop_assert!((tmin..=tmax).contains(&pos.top));
    }

    #[test]
    fn empty_target_falls_back(x in coord(), y in coord(), w in extent(), vw in extent(), vh in extent()) {
        let g = AnchorGeometry::new(
            Rect::new(x, y, w, 0.0),
            Rect::from_size(vw, vh),
            Size::new(100.0, 40.0),
        );
        prop_assert_eq!(BubbleAnchorEngine::default().compute(&g), BubblePosition::new(14.0, 10.0));
    }

    #[test]
    fn moving_target_right_never_moves_bubble_left(g in geometry(), dx in 0.0f64..500.0) {
        let engine = BubbleAnchorEngine::default();
        let before = engine.compute(&g);
        let moved = AnchorGeometry { target: g.target.offset(dx, 0.0), ..g };
        let after = engine.compute(&moved);
        prop_assert!(after.left >= before.left);
        prop_assert_eq!(after.top, before.top);
    }
}
