//! Property-based invariant tests for the display scale calculator.
//!
//! ## Invariants
//!
//! 1. Ceiling: the scale never exceeds 1.0 for any window size.
//! 2. Floor: the scale never drops below 0.0.
//! 3. Monotonicity: growing either window dimension never shrinks the scale.

use hguard_core::scale::{ScaleConfig, scale_for_window};
use proptest::prelude::*;

fn arb_dimension() -> impl Strategy<Value = f64> {
    (0u32..=8000).prop_map(f64::from)
}

fn arb_growth() -> impl Strategy<Value = f64> {
    (0u32..=4000).prop_map(f64::from)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn scale_is_bounded(w in arb_dimension(), h in arb_dimension()) {
        let s = scale_for_window(w, h, &ScaleConfig::default());
        prop_assert!(s <= 1.0, "scale={s} for {w}x{h}");
        prop_assert!(s >= 0.0, "scale={s} for {w}x{h}");
    }

    #[test]
    fn scale_is_monotone_in_width(w in arb_dimension(), h in arb_dimension(), dw in arb_growth()) {
        let cfg = ScaleConfig::default();
        let before = scale_for_window(w, h, &cfg);
        let after = scale_for_window(w + dw, h, &cfg);
        prop_assert!(after >= before, "width {w}->{} shrank {before}->{after}", w + dw);
    }

    #[test]
    fn scale_is_monotone_in_height(w in arb_dimension(), h in arb_dimension(), dh in arb_growth()) {
        let cfg = ScaleConfig::default();
        let before = scale_for_window(w, h, &cfg);
        let after = scale_for_window(w, h + dh, &cfg);
        prop_assert!(after >= before, "height {h}->{} shrank {before}->{after}", h + dh);
    }
}

#[test]
fn native_size_plus_pad_is_exactly_one() {
    let cfg = ScaleConfig::default();
    assert_eq!(scale_for_window(1300.0, 740.0, &cfg), 1.0);
}
