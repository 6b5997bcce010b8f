#![forbid(unsafe_code)]

//! Uniform display scale for the root presentation surface.
//!
//! The slide is authored at a fixed base size and shrunk to fit the window,
//! never enlarged past its native size.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Native slide dimensions and breathing room around it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScaleConfig {
    /// Authored width of the root surface in pixels.
    pub base_width: f64,
    /// Authored height of the root surface in pixels.
    pub base_height: f64,
    /// Padding subtracted from each window dimension before fitting.
    pub pad: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            base_width: 1280.0,
            base_height: 720.0,
            pad: 20.0,
        }
    }
}

impl ScaleConfig {
    /// Scale factor for a window of `width` x `height` pixels.
    #[must_use]
    pub fn scale(&self, width: f64, height: f64) -> f64 {
        scale_for_window(width, height, self)
    }
}

/// `min((w - pad) / base_w, (h - pad) / base_h, 1)`, floored at zero.
///
/// Windows smaller than the padding collapse the surface to zero rather than
/// producing a negative (mirrored) scale. Non-finite input also yields zero.
#[must_use]
pub fn scale_for_window(width: f64, height: f64, config: &ScaleConfig) -> f64 {
    if config.base_width <= 0.0 || config.base_height <= 0.0 {
        return 1.0;
    }
    // `f64::min` drops a NaN operand, so reject bad input before comparing.
    if !(width.is_finite() && height.is_finite()) {
        return 0.0;
    }
    let sx = (width - config.pad) / config.base_width;
    let sy = (height - config.pad) / config.base_height;
    let s = sx.min(sy).min(1.0);
    if s.is_finite() { s.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_window_caps_at_one() {
        let cfg = ScaleConfig::default();
        assert_eq!(cfg.scale(3840.0, 2160.0), 1.0);
        assert_eq!(cfg.scale(1300.0, 740.0), 1.0);
    }

    #[test]
    fn narrow_window_is_width_bound() {
        let cfg = ScaleConfig::default();
        let s = cfg.scale(660.0, 2000.0);
        assert!((s - 0.5).abs() < 1e-12);
    }

    #[test]
    fn short_window_is_height_bound() {
        let cfg = ScaleConfig::default();
        let s = cfg.scale(4000.0, 380.0);
        assert!((s - 0.5).abs() < 1e-12);
    }

    #[test]
    fn tiny_window_floors_at_zero() {
        let cfg = ScaleConfig::default();
        assert_eq!(cfg.scale(5.0, 5.0), 0.0);
    }

    #[test]
    fn non_finite_window_yields_zero() {
        let cfg = ScaleConfig::default();
        assert_eq!(cfg.scale(f64::NAN, 500.0), 0.0);
        assert_eq!(cfg.scale(1280.0, f64::NAN), 0.0);
        assert_eq!(cfg.scale(f64::INFINITY, 720.0), 0.0);
        assert_eq!(cfg.scale(1280.0, f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn degenerate_base_size_is_identity() {
        let cfg = ScaleConfig {
            base_width: 0.0,
            ..ScaleConfig::default()
        };
        assert_eq!(cfg.scale(100.0, 100.0), 1.0);
    }
}
