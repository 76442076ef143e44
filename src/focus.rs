//! The focus-offset model: a world-space reference point and a scale factor.
//!
//! World coordinates may be as large as ~1e9. Before anything reaches the
//! wrapped context, the focus point is subtracted and only then is the result
//! scaled: `screen = scale * (world - focus)`. When the world coordinate and
//! the focus have similar magnitude the subtraction is exact and leaves a small
//! number; scaling first, or folding the focus into a native matrix, would
//! round both large operands and lose sub-pixel detail.

use serde::{Deserialize, Serialize};

use crate::error::{FarCanvasError, Result};

/// Caller-facing configuration. Missing fields default to `{x: 0, y: 0, scale: 1}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

/// Validated focus point and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusOffset {
    x: f64,
    y: f64,
    scale: f64,
}

impl FocusOffset {
    pub fn new(x: f64, y: f64, scale: f64) -> Result<Self> {
        if scale == 0.0 {
            return Err(FarCanvasError::Configuration(
                "scale must not be zero".to_string(),
            ));
        }
        if !scale.is_finite() {
            return Err(FarCanvasError::Configuration(format!(
                "scale must be finite, got {scale}"
            )));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(FarCanvasError::Configuration(format!(
                "focus point must be finite, got ({x}, {y})"
            )));
        }
        Ok(Self { x, y, scale })
    }

    /// Same scale, different focus point. The scale was validated already.
    pub(crate) fn refocus(&self, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            scale: self.scale,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn screen_x(&self, x: f64) -> f64 {
        self.scale * (x - self.x)
    }

    pub fn screen_y(&self, y: f64) -> f64 {
        self.scale * (y - self.y)
    }

    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (self.screen_x(x), self.screen_y(y))
    }

    pub fn distance_to_screen(&self, distance: f64) -> f64 {
        self.scale * distance
    }

    pub fn world_x(&self, x: f64) -> f64 {
        x / self.scale + self.x
    }

    pub fn world_y(&self, y: f64) -> f64 {
        y / self.scale + self.y
    }

    pub fn to_world(&self, x: f64, y: f64) -> (f64, f64) {
        (self.world_x(x), self.world_y(y))
    }

    pub fn distance_to_world(&self, distance: f64) -> f64 {
        distance / self.scale
    }
}

impl TryFrom<FocusConfig> for FocusOffset {
    type Error = FarCanvasError;

    fn try_from(config: FocusConfig) -> Result<Self> {
        FocusOffset::new(config.x, config.y, config.scale)
    }
}

impl From<FocusOffset> for FocusConfig {
    fn from(focus: FocusOffset) -> Self {
        Self {
            x: focus.x,
            y: focus.y,
            scale: focus.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        let tolerance = 1e-7 * b.abs().max(1.0);
        assert!((a - b).abs() <= tolerance, "{} != {}", a, b);
    }

    fn configs() -> Vec<FocusConfig> {
        let mut out = Vec::new();
        for (x, y) in [(0.0, 0.0), (-1337.0, 0.0), (1337.0, 13.0), (0.0, -1337.0), (1.0e9, -1.0e9)] {
            for scale in [1.0, 5.0, 6.0, 7.0, 0.25, -2.0, 2.1875] {
                out.push(FocusConfig { x, y, scale });
            }
        }
        out
    }

    #[test]
    fn inverse_round_trips_points_and_distances() {
        for config in configs() {
            let focus = FocusOffset::try_from(config).unwrap();
            for t in [128.0, -64.0, 0.0, 12.5, 1.0e9 + 0.25] {
                assert_close(focus.screen_x(focus.world_x(t)), t);
                assert_close(focus.screen_y(focus.world_y(t)), t);
                assert_close(focus.world_x(focus.screen_x(t)), t);
                assert_close(focus.world_y(focus.screen_y(t)), t);
                assert_close(focus.distance_to_screen(focus.distance_to_world(t)), t);
                assert_close(focus.distance_to_world(focus.distance_to_screen(t)), t);
            }
        }
    }

    #[test]
    fn distances_ignore_the_offset() {
        let near = FocusOffset::new(0.0, 0.0, 3.0).unwrap();
        let far = FocusOffset::new(1.0e9, -4.0e8, 3.0).unwrap();
        assert_eq!(near.distance_to_screen(7.5), far.distance_to_screen(7.5));
        assert_eq!(far.distance_to_screen(7.5), 22.5);
    }

    #[test]
    fn subtracts_before_scaling() {
        let focus = FocusOffset::new(1.0e9, 1.0e9, 3.0).unwrap();
        // 1e9 + 0.125 is exact; scaling first would round 3e9 + 0.375.
        assert_eq!(focus.to_screen(1.0e9 + 0.125, 1.0e9 - 0.125), (0.375, -0.375));
    }

    #[test]
    fn rejects_zero_scale() {
        let err = FocusOffset::new(1.0, 2.0, 0.0).unwrap_err();
        assert!(matches!(err, FarCanvasError::Configuration(_)));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(FocusOffset::new(0.0, 0.0, f64::NAN).is_err());
        assert!(FocusOffset::new(f64::INFINITY, 0.0, 1.0).is_err());
        assert!(FocusOffset::new(0.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn default_config_is_the_identity_mapping() {
        let focus = FocusOffset::try_from(FocusConfig::default()).unwrap();
        assert_eq!(focus.to_screen(10.0, 20.0), (10.0, 20.0));
        assert_eq!(focus.distance_to_screen(4.0), 4.0);
    }
}
