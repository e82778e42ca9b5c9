//! Geometry of the rotation bar: a horizontal ruler of degree ticks with a
//! draggable marker for the current angle.

use serde::{Deserialize, Serialize};

/// Most ticks drawn on either side of zero.
pub const MAX_TICKS_PER_SIDE: i64 = 3600;

/// Layout of the rotation bar, built once from configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationBarConfig {
    /// Horizontal distance between neighbouring ticks, in points.
    pub tick_spacing: f64,
    pub degrees_per_tick: f64,
    /// The bar spans `-max_degrees..=max_degrees`.
    pub max_degrees: f64,
    pub height: f64,
    /// Every n-th tick carries a degree label.
    pub label_every: u32,
}

impl Default for RotationBarConfig {
    fn default() -> Self {
        Self {
            tick_spacing: 8.0,
            degrees_per_tick: 5.0,
            max_degrees: 180.0,
            height: 36.0,
            label_every: 3,
        }
    }
}

impl RotationBarConfig {
    /// Full bar width in points.
    pub fn width(&self) -> f64 {
        2.0 * self.max_degrees / self.degrees_per_tick * self.tick_spacing
    }

    /// Checks the values a configuration file may have set, describing the
    /// first bad one.
    pub fn validate(&self) -> Result<(), String> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(format!("rotation_bar.{name} must be positive, got {v}"))
            }
        };
        positive("tick_spacing", self.tick_spacing)?;
        positive("degrees_per_tick", self.degrees_per_tick)?;
        positive("max_degrees", self.max_degrees)?;
        positive("height", self.height)?;
        if self.max_degrees / self.degrees_per_tick > MAX_TICKS_PER_SIDE as f64 {
            return Err(format!(
                "rotation_bar would need more than {MAX_TICKS_PER_SIDE} ticks per side \
                 ({} / {})",
                self.max_degrees, self.degrees_per_tick
            ));
        }
        Ok(())
    }

    fn points_per_degree(&self) -> f64 {
        self.tick_spacing / self.degrees_per_tick
    }

    // Usable as a clamp bound even when the value was never validated.
    fn limit(&self) -> f64 {
        if self.max_degrees.is_nan() {
            0.0
        } else {
            self.max_degrees.abs()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Offset from the bar centre, in points.
    pub offset: f64,
    pub degrees: f64,
    pub labelled: bool,
}

/// Angle in radians after dragging the marker `dx` points from where it was
/// at `start_angle`. Clamped to the bar's range.
pub fn angle_for_drag(start_angle: f64, dx: f64, cfg: &RotationBarConfig) -> f64 {
    let degrees = start_angle.to_degrees() + dx / cfg.points_per_degree();
    let limit = cfg.limit();
    degrees.clamp(-limit, limit).to_radians()
}

/// Marker offset from the bar centre for `angle` radians.
pub fn indicator_offset(angle: f64, cfg: &RotationBarConfig) -> f64 {
    let limit = cfg.limit();
    angle.to_degrees().clamp(-limit, limit) * cfg.points_per_degree()
}

/// Angle in radians under a point `offset` points from the bar centre.
pub fn angle_at_offset(offset: f64, cfg: &RotationBarConfig) -> f64 {
    angle_for_drag(0.0, offset, cfg)
}

pub fn ticks(cfg: &RotationBarConfig) -> Vec<Tick> {
    if !(cfg.degrees_per_tick > 0.0 && cfg.max_degrees > 0.0) {
        return Vec::new();
    }
    let per_side = (cfg.max_degrees / cfg.degrees_per_tick).floor() as i64;
    let per_side = per_side.min(MAX_TICKS_PER_SIDE);
    let label_every = i64::from(cfg.label_every.max(1));
    (-per_side..=per_side)
        .map(|i| {
            let degrees = i as f64 * cfg.degrees_per_tick;
            Tick {
                offset: degrees * cfg.points_per_degree(),
                degrees,
                labelled: i % label_every == 0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_drag_maps_points_to_degrees() {
        let cfg = RotationBarConfig::default();
        // 8 points per 5 degrees
        let a = angle_for_drag(0.0, 16.0, &cfg);
        assert_abs_diff_eq!(a.to_degrees(), 10.0, epsilon = 1e-9);
        let b = angle_for_drag(a, -32.0, &cfg);
        assert_abs_diff_eq!(b.to_degrees(), -10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_drag_clamps() {
        let cfg = RotationBarConfig {
            max_degrees: 45.0,
            ..Default::default()
        };
        let right = angle_for_drag(0.0, 10_000.0, &cfg);
        let left = angle_for_drag(0.0, -10_000.0, &cfg);
        assert_abs_diff_eq!(right.to_degrees(), 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(left.to_degrees(), -45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bad_range_does_not_panic() {
        let negative: RotationBarConfig = toml::from_str("max_degrees = -10.0").unwrap();
        assert!(negative.validate().is_err());
        let a = angle_for_drag(0.0, 5000.0, &negative);
        assert_abs_diff_eq!(a.to_degrees(), 10.0, epsilon = 1e-9);
        assert!(indicator_offset(a, &negative).is_finite());
        assert!(ticks(&negative).is_empty());

        let nan = RotationBarConfig {
            max_degrees: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
        assert_eq!(angle_for_drag(0.3, 50.0, &nan), 0.0);
        assert!(ticks(&nan).is_empty());
    }

    #[test]
    fn test_tiny_tick_step_is_bounded() {
        let cfg = RotationBarConfig {
            degrees_per_tick: 1e-12,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        assert_eq!(ticks(&cfg).len() as i64, 2 * MAX_TICKS_PER_SIDE + 1);
        assert!(RotationBarConfig::default().validate().is_ok());
    }

    #[test]
    fn test_indicator_round_trip() {
        let cfg = RotationBarConfig::default();
        let angle = 33f64.to_radians();
        let off = indicator_offset(angle, &cfg);
        assert_abs_diff_eq!(angle_at_offset(off, &cfg), angle, epsilon = 1e-12);
        assert!(off.abs() <= cfg.width() / 2.0);
    }

    #[test]
    fn test_ticks_span_bar() {
        let cfg = RotationBarConfig::default();
        let t = ticks(&cfg);
        assert_eq!(t.len(), 73);
        assert_abs_diff_eq!(t[0].offset, -cfg.width() / 2.0, epsilon = 1e-9);
        assert!(t[36].labelled && t[36].degrees == 0.0);
        assert_eq!(t.iter().filter(|t| t.labelled).count(), 25);
    }
}
