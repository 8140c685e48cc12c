//! Physical constants of the rope world

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{RopeError, ensure_finite};

/// Canvas bounds and force constants injected into a [`Rope`](super::Rope)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    /// Canvas width (free point is clamped to `[0, width]`)
    pub width: f32,
    /// Canvas height (free point is clamped to `[0, height]`)
    pub height: f32,
    /// Downward acceleration added to the free point every second
    pub gravity: f32,
    /// Strength of the rope constraint. Only zero vs non-zero changes the
    /// direction of the impulse, but it is kept as a real coefficient.
    pub stiffness: f32,
    /// Fraction of velocity kept (and reversed) on a wall bounce
    pub damping: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            gravity: GRAVITY,
            stiffness: STIFFNESS,
            damping: BOUNCE_DAMPING,
        }
    }
}

impl PhysicsParams {
    /// Reject bounds and constants the integrator cannot work with
    pub fn validate(&self) -> Result<(), RopeError> {
        let width = ensure_finite(self.width, "width")?;
        let height = ensure_finite(self.height, "height")?;
        if width <= 0.0 || height <= 0.0 {
            return Err(RopeError::InvalidBounds { width, height });
        }

        ensure_finite(self.gravity, "gravity")?;
        let stiffness = ensure_finite(self.stiffness, "stiffness")?;
        if stiffness < 0.0 {
            return Err(RopeError::InvalidParameter {
                name: "stiffness",
                value: stiffness,
            });
        }
        ensure_finite(self.damping, "damping")?;
        Ok(())
    }

    /// Whether a point lies inside the canvas (edges included)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = PhysicsParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.width, 800.0);
        assert_eq!(params.damping, 0.8);
    }

    #[test]
    fn test_rejects_degenerate_bounds() {
        let params = PhysicsParams {
            height: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(RopeError::InvalidBounds { .. })
        ));

        let params = PhysicsParams {
            width: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(RopeError::NonFinite { name: "width" })
        );
    }

    #[test]
    fn test_rejects_negative_stiffness() {
        let params = PhysicsParams {
            stiffness: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(RopeError::InvalidParameter { name: "stiffness", .. })
        ));
    }

    #[test]
    fn test_contains_includes_edges() {
        let params = PhysicsParams::default();
        assert!(params.contains(Vec2::new(0.0, 800.0)));
        assert!(!params.contains(Vec2::new(-0.1, 10.0)));
        assert!(!params.contains(Vec2::new(10.0, 800.5)));
    }
}
