//! The rope: a pointer-driven anchor tied to a free, bouncing endpoint
//!
//! The free point integrates gravity with explicit Euler steps, bounces off the
//! canvas walls with energy loss, and receives a unit impulse toward the anchor
//! whenever the rope is stretched past its rest length.

use glam::Vec2;

use super::params::PhysicsParams;
use crate::consts::*;
use crate::error::{RopeError, ensure_finite};

/// Wall axis a bounce happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left or right wall
    Horizontal,
    /// Floor or ceiling
    Vertical,
}

/// Things that happened during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RopeEvent {
    /// Free point hit a wall; `speed` is measured after the reflection
    Bounce { axis: Axis, speed: f32 },
}

/// A single rope segment between an anchor and a free endpoint
#[derive(Debug, Clone)]
pub struct Rope {
    /// Anchor endpoint, follows the pointer and is never clamped
    pub anchor: Vec2,
    /// Free endpoint
    pub free: Vec2,
    /// Free endpoint velocity (canvas units per frame)
    pub velocity: Vec2,
    /// Events from the most recent step
    pub events: Vec<RopeEvent>,
    rest_length: f32,
    params: PhysicsParams,
    /// Timestep of the current frame, used by the constraint impulse
    frame_dt: f32,
}

impl Rope {
    /// Create a rope at rest. Every coordinate must be finite and the length positive.
    pub fn new(
        anchor: Vec2,
        free: Vec2,
        rest_length: f32,
        params: PhysicsParams,
    ) -> Result<Self, RopeError> {
        ensure_finite(anchor.x, "x1")?;
        ensure_finite(anchor.y, "y1")?;
        ensure_finite(free.x, "x2")?;
        ensure_finite(free.y, "y2")?;
        let rest_length = ensure_finite(rest_length, "length")?;
        if rest_length <= 0.0 {
            return Err(RopeError::InvalidLength);
        }
        params.validate()?;

        Ok(Self {
            anchor,
            free,
            velocity: Vec2::ZERO,
            events: Vec::new(),
            rest_length,
            params,
            frame_dt: NOMINAL_DT,
        })
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Current distance between the two endpoints
    pub fn length(&self) -> f32 {
        self.anchor.distance(self.free)
    }

    /// Advance the free point by `dt` seconds of wall-clock time.
    ///
    /// Gravity first, then wall bounces checked against the predicted position,
    /// then the constraint impulse evaluated at that predicted position, and
    /// finally the clamped position update.
    pub fn step(&mut self, dt: f32) -> Result<(), RopeError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(RopeError::InvalidTimestep(dt));
        }
        self.events.clear();
        self.frame_dt = dt;

        let PhysicsParams {
            width,
            height,
            gravity,
            damping,
            ..
        } = self.params;

        self.velocity.y += gravity * dt;

        let next_y = self.free.y + self.velocity.y;
        if next_y < 0.0 || next_y > height {
            self.velocity.y *= -damping;
            self.record_bounce(Axis::Vertical);
        }

        let next_x = self.free.x + self.velocity.x;
        if next_x < 0.0 || next_x > width {
            self.velocity.x *= -damping;
            self.record_bounce(Axis::Horizontal);
        }

        let impulse = self.constraint_impulse(self.anchor, self.free + self.velocity);
        self.velocity += impulse;

        self.free.y = (self.free.y + self.velocity.y).clamp(0.0, height);
        self.free.x = (self.free.x + self.velocity.x).clamp(0.0, width);

        log::trace!(
            "rope step dt={:.4} free=({:.1}, {:.1}) vel=({:.3}, {:.3})",
            dt,
            self.free.x,
            self.free.y,
            self.velocity.x,
            self.velocity.y
        );
        Ok(())
    }

    /// Restoring impulse between `a` (anchor side) and `b` (free side).
    ///
    /// Zero while the rope is slack; otherwise a unit vector pointing from `b`
    /// back toward `a`.
    pub fn pulling_force(&self, a: Vec2, b: Vec2) -> Result<Vec2, RopeError> {
        ensure_finite(a.x, "x1")?;
        ensure_finite(a.y, "y1")?;
        ensure_finite(b.x, "x2")?;
        ensure_finite(b.y, "y2")?;
        Ok(self.constraint_impulse(a, b))
    }

    /// Move the anchor, tugging the free point if the new anchor stretches the rope
    pub fn set_anchor(&mut self, x: f32, y: f32) -> Result<(), RopeError> {
        let target = Vec2::new(ensure_finite(x, "x")?, ensure_finite(y, "y")?);
        self.velocity += self.constraint_impulse(target, self.free);
        self.anchor = target;
        Ok(())
    }

    /// How far the rope is below its rest length, in `[-rest_length, 0]`
    pub fn slack(&self) -> f32 {
        (self.length() - self.rest_length).clamp(-self.rest_length, 0.0)
    }

    /// Sample the sagging curve from anchor to free point.
    ///
    /// Returns `segments + 1` points at `t = i / segments`. The first point is
    /// exactly the anchor and the last exactly the free point.
    pub fn curve_points(&self, segments: usize) -> Vec<Vec2> {
        let segments = segments.max(1);
        let slack = self.slack();
        // cosh is even; folding onto |t - 0.5| makes both ends cancel exactly
        let sag = |t: f32| slack * (t - 0.5).abs().cosh();
        let start_sag = sag(0.0);

        (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let mut p = self.free * t + self.anchor * (1.0 - t);
                p.y += sag(t) - start_sag;
                p
            })
            .collect()
    }

    fn constraint_impulse(&self, a: Vec2, b: Vec2) -> Vec2 {
        let delta = b - a;
        if delta.length() <= self.rest_length {
            return Vec2::ZERO;
        }

        let angle = delta.y.atan2(delta.x);
        let reach = Vec2::from_angle(angle) * self.rest_length;
        let raw = (a - b - reach) * (self.frame_dt * self.params.stiffness);
        // Only the direction survives; zero or overflowing magnitudes give zero
        raw.normalize_or_zero()
    }

    fn record_bounce(&mut self, axis: Axis) {
        let speed = self.velocity.length();
        self.events.push(RopeEvent::Bounce { axis, speed });
    }
}
