//! Rope Swing - a single draggable rope with a bouncing free end
//!
//! Core modules:
//! - `sim`: Rope physics (gravity, wall bounces, length constraint)
//! - `app`: Host-facing lifecycle driven by frames and pointer events
//! - `surface`: Drawing and audio capabilities injected by the host
//! - `renderer`: WebGPU tessellation and pipeline for the drawing surface
//! - `audio`: Procedural impact sound (Web Audio in the browser)

pub mod app;
pub mod audio;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod surface;

pub use app::RopeApp;
pub use error::{AudioError, RopeError};
pub use settings::{Settings, Variant};
pub use surface::{DrawSurface, ImpactAudio, Silent};

use glam::Vec2;

/// Rope configuration constants
pub mod consts {
    use glam::Vec2;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Downward acceleration of the free point
    pub const GRAVITY: f32 = 9.82;
    /// Constraint stiffness of the near-rigid rope
    pub const STIFFNESS: f32 = 1e10;
    /// Velocity kept (and reversed) on a wall bounce
    pub const BOUNCE_DAMPING: f32 = 0.8;
    /// Frame time assumed before the first frame arrives
    pub const NOMINAL_DT: f32 = 1.0 / 60.0;

    /// Rope defaults
    pub const ROPE_LENGTH: f32 = 300.0;
    pub const ANCHOR_START: Vec2 = Vec2::new(100.0, 100.0);

    /// Drawing
    pub const CURVE_SEGMENTS: usize = 100;
    pub const ROPE_STROKE: f32 = 6.0;
    pub const ENDPOINT_STROKE: f32 = 3.0;
    pub const ENDPOINT_DIAMETER: f32 = 20.0;
    pub const BACKGROUND_GRAY: u8 = 220;

    /// Impact sound
    pub const MAX_IMPACT_VOLUME: f32 = 0.2;
    pub const MIN_IMPACT_VOLUME: f32 = 0.008;
    /// Length of (400, 400)
    pub const IMPACT_REFERENCE_SPEED: f32 = 565.685_4;
}

/// Map a point in canvas space (origin top-left, y down) to normalized device coordinates
#[inline]
pub fn canvas_to_ndc(p: Vec2, canvas: Vec2) -> Vec2 {
    Vec2::new(p.x / canvas.x * 2.0 - 1.0, 1.0 - p.y / canvas.y * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_to_ndc_corners() {
        let canvas = Vec2::new(800.0, 800.0);
        assert_eq!(canvas_to_ndc(Vec2::ZERO, canvas), Vec2::new(-1.0, 1.0));
        assert_eq!(canvas_to_ndc(canvas, canvas), Vec2::new(1.0, -1.0));
        assert_eq!(canvas_to_ndc(canvas * 0.5, canvas), Vec2::ZERO);
    }

    #[test]
    fn test_reference_speed_matches_diagonal() {
        let diagonal = Vec2::new(400.0, 400.0).length();
        assert!((consts::IMPACT_REFERENCE_SPEED - diagonal).abs() < 1e-3);
    }
}
