//! Host capabilities the app draws and plays sounds through
//!
//! The browser build backs these with WebGPU and Web Audio; tests back them
//! with recorders.

use glam::Vec2;

use crate::error::AudioError;

/// RGBA color, components in `[0, 1]`
pub type Color = [f32; 4];

/// Opaque gray from an 8-bit level, like `background(220)`
pub fn gray(level: u8) -> Color {
    let v = level as f32 / 255.0;
    [v, v, v, 1.0]
}

/// Immediate-mode 2D drawing in canvas coordinates (origin top-left, y down)
pub trait DrawSurface {
    /// Clear the whole canvas
    fn background(&mut self, color: Color);
    /// Width of subsequent lines and circle outlines, in canvas units
    fn stroke_weight(&mut self, weight: f32);
    /// Stroked line segment
    fn line(&mut self, from: Vec2, to: Vec2);
    /// Filled and stroked circle
    fn circle(&mut self, center: Vec2, diameter: f32);
    /// Filled rectangle without outline
    fn rect(&mut self, min: Vec2, size: Vec2, color: Color);
}

/// Something that can play the rope's impact sound
pub trait ImpactAudio {
    /// Play one impact at `volume` in `[0, 1]`
    fn play_impact(&mut self, volume: f32) -> Result<(), AudioError>;
}

/// Audio sink for hosts without sound
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl ImpactAudio for Silent {
    fn play_impact(&mut self, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_levels() {
        assert_eq!(gray(0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(gray(255), [1.0, 1.0, 1.0, 1.0]);
        let g = gray(220);
        assert!((g[0] - 0.8627).abs() < 1e-3);
        assert_eq!(g[3], 1.0);
    }
}
