//! Drawing surface that records geometry for one frame

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::surface::{Color, DrawSurface, gray};

/// Segments used for endpoint circles
const CIRCLE_SEGMENTS: u32 = 24;

/// Collects tessellated shapes until the renderer uploads them
#[derive(Debug, Clone)]
pub struct ShapeBatch {
    vertices: Vec<Vertex>,
    clear_color: Color,
    stroke_weight: f32,
}

impl Default for ShapeBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeBatch {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            clear_color: gray(0),
            stroke_weight: 1.0,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl DrawSurface for ShapeBatch {
    fn background(&mut self, color: Color) {
        // Everything queued so far would be painted over
        self.vertices.clear();
        self.clear_color = color;
    }

    fn stroke_weight(&mut self, weight: f32) {
        self.stroke_weight = weight.max(0.0);
    }

    fn line(&mut self, from: Vec2, to: Vec2) {
        self.vertices
            .extend(shapes::thick_line(from, to, self.stroke_weight, colors::STROKE));
    }

    fn circle(&mut self, center: Vec2, diameter: f32) {
        let radius = diameter * 0.5;
        self.vertices
            .extend(shapes::circle(center, radius, colors::FILL, CIRCLE_SEGMENTS));

        if self.stroke_weight > 0.0 {
            let half = self.stroke_weight * 0.5;
            self.vertices.extend(shapes::ring(
                center,
                (radius - half).max(0.0),
                radius + half,
                colors::STROKE,
                CIRCLE_SEGMENTS,
            ));
        }
    }

    fn rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.vertices.extend(shapes::rect(min, size, color));
    }
}
