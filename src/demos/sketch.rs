//! Sketch pad: click to place brush points
//!
//! The point list is append-only; every placement redraws the whole set.

use glam::Mat4;

use crate::renderer::draw::{DrawDevice, Primitive};
use crate::renderer::shapes::point_quad;

/// One placed point with the brush values at placement time
#[derive(Debug, Clone, Copy)]
pub struct BrushPoint {
    pub x: f32,
    pub y: f32,
    pub color: [f32; 4],
    /// Quad side length in clip-space units
    pub size: f32,
}

/// The canvas of placed points
#[derive(Debug, Default)]
pub struct SketchPad {
    points: Vec<BrushPoint>,
}

impl SketchPad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a point at clip-space (x, y) with the current brush
    pub fn place(&mut self, x: f32, y: f32, color: [f32; 4], size: f32) {
        self.points.push(BrushPoint { x, y, color, size });
        log::debug!("placed point {} at ({:.3}, {:.3})", self.points.len(), x, y);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Redraw every placed point, oldest first
    pub fn draw(&self, device: &mut dyn DrawDevice) {
        device.set_view_proj(Mat4::IDENTITY);
        device.set_transform(Mat4::IDENTITY);
        device.bind_texture(None);
        device.set_lights(None);
        device.set_color(None);
        for point in &self.points {
            device.draw_slice(
                &point_quad(point.x, point.y, point.size, point.color),
                Primitive::Triangles,
            );
        }
    }
}

/// Canvas pixel coordinates to clip space, y flipped
pub fn canvas_to_ndc(px: f32, py: f32, width: f32, height: f32) -> (f32, f32) {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    ((px - half_w) / half_w, (half_h - py) / half_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_to_ndc_center_and_corners() {
        let (x, y) = canvas_to_ndc(200.0, 150.0, 400.0, 300.0);
        assert_eq!((x, y), (0.0, 0.0));
        let (x, y) = canvas_to_ndc(0.0, 0.0, 400.0, 300.0);
        assert_eq!((x, y), (-1.0, 1.0));
        let (x, y) = canvas_to_ndc(400.0, 300.0, 400.0, 300.0);
        assert_eq!((x, y), (1.0, -1.0));
    }

    #[test]
    fn test_points_accumulate_in_order() {
        let mut pad = SketchPad::new();
        assert!(pad.is_empty());
        pad.place(0.0, 0.0, [1.0, 0.0, 0.0, 1.0], 0.05);
        pad.place(0.5, -0.5, [0.0, 1.0, 0.0, 1.0], 0.1);
        assert_eq!(pad.len(), 2);
        assert_eq!(pad.points[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(pad.points[1].size, 0.1);
    }
}
