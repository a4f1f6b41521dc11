//! Polygon fan demo plus the random star
//!
//! The n-gon is drawn slice by slice, each slice re-uploaded and drawn with
//! its own darkened fill. The star picks a random primitive and color on
//! every press.

use glam::Mat4;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::MIN_SIDES;
use crate::renderer::draw::{DrawDevice, Primitive};
use crate::renderer::shapes::{ShadeStyle, fan_slices, star_vertices};

/// Side count, shading style and intensity for the fan
#[derive(Debug, Clone)]
pub struct PolygonDemo {
    pub sides: u32,
    pub style: ShadeStyle,
    pub intensity: f32,
    radius: f32,
}

impl PolygonDemo {
    pub fn new(intensity: f32) -> Self {
        Self {
            sides: MIN_SIDES,
            style: ShadeStyle::Mid,
            intensity,
            radius: 0.5,
        }
    }

    pub fn increment_sides(&mut self) {
        self.sides += 1;
    }

    /// Decrease the side count; a triangle is the floor. Returns whether
    /// anything changed.
    pub fn decrement_sides(&mut self) -> bool {
        if self.sides > MIN_SIDES {
            self.sides -= 1;
            true
        } else {
            log::debug!("side decrement rejected at {}", self.sides);
            false
        }
    }

    pub fn set_style(&mut self, style: ShadeStyle) {
        self.style = style;
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    pub fn reset(&mut self) {
        self.sides = MIN_SIDES;
        self.style = ShadeStyle::Mid;
    }

    /// Draw the fan, one draw call per slice
    pub fn draw(&self, device: &mut dyn DrawDevice) {
        device.set_view_proj(Mat4::IDENTITY);
        device.set_transform(Mat4::IDENTITY);
        device.bind_texture(None);
        device.set_lights(None);

        match fan_slices(self.sides, self.radius, self.intensity, self.style) {
            Ok(slices) => {
                for slice in &slices {
                    device.set_color(Some(slice.color));
                    device.draw_slice(&slice.vertices, Primitive::Triangles);
                }
            }
            Err(err) => log::warn!("fan skipped: {}", err),
        }
    }

    /// Draw the star with a random color and a random primitive
    pub fn draw_star(&self, rng: &mut Pcg32, device: &mut dyn DrawDevice) {
        device.set_view_proj(Mat4::IDENTITY);
        device.set_transform(Mat4::IDENTITY);
        device.bind_texture(None);
        device.set_lights(None);

        let color = [random_channel(rng), random_channel(rng), random_channel(rng), 1.0];
        device.set_color(Some(color));
        device.set_point_size(0.05);

        let primitive = match rng.random_range(1..=7) {
            1 => Primitive::Points,
            2 => Primitive::Lines,
            3 => Primitive::LineStrip,
            4 => Primitive::LineLoop,
            5 => Primitive::Triangles,
            6 => Primitive::TriangleStrip,
            _ => Primitive::TriangleFan,
        };
        device.draw_slice(&star_vertices(), primitive);
    }
}

impl Default for PolygonDemo {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Random color channel in [0.10, 1.00], two-decimal steps
fn random_channel(rng: &mut Pcg32) -> f32 {
    rng.random_range(10..=100) as f32 * 0.01
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Vertex;
    use rand::SeedableRng;

    /// Counts draw calls and remembers the last primitive
    #[derive(Default)]
    struct CountingDevice {
        draws: usize,
        colors: Vec<[f32; 4]>,
        last_primitive: Option<Primitive>,
    }

    impl DrawDevice for CountingDevice {
        fn bind_geometry(&mut self, _geometry: crate::sim::state::GeometryId) {}
        fn bind_texture(&mut self, _texture: Option<crate::sim::state::TextureId>) {}
        fn set_view_proj(&mut self, _view_proj: Mat4) {}
        fn set_transform(&mut self, _model: Mat4) {}
        fn set_color(&mut self, color: Option<[f32; 4]>) {
            if let Some(color) = color {
                self.colors.push(color);
            }
        }
        fn set_lights(&mut self, _rig: Option<&crate::renderer::LightRig>) {}
        fn set_point_size(&mut self, _size: f32) {}
        fn draw_bound(&mut self) {}
        fn draw_slice(&mut self, _vertices: &[Vertex], primitive: Primitive) {
            self.draws += 1;
            self.last_primitive = Some(primitive);
        }
    }

    #[test]
    fn test_one_draw_per_slice() {
        let mut demo = PolygonDemo::new(0.9);
        for _ in 0..5 {
            demo.increment_sides();
        }
        assert_eq!(demo.sides, 8);

        let mut device = CountingDevice::default();
        demo.draw(&mut device);
        assert_eq!(device.draws, 8);
        assert_eq!(device.colors.len(), 8);
        // First slice full red, later slices darker
        assert_eq!(device.colors[0][0], 1.0);
        assert!(device.colors[7][0] < device.colors[0][0]);
    }

    #[test]
    fn test_decrement_floors_at_triangle() {
        let mut demo = PolygonDemo::default();
        assert!(!demo.decrement_sides());
        assert_eq!(demo.sides, MIN_SIDES);
        demo.increment_sides();
        assert!(demo.decrement_sides());
        assert_eq!(demo.sides, MIN_SIDES);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut demo = PolygonDemo::default();
        demo.increment_sides();
        demo.set_style(ShadeStyle::Top);
        demo.reset();
        assert_eq!(demo.sides, MIN_SIDES);
        assert_eq!(demo.style, ShadeStyle::Mid);
    }

    #[test]
    fn test_star_color_in_range_and_deterministic() {
        let mut device = CountingDevice::default();
        let demo = PolygonDemo::default();
        let mut rng = Pcg32::seed_from_u64(9);
        demo.draw_star(&mut rng, &mut device);
        assert_eq!(device.draws, 1);
        let color = device.colors.last().unwrap();
        for channel in &color[0..3] {
            assert!((0.1..=1.0).contains(channel));
        }

        let mut device2 = CountingDevice::default();
        let mut rng2 = Pcg32::seed_from_u64(9);
        demo.draw_star(&mut rng2, &mut device2);
        assert_eq!(device2.colors, device.colors);
        assert_eq!(device2.last_primitive, device.last_primitive);
    }
}
