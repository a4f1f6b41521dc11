//! Draw dispatch
//!
//! Turns a `SceneState` into an ordered stream of device calls: one draw per
//! active entity, roster order, with geometry/texture/uniform state re-bound
//! before every draw. Pure with respect to the scene; all mutation happens in
//! the device.

use glam::{Mat4, Vec3};

use super::vertex::Vertex;
use crate::consts::{CAM_FAR, CAM_FOV_DEG, CAM_NEAR};
use crate::sim::state::{Camera, Entity, EntityKind, GeometryId, SceneState, TextureId};

/// Draw primitive, matching what the demo shapes are authored as. The
/// backend lowers fans, loops and points to what the GPU supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// One point light: position and color (black when toggled off)
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
}

/// The lighting scene's full rig: one directional light, ambient, two
/// toggleable point lights.
#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    pub direction: Vec3,
    pub directional_color: [f32; 3],
    pub ambient: [f32; 3],
    pub points: [PointLight; 2],
}

impl LightRig {
    /// Rig for the current scene; disabled point lights contribute black.
    pub fn from_scene(state: &SceneState) -> Self {
        let on = [1.0, 1.0, 1.0];
        let off = [0.0, 0.0, 0.0];
        Self {
            direction: Vec3::ONE.normalize(),
            directional_color: [1.0, 1.0, 1.0],
            ambient: [0.2, 0.2, 0.2],
            points: [
                PointLight {
                    position: Vec3::new(0.0, 2.0, 0.0),
                    color: if state.lights[0] { on } else { off },
                },
                PointLight {
                    position: Vec3::new(6.0, 1.0, -5.0),
                    color: if state.lights[1] { on } else { off },
                },
            ],
        }
    }
}

/// Rendering primitive collaborator. The dispatcher drives this; the wgpu
/// backend and the test recorder implement it.
pub trait DrawDevice {
    /// Select the static geometry the next draw uses
    fn bind_geometry(&mut self, geometry: GeometryId);
    /// Select the texture for the next draw; None draws untextured
    fn bind_texture(&mut self, texture: Option<TextureId>);
    /// View-projection for subsequent draws (identity for the 2D scenes)
    fn set_view_proj(&mut self, view_proj: Mat4);
    /// Model transform for the next draw
    fn set_transform(&mut self, model: Mat4);
    /// Solid fill override; None uses per-vertex colors
    fn set_color(&mut self, color: Option<[f32; 4]>);
    /// Light rig for the next draw; None renders unlit
    fn set_lights(&mut self, rig: Option<&LightRig>);
    /// Side length used when expanding point primitives
    fn set_point_size(&mut self, size: f32);
    /// Draw the currently bound geometry with the current bindings
    fn draw_bound(&mut self);
    /// Immediate-mode draw of a transient vertex list (fan slices, brush
    /// points, the star)
    fn draw_slice(&mut self, vertices: &[Vertex], primitive: Primitive);
}

/// Perspective-times-view for a 3D scene camera
pub fn view_proj(camera: &Camera, aspect: f32) -> Mat4 {
    let proj = Mat4::perspective_rh(CAM_FOV_DEG.to_radians(), aspect, CAM_NEAR, CAM_FAR);
    let view = Mat4::look_at_rh(camera.eye, camera.eye + camera.look, Vec3::Y);
    proj * view
}

/// Model transform for one entity: translate ∘ rotate ∘ scale, except for
/// the windmill pieces whose chains hang off the shared windmill state.
pub fn entity_transform(entity: &Entity, state: &SceneState) -> Mat4 {
    let translate = Mat4::from_translation(entity.position);
    let scale = Mat4::from_scale(entity.scale);

    match entity.kind {
        EntityKind::WindmillBase => {
            translate
                * Mat4::from_rotation_y(-state.windmill.fan_turn.to_radians())
                * Mat4::from_rotation_x(270.0_f32.to_radians())
                * scale
        }
        EntityKind::FanBlade(index) => {
            let blade_angle = state.windmill.fan_angle + 90.0 * f32::from(index);
            translate
                * Mat4::from_rotation_y(-state.windmill.fan_turn.to_radians())
                * Mat4::from_translation(Vec3::new(0.0, 0.0, -0.6))
                * Mat4::from_rotation_z(blade_angle.to_radians())
                * Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0))
                * scale
        }
        EntityKind::LightMarker(index) => {
            let lit = state
                .lights
                .get(index as usize)
                .copied()
                .unwrap_or(false);
            let s = if lit { 0.5 } else { 0.1 };
            translate * Mat4::from_scale(Vec3::splat(s))
        }
        _ => {
            let axis = entity.rotation_axis.try_normalize().unwrap_or(Vec3::Z);
            translate * Mat4::from_axis_angle(axis, entity.rotation_deg.to_radians()) * scale
        }
    }
}

/// Issue one draw per active entity in roster order, re-binding everything
/// per entity.
pub fn dispatch_scene(state: &SceneState, view_proj: Mat4, device: &mut dyn DrawDevice) {
    device.set_view_proj(view_proj);
    let rig = LightRig::from_scene(state);

    for entity in state.entities.iter().filter(|e| e.active) {
        device.bind_geometry(entity.geometry);
        device.bind_texture(entity.texture);
        device.set_color(entity.color);
        device.set_lights(if entity.lit { Some(&rig) } else { None });
        device.set_transform(entity_transform(entity, state));
        device.draw_bound();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Entity;

    /// Records device calls for dispatch-order assertions
    #[derive(Default)]
    struct RecordingDevice {
        ops: Vec<String>,
        transforms: Vec<Mat4>,
    }

    impl DrawDevice for RecordingDevice {
        fn bind_geometry(&mut self, geometry: GeometryId) {
            self.ops.push(format!("geometry:{:?}", geometry));
        }
        fn bind_texture(&mut self, texture: Option<TextureId>) {
            self.ops.push(format!("texture:{:?}", texture));
        }
        fn set_view_proj(&mut self, _view_proj: Mat4) {
            self.ops.push("view_proj".into());
        }
        fn set_transform(&mut self, model: Mat4) {
            self.transforms.push(model);
            self.ops.push("transform".into());
        }
        fn set_color(&mut self, _color: Option<[f32; 4]>) {
            self.ops.push("color".into());
        }
        fn set_lights(&mut self, rig: Option<&LightRig>) {
            self.ops.push(format!("lights:{}", rig.is_some()));
        }
        fn set_point_size(&mut self, _size: f32) {}
        fn draw_bound(&mut self) {
            self.ops.push("draw".into());
        }
        fn draw_slice(&mut self, _vertices: &[Vertex], _primitive: Primitive) {
            self.ops.push("slice".into());
        }
    }

    #[test]
    fn test_dispatch_order_and_inactive_skip() {
        let mut state = SceneState::new(1);
        let mut a = Entity::new(EntityKind::Scenery, GeometryId::Floor);
        let mut b = Entity::new(EntityKind::Scenery, GeometryId::Mud);
        b.active = false;
        let c = Entity::new(EntityKind::Rope, GeometryId::Rope);
        a.texture = Some(TextureId::Grass);
        state.entities = vec![a, b, c];

        let mut device = RecordingDevice::default();
        dispatch_scene(&state, Mat4::IDENTITY, &mut device);

        let draws = device.ops.iter().filter(|op| *op == "draw").count();
        assert_eq!(draws, 2, "inactive entity skipped");
        let geoms: Vec<&String> = device
            .ops
            .iter()
            .filter(|op| op.starts_with("geometry"))
            .collect();
        assert_eq!(geoms, ["geometry:Floor", "geometry:Rope"]);
        // Every draw re-binds: geometry, texture, color, lights, transform
        assert_eq!(device.ops.iter().filter(|op| op.starts_with("texture")).count(), 2);
    }

    #[test]
    fn test_generic_transform_composition_order() {
        let mut state = SceneState::new(1);
        let mut e = Entity::new(EntityKind::Scenery, GeometryId::Cube);
        e.position = Vec3::new(1.0, 2.0, 3.0);
        e.rotation_deg = 90.0;
        e.rotation_axis = Vec3::Z;
        e.scale = Vec3::new(2.0, 1.0, 1.0);
        state.entities = vec![e.clone()];

        let m = entity_transform(&e, &state);
        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_z(90.0_f32.to_radians())
            * Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        assert!(m.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_light_marker_scale_tracks_toggle() {
        let mut state = SceneState::new(1);
        let e = Entity::new(EntityKind::LightMarker(0), GeometryId::Cube);
        state.entities = vec![e.clone()];

        let on = entity_transform(&e, &state);
        assert!((on.x_axis.x - 0.5).abs() < 1e-6);

        state.lights[0] = false;
        let off = entity_transform(&e, &state);
        assert!((off.x_axis.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_fan_blades_fan_out_by_quarter_turns() {
        let mut state = SceneState::new(1);
        state.windmill.fan_angle = 0.0;
        let mut blades: Vec<Mat4> = Vec::new();
        for i in 0..4u8 {
            let mut e = Entity::new(EntityKind::FanBlade(i), GeometryId::Cube);
            e.position = Vec3::new(10.0, 3.0, -10.0);
            e.scale = Vec3::new(0.4, 1.5, 0.2);
            blades.push(entity_transform(&e, &state));
        }
        // Opposite blades point opposite ways from the hub
        let tip = glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let p0 = blades[0] * tip;
        let p2 = blades[2] * tip;
        let hub = glam::Vec4::new(10.0, 3.0, -10.6, 1.0);
        let d0 = (p0 - hub).truncate();
        let d2 = (p2 - hub).truncate();
        assert!((d0 + d2).length() < 1e-4);
    }

    #[test]
    fn test_disabled_point_light_is_black() {
        let mut state = SceneState::new(1);
        state.lights = [true, false];
        let rig = LightRig::from_scene(&state);
        assert_eq!(rig.points[0].color, [1.0, 1.0, 1.0]);
        assert_eq!(rig.points[1].color, [0.0, 0.0, 0.0]);
    }
}
