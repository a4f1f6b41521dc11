//! Demo catalog
//!
//! One parameterized scene builder instead of per-demo init functions: each
//! demo is an entity roster plus camera/windmill/light defaults. The sketch
//! pad and polygon fan are canvas demos with their own small state.

pub mod polygon;
pub mod sketch;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

pub use polygon::PolygonDemo;
pub use sketch::SketchPad;

use crate::consts::SPINNER_DEG_PER_SEC;
use crate::renderer::draw;
use crate::renderer::vertex::colors;
use crate::sim::state::{Camera, Entity, EntityKind, GeometryId, SceneState, TextureId, Windmill};

/// The six demo programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DemoKind {
    /// Click-to-place brush points
    Sketch,
    /// Shaded n-gon fan plus the random star
    Polygon,
    /// Rock-paper-scissors tug of war
    #[default]
    Tug,
    /// Same match, textured quads
    TugTextured,
    /// Buildings, windmill and grass plane with a walkable camera
    Landscape,
    /// Spinning cube and mountain under toggleable lights
    Lighting,
}

impl DemoKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sketch" => Some(DemoKind::Sketch),
            "polygon" => Some(DemoKind::Polygon),
            "tug" => Some(DemoKind::Tug),
            "tug-textured" | "textured" => Some(DemoKind::TugTextured),
            "landscape" => Some(DemoKind::Landscape),
            "lighting" => Some(DemoKind::Lighting),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DemoKind::Sketch => "sketch",
            DemoKind::Polygon => "polygon",
            DemoKind::Tug => "tug",
            DemoKind::TugTextured => "tug-textured",
            DemoKind::Landscape => "landscape",
            DemoKind::Lighting => "lighting",
        }
    }

    /// Background clear color for this demo
    pub fn clear_color(&self) -> [f64; 4] {
        match self {
            DemoKind::Sketch | DemoKind::Polygon => colors::CANVAS,
            DemoKind::Tug | DemoKind::TugTextured => colors::SKY_TUG,
            DemoKind::Landscape | DemoKind::Lighting => colors::SKY_3D,
        }
    }

    pub fn is_3d(&self) -> bool {
        matches!(self, DemoKind::Landscape | DemoKind::Lighting)
    }
}

/// Build the scene for a demo. Entities are fixed from here on; insertion
/// order is draw order.
pub fn build_scene(kind: DemoKind, seed: u64) -> SceneState {
    let mut state = SceneState::new(seed);
    match kind {
        DemoKind::Sketch | DemoKind::Polygon => {}
        DemoKind::Tug => tug_roster(&mut state, false),
        DemoKind::TugTextured => tug_roster(&mut state, true),
        DemoKind::Landscape => landscape_roster(&mut state),
        DemoKind::Lighting => lighting_roster(&mut state),
    }
    state
}

/// View-projection for the demo: perspective for the 3D scenes, identity
/// (clip-space shapes) everywhere else.
pub fn scene_view_proj(kind: DemoKind, state: &SceneState, aspect: f32) -> Mat4 {
    if kind.is_3d() {
        draw::view_proj(&state.camera, aspect)
    } else {
        Mat4::IDENTITY
    }
}

fn tug_roster(state: &mut SceneState, textured: bool) {
    let paint = |entity: &mut Entity, color: [f32; 4], texture: TextureId| {
        if textured {
            entity.texture = Some(texture);
        } else {
            entity.color = Some(color);
        }
    };

    let mut floor = Entity::new(EntityKind::Scenery, GeometryId::Floor);
    paint(&mut floor, colors::FLOOR_GRASS, TextureId::Grass);

    let mut mud = Entity::new(EntityKind::Scenery, GeometryId::Mud);
    paint(&mut mud, colors::MUD, TextureId::Burlap);

    let mut rope = Entity::new(EntityKind::Rope, GeometryId::Rope);
    rope.position = Vec3::new(0.0, -0.34, 0.0);
    rope.tug_affected = true;
    paint(&mut rope, colors::ROPE, TextureId::Burlap);

    let mut player = Entity::new(EntityKind::Player, GeometryId::Person);
    player.position = Vec3::new(-0.3, -0.34, 0.0);
    player.tug_affected = true;
    paint(&mut player, colors::PLAYER, TextureId::BlueCloth);

    let mut opponent = Entity::new(EntityKind::Opponent, GeometryId::Person);
    opponent.position = Vec3::new(0.3, -0.34, 0.0);
    opponent.tug_affected = true;
    paint(&mut opponent, colors::OPPONENT, TextureId::RedCloth);

    state.entities = vec![floor, mud, rope, player, opponent];
}

fn landscape_roster(state: &mut SceneState) {
    state.camera = Camera::facing(270.0, Vec3::new(0.0, 0.0, -30.0));
    state.windmill = Windmill::running();

    // Five buildings, cube face colors as authored
    let buildings = [
        (Vec3::new(0.0, 2.0, 30.0), 90.0, Vec3::Y),
        (Vec3::new(10.0, 2.0, 20.0), 270.0, Vec3::X),
        (Vec3::new(-10.0, 2.0, 20.0), 0.0, Vec3::new(1.0, 1.0, 0.0)),
        (Vec3::new(15.0, 2.0, 10.0), 90.0, Vec3::Z),
        (Vec3::new(-15.0, 2.0, 10.0), 180.0, Vec3::new(1.0, 1.0, 0.0)),
    ];
    for (position, rotation_deg, axis) in buildings {
        let mut building = Entity::new(EntityKind::Scenery, GeometryId::Cube);
        building.position = position;
        building.rotation_deg = rotation_deg;
        building.rotation_axis = axis;
        building.scale = Vec3::new(2.0, 4.0, 2.0);
        state.entities.push(building);
    }

    let mut base = Entity::new(EntityKind::WindmillBase, GeometryId::Cube);
    base.position = Vec3::new(10.0, 1.0, -10.0);
    base.scale = Vec3::new(0.3, 3.0, 0.3);
    base.color = Some(colors::WINDMILL_BASE);
    state.entities.push(base);

    for index in 0..4u8 {
        let mut blade = Entity::new(EntityKind::FanBlade(index), GeometryId::Cube);
        blade.position = Vec3::new(10.0, 3.0, -10.0);
        blade.scale = Vec3::new(0.4, 1.5, 0.2);
        blade.color = Some(colors::BLADES[index as usize]);
        state.entities.push(blade);
    }

    let mut ground = Entity::new(EntityKind::Scenery, GeometryId::Cube);
    ground.position = Vec3::new(0.0, -1.6, 0.0);
    ground.scale = Vec3::new(100.0, 0.01, 100.0);
    ground.texture = Some(TextureId::Grass);
    ground.color = Some([1.0; 4]);
    state.entities.push(ground);
}

fn lighting_roster(state: &mut SceneState) {
    state.camera = Camera::facing(270.0, Vec3::new(0.0, 0.0, -15.0));
    state.lights = [true, true];

    let mut cube = Entity::new(EntityKind::Spinner, GeometryId::Cube);
    cube.position = Vec3::new(6.0, 0.5, 2.0);
    cube.scale = Vec3::splat(2.0);
    cube.rotation_axis = Vec3::Y;
    cube.spin_deg_per_sec = SPINNER_DEG_PER_SEC;
    cube.color = Some(colors::SPIN_CUBE);
    cube.lit = true;
    state.entities.push(cube);

    for (index, position) in [Vec3::new(0.0, 2.0, 0.0), Vec3::new(6.0, 1.0, -5.0)]
        .into_iter()
        .enumerate()
    {
        let mut marker = Entity::new(EntityKind::LightMarker(index as u8), GeometryId::Cube);
        marker.position = position;
        marker.color = Some(colors::LIGHT_MARKER);
        marker.lit = true;
        state.entities.push(marker);
    }

    let mut mountain = Entity::new(EntityKind::Spinner, GeometryId::Pyramid);
    mountain.position = Vec3::new(-6.0, 2.0, 2.0);
    mountain.scale = Vec3::splat(3.0);
    mountain.rotation_axis = Vec3::Y;
    mountain.spin_deg_per_sec = SPINNER_DEG_PER_SEC;
    mountain.color = Some(colors::MOUNTAIN);
    mountain.lit = true;
    state.entities.push(mountain);

    let mut ground = Entity::new(EntityKind::Scenery, GeometryId::Cube);
    ground.position = Vec3::new(0.0, -1.6, 0.0);
    ground.scale = Vec3::new(100.0, 0.01, 100.0);
    ground.texture = Some(TextureId::Grass);
    ground.color = Some([1.0; 4]);
    state.entities.push(ground);
}
