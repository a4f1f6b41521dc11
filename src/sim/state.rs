//! Scene state and core simulation types
//!
//! One `SceneState` per demo, created at startup. The entity roster is fixed
//! after creation; draw order is insertion order.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{look_vector, wrap_degrees};

/// Handle to a piece of static geometry owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryId {
    /// Ground strip behind the tug match (triangle strip, 4 verts)
    Floor,
    /// Mud pit fan (triangle fan, 6 verts)
    Mud,
    /// Rope quad (triangle strip, 4 verts)
    Rope,
    /// Contestant quad (triangle strip, 4 verts)
    Person,
    /// Unit cube, 36 expanded verts with per-face colors
    Cube,
    /// Unit pyramid, 36 expanded verts
    Pyramid,
}

/// Handle to a procedural texture owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureId {
    Grass,
    Burlap,
    BlueCloth,
    RedCloth,
}

/// Role of an entity in the per-tick update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Static dressing; only drawn
    Scenery,
    /// The player's contestant (left side of the rope)
    Player,
    /// The AI contestant (right side of the rope)
    Opponent,
    /// The rope between them
    Rope,
    /// Windmill tower, yawed by the fan-turn angle
    WindmillBase,
    /// One windmill blade; the index picks the 90-degree offset
    FanBlade(u8),
    /// Marker cube for a toggleable point light (index into the light flags)
    LightMarker(u8),
    /// Continuously rotating showpiece (lighting-demo cube and mountain)
    Spinner,
}

/// A single drawable/animatable object with its own transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub geometry: GeometryId,
    /// Solid color override; None draws the geometry's per-vertex colors
    pub color: Option<[f32; 4]>,
    pub texture: Option<TextureId>,
    /// Translation (z unused by the 2D demos)
    pub position: Vec3,
    /// Rotation in degrees about `rotation_axis`, always in [0, 360)
    pub rotation_deg: f32,
    pub rotation_axis: Vec3,
    pub scale: Vec3,
    /// Continuous spin rate in degrees per second (0 = static)
    pub spin_deg_per_sec: f32,
    /// Whether the per-round pull translation applies to this entity
    pub tug_affected: bool,
    /// Whether this entity is shaded by the scene lights
    pub lit: bool,
    /// Inactive entities are skipped by both the stepper and the dispatcher
    pub active: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, geometry: GeometryId) -> Self {
        Self {
            kind,
            geometry,
            color: None,
            texture: None,
            position: Vec3::ZERO,
            rotation_deg: 0.0,
            rotation_axis: Vec3::Z,
            scale: Vec3::ONE,
            spin_deg_per_sec: 0.0,
            tug_affected: false,
            lit: false,
            active: true,
        }
    }

    /// Advance the continuous spin, keeping the angle wrapped
    pub fn spin(&mut self, dt: f32) {
        if self.spin_deg_per_sec != 0.0 {
            self.rotation_deg = wrap_degrees(self.rotation_deg + self.spin_deg_per_sec * dt);
        }
    }
}

/// First-person camera for the 3D scenes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Heading in degrees, always in [0, 360)
    pub angle: f32,
    pub eye: Vec3,
    /// Unit look direction, recomputed from `angle` after every turn
    pub look: Vec3,
}

impl Camera {
    /// Camera at `eye` facing `angle_deg`
    pub fn facing(angle_deg: f32, eye: Vec3) -> Self {
        let mut cam = Self {
            angle: wrap_degrees(angle_deg),
            eye,
            look: Vec3::ZERO,
        };
        cam.refresh_look();
        cam
    }

    /// Recompute the look vector as (cos a, 0, -sin a)
    pub fn refresh_look(&mut self) {
        let (x, z) = look_vector(self.angle);
        self.look = Vec3::new(x, 0.0, z);
    }

    /// Turn by `deg` (positive = left), wrapping and refreshing the look vector
    pub fn turn(&mut self, deg: f32) {
        self.angle = wrap_degrees(self.angle + deg);
        self.refresh_look();
    }

    /// Walk along the look vector (negative = backward)
    pub fn advance(&mut self, dist: f32) {
        self.eye += self.look * dist;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::facing(270.0, Vec3::ZERO)
    }
}

/// Windmill state for the landscape scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Windmill {
    /// Blade rotation in degrees, [0, 360)
    pub fan_angle: f32,
    /// Yaw of the whole mill in degrees, [0, 360)
    pub fan_turn: f32,
    /// Fan spins only while enabled (toggled by the player)
    pub fan_enabled: bool,
}

impl Windmill {
    pub fn running() -> Self {
        Self {
            fan_enabled: true,
            ..Self::default()
        }
    }

    pub fn toggle_fan(&mut self) {
        self.fan_enabled = !self.fan_enabled;
    }
}

/// Who took the tug match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Ai,
}

impl Winner {
    pub fn banner(&self) -> &'static str {
        match self {
            Winner::Player => "Player WINS!",
            Winner::Ai => "AI WINS!",
        }
    }
}

/// Tug match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to pick a hand
    Idle,
    /// A round was just resolved; the stepper picks it up next tick
    RoundInProgress,
    /// Pull animation running; `ticks_left` counts down from the move budget
    RoundAnimating { ticks_left: u32, direction: i8 },
    /// Score reached +/-3; only the terminal animation keeps running
    GameOver { winner: Winner },
}

/// Complete mutable state for one demo scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneState {
    /// Seed for the per-round AI hand draw
    pub seed: u64,
    /// Fixed roster; insertion order is draw order
    pub entities: Vec<Entity>,
    pub phase: GamePhase,
    /// Tug score, always within [-3, 3]
    pub score: i8,
    /// Rounds resolved so far (keys the AI hand draw)
    pub rounds_played: u32,
    /// Pull direction queued by the resolver, consumed exactly once per tick
    pub pending_pull: Option<i8>,
    pub camera: Camera,
    pub windmill: Windmill,
    /// Point-light enabled flags for the lighting scene
    pub lights: [bool; 2],
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Terminal latch: the shift-to-ground transition fires at most once
    pub ground_shift_done: bool,
}

impl SceneState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            entities: Vec::new(),
            phase: GamePhase::Idle,
            score: 0,
            rounds_played: 0,
            pending_pull: None,
            camera: Camera::default(),
            windmill: Windmill::default(),
            lights: [true, true],
            time_ticks: 0,
            ground_shift_done: false,
        }
    }

    /// Whether the tug match has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    /// First entity of the given kind, if present in this roster
    pub fn entity_of(&self, kind: EntityKind) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind == kind)
    }

    pub fn entity_of_mut(&mut self, kind: EntityKind) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.kind == kind)
    }

    /// Flip a point light; out-of-range indices are ignored
    pub fn toggle_light(&mut self, index: u8) {
        if let Some(flag) = self.lights.get_mut(index as usize) {
            *flag = !*flag;
        } else {
            log::warn!("toggle for unknown light {}", index);
        }
    }

    /// Clamp-add to the score, respecting the terminal bound
    pub fn add_score(&mut self, delta: i8) {
        self.score = (self.score + delta).clamp(-SCORE_LIMIT, SCORE_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_turn_wraps_and_refreshes_look() {
        let mut cam = Camera::facing(350.0, Vec3::ZERO);
        cam.turn(20.0);
        assert!((cam.angle - 10.0).abs() < 1e-4);
        let (x, z) = crate::look_vector(cam.angle);
        assert!((cam.look.x - x).abs() < 1e-6);
        assert!((cam.look.z - z).abs() < 1e-6);
    }

    #[test]
    fn test_score_clamped_at_bounds() {
        let mut state = SceneState::new(1);
        state.score = 3;
        state.add_score(1);
        assert_eq!(state.score, 3);
        state.score = -3;
        state.add_score(-1);
        assert_eq!(state.score, -3);
    }

    #[test]
    fn test_toggle_light_ignores_bad_index() {
        let mut state = SceneState::new(1);
        state.toggle_light(0);
        assert!(!state.lights[0]);
        state.toggle_light(7);
        assert_eq!(state.lights, [false, true]);
    }

    #[test]
    fn test_entity_spin_stays_wrapped() {
        let mut e = Entity::new(EntityKind::Spinner, GeometryId::Cube);
        e.spin_deg_per_sec = 180.0;
        for _ in 0..100 {
            e.spin(0.5);
            assert!((0.0..360.0).contains(&e.rotation_deg));
        }
    }
}
